use crate::backend::JpeglsBackend;
use crate::codec::JpeglsCodec;
use crate::transfer_syntax::TransferSyntax;

impl<B: JpeglsBackend> JpeglsCodec<B> {
    /// True iff `uid` names a JPEG-LS transfer syntax and a backend is installed.
    pub fn can_decode(&self, uid: &str) -> bool {
        TransferSyntax::from_uid(uid).is_some_and(|ts| self.can_decode_syntax(ts))
    }

    /// True iff `uid` names a JPEG-LS transfer syntax and a backend is installed.
    pub fn can_encode(&self, uid: &str) -> bool {
        TransferSyntax::from_uid(uid).is_some_and(|ts| self.can_encode_syntax(ts))
    }

    pub fn can_decode_syntax(&self, _ts: TransferSyntax) -> bool {
        self.is_available()
    }

    pub fn can_encode_syntax(&self, _ts: TransferSyntax) -> bool {
        self.is_available()
    }

    /// The transfer syntaxes this codec will accept, empty without a backend.
    pub fn supported_transfer_syntaxes(&self) -> &'static [TransferSyntax] {
        if self.is_available() {
            &TransferSyntax::ALL
        } else {
            &[]
        }
    }
}
