use std::fmt;

use crate::constants::{JPEGLS_LOSSLESS_UID, JPEGLS_NEAR_LOSSLESS_UID};

/// The JPEG-LS transfer syntaxes this crate can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferSyntax {
    /// JPEG-LS Lossless Image Compression.
    JpeglsLossless,
    /// JPEG-LS Lossy (Near-Lossless) Image Compression.
    JpeglsNearLossless,
}

impl TransferSyntax {
    pub const ALL: [TransferSyntax; 2] = [Self::JpeglsLossless, Self::JpeglsNearLossless];

    pub fn uid(self) -> &'static str {
        match self {
            Self::JpeglsLossless => JPEGLS_LOSSLESS_UID,
            Self::JpeglsNearLossless => JPEGLS_NEAR_LOSSLESS_UID,
        }
    }

    /// Looks up a transfer syntax UID. Trailing NUL padding, as found in
    /// even-length DICOM UI values, is ignored.
    pub fn from_uid(uid: &str) -> Option<Self> {
        let uid = uid.trim_end_matches('\0');
        Self::ALL.into_iter().find(|ts| ts.uid() == uid)
    }

    /// The profile a stream was encoded with, given its NEAR parameter.
    pub fn from_lossy_error(allowed_lossy_error: u8) -> Self {
        if allowed_lossy_error == 0 {
            Self::JpeglsLossless
        } else {
            Self::JpeglsNearLossless
        }
    }

    pub fn is_lossy(self) -> bool {
        self == Self::JpeglsNearLossless
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::JpeglsLossless => "JPEG-LS Lossless Image Compression",
            Self::JpeglsNearLossless => "JPEG-LS Lossy (Near-Lossless) Image Compression",
        }
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.uid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_lookup_accepts_padded_values() {
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.4.80\0"),
            Some(TransferSyntax::JpeglsLossless)
        );
        assert_eq!(
            TransferSyntax::from_uid("1.2.840.10008.1.2.4.81"),
            Some(TransferSyntax::JpeglsNearLossless)
        );
    }

    #[test]
    fn other_uids_are_unknown() {
        for uid in ["1.2.840.10008.1.2.4.50", "1.2.840.10008.1.2.1", "", "1.2.840.10008.1.2.4.8"] {
            assert_eq!(TransferSyntax::from_uid(uid), None);
        }
    }

    #[test]
    fn lossy_error_selects_profile() {
        assert_eq!(TransferSyntax::from_lossy_error(0), TransferSyntax::JpeglsLossless);
        assert!(TransferSyntax::from_lossy_error(3).is_lossy());
    }
}
