use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Marker codes that can appear in a JPEG-LS interchange stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum JpegMarkerCode {
    /// SOI
    StartOfImage = 0xD8,
    /// EOI; its second byte is what fragment trimming searches for.
    EndOfImage = 0xD9,
    /// SOS
    StartOfScan = 0xDA,
    /// DNL
    DefineNumberOfLines = 0xDC,
    /// DRI
    DefineRestartInterval = 0xDD,

    // APPn segments carry no frame geometry and are skipped while reading headers.
    ApplicationData0 = 0xE0,
    ApplicationData1 = 0xE1,
    ApplicationData2 = 0xE2,
    ApplicationData3 = 0xE3,
    ApplicationData4 = 0xE4,
    ApplicationData5 = 0xE5,
    ApplicationData6 = 0xE6,
    ApplicationData7 = 0xE7,
    ApplicationData8 = 0xE8,
    ApplicationData9 = 0xE9,
    ApplicationData10 = 0xEA,
    ApplicationData11 = 0xEB,
    ApplicationData12 = 0xEC,
    ApplicationData13 = 0xED,
    ApplicationData14 = 0xEE,
    ApplicationData15 = 0xEF,

    /// COM
    Comment = 0xFE,

    /// SOF-55, the only frame type a JPEG-LS transfer syntax may carry.
    StartOfFrameJpegls = 0xF7,
    /// LSE preset coding parameters.
    JpeglsPresetParameters = 0xF8,
}

impl JpegMarkerCode {
    /// Markers that carry a length-prefixed segment the header reader may skip.
    pub fn is_skippable_segment(self) -> bool {
        matches!(
            self,
            Self::DefineRestartInterval
                | Self::DefineNumberOfLines
                | Self::Comment
                | Self::JpeglsPresetParameters
        ) || (u8::from(self) & 0xF0) == 0xE0
    }
}
