use thiserror::Error;

/// Errors raised while reading or writing JPEG-LS marker segments.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegStreamError {
    #[error("Need more data")]
    NeedMoreData = 1,
    #[error("Destination too small")]
    DestinationTooSmall = 2,
    #[error("JPEG marker start byte not found")]
    JpegMarkerStartByteNotFound = 3,
    #[error("Start of image marker not found")]
    StartOfImageMarkerNotFound = 4,
    #[error("Unknown JPEG marker found")]
    UnknownJpegMarkerFound = 5,
    #[error("Invalid marker segment size")]
    InvalidMarkerSegmentSize = 6,
    #[error("Duplicate start of frame marker")]
    DuplicateStartOfFrameMarker = 7,
    #[error("Start of frame marker not found")]
    StartOfFrameMarkerNotFound = 8,
    #[error("Unexpected end of image marker")]
    UnexpectedEndOfImageMarker = 9,
    #[error("Invalid parameter width")]
    InvalidParameterWidth = 10,
    #[error("Invalid parameter height")]
    InvalidParameterHeight = 11,
    #[error("Invalid parameter bits per sample")]
    InvalidParameterBitsPerSample = 12,
    #[error("Invalid parameter component count")]
    InvalidParameterComponentCount = 13,
    #[error("Invalid parameter interleave mode")]
    InvalidParameterInterleaveMode = 14,
}

/// Failure reported by a compression backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("invalid compressed data")]
    InvalidData,
    #[error(transparent)]
    Stream(#[from] JpegStreamError),
    #[error("destination too small: {needed} bytes needed, {available} available")]
    DestinationTooSmall { needed: usize, available: usize },
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("{0}")]
    Other(String),
}

/// Errors returned by the framing engine.
///
/// Every variant is recoverable: malformed or truncated input is an ordinary
/// operating condition, never a reason to abort the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("failed to parse JPEG-LS header: {0}")]
    HeaderParseFailure(BackendError),
    #[error("unsupported bits per sample: {0}")]
    UnsupportedSampleDepth(u8),
    #[error("unsupported component count: {0}")]
    UnsupportedComponentCount(u8),
    #[error("buffer of {length} bytes does not split into {frames} equal frames")]
    FrameLengthMismatch { length: usize, frames: u32 },
    #[error("expected {expected} fragments, found {actual}")]
    FrameCountMismatch { expected: u32, actual: usize },
    #[error("volume declares no frames")]
    EmptyVolume,
    #[error("fragment {index} is empty")]
    EmptyFragment { index: usize },
    #[error("fragment {index} has no end of image marker")]
    MissingEndMarker { index: usize },
    #[error("encoded frame needs {required} bytes, scratch buffer holds {capacity}")]
    EncodeBufferOverflow { required: usize, capacity: usize },
    #[error("encode failed: {0}")]
    EncodeFailed(BackendError),
    #[error("decode failed: {0}")]
    DecodeFailed(BackendError),
    #[error("frame {index} header differs from the first frame")]
    InconsistentFrameHeader { index: usize },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    #[error("region bounds are inverted")]
    InvalidRegion,
    #[error("image size overflows addressable memory")]
    SizeOverflow,
    #[error("operation cancelled")]
    Cancelled,
    #[error("JPEG-LS backend unavailable")]
    CapabilityUnavailable,
}
