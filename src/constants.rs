pub const JPEG_MARKER_START_BYTE: u8 = 0xFF;

/// Second byte of the EOI marker. Fragments are trimmed back to the last occurrence.
pub const JPEG_END_OF_IMAGE_BYTE: u8 = 0xD9;

pub const JPEGLS_LOSSLESS_UID: &str = "1.2.840.10008.1.2.4.80";
pub const JPEGLS_NEAR_LOSSLESS_UID: &str = "1.2.840.10008.1.2.4.81";

pub const MINIMUM_BITS_PER_SAMPLE: u8 = 2;
pub const MAXIMUM_BITS_PER_SAMPLE: u8 = 16;
pub const MAXIMUM_COMPONENT_COUNT_IN_SCAN: u8 = 4;

// Scratch space per pixel handed to the encoder. A loose upper bound, not a tight fit.
pub const ENCODE_SCRATCH_BYTES_PER_PIXEL: usize = 4;

// The size in bytes of the segment length field.
pub const SEGMENT_LENGTH_SIZE: usize = 2;

// LSE parameter type 1: preset coding parameters (ISO/IEC 14495-1, C.2.4.1.1).
pub const PRESET_CODING_PARAMETERS_ID: u8 = 1;
