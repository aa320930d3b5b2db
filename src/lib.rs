//! JPEG-LS encapsulated pixel data for DICOM.
//!
//! This crate frames raw multi-frame sample buffers into JPEG-LS fragments and
//! reassembles fragment sequences read back from a file. The entropy coder is
//! supplied by the caller through [`JpeglsBackend`]; this crate owns the framing,
//! header introspection, per-frame policy and the all-or-nothing frame loop.
//!
//! ```text
//! encode: raw samples -> split_for_encode -> backend.encode (per frame) -> FragmentSequence
//! decode: FragmentSequence -> join_for_decode / trim -> peek -> backend.decode -> samples
//! ```

pub mod backend;
pub mod cancel;
pub mod capability;
pub mod codec;
pub mod constants;
pub mod error;
pub mod fragment;
pub mod fragment_assembler;
pub mod header;
pub mod jpeg_marker_code;
pub mod jpeg_stream_reader;
pub mod jpeg_stream_writer;
pub mod pixel_format;
pub mod region;
pub mod transfer_syntax;

pub use backend::{EncodeConfiguration, JpeglsBackend, Region};
pub use cancel::CancellationFlag;
pub use codec::{CodecOptions, DecodedFrames, FrameLayout, ImageGeometry, JpeglsCodec};
pub use error::{BackendError, CodecError, JpegStreamError};
pub use fragment::{Fragment, FragmentSequence, PixelData};
pub use header::ImageDescriptor;
pub use pixel_format::{PhotometricInterpretation, PixelFormat, ScalarType};
pub use region::RegionBounds;
pub use transfer_syntax::TransferSyntax;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Interleave mode for multi-component scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum InterleaveMode {
    /// No interleaving (one scan per component).
    #[default]
    None = 0,
    /// Interleaved by line.
    Line = 1,
    /// Interleaved by sample.
    Sample = 2,
}

/// HP color transformation applied before encoding multi-component images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ColorTransformation {
    #[default]
    None = 0,
    Hp1 = 1,
    Hp2 = 2,
    Hp3 = 3,
}

/// Frame parameters read from the SOF-55 and SOS segments of a JPEG-LS stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressedFrameHeader {
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u8,
    pub component_count: u8,
    /// NEAR parameter of the first scan; 0 means lossless.
    pub allowed_lossy_error: u8,
    pub interleave_mode: InterleaveMode,
}

impl CompressedFrameHeader {
    /// Bytes needed to hold one decoded frame:
    /// `width * height * ceil(bits_per_sample / 8) * component_count`.
    pub fn decoded_len(&self) -> Result<usize, CodecError> {
        let bytes_per_sample = (self.bits_per_sample as usize).div_ceil(8);
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(bytes_per_sample))
            .and_then(|n| n.checked_mul(self.component_count as usize))
            .ok_or(CodecError::SizeOverflow)
    }

    /// True when two frames of a volume can share one output layout.
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.bits_per_sample == other.bits_per_sample
            && self.component_count == other.component_count
    }
}
