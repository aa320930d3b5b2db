//! The boundary to the JPEG-LS entropy coder.
//!
//! The framing engine never codes samples itself. It hands complete, trimmed
//! bitstreams and explicit per-frame configurations to a [`JpeglsBackend`] and
//! treats every call as atomic.

use crate::{ColorTransformation, CompressedFrameHeader, InterleaveMode};
use crate::error::BackendError;
use crate::jpeg_stream_reader::read_frame_header;

/// Parameters for encoding a single frame. Built fresh for every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeConfiguration {
    pub lossless: bool,
    /// NEAR parameter; always 0 when `lossless` is set.
    pub allowed_lossy_error: u8,
    pub interleave_mode: InterleaveMode,
    pub color_transform: ColorTransformation,
    pub width: u32,
    pub height: u32,
    pub bits_per_sample: u8,
    pub component_count: u8,
}

/// A rectangular window of a frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Bytes needed to hold the window with the sample layout of `header`.
    pub fn decoded_len(&self, header: &CompressedFrameHeader) -> Option<usize> {
        let bytes_per_sample = (header.bits_per_sample as usize).div_ceil(8);
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(bytes_per_sample)?
            .checked_mul(header.component_count as usize)
    }

    /// True when the window lies entirely inside the frame.
    pub fn fits_within(&self, header: &CompressedFrameHeader) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= header.width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= header.height)
    }
}

/// A JPEG-LS compression primitive.
///
/// Implementations must be callable from several threads at once; a backend that
/// is not reentrant serializes its own calls. All methods write only into the
/// destination they are given and report insufficient space as
/// [`BackendError::DestinationTooSmall`].
pub trait JpeglsBackend: Send + Sync {
    /// Reads the frame header of a complete JPEG-LS stream.
    fn read_header(&self, source: &[u8]) -> Result<CompressedFrameHeader, BackendError> {
        read_frame_header(source).map_err(BackendError::from)
    }

    /// Decodes a whole frame into `destination`, which holds exactly
    /// `header.decoded_len()` bytes.
    fn decode(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        destination: &mut [u8],
    ) -> Result<(), BackendError>;

    /// Decodes only `region` of the frame into `destination`.
    fn decode_region(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        region: Region,
        destination: &mut [u8],
    ) -> Result<(), BackendError>;

    /// Encodes one frame of samples into `destination` and returns the number of
    /// bytes written.
    fn encode(
        &self,
        source: &[u8],
        config: &EncodeConfiguration,
        destination: &mut [u8],
    ) -> Result<usize, BackendError>;
}

impl<B: JpeglsBackend + ?Sized> JpeglsBackend for &B {
    fn read_header(&self, source: &[u8]) -> Result<CompressedFrameHeader, BackendError> {
        (**self).read_header(source)
    }

    fn decode(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        destination: &mut [u8],
    ) -> Result<(), BackendError> {
        (**self).decode(source, header, destination)
    }

    fn decode_region(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        region: Region,
        destination: &mut [u8],
    ) -> Result<(), BackendError> {
        (**self).decode_region(source, header, region, destination)
    }

    fn encode(
        &self,
        source: &[u8],
        config: &EncodeConfiguration,
        destination: &mut [u8],
    ) -> Result<usize, BackendError> {
        (**self).encode(source, config, destination)
    }
}

impl<B: JpeglsBackend + ?Sized> JpeglsBackend for Box<B> {
    fn read_header(&self, source: &[u8]) -> Result<CompressedFrameHeader, BackendError> {
        (**self).read_header(source)
    }

    fn decode(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        destination: &mut [u8],
    ) -> Result<(), BackendError> {
        (**self).decode(source, header, destination)
    }

    fn decode_region(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        region: Region,
        destination: &mut [u8],
    ) -> Result<(), BackendError> {
        (**self).decode_region(source, header, region, destination)
    }

    fn encode(
        &self,
        source: &[u8],
        config: &EncodeConfiguration,
        destination: &mut [u8],
    ) -> Result<usize, BackendError> {
        (**self).encode(source, config, destination)
    }
}
