//! Header introspection: reading a compressed frame's geometry and mapping it to
//! the DICOM image pixel description.

use crate::CompressedFrameHeader;
use crate::backend::JpeglsBackend;
use crate::error::CodecError;
use crate::pixel_format::{PhotometricInterpretation, PixelFormat, ScalarType};
use crate::transfer_syntax::TransferSyntax;

/// What a JPEG-LS stream says about the image it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub header: CompressedFrameHeader,
    pub pixel_format: PixelFormat,
    pub photometric: PhotometricInterpretation,
    pub transfer_syntax: TransferSyntax,
}

impl ImageDescriptor {
    /// The NEAR bound of a near-lossless stream. Recorded only; never enforced here.
    pub fn lossy_error(&self) -> Option<u8> {
        self.transfer_syntax
            .is_lossy()
            .then_some(self.header.allowed_lossy_error)
    }
}

/// Reads the frame header of `buffer` through `backend` without decoding any samples.
pub fn peek<B: JpeglsBackend + ?Sized>(
    backend: &B,
    buffer: &[u8],
) -> Result<CompressedFrameHeader, CodecError> {
    backend
        .read_header(buffer)
        .map_err(CodecError::HeaderParseFailure)
}

/// Maps a frame header onto pixel format, photometric interpretation and transfer syntax.
pub fn describe(header: &CompressedFrameHeader) -> Result<ImageDescriptor, CodecError> {
    let pixel_format = match header.bits_per_sample {
        8 => PixelFormat::new(ScalarType::Uint8),
        12 => PixelFormat::new(ScalarType::Uint16).with_bits_stored(12),
        16 => PixelFormat::new(ScalarType::Uint16),
        bits => return Err(CodecError::UnsupportedSampleDepth(bits)),
    };
    let photometric = PhotometricInterpretation::from_component_count(header.component_count)?;

    Ok(ImageDescriptor {
        header: *header,
        pixel_format: pixel_format.with_samples_per_pixel(photometric.samples_per_pixel()),
        photometric,
        transfer_syntax: TransferSyntax::from_lossy_error(header.allowed_lossy_error),
    })
}
