//! The frame codec driver.
//!
//! [`JpeglsCodec`] owns the per-frame loop for both directions. A multi-frame
//! encode or decode is a transaction: the caller gets every frame or an error,
//! never a partial fragment sequence or sample buffer.

use std::borrow::Cow;

use crate::{ColorTransformation, CompressedFrameHeader, InterleaveMode};
use crate::backend::{EncodeConfiguration, JpeglsBackend};
use crate::cancel::CancellationFlag;
use crate::constants::{
    ENCODE_SCRATCH_BYTES_PER_PIXEL, MAXIMUM_BITS_PER_SAMPLE, MINIMUM_BITS_PER_SAMPLE,
};
use crate::error::{BackendError, CodecError};
use crate::fragment::{Fragment, FragmentSequence, PixelData};
use crate::fragment_assembler::{join_for_decode, split_for_encode};
use crate::header::{ImageDescriptor, describe, peek};
use crate::pixel_format::PixelFormat;

/// How the frames of an image are laid out in its pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// A 2-D image; its bitstream may span any number of fragments.
    Single,
    /// A volume of `frames` slices, one fragment per slice.
    Volume { frames: u32 },
}

impl FrameLayout {
    pub fn frame_count(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Volume { frames } => frames,
        }
    }

    pub fn is_multi_frame(self) -> bool {
        matches!(self, Self::Volume { .. })
    }
}

/// Declared dimensions of the image being encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
    pub layout: FrameLayout,
}

impl ImageGeometry {
    pub fn single(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layout: FrameLayout::Single,
        }
    }

    pub fn volume(width: u32, height: u32, frames: u32) -> Self {
        Self {
            width,
            height,
            layout: FrameLayout::Volume { frames },
        }
    }

    pub fn frame_count(&self) -> u32 {
        self.layout.frame_count()
    }
}

/// Caller policy for encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub lossless: bool,
    /// NEAR bound used when `lossless` is false.
    pub lossy_error: u8,
}

impl CodecOptions {
    pub fn lossless() -> Self {
        Self {
            lossless: true,
            lossy_error: 0,
        }
    }

    pub fn near_lossless(lossy_error: u8) -> Self {
        Self {
            lossless: false,
            lossy_error,
        }
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::lossless()
    }
}

/// Samples of every frame, concatenated in frame order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrames {
    pub data: Vec<u8>,
    pub descriptor: ImageDescriptor,
    pub frame_count: u32,
}

impl DecodedFrames {
    pub fn frame_len(&self) -> usize {
        self.data.len() / self.frame_count.max(1) as usize
    }

    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        let len = self.frame_len();
        let start = index.checked_mul(len)?;
        self.data.get(start..start.checked_add(len)?)
    }
}

/// JPEG-LS codec bound to an optional compression backend.
///
/// Without a backend every capability query answers false and every operation
/// fails with [`CodecError::CapabilityUnavailable`].
pub struct JpeglsCodec<B = Box<dyn JpeglsBackend>> {
    backend: Option<B>,
}

impl<B: JpeglsBackend> JpeglsCodec<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub(crate) fn backend(&self) -> Result<&B, CodecError> {
        self.backend.as_ref().ok_or(CodecError::CapabilityUnavailable)
    }

    /// Reads the frame header of a complete bitstream.
    pub fn peek(&self, buffer: &[u8]) -> Result<CompressedFrameHeader, CodecError> {
        peek(self.backend()?, buffer)
    }

    /// Describes the image held in `fragments` from the header of its first frame.
    pub fn header_info(
        &self,
        fragments: &FragmentSequence,
        layout: FrameLayout,
    ) -> Result<ImageDescriptor, CodecError> {
        let backend = self.backend()?;
        let streams = join_for_decode(fragments, layout)?;
        let first = streams.first().ok_or(CodecError::FrameCountMismatch {
            expected: layout.frame_count(),
            actual: 0,
        })?;
        describe(&peek(backend, first)?)
    }

    /// Compresses `raw`, holding `geometry.frame_count()` equally sized frames,
    /// into one fragment per frame.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(width = geometry.width, height = geometry.height, frames = geometry.frame_count())
    )]
    pub fn encode(
        &self,
        raw: &[u8],
        geometry: &ImageGeometry,
        pixel_format: &PixelFormat,
        options: CodecOptions,
        cancel: Option<&CancellationFlag>,
    ) -> Result<FragmentSequence, CodecError> {
        let backend = self.backend()?;
        let frames = split_for_encode(raw, geometry.frame_count())?;
        let capacity = (geometry.width as usize)
            .checked_mul(geometry.height as usize)
            .and_then(|n| n.checked_mul(ENCODE_SCRATCH_BYTES_PER_PIXEL))
            .ok_or(CodecError::SizeOverflow)?;

        let result = map_frames(frames, |index, frame| {
            check_cancelled(cancel)?;
            let config = encode_configuration(geometry, pixel_format, options)?;
            let mut scratch = vec![0u8; capacity];
            let written = backend
                .encode(frame, &config, &mut scratch)
                .map_err(|err| match err {
                    BackendError::DestinationTooSmall { needed, .. } => {
                        CodecError::EncodeBufferOverflow {
                            required: needed,
                            capacity,
                        }
                    }
                    other => CodecError::EncodeFailed(other),
                })?;
            if written > capacity {
                return Err(CodecError::EncodeBufferOverflow {
                    required: written,
                    capacity,
                });
            }
            scratch.truncate(written);
            tracing::debug!(frame = index, bytes = written, "encoded frame");
            Ok(Fragment::from(scratch))
        });

        match result {
            Ok(fragments) => Ok(fragments.into_iter().collect()),
            Err(err) => {
                tracing::warn!(error = %err, "encode aborted, no fragments published");
                Err(err)
            }
        }
    }

    /// Decodes every frame of `fragments` and concatenates the samples in frame order.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(fragments = fragments.len(), layout = ?layout)
    )]
    pub fn decode(
        &self,
        fragments: &FragmentSequence,
        layout: FrameLayout,
        cancel: Option<&CancellationFlag>,
    ) -> Result<DecodedFrames, CodecError> {
        let result = self.decode_frames(fragments, layout, cancel);
        if let Err(err) = &result {
            tracing::warn!(error = %err, "decode aborted, no samples returned");
        }
        result
    }

    fn decode_frames(
        &self,
        fragments: &FragmentSequence,
        layout: FrameLayout,
        cancel: Option<&CancellationFlag>,
    ) -> Result<DecodedFrames, CodecError> {
        let backend = self.backend()?;
        let streams = join_for_decode(fragments, layout)?;

        // Headers are read up front so that a volume with mixed geometry fails
        // before any sample is decoded.
        let headers = streams
            .iter()
            .map(|stream| peek(backend, stream))
            .collect::<Result<Vec<_>, _>>()?;
        let first = *headers.first().ok_or(CodecError::FrameCountMismatch {
            expected: layout.frame_count(),
            actual: 0,
        })?;
        if let Some(index) = headers.iter().position(|h| !h.same_geometry(&first)) {
            return Err(CodecError::InconsistentFrameHeader { index });
        }

        let descriptor = describe(&first)?;
        let frame_len = first.decoded_len()?;
        let total_len = frame_len
            .checked_mul(streams.len())
            .ok_or(CodecError::SizeOverflow)?;

        let jobs: Vec<(Cow<'_, [u8]>, CompressedFrameHeader)> =
            streams.into_iter().zip(headers).collect();
        let frame_count = jobs.len() as u32;
        let decoded = map_frames(jobs, |index, (stream, header)| {
            check_cancelled(cancel)?;
            let mut samples = vec![0u8; frame_len];
            backend
                .decode(&stream, &header, &mut samples)
                .map_err(CodecError::DecodeFailed)?;
            tracing::debug!(
                frame = index,
                near = header.allowed_lossy_error,
                "decoded frame"
            );
            Ok(samples)
        })?;

        let mut data = Vec::with_capacity(total_len);
        for samples in decoded {
            data.extend_from_slice(&samples);
        }

        Ok(DecodedFrames {
            data,
            descriptor,
            frame_count,
        })
    }

    /// Encodes a native pixel data value into an encapsulated one.
    pub fn encode_pixel_data(
        &self,
        input: &PixelData,
        geometry: &ImageGeometry,
        pixel_format: &PixelFormat,
        options: CodecOptions,
    ) -> Result<PixelData, CodecError> {
        let raw = input
            .as_native()
            .ok_or(CodecError::UnsupportedOperation("pixel data is already encapsulated"))?;
        self.encode(raw, geometry, pixel_format, options, None)
            .map(PixelData::Encapsulated)
    }

    /// Decodes an encapsulated pixel data value into a native one.
    pub fn decode_pixel_data(
        &self,
        input: &PixelData,
        layout: FrameLayout,
    ) -> Result<PixelData, CodecError> {
        let fragments = input
            .as_fragments()
            .ok_or(CodecError::UnsupportedOperation("pixel data is not encapsulated"))?;
        self.decode(fragments, layout, None)
            .map(|decoded| PixelData::Native(decoded.data))
    }
}

/// Builds the configuration for one frame.
///
/// The sample precision handed to the encoder is always `bits_allocated`, even for
/// signed data or when fewer bits are stored.
pub fn encode_configuration(
    geometry: &ImageGeometry,
    pixel_format: &PixelFormat,
    options: CodecOptions,
) -> Result<EncodeConfiguration, CodecError> {
    let bits_per_sample = u8::try_from(pixel_format.bits_allocated)
        .ok()
        .filter(|bits| (MINIMUM_BITS_PER_SAMPLE..=MAXIMUM_BITS_PER_SAMPLE).contains(bits))
        .ok_or(CodecError::UnsupportedSampleDepth(
            pixel_format.bits_allocated.min(u8::MAX as u16) as u8,
        ))?;
    let component_count = u8::try_from(pixel_format.samples_per_pixel)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(CodecError::UnsupportedComponentCount(
            pixel_format.samples_per_pixel.min(u8::MAX as u16) as u8,
        ))?;

    let (interleave_mode, color_transform) = match component_count {
        4 => (InterleaveMode::Line, ColorTransformation::None),
        3 => (InterleaveMode::Line, ColorTransformation::Hp1),
        _ => (InterleaveMode::None, ColorTransformation::None),
    };

    Ok(EncodeConfiguration {
        lossless: options.lossless,
        allowed_lossy_error: if options.lossless { 0 } else { options.lossy_error },
        interleave_mode,
        color_transform,
        width: geometry.width,
        height: geometry.height,
        bits_per_sample,
        component_count,
    })
}

fn check_cancelled(cancel: Option<&CancellationFlag>) -> Result<(), CodecError> {
    match cancel {
        Some(flag) if flag.is_cancelled() => Err(CodecError::Cancelled),
        _ => Ok(()),
    }
}

/// Runs `f` over every frame and collects the results in frame order, stopping at
/// the first error.
#[cfg(not(feature = "parallel"))]
fn map_frames<I, T, F>(items: Vec<I>, f: F) -> Result<Vec<T>, CodecError>
where
    F: Fn(usize, I) -> Result<T, CodecError>,
{
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| f(index, item))
        .collect()
}

#[cfg(feature = "parallel")]
fn map_frames<I, T, F>(items: Vec<I>, f: F) -> Result<Vec<T>, CodecError>
where
    I: Send,
    T: Send,
    F: Fn(usize, I) -> Result<T, CodecError> + Send + Sync,
{
    use rayon::prelude::*;

    items
        .into_par_iter()
        .enumerate()
        .map(|(index, item)| f(index, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_format::ScalarType;

    #[test]
    fn configuration_uses_bits_allocated() {
        let geometry = ImageGeometry::single(8, 8);
        let pf = PixelFormat::new(ScalarType::Int16).with_bits_stored(13);
        let config = encode_configuration(&geometry, &pf, CodecOptions::lossless()).unwrap();
        assert_eq!(config.bits_per_sample, 16);
        assert_eq!(config.component_count, 1);
        assert_eq!(config.interleave_mode, InterleaveMode::None);
        assert_eq!(config.color_transform, ColorTransformation::None);
    }

    #[test]
    fn configuration_interleave_policy() {
        let geometry = ImageGeometry::single(8, 8);
        let rgb = PixelFormat::new(ScalarType::Uint8).with_samples_per_pixel(3);
        let config = encode_configuration(&geometry, &rgb, CodecOptions::lossless()).unwrap();
        assert_eq!(config.interleave_mode, InterleaveMode::Line);
        assert_eq!(config.color_transform, ColorTransformation::Hp1);

        let cmyk = rgb.with_samples_per_pixel(4);
        let config = encode_configuration(&geometry, &cmyk, CodecOptions::lossless()).unwrap();
        assert_eq!(config.interleave_mode, InterleaveMode::Line);
        assert_eq!(config.color_transform, ColorTransformation::None);
    }

    #[test]
    fn configuration_lossy_error_follows_policy() {
        let geometry = ImageGeometry::single(8, 8);
        let pf = PixelFormat::new(ScalarType::Uint8);

        let lossless = CodecOptions {
            lossless: true,
            lossy_error: 5,
        };
        let config = encode_configuration(&geometry, &pf, lossless).unwrap();
        assert_eq!(config.allowed_lossy_error, 0);

        let config = encode_configuration(&geometry, &pf, CodecOptions::near_lossless(3)).unwrap();
        assert!(!config.lossless);
        assert_eq!(config.allowed_lossy_error, 3);
    }

    #[test]
    fn configuration_rejects_unusable_storage() {
        let geometry = ImageGeometry::single(8, 8);
        let mut pf = PixelFormat::new(ScalarType::Uint16);
        pf.bits_allocated = 32;
        assert_eq!(
            encode_configuration(&geometry, &pf, CodecOptions::default()),
            Err(CodecError::UnsupportedSampleDepth(32))
        );
    }

    #[test]
    fn frame_lookup_is_bounded() {
        let decoded = DecodedFrames {
            data: (0..8).collect(),
            descriptor: describe(&CompressedFrameHeader {
                width: 2,
                height: 2,
                bits_per_sample: 8,
                component_count: 1,
                ..Default::default()
            })
            .unwrap(),
            frame_count: 2,
        };
        assert_eq!(decoded.frame(1), Some(&[4, 5, 6, 7][..]));
        assert_eq!(decoded.frame(2), None);
        assert_eq!(decoded.frame(usize::MAX / 8), None);
        assert_eq!(decoded.frame(usize::MAX), None);
    }

    #[test]
    fn layout_frame_counts() {
        assert_eq!(FrameLayout::Single.frame_count(), 1);
        assert_eq!(FrameLayout::Volume { frames: 4 }.frame_count(), 4);
        assert!(ImageGeometry::volume(2, 2, 4).layout.is_multi_frame());
    }
}
