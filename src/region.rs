//! Windowed decode of a single frame.

use crate::backend::{JpeglsBackend, Region};
use crate::codec::{FrameLayout, JpeglsCodec};
use crate::error::CodecError;
use crate::fragment::FragmentSequence;
use crate::fragment_assembler::join_for_decode;
use crate::header::peek;

/// Inclusive-exclusive pixel bounds of a window: columns `x_min..x_max`, rows `y_min..y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionBounds {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl RegionBounds {
    pub fn to_region(self) -> Result<Region, CodecError> {
        if self.x_max < self.x_min || self.y_max < self.y_min {
            return Err(CodecError::InvalidRegion);
        }
        Ok(Region {
            x: self.x_min,
            y: self.y_min,
            width: self.x_max - self.x_min,
            height: self.y_max - self.y_min,
        })
    }
}

impl<B: JpeglsBackend> JpeglsCodec<B> {
    /// Decodes the window `bounds` of a single frame straight into `destination`.
    ///
    /// The backend checks that `destination` is large enough; its refusal is
    /// returned unchanged as [`CodecError::DecodeFailed`]. Volumes are not supported.
    pub fn decode_region(
        &self,
        fragments: &FragmentSequence,
        layout: FrameLayout,
        bounds: RegionBounds,
        destination: &mut [u8],
    ) -> Result<(), CodecError> {
        let backend = self.backend()?;
        if layout.is_multi_frame() {
            return Err(CodecError::UnsupportedOperation(
                "windowed decode of a multi-frame image",
            ));
        }
        let region = bounds.to_region()?;

        let streams = join_for_decode(fragments, layout)?;
        let stream = &streams[0];
        let header = peek(backend, stream)?;
        tracing::debug!(?region, width = header.width, height = header.height, "decoding region");

        backend
            .decode_region(stream, &header, region, destination)
            .map_err(CodecError::DecodeFailed)
    }
}
