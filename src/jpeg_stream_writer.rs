//! JPEG-LS marker segment writer.
//!
//! Backends use this to frame their entropy coded data: SOI, SOF-55, an optional
//! LSE preset segment, SOS, the scan data, and EOI.

use crate::CompressedFrameHeader;
use crate::InterleaveMode;
use crate::constants::{JPEG_MARKER_START_BYTE, PRESET_CODING_PARAMETERS_ID};
use crate::error::JpegStreamError;
use crate::jpeg_marker_code::JpegMarkerCode;

/// JPEG-LS preset coding parameters (LSE type 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PresetCodingParameters {
    pub maximum_sample_value: u16,
    pub threshold1: u16,
    pub threshold2: u16,
    pub threshold3: u16,
    pub reset_value: u16,
}

/// A writer that emits JPEG-LS markers into a caller supplied buffer.
pub struct JpegStreamWriter<'a> {
    destination: &'a mut [u8],
    position: usize,
}

impl<'a> JpegStreamWriter<'a> {
    pub fn new(destination: &'a mut [u8]) -> Self {
        Self {
            destination,
            position: 0,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    pub fn write_byte(&mut self, value: u8) -> Result<(), JpegStreamError> {
        let slot = self
            .destination
            .get_mut(self.position)
            .ok_or(JpegStreamError::DestinationTooSmall)?;
        *slot = value;
        self.position += 1;
        Ok(())
    }

    pub fn write_u16(&mut self, value: u16) -> Result<(), JpegStreamError> {
        self.write_bytes(&value.to_be_bytes())
    }

    pub fn write_bytes(&mut self, values: &[u8]) -> Result<(), JpegStreamError> {
        let end = self.position + values.len();
        if end > self.destination.len() {
            return Err(JpegStreamError::DestinationTooSmall);
        }
        self.destination[self.position..end].copy_from_slice(values);
        self.position = end;
        Ok(())
    }

    pub fn write_marker(&mut self, marker: JpegMarkerCode) -> Result<(), JpegStreamError> {
        self.write_byte(JPEG_MARKER_START_BYTE)?;
        self.write_byte(marker.into())
    }

    pub fn write_start_of_image(&mut self) -> Result<(), JpegStreamError> {
        self.write_marker(JpegMarkerCode::StartOfImage)
    }

    pub fn write_end_of_image(&mut self) -> Result<(), JpegStreamError> {
        self.write_marker(JpegMarkerCode::EndOfImage)
    }

    pub fn write_start_of_frame_jpegls(
        &mut self,
        header: &CompressedFrameHeader,
    ) -> Result<(), JpegStreamError> {
        let width =
            u16::try_from(header.width).map_err(|_| JpegStreamError::InvalidParameterWidth)?;
        let height =
            u16::try_from(header.height).map_err(|_| JpegStreamError::InvalidParameterHeight)?;

        self.write_marker(JpegMarkerCode::StartOfFrameJpegls)?;
        let length = 2 + 6 + header.component_count as usize * 3;
        self.write_u16(length as u16)?;

        self.write_byte(header.bits_per_sample)?;
        self.write_u16(height)?;
        self.write_u16(width)?;
        self.write_byte(header.component_count)?;

        for i in 0..header.component_count {
            self.write_byte(i + 1)?; // Component ID
            self.write_byte(0x11)?; // H=1, V=1
            self.write_byte(0)?; // Tq
        }
        Ok(())
    }

    /// Writes one SOS segment covering `component_count` components starting at ID 1.
    pub fn write_start_of_scan_segment(
        &mut self,
        component_count: u8,
        near_lossless: u8,
        interleave_mode: InterleaveMode,
    ) -> Result<(), JpegStreamError> {
        self.write_marker(JpegMarkerCode::StartOfScan)?;
        let length = 2 + 1 + component_count as usize * 2 + 3;
        self.write_u16(length as u16)?;

        self.write_byte(component_count)?;
        for i in 0..component_count {
            self.write_byte(i + 1)?;
            self.write_byte(0)?; // Mapping table selector
        }

        self.write_byte(near_lossless)?;
        self.write_byte(interleave_mode.into())?;
        self.write_byte(0)?; // Point transform
        Ok(())
    }

    pub fn write_jpegls_preset_parameters_segment(
        &mut self,
        pc: &PresetCodingParameters,
    ) -> Result<(), JpegStreamError> {
        self.write_marker(JpegMarkerCode::JpeglsPresetParameters)?;
        self.write_u16(2 + 1 + 5 * 2)?;
        self.write_byte(PRESET_CODING_PARAMETERS_ID)?;

        self.write_u16(pc.maximum_sample_value)?;
        self.write_u16(pc.threshold1)?;
        self.write_u16(pc.threshold2)?;
        self.write_u16(pc.threshold3)?;
        self.write_u16(pc.reset_value)?;
        Ok(())
    }

    pub fn remaining_slice(&mut self) -> &mut [u8] {
        let start = self.position.min(self.destination.len());
        &mut self.destination[start..]
    }

    /// Accounts for `count` bytes written directly into [`remaining_slice`](Self::remaining_slice).
    pub fn advance(&mut self, count: usize) -> Result<(), JpegStreamError> {
        if self.position + count > self.destination.len() {
            return Err(JpegStreamError::DestinationTooSmall);
        }
        self.position += count;
        Ok(())
    }
}
