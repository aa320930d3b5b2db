//! Bounds-checked reader for the header section of a JPEG-LS stream.
//!
//! Only the segments needed to describe a frame are interpreted: SOF-55 for the
//! geometry and the first SOS for NEAR and the interleave mode. Application data,
//! comments, preset parameters and restart intervals are skipped. Every read is
//! checked against the end of the source, so truncated input yields an error.

use crate::{CompressedFrameHeader, InterleaveMode};
use crate::constants::{
    JPEG_MARKER_START_BYTE, MAXIMUM_BITS_PER_SAMPLE, MAXIMUM_COMPONENT_COUNT_IN_SCAN,
    MINIMUM_BITS_PER_SAMPLE, SEGMENT_LENGTH_SIZE,
};
use crate::error::JpegStreamError;
use crate::jpeg_marker_code::JpegMarkerCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegStreamReaderState {
    BeforeStartOfImage,
    HeaderSection,
    ScanSection,
}

pub struct JpegStreamReader<'a> {
    source: &'a [u8],
    position: usize,
    state: JpegStreamReaderState,
    frame_header: Option<CompressedFrameHeader>,
}

impl<'a> JpegStreamReader<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            position: 0,
            state: JpegStreamReaderState::BeforeStartOfImage,
            frame_header: None,
        }
    }

    pub fn state(&self) -> JpegStreamReaderState {
        self.state
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes following the last segment read. After [`read_header`](Self::read_header)
    /// this is the entropy coded data of the first scan.
    pub fn remaining_data(&self) -> &'a [u8] {
        &self.source[self.position.min(self.source.len())..]
    }

    /// Reads up to and including the first SOS segment.
    pub fn read_header(&mut self) -> Result<CompressedFrameHeader, JpegStreamError> {
        self.read_start_of_image()?;

        loop {
            match self.read_marker()? {
                JpegMarkerCode::StartOfFrameJpegls => {
                    if self.frame_header.is_some() {
                        return Err(JpegStreamError::DuplicateStartOfFrameMarker);
                    }
                    self.read_start_of_frame_segment()?;
                }
                JpegMarkerCode::StartOfScan => {
                    let mut header = self
                        .frame_header
                        .ok_or(JpegStreamError::StartOfFrameMarkerNotFound)?;
                    self.read_start_of_scan_segment(&mut header)?;
                    self.frame_header = Some(header);
                    self.state = JpegStreamReaderState::ScanSection;
                    return Ok(header);
                }
                JpegMarkerCode::EndOfImage => {
                    return Err(JpegStreamError::UnexpectedEndOfImageMarker);
                }
                marker if marker.is_skippable_segment() => self.skip_segment()?,
                _ => return Err(JpegStreamError::UnknownJpegMarkerFound),
            }
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, JpegStreamError> {
        let value = *self
            .source
            .get(self.position)
            .ok_or(JpegStreamError::NeedMoreData)?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_u16(&mut self) -> Result<u16, JpegStreamError> {
        let b1 = self.read_u8()? as u16;
        let b2 = self.read_u8()? as u16;
        Ok((b1 << 8) | b2)
    }

    pub fn read_marker(&mut self) -> Result<JpegMarkerCode, JpegStreamError> {
        if self.read_u8()? != JPEG_MARKER_START_BYTE {
            return Err(JpegStreamError::JpegMarkerStartByteNotFound);
        }
        // Any number of 0xFF fill bytes may precede the marker code.
        let mut marker_byte = self.read_u8()?;
        while marker_byte == JPEG_MARKER_START_BYTE {
            marker_byte = self.read_u8()?;
        }
        JpegMarkerCode::try_from(marker_byte).map_err(|_| JpegStreamError::UnknownJpegMarkerFound)
    }

    fn read_start_of_image(&mut self) -> Result<(), JpegStreamError> {
        match self.read_marker() {
            Ok(JpegMarkerCode::StartOfImage) => {
                self.state = JpegStreamReaderState::HeaderSection;
                Ok(())
            }
            Err(JpegStreamError::NeedMoreData) => Err(JpegStreamError::NeedMoreData),
            _ => Err(JpegStreamError::StartOfImageMarkerNotFound),
        }
    }

    /// Reads the segment length and returns the number of payload bytes that follow.
    fn read_segment_size(&mut self) -> Result<usize, JpegStreamError> {
        let length = self.read_u16()? as usize;
        if length < SEGMENT_LENGTH_SIZE {
            return Err(JpegStreamError::InvalidMarkerSegmentSize);
        }
        Ok(length - SEGMENT_LENGTH_SIZE)
    }

    fn read_start_of_frame_segment(&mut self) -> Result<(), JpegStreamError> {
        let size = self.read_segment_size()?;
        if size < 6 {
            return Err(JpegStreamError::InvalidMarkerSegmentSize);
        }

        let bits_per_sample = self.read_u8()?;
        let height = self.read_u16()? as u32;
        let width = self.read_u16()? as u32;
        let component_count = self.read_u8()?;

        if !(MINIMUM_BITS_PER_SAMPLE..=MAXIMUM_BITS_PER_SAMPLE).contains(&bits_per_sample) {
            return Err(JpegStreamError::InvalidParameterBitsPerSample);
        }
        // A zero height would require DNL support, which DICOM fragments never use.
        if height == 0 {
            return Err(JpegStreamError::InvalidParameterHeight);
        }
        if width == 0 {
            return Err(JpegStreamError::InvalidParameterWidth);
        }
        if component_count == 0 {
            return Err(JpegStreamError::InvalidParameterComponentCount);
        }
        if size != 6 + 3 * component_count as usize {
            return Err(JpegStreamError::InvalidMarkerSegmentSize);
        }

        for _ in 0..component_count {
            let _id = self.read_u8()?;
            let _sampling = self.read_u8()?;
            let _tq = self.read_u8()?;
        }

        self.frame_header = Some(CompressedFrameHeader {
            width,
            height,
            bits_per_sample,
            component_count,
            ..Default::default()
        });
        Ok(())
    }

    fn read_start_of_scan_segment(
        &mut self,
        header: &mut CompressedFrameHeader,
    ) -> Result<(), JpegStreamError> {
        let size = self.read_segment_size()?;
        let components_in_scan = self.read_u8()?;
        if components_in_scan == 0
            || components_in_scan > MAXIMUM_COMPONENT_COUNT_IN_SCAN
            || components_in_scan > header.component_count
        {
            return Err(JpegStreamError::InvalidParameterComponentCount);
        }
        if size != 4 + 2 * components_in_scan as usize {
            return Err(JpegStreamError::InvalidMarkerSegmentSize);
        }

        for _ in 0..components_in_scan {
            let _id = self.read_u8()?;
            let _mapping_table = self.read_u8()?;
        }
        header.allowed_lossy_error = self.read_u8()?;
        header.interleave_mode = InterleaveMode::try_from(self.read_u8()?)
            .map_err(|_| JpegStreamError::InvalidParameterInterleaveMode)?;
        let _point_transform = self.read_u8()?;
        Ok(())
    }

    pub fn skip_segment(&mut self) -> Result<(), JpegStreamError> {
        let size = self.read_segment_size()?;
        let end = self
            .position
            .checked_add(size)
            .filter(|&end| end <= self.source.len())
            .ok_or(JpegStreamError::NeedMoreData)?;
        self.position = end;
        Ok(())
    }
}

/// Reads the frame header of a complete JPEG-LS stream without touching the scan data.
pub fn read_frame_header(source: &[u8]) -> Result<CompressedFrameHeader, JpegStreamError> {
    JpegStreamReader::new(source).read_header()
}
