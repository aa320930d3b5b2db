//! Deterministic stand-in for a JPEG-LS entropy coder.
//!
//! `StoredBackend` writes real SOI/SOF-55/SOS/EOI framing around the raw samples,
//! so header parsing and end marker trimming run against genuine marker layouts
//! while the sample bytes round trip unchanged.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use jpegls_frames::jpeg_stream_reader::JpegStreamReader;
use jpegls_frames::jpeg_stream_writer::JpegStreamWriter;
use jpegls_frames::{
    BackendError, CancellationFlag, CompressedFrameHeader, EncodeConfiguration,
    FragmentSequence, JpeglsBackend, Region,
};

#[derive(Default)]
pub struct StoredBackend {
    /// Refuse to encode any frame whose first sample equals this value.
    pub fail_on_first_sample: Option<u8>,
    /// Report this many bytes written regardless of the real length.
    pub claimed_length: Option<usize>,
    /// Raised from inside every encode and decode call, after the frame is coded.
    pub cancel_during_call: Option<CancellationFlag>,
    pub encode_calls: AtomicUsize,
    pub decode_calls: AtomicUsize,
    pub configs: Mutex<Vec<EncodeConfiguration>>,
}

impl StoredBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(first_sample: u8) -> Self {
        Self {
            fail_on_first_sample: Some(first_sample),
            ..Self::default()
        }
    }

    pub fn cancelling(flag: &CancellationFlag) -> Self {
        Self {
            cancel_during_call: Some(flag.clone()),
            ..Self::default()
        }
    }

    fn raise_cancel(&self) {
        if let Some(flag) = &self.cancel_during_call {
            flag.cancel();
        }
    }

    pub fn recorded_configs(&self) -> Vec<EncodeConfiguration> {
        self.configs.lock().unwrap().clone()
    }
}

fn header_from_config(config: &EncodeConfiguration) -> CompressedFrameHeader {
    CompressedFrameHeader {
        width: config.width,
        height: config.height,
        bits_per_sample: config.bits_per_sample,
        component_count: config.component_count,
        allowed_lossy_error: config.allowed_lossy_error,
        interleave_mode: config.interleave_mode,
    }
}

fn bytes_per_pixel(header: &CompressedFrameHeader) -> usize {
    (header.bits_per_sample as usize).div_ceil(8) * header.component_count as usize
}

/// Framing overhead of a stream produced by `StoredBackend` for `component_count`.
pub fn framing_len(component_count: u8) -> usize {
    let scan_components = component_count.min(4) as usize;
    2 + (2 + 8 + 3 * component_count as usize) + (2 + 6 + 2 * scan_components) + 2
}

impl JpeglsBackend for StoredBackend {
    fn decode(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        destination: &mut [u8],
    ) -> Result<(), BackendError> {
        self.decode_calls.fetch_add(1, Ordering::SeqCst);
        let mut reader = JpegStreamReader::new(source);
        reader.read_header()?;
        let samples = reader.remaining_data();
        let needed = header.width as usize * header.height as usize * bytes_per_pixel(header);
        if samples.len() < needed + 2 {
            return Err(BackendError::InvalidData);
        }
        if destination.len() < needed {
            return Err(BackendError::DestinationTooSmall {
                needed,
                available: destination.len(),
            });
        }
        destination[..needed].copy_from_slice(&samples[..needed]);
        self.raise_cancel();
        Ok(())
    }

    fn decode_region(
        &self,
        source: &[u8],
        header: &CompressedFrameHeader,
        region: Region,
        destination: &mut [u8],
    ) -> Result<(), BackendError> {
        if !region.fits_within(header) {
            return Err(BackendError::Unsupported("region outside frame".into()));
        }
        let needed = region.decoded_len(header).ok_or(BackendError::InvalidData)?;
        if destination.len() < needed {
            return Err(BackendError::DestinationTooSmall {
                needed,
                available: destination.len(),
            });
        }

        let mut full = vec![0u8; header.decoded_len().map_err(|_| BackendError::InvalidData)?];
        self.decode(source, header, &mut full)?;

        let pixel = bytes_per_pixel(header);
        let row_len = region.width as usize * pixel;
        for row in 0..region.height as usize {
            let y = region.y as usize + row;
            let start = (y * header.width as usize + region.x as usize) * pixel;
            destination[row * row_len..(row + 1) * row_len]
                .copy_from_slice(&full[start..start + row_len]);
        }
        Ok(())
    }

    fn encode(
        &self,
        source: &[u8],
        config: &EncodeConfiguration,
        destination: &mut [u8],
    ) -> Result<usize, BackendError> {
        self.encode_calls.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().unwrap().push(*config);

        if self.fail_on_first_sample.is_some()
            && source.first() == self.fail_on_first_sample.as_ref()
        {
            return Err(BackendError::Other("injected encode failure".into()));
        }

        let header = header_from_config(config);
        let expected = header.decoded_len().map_err(|_| BackendError::InvalidData)?;
        if source.len() != expected {
            return Err(BackendError::InvalidData);
        }
        let needed = framing_len(config.component_count) + source.len();
        if destination.len() < needed {
            return Err(BackendError::DestinationTooSmall {
                needed,
                available: destination.len(),
            });
        }

        let mut writer = JpegStreamWriter::new(destination);
        writer.write_start_of_image()?;
        writer.write_start_of_frame_jpegls(&header)?;
        writer.write_start_of_scan_segment(
            config.component_count.min(4),
            config.allowed_lossy_error,
            config.interleave_mode,
        )?;
        writer.write_bytes(source)?;
        writer.write_end_of_image()?;
        self.raise_cancel();

        Ok(self.claimed_length.unwrap_or(writer.len()))
    }
}

/// Deterministic 8-bit samples for `frames` frames of `width * height * components`.
pub fn gradient(width: u32, height: u32, components: u8, frames: u32) -> Vec<u8> {
    let len = width as usize * height as usize * components as usize * frames as usize;
    (0..len).map(|i| ((i * 7 + i / 13) % 251) as u8).collect()
}

/// Copies every fragment with `padding` extra bytes appended after EOI.
pub fn pad_fragments(fragments: &FragmentSequence, padding: &[u8]) -> FragmentSequence {
    fragments
        .iter()
        .map(|f| {
            let mut bytes = f.to_vec();
            bytes.extend_from_slice(padding);
            bytes.into()
        })
        .collect()
}
