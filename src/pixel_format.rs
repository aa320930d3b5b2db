use std::fmt;

use crate::error::CodecError;

/// Storage type of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Uint8,
    Int8,
    Uint12,
    Int12,
    Uint16,
    Int16,
}

impl ScalarType {
    fn layout(self) -> (u16, u16, u16) {
        // (bits allocated, bits stored, pixel representation)
        match self {
            Self::Uint8 => (8, 8, 0),
            Self::Int8 => (8, 8, 1),
            Self::Uint12 => (16, 12, 0),
            Self::Int12 => (16, 12, 1),
            Self::Uint16 => (16, 16, 0),
            Self::Int16 => (16, 16, 1),
        }
    }
}

/// The DICOM image pixel module attributes that describe one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormat {
    pub samples_per_pixel: u16,
    pub bits_allocated: u16,
    pub bits_stored: u16,
    pub high_bit: u16,
    /// 0 for unsigned samples, 1 for two's complement.
    pub pixel_representation: u16,
}

impl PixelFormat {
    pub fn new(scalar_type: ScalarType) -> Self {
        let (bits_allocated, bits_stored, pixel_representation) = scalar_type.layout();
        Self {
            samples_per_pixel: 1,
            bits_allocated,
            bits_stored,
            high_bit: bits_stored - 1,
            pixel_representation,
        }
    }

    pub fn with_samples_per_pixel(mut self, samples_per_pixel: u16) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    /// Narrows the meaningful bits; the high bit follows.
    pub fn with_bits_stored(mut self, bits_stored: u16) -> Self {
        self.bits_stored = bits_stored.min(self.bits_allocated).max(1);
        self.high_bit = self.bits_stored - 1;
        self
    }

    pub fn is_signed(&self) -> bool {
        self.pixel_representation == 1
    }

    pub fn bytes_per_sample(&self) -> usize {
        (self.bits_allocated as usize).div_ceil(8)
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_sample() * self.samples_per_pixel as usize
    }
}

/// Semantic meaning of the sample channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotometricInterpretation {
    Monochrome1,
    Monochrome2,
    PaletteColor,
    Rgb,
    YbrFull,
    YbrFull422,
}

impl PhotometricInterpretation {
    /// JPEG-LS streams carry no color space, so the component count decides.
    pub fn from_component_count(component_count: u8) -> Result<Self, CodecError> {
        match component_count {
            1 => Ok(Self::Monochrome2),
            3 => Ok(Self::Rgb),
            n => Err(CodecError::UnsupportedComponentCount(n)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monochrome1 => "MONOCHROME1",
            Self::Monochrome2 => "MONOCHROME2",
            Self::PaletteColor => "PALETTE COLOR",
            Self::Rgb => "RGB",
            Self::YbrFull => "YBR_FULL",
            Self::YbrFull422 => "YBR_FULL_422",
        }
    }

    pub fn samples_per_pixel(self) -> u16 {
        match self {
            Self::Monochrome1 | Self::Monochrome2 | Self::PaletteColor => 1,
            Self::Rgb | Self::YbrFull | Self::YbrFull422 => 3,
        }
    }
}

impl fmt::Display for PhotometricInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
