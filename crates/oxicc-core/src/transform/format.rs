//! Pixel formats and alpha conventions

/// Memory layout of one pixel
///
/// Packed 565 and 1010102 words are little-endian. 16-bit channels are
/// big-endian. Half and float channels are little-endian IEEE 754.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    Rgb565,
    Bgr565,
    Rgb888,
    Bgr888,
    Rgba8888,
    Bgra8888,
    Rgba1010102,
    Bgra1010102,
    Rgb161616,
    Bgr161616,
    Rgba16161616,
    Bgra16161616,
    RgbHhh,
    BgrHhh,
    RgbaHhhh,
    BgraHhhh,
    RgbFff,
    BgrFff,
    RgbaFfff,
    BgraFfff,
}

/// Channel storage shared by an RGB format and its BGR twin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Storage {
    Packed565,
    U8x3,
    U8x4,
    Packed1010102,
    U16x3,
    U16x4,
    F16x3,
    F16x4,
    F32x3,
    F32x4,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 20] = [
        Self::Rgb565,
        Self::Bgr565,
        Self::Rgb888,
        Self::Bgr888,
        Self::Rgba8888,
        Self::Bgra8888,
        Self::Rgba1010102,
        Self::Bgra1010102,
        Self::Rgb161616,
        Self::Bgr161616,
        Self::Rgba16161616,
        Self::Bgra16161616,
        Self::RgbHhh,
        Self::BgrHhh,
        Self::RgbaHhhh,
        Self::BgraHhhh,
        Self::RgbFff,
        Self::BgrFff,
        Self::RgbaFfff,
        Self::BgraFfff,
    ];

    pub(crate) const fn storage(self) -> Storage {
        match self {
            Self::Rgb565 | Self::Bgr565 => Storage::Packed565,
            Self::Rgb888 | Self::Bgr888 => Storage::U8x3,
            Self::Rgba8888 | Self::Bgra8888 => Storage::U8x4,
            Self::Rgba1010102 | Self::Bgra1010102 => Storage::Packed1010102,
            Self::Rgb161616 | Self::Bgr161616 => Storage::U16x3,
            Self::Rgba16161616 | Self::Bgra16161616 => Storage::U16x4,
            Self::RgbHhh | Self::BgrHhh => Storage::F16x3,
            Self::RgbaHhhh | Self::BgraHhhh => Storage::F16x4,
            Self::RgbFff | Self::BgrFff => Storage::F32x3,
            Self::RgbaFfff | Self::BgraFfff => Storage::F32x4,
        }
    }

    /// Bytes per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self.storage() {
            Storage::Packed565 => 2,
            Storage::U8x3 => 3,
            Storage::U8x4 | Storage::Packed1010102 => 4,
            Storage::U16x3 | Storage::F16x3 => 6,
            Storage::U16x4 | Storage::F16x4 => 8,
            Storage::F32x3 => 12,
            Storage::F32x4 => 16,
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(
            self.storage(),
            Storage::U8x4 | Storage::Packed1010102 | Storage::U16x4 | Storage::F16x4 | Storage::F32x4
        )
    }

    /// Red and blue are stored swapped
    pub const fn is_bgr(self) -> bool {
        matches!(
            self,
            Self::Bgr565
                | Self::Bgr888
                | Self::Bgra8888
                | Self::Bgra1010102
                | Self::Bgr161616
                | Self::Bgra16161616
                | Self::BgrHhh
                | Self::BgraHhhh
                | Self::BgrFff
                | Self::BgraFfff
        )
    }

    /// Whether stores clamp to [0, 1]; half and float keep the full range
    pub const fn is_normalized(self) -> bool {
        !matches!(
            self.storage(),
            Storage::F16x3 | Storage::F16x4 | Storage::F32x3 | Storage::F32x4
        )
    }
}

/// How color channels relate to alpha
///
/// Alpha itself is always linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlphaFormat {
    /// Alpha is ignored on load and written as 1
    Opaque,
    /// Color is independent of alpha
    #[default]
    Unpremul,
    /// Color was multiplied by alpha after encoding
    PremulAsEncoded,
    /// Color was multiplied by alpha in linear space, then encoded
    PremulLinear,
}
