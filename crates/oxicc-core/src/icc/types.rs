//! ICC signature and date types

use std::fmt;

/// ICC Tag Signature (4-byte ASCII code)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagSignature(pub u32);

impl TagSignature {
    /// Create from 4 ASCII characters
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const A2B0: Self = Self::from_bytes(*b"A2B0");
    pub const RED_COLORANT: Self = Self::from_bytes(*b"rXYZ");
    pub const GREEN_COLORANT: Self = Self::from_bytes(*b"gXYZ");
    pub const BLUE_COLORANT: Self = Self::from_bytes(*b"bXYZ");
    pub const RED_TRC: Self = Self::from_bytes(*b"rTRC");
    pub const GREEN_TRC: Self = Self::from_bytes(*b"gTRC");
    pub const BLUE_TRC: Self = Self::from_bytes(*b"bTRC");
    pub const MEDIA_WHITE: Self = Self::from_bytes(*b"wtpt");
}

/// Type signatures at the start of every tag body
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeSignature(pub u32);

impl TypeSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
    pub const CURVE: Self = Self::from_bytes(*b"curv");
    pub const PARA: Self = Self::from_bytes(*b"para");
    pub const LUT8: Self = Self::from_bytes(*b"mft1");
    pub const LUT16: Self = Self::from_bytes(*b"mft2");
}

/// Data color space and PCS signatures from the header
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColorSpaceSignature(pub u32);

impl ColorSpaceSignature {
    pub const fn from_bytes(b: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(b))
    }

    pub const CMYK: Self = Self::from_bytes(*b"CMYK");
    pub const GRAY: Self = Self::from_bytes(*b"GRAY");
    pub const RGB: Self = Self::from_bytes(*b"RGB ");
    pub const LAB: Self = Self::from_bytes(*b"Lab ");
    pub const XYZ: Self = Self::from_bytes(*b"XYZ ");
}

/// Writes the signature as its four characters, or hex when not printable
fn fmt_fourcc(value: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let bytes = value.to_be_bytes();
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        bytes.iter().try_for_each(|&b| write!(f, "{}", b as char))
    } else {
        write!(f, "0x{:08X}", value)
    }
}

macro_rules! fourcc_fmt {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt_fourcc(self.0, f)
                }
            }

            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}(", stringify!($ty))?;
                    fmt_fourcc(self.0, f)?;
                    write!(f, ")")
                }
            }
        )*
    };
}

fourcc_fmt!(TagSignature, TypeSignature, ColorSpaceSignature);

/// dateTimeNumber - ICC date/time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTime {
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
}
