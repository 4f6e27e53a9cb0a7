//! Compile-time pixel format descriptors.
//!
//! Every pixel type the buffers and the streaming protocol accept implements
//! [`PixelFormat`]. The descriptor is the ground truth for the format rows
//! must end up in; nothing here is computed at run time.

use bytemuck::{Pod, Zeroable};
use rgb::{Gray, GrayAlpha, Rgb, Rgba};

/// Which channels a pixel carries.
///
/// Discriminants are the PNG color type codes, so the bit tests below follow
/// the same masks (1 = palette, 2 = color, 4 = alpha).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorModel {
    Gray = 0,
    Rgb = 2,
    /// Palette indices.
    Indexed = 3,
    GrayAlpha = 4,
    RgbAlpha = 6,
}

impl ColorModel {
    const MASK_PALETTE: u8 = 1;
    const MASK_COLOR: u8 = 2;
    const MASK_ALPHA: u8 = 4;

    /// Look up a model by its PNG color type code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Gray),
            2 => Some(Self::Rgb),
            3 => Some(Self::Indexed),
            4 => Some(Self::GrayAlpha),
            6 => Some(Self::RgbAlpha),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn has_alpha(self) -> bool {
        self.code() & Self::MASK_ALPHA != 0
    }

    /// True for RGB, RGBA, and indexed (palette entries are colors).
    pub const fn has_color(self) -> bool {
        self.code() & (Self::MASK_COLOR | Self::MASK_PALETTE) != 0
    }

    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::Indexed)
    }

    /// Gray or gray+alpha.
    pub const fn is_gray(self) -> bool {
        self.code() & !Self::MASK_ALPHA == Self::Gray as u8
    }

    /// Number of samples per pixel.
    pub const fn channels(self) -> u8 {
        match self {
            Self::Gray | Self::Indexed => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::RgbAlpha => 4,
        }
    }
}

/// A sample type: `u8` or `u16`.
pub trait Component: Pod + Into<u16> {
    /// Fully opaque / full intensity.
    const MAX: Self;
}

impl Component for u8 {
    const MAX: Self = u8::MAX;
}

impl Component for u16 {
    const MAX: Self = u16::MAX;
}

/// Static description of a pixel type.
///
/// Implemented for the `rgb` crate's gray/RGB types at 8 and 16 bits,
/// [`Index8`], and the packed sub-byte types.
pub trait PixelFormat: Copy + core::fmt::Debug + 'static {
    /// Storage type of one sample.
    type Component: Component;

    const CHANNELS: u8;
    const COLOR_MODEL: ColorModel;
    /// Bits per sample (per index for palette formats).
    const BIT_DEPTH: u8;

    fn channels() -> u8 {
        Self::CHANNELS
    }

    fn color_model() -> ColorModel {
        Self::COLOR_MODEL
    }

    fn bit_depth() -> u8 {
        Self::BIT_DEPTH
    }

    /// Value used when the codec synthesizes an alpha channel.
    fn alpha_filler() -> Self::Component {
        Self::Component::MAX
    }

    /// Bits one pixel occupies on the wire.
    fn bits_per_pixel() -> usize {
        Self::CHANNELS as usize * Self::BIT_DEPTH as usize
    }
}

/// Bytes needed for one row of `width` pixels of `P`, packed as the codec
/// delivers them.
pub fn row_bytes<P: PixelFormat>(width: u32) -> usize {
    (width as usize * P::bits_per_pixel()).div_ceil(8)
}

/// True when `P`'s in-memory size is exactly its sample bits, with whole-byte
/// samples. Row-of-objects and contiguous storage rely on this to hand pixel
/// memory to the codec directly.
pub const fn is_channel_only<P: PixelFormat>() -> bool {
    P::BIT_DEPTH % 8 == 0
        && core::mem::size_of::<P>() * 8 == P::CHANNELS as usize * P::BIT_DEPTH as usize
}

macro_rules! pixel_format {
    ($ty:ty, $component:ty, $model:ident, $channels:literal, $depth:literal) => {
        impl PixelFormat for $ty {
            type Component = $component;
            const CHANNELS: u8 = $channels;
            const COLOR_MODEL: ColorModel = ColorModel::$model;
            const BIT_DEPTH: u8 = $depth;
        }
    };
}

pixel_format!(Gray<u8>, u8, Gray, 1, 8);
pixel_format!(Gray<u16>, u16, Gray, 1, 16);
pixel_format!(GrayAlpha<u8>, u8, GrayAlpha, 2, 8);
pixel_format!(GrayAlpha<u16>, u16, GrayAlpha, 2, 16);
pixel_format!(Rgb<u8>, u8, Rgb, 3, 8);
pixel_format!(Rgb<u16>, u16, Rgb, 3, 16);
pixel_format!(Rgba<u8>, u8, RgbAlpha, 4, 8);
pixel_format!(Rgba<u16>, u16, RgbAlpha, 4, 16);

/// 8-bit palette index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Index8(pub u8);

pixel_format!(Index8, u8, Indexed, 1, 8);

/// A pixel narrower than a byte. Several share one storage byte, most
/// significant bits first.
pub trait PackedPixel: PixelFormat<Component = u8> {
    /// `(1 << BIT_DEPTH) - 1`.
    const BIT_MASK: u8 = ((1u16 << Self::BIT_DEPTH) - 1) as u8;
    const PIXELS_PER_BYTE: usize = 8 / Self::BIT_DEPTH as usize;

    /// Build from the low `BIT_DEPTH` bits of `bits`; higher bits are dropped.
    fn from_bits(bits: u8) -> Self;

    /// The value, always below `1 << BIT_DEPTH`.
    fn bits(self) -> u8;
}

/// Sub-byte grayscale sample (`BITS` ∈ {1, 2, 4}).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedGray<const BITS: u8>(u8);

/// Sub-byte palette index (`BITS` ∈ {1, 2, 4}).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PackedIndex<const BITS: u8>(u8);

pub type Gray1 = PackedGray<1>;
pub type Gray2 = PackedGray<2>;
pub type Gray4 = PackedGray<4>;
pub type Index1 = PackedIndex<1>;
pub type Index2 = PackedIndex<2>;
pub type Index4 = PackedIndex<4>;

macro_rules! packed_pixel {
    ($name:ident, $model:ident) => {
        impl<const BITS: u8> $name<BITS> {
            const VALID_DEPTH: () = assert!(
                BITS == 1 || BITS == 2 || BITS == 4,
                "packed pixels are 1, 2, or 4 bits wide"
            );

            /// Truncates `value` to `BITS` bits.
            pub const fn new(value: u8) -> Self {
                let () = Self::VALID_DEPTH;
                Self(value & ((1u16 << BITS) - 1) as u8)
            }

            pub const fn value(self) -> u8 {
                self.0
            }
        }

        impl<const BITS: u8> PixelFormat for $name<BITS> {
            type Component = u8;
            const CHANNELS: u8 = 1;
            const COLOR_MODEL: ColorModel = ColorModel::$model;
            const BIT_DEPTH: u8 = BITS;
        }

        impl<const BITS: u8> PackedPixel for $name<BITS> {
            fn from_bits(bits: u8) -> Self {
                Self::new(bits)
            }

            fn bits(self) -> u8 {
                self.0
            }
        }
    };
}

packed_pixel!(PackedGray, Gray);
packed_pixel!(PackedIndex, Indexed);
