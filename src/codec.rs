//! The codec seam.
//!
//! A codec session (one image, one transfer) implements [`Decoder`] or
//! [`Encoder`]. It owns the header, performs pixel transforms internally,
//! and moves one row per call. Which transforms a build of the codec can
//! actually perform is reported as [`Capabilities`], so the negotiation
//! logic is identical across builds and testable without recompiling.

use core::fmt;

use crate::error::RowError;
use crate::info::{Chunk, ImageInfo};

/// A transform a codec build may or may not include.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 16-bit to 8-bit truncation.
    Strip16,
    /// Caller-supplied per-row transforms.
    UserTransform,
    StripAlpha,
    /// Synthesizing an alpha channel from a filler value.
    Filler,
    /// Palette, transparency, and sub-byte gray expansion.
    Expand,
    RgbToGray,
    GrayToRgb,
    /// Packing sub-byte indices to one per byte.
    Pack,
    /// 16-bit byte-order swapping.
    Swap,
    Interlacing,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::Strip16,
        Capability::UserTransform,
        Capability::StripAlpha,
        Capability::Filler,
        Capability::Expand,
        Capability::RgbToGray,
        Capability::GrayToRgb,
        Capability::Pack,
        Capability::Swap,
        Capability::Interlacing,
    ];

    /// What the caller sees when this capability is missing. Names the build
    /// option to turn on; nothing at run time can fix it.
    pub const fn message(self) -> &'static str {
        match self {
            Capability::Strip16 => {
                "expected 8-bit data but found 16-bit; recompile with 16-to-8 support"
            }
            Capability::UserTransform => {
                "expected 16-bit data but found 8-bit; recompile with user-transform support"
            }
            Capability::StripAlpha => {
                "alpha channel unexpected; recompile with strip-alpha support"
            }
            Capability::Filler => {
                "expected alpha channel but none found; recompile with filler support"
            }
            Capability::Expand => "expansion required; recompile with expand support",
            Capability::RgbToGray => "grayscale data expected; recompile with rgb-to-gray support",
            Capability::GrayToRgb => "expected RGB data; recompile with gray-to-rgb support",
            Capability::Pack => "indexed depth differs; recompile with pack support",
            Capability::Swap => "cannot move 16-bit samples; recompile with swap support",
            Capability::Interlacing => {
                "cannot stream interlaced image; recompile with interlacing support"
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Transforms a codec session can perform.
///
/// ```
/// use zenrows::{Capabilities, Capability};
///
/// static CAPS: Capabilities = Capabilities::all()
///     .with(Capability::RgbToGray, false)
///     .with(Capability::UserTransform, false);
///
/// assert!(CAPS.supports(Capability::Expand));
/// assert!(!CAPS.supports(Capability::RgbToGray));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Capabilities {
    bits: u16,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl Capabilities {
    /// A build with no optional transforms.
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    /// A build with every transform compiled in.
    pub const fn all() -> Self {
        Self {
            bits: (1 << Capability::ALL.len()) - 1,
        }
    }

    const fn bit(cap: Capability) -> u16 {
        1 << (cap as u16)
    }

    /// Turn one capability on or off.
    pub const fn with(self, cap: Capability, enabled: bool) -> Self {
        let bits = if enabled {
            self.bits | Self::bit(cap)
        } else {
            self.bits & !Self::bit(cap)
        };
        Self { bits }
    }

    pub const fn without(self, cap: Capability) -> Self {
        self.with(cap, false)
    }

    pub const fn supports(&self, cap: Capability) -> bool {
        self.bits & Self::bit(cap) != 0
    }

    /// `Ok(())` when supported, otherwise the capability error.
    pub fn require(&self, cap: Capability) -> Result<(), RowError> {
        if self.supports(cap) {
            Ok(())
        } else {
            Err(RowError::Capability(cap))
        }
    }
}

/// Layout of the row handed to a user row transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowInfo {
    /// Pixels in the row.
    pub width: u32,
    /// Bytes the row occupies once the transform has run.
    pub rowbytes: usize,
    pub channels: u8,
    pub bit_depth: u8,
}

/// Per-row callback run by the codec after its own transforms.
pub type RowTransformFn = fn(&RowInfo, &mut [u8]);

/// Where a synthesized filler channel goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillerPlacement {
    Before,
    After,
}

/// A transform installed on a codec session's pipeline.
#[non_exhaustive]
#[derive(Clone, Copy, Debug)]
pub enum Transform {
    /// Drop the low byte of 16-bit samples.
    TruncateDepth,
    /// Run `transform` on every row; the output row has `bit_depth` and
    /// `channels`.
    UserRowTransform {
        transform: RowTransformFn,
        bit_depth: u8,
        channels: u8,
    },
    StripAlpha,
    /// Promote the transparency table to a real alpha channel.
    TransparencyToAlpha,
    AddAlpha {
        filler: u16,
        placement: FillerPlacement,
    },
    ExpandPaletteToColor,
    /// Unpack 1/2/4-bit indices to one per byte.
    Pack,
    ColorToGray,
    GrayToColor,
    ExpandSubByteGray,
    /// Swap 16-bit samples between big-endian and native order.
    Swap,
}

impl Transform {
    /// Capability a codec needs to install this transform.
    pub const fn capability(&self) -> Capability {
        match self {
            Transform::TruncateDepth => Capability::Strip16,
            Transform::UserRowTransform { .. } => Capability::UserTransform,
            Transform::StripAlpha => Capability::StripAlpha,
            Transform::AddAlpha { .. } => Capability::Filler,
            Transform::TransparencyToAlpha
            | Transform::ExpandPaletteToColor
            | Transform::ExpandSubByteGray => Capability::Expand,
            Transform::Pack => Capability::Pack,
            Transform::ColorToGray => Capability::RgbToGray,
            Transform::GrayToColor => Capability::GrayToRgb,
            Transform::Swap => Capability::Swap,
        }
    }
}

/// A codec read session.
///
/// Calls arrive in a fixed order: `read_header`, any number of
/// `install`/`info_mut` calls, `set_interlace_handling`, `update_info`,
/// `read_row` for every row of every pass, then `read_end`.
pub trait Decoder {
    fn capabilities(&self) -> Capabilities;

    /// Parse the header and everything before the pixel data.
    fn read_header(&mut self) -> Result<(), RowError>;

    fn info(&self) -> &ImageInfo;

    fn info_mut(&mut self) -> &mut ImageInfo;

    fn has_chunk(&self, chunk: Chunk) -> bool {
        self.info().has_chunk(chunk)
    }

    /// Add `transform` to the pipeline. Only called when
    /// [`capabilities`](Decoder::capabilities) includes its capability.
    fn install(&mut self, transform: Transform);

    /// Enable multi-pass delivery; returns the number of passes.
    fn set_interlace_handling(&mut self) -> usize;

    /// Recompute the output format from the installed transforms.
    fn update_info(&mut self) -> Result<(), RowError>;

    /// Fill `row` with the next row of the current pass.
    fn read_row(&mut self, row: &mut [u8]) -> Result<(), RowError>;

    /// Read trailing metadata.
    fn read_end(&mut self) -> Result<(), RowError>;
}

/// A codec write session.
pub trait Encoder {
    fn capabilities(&self) -> Capabilities;

    /// Declare the header. Called once before `write_header`.
    fn set_info(&mut self, info: ImageInfo);

    fn info(&self) -> &ImageInfo;

    fn write_header(&mut self) -> Result<(), RowError>;

    fn install(&mut self, transform: Transform);

    fn set_interlace_handling(&mut self) -> usize;

    /// Consume one full row; for interlaced images the codec keeps the pixels
    /// belonging to the current pass.
    fn write_row(&mut self, row: &[u8]) -> Result<(), RowError>;

    fn write_end(&mut self) -> Result<(), RowError>;
}

/// Install `transform` if the session supports it, else fail with its
/// capability error.
pub(crate) fn install_checked<F>(
    caps: Capabilities,
    transform: Transform,
    install: F,
) -> Result<(), RowError>
where
    F: FnOnce(Transform),
{
    caps.require(transform.capability())?;
    log::debug!("installing {transform:?}");
    install(transform);
    Ok(())
}
