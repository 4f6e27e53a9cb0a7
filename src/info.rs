use alloc::vec::Vec;

use rgb::Rgb;

use crate::pixel::{ColorModel, PixelFormat};

/// Interlacing scheme of the encoded image.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Interlace {
    #[default]
    None,
    /// Seven-pass Adam7.
    Adam7,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    #[default]
    Deflate,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    #[default]
    Adaptive,
}

/// Auxiliary chunks a codec can report via [`crate::Decoder::has_chunk`].
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Chunk {
    Gamma,
    Palette,
    Transparency,
}

/// Transparency table (tRNS): values that should read as fully transparent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transparency {
    /// Alpha per palette entry.
    Indexed(Vec<u8>),
    /// The one gray level that is transparent.
    Gray(u16),
    /// The one color that is transparent.
    Rgb(Rgb<u16>),
}

/// Image header as declared by or to a codec session.
///
/// The read path mutates `color_model`/`bit_depth` during negotiation; the
/// codec rewrites them again when it recomputes its output format.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub color_model: ColorModel,
    pub bit_depth: u8,
    pub interlace: Interlace,
    pub compression: Compression,
    pub filter: Filter,
    pub gamma: Option<f64>,
    pub palette: Vec<Rgb<u8>>,
    pub transparency: Option<Transparency>,
}

impl Default for ImageInfo {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            color_model: ColorModel::Rgb,
            bit_depth: 8,
            interlace: Interlace::None,
            compression: Compression::Deflate,
            filter: Filter::Adaptive,
            gamma: None,
            palette: Vec::new(),
            transparency: None,
        }
    }
}

impl ImageInfo {
    /// Header for a `width` x `height` image stored as `P`.
    pub fn for_pixel<P: PixelFormat>(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color_model: P::COLOR_MODEL,
            bit_depth: P::BIT_DEPTH,
            ..Self::default()
        }
    }

    /// Whether the metadata for `chunk` is present.
    pub fn has_chunk(&self, chunk: Chunk) -> bool {
        match chunk {
            Chunk::Gamma => self.gamma.is_some(),
            Chunk::Palette => !self.palette.is_empty(),
            Chunk::Transparency => self.transparency.is_some(),
        }
    }

    /// Forget the palette once it has been expanded into full color.
    pub fn drop_palette(&mut self) {
        self.palette.clear();
    }

    /// Whether the image needs more than one pass.
    pub fn is_interlaced(&self) -> bool {
        self.interlace != Interlace::None
    }
}
