//! Write path: push rows from a [`RowProducer`] into an [`Encoder`].

use crate::buffer::RowBuffer;
use crate::codec::{Capability, Encoder, Transform, install_checked};
use crate::error::RowError;
use crate::info::{ImageInfo, Interlace};
use crate::pixel::{PixelFormat, row_bytes};

/// Source of rows to encode.
///
/// Rows are always full width; for interlaced output the same rows are
/// requested once per pass and the codec picks the pixels each pass needs.
pub trait RowProducer {
    type Pixel: PixelFormat;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn reset(&mut self, _pass: usize) -> Result<(), RowError> {
        Ok(())
    }

    fn next_row(&mut self, position: u32) -> Result<&[u8], RowError>;
}

impl<B: RowBuffer> RowProducer for B {
    type Pixel = B::Pixel;

    fn width(&self) -> u32 {
        RowBuffer::width(self)
    }

    fn height(&self) -> u32 {
        RowBuffer::height(self)
    }

    fn next_row(&mut self, position: u32) -> Result<&[u8], RowError> {
        self.row_bytes(position as usize)
    }
}

/// Builder for writing one image to an encoder session.
pub struct WriteRequest<'a, E: ?Sized> {
    encoder: &'a mut E,
    info: ImageInfo,
}

impl<'a, E: Encoder + ?Sized> WriteRequest<'a, E> {
    pub fn new(encoder: &'a mut E) -> Self {
        Self {
            encoder,
            info: ImageInfo::default(),
        }
    }

    /// Start from `info` (palette, transparency, gamma, interlace). Size,
    /// color model, and bit depth are always taken from the producer.
    pub fn with_info(mut self, info: ImageInfo) -> Self {
        self.info = info;
        self
    }

    pub fn with_interlace(mut self, interlace: Interlace) -> Self {
        self.info.interlace = interlace;
        self
    }

    /// Run the full transfer. Returns the header that was written.
    pub fn write<P: RowProducer>(self, producer: &mut P) -> Result<ImageInfo, RowError> {
        let Self { encoder, mut info } = self;

        info.width = producer.width();
        info.height = producer.height();
        info.color_model = P::Pixel::COLOR_MODEL;
        info.bit_depth = P::Pixel::BIT_DEPTH;
        log::debug!(
            "writing {}x{} {:?}/{} ({:?})",
            info.width,
            info.height,
            info.color_model,
            info.bit_depth,
            info.interlace
        );

        encoder.set_info(info.clone());
        encoder.write_header()?;

        if P::Pixel::BIT_DEPTH == 16 && cfg!(target_endian = "little") {
            install_checked(encoder.capabilities(), Transform::Swap, |t| {
                encoder.install(t)
            })?;
        }

        let pass_count = if info.is_interlaced() {
            encoder.capabilities().require(Capability::Interlacing)?;
            encoder.set_interlace_handling()
        } else {
            1
        };

        let stride = row_bytes::<P::Pixel>(info.width);
        for pass in 0..pass_count {
            log::trace!("writing pass {pass} of {pass_count}");
            producer.reset(pass)?;
            for pos in 0..info.height {
                let row = producer.next_row(pos)?;
                if row.len() < stride {
                    return Err(RowError::RowLength {
                        expected: stride,
                        actual: row.len(),
                    });
                }
                encoder.write_row(&row[..stride])?;
            }
        }

        encoder.write_end()?;
        Ok(info)
    }
}
