//! Read path: pull rows from a [`Decoder`] into a [`RowConsumer`].

use alloc::vec;

use crate::buffer::RowBuffer;
use crate::codec::{Capability, Decoder, Transform, install_checked};
use crate::error::RowError;
use crate::info::ImageInfo;
use crate::limits::Limits;
use crate::negotiate::convert_color_space;
use crate::pixel::{PixelFormat, row_bytes};

/// Destination for decoded rows.
///
/// The protocol calls [`reset`](RowConsumer::reset) at the start of every
/// delivered pass, then [`next_row`](RowConsumer::next_row) for positions
/// `0..height` in order. The returned slice must hold at least
/// `row_bytes::<Pixel>(width)` bytes; for passes after the first it should
/// still contain the row's earlier content, which the codec merges into.
pub trait RowConsumer {
    type Pixel: PixelFormat;

    /// Whether every interlace pass should be delivered. When false, all
    /// passes but the last are read and thrown away.
    const SUPPORTS_INTERLACING: bool = false;

    fn reset(&mut self, _info: &ImageInfo, _pass: usize) -> Result<(), RowError> {
        Ok(())
    }

    fn next_row(&mut self, position: u32) -> Result<&mut [u8], RowError>;
}

/// Buffers take every pass and allocate once, at pass 0.
impl<B: RowBuffer> RowConsumer for B {
    type Pixel = B::Pixel;
    const SUPPORTS_INTERLACING: bool = true;

    fn reset(&mut self, info: &ImageInfo, pass: usize) -> Result<(), RowError> {
        if pass == 0 {
            self.resize(info.width, info.height)?;
        }
        Ok(())
    }

    fn next_row(&mut self, position: u32) -> Result<&mut [u8], RowError> {
        self.row_bytes_mut(position as usize)
    }
}

/// Wraps a consumer so interlaced images deliver only their final pass.
#[derive(Clone, Debug, Default)]
pub struct LastPassOnly<C>(pub C);

impl<C> LastPassOnly<C> {
    pub fn into_inner(self) -> C {
        self.0
    }
}

impl<C: RowConsumer> RowConsumer for LastPassOnly<C> {
    type Pixel = C::Pixel;
    const SUPPORTS_INTERLACING: bool = false;

    fn reset(&mut self, info: &ImageInfo, pass: usize) -> Result<(), RowError> {
        self.0.reset(info, pass)
    }

    fn next_row(&mut self, position: u32) -> Result<&mut [u8], RowError> {
        self.0.next_row(position)
    }
}

/// Builder for reading one image from a decoder session.
///
/// ```no_run
/// # fn demo<D: zenrows::Decoder>(decoder: &mut D) -> Result<(), zenrows::RowError> {
/// use zenrows::{PixelBuffer, ReadRequest};
///
/// let mut buffer = PixelBuffer::<rgb::Rgba<u8>>::new();
/// let info = ReadRequest::new(decoder)
///     .convert_color_space()
///     .read(&mut buffer)?;
/// assert_eq!(buffer.width(), info.width);
/// # Ok(()) }
/// ```
pub struct ReadRequest<'a, D: ?Sized> {
    decoder: &'a mut D,
    limits: Option<&'a Limits>,
    convert: bool,
}

impl<'a, D: Decoder + ?Sized> ReadRequest<'a, D> {
    /// Read with no color-space conversion: the image must already be in the
    /// consumer's pixel format.
    pub fn new(decoder: &'a mut D) -> Self {
        Self {
            decoder,
            limits: None,
            convert: false,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Negotiate transforms so any source format lands in the consumer's
    /// pixel format.
    pub fn convert_color_space(mut self) -> Self {
        self.convert = true;
        self
    }

    /// Run the full transfer. Returns the header as the consumer saw it.
    ///
    /// Any error aborts the transfer; the consumer is left with whatever
    /// rows arrived before it.
    pub fn read<C: RowConsumer>(self, consumer: &mut C) -> Result<ImageInfo, RowError> {
        let Self {
            decoder,
            limits,
            convert,
        } = self;

        decoder.read_header()?;
        if convert {
            convert_color_space::<C::Pixel, D>(decoder)?;
        }

        if C::Pixel::BIT_DEPTH == 16 && cfg!(target_endian = "little") {
            install_checked(decoder.capabilities(), Transform::Swap, |t| {
                decoder.install(t)
            })?;
        }

        // interlace handling must be set up before the info update
        let mut pass_count = if decoder.info().is_interlaced() {
            decoder.capabilities().require(Capability::Interlacing)?;
            decoder.set_interlace_handling()
        } else {
            1
        };

        decoder.update_info()?;
        let info = decoder.info().clone();
        check_format::<C::Pixel>(&info)?;

        let stride = row_bytes::<C::Pixel>(info.width);
        if let Some(limits) = limits {
            limits.check_image(&info, stride)?;
        }

        if pass_count > 1 && !C::SUPPORTS_INTERLACING {
            log::warn!(
                "consumer cannot take interlaced rows; discarding {} of {pass_count} passes",
                pass_count - 1
            );
            let mut scratch = vec![0u8; stride];
            for pass in 0..pass_count - 1 {
                log::trace!("discarding pass {pass}");
                for _ in 0..info.height {
                    decoder.read_row(&mut scratch)?;
                }
            }
            pass_count = 1;
        }

        for pass in 0..pass_count {
            log::trace!("reading pass {pass} of {pass_count}");
            consumer.reset(&info, pass)?;
            for pos in 0..info.height {
                let row = consumer.next_row(pos)?;
                if row.len() < stride {
                    return Err(RowError::RowLength {
                        expected: stride,
                        actual: row.len(),
                    });
                }
                decoder.read_row(&mut row[..stride])?;
            }
        }

        decoder.read_end()?;
        Ok(info)
    }
}

/// The codec's output format must now equal `P` exactly; anything else means
/// negotiation installed the wrong transforms.
fn check_format<P: PixelFormat>(info: &ImageInfo) -> Result<(), RowError> {
    if info.color_model != P::COLOR_MODEL || info.bit_depth != P::BIT_DEPTH {
        return Err(RowError::FormatMismatch {
            expected_model: P::COLOR_MODEL,
            expected_depth: P::BIT_DEPTH,
            actual_model: info.color_model,
            actual_depth: info.bit_depth,
        });
    }
    Ok(())
}
