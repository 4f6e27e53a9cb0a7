//! Pixel storage for one image's worth of scanlines.
//!
//! Three strategies, all exposing their rows as the bytes the codec reads and
//! writes:
//!
//! - [`PixelBuffer`]: one `Vec<P>` per row, for byte-aligned pixel types.
//! - [`PackedBuffer`]: one packed byte row per image row, for 1/2/4-bit
//!   pixels, addressed through [`PackedRef`] / [`PackedMut`] proxies.
//! - [`ContiguousBuffer`]: a single `width * height * bytes_per_pixel`
//!   allocation that can be handed off with
//!   [`fetch_bytes`](ContiguousBuffer::fetch_bytes).

mod contiguous;
mod packed;
mod rows;

pub use contiguous::ContiguousBuffer;
pub use packed::{PackedBuffer, PackedMut, PackedRef, PackedRow};
pub use rows::PixelBuffer;

use crate::error::RowError;
use crate::pixel::PixelFormat;

/// Common surface the streaming protocol drives.
///
/// Every buffer is also a [`RowConsumer`](crate::RowConsumer) that allocates
/// on the first pass and a [`RowProducer`](crate::RowProducer).
pub trait RowBuffer {
    type Pixel: PixelFormat;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Re-establish `width` addressable pixels in each of `height` rows.
    /// New pixels are zero.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RowError>;

    /// Row `index` in codec layout.
    fn row_bytes(&self, index: usize) -> Result<&[u8], RowError>;

    fn row_bytes_mut(&mut self, index: usize) -> Result<&mut [u8], RowError>;
}

/// Bytes needed for `height` separately allocated rows of `row_bytes` each,
/// counting `header` bytes of bookkeeping per row. Fails when the total
/// overflows or exceeds what one allocation may hold.
pub(crate) fn checked_rows_size(
    width: u32,
    height: u32,
    row_bytes: Option<usize>,
    header: usize,
) -> Result<usize, RowError> {
    row_bytes
        .and_then(|bytes| bytes.checked_add(header))
        .and_then(|bytes| bytes.checked_mul(height as usize))
        .filter(|&total| total <= isize::MAX as usize)
        .ok_or(RowError::DimensionsTooLarge { width, height })
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), RowError> {
    if index < len {
        Ok(())
    } else {
        Err(RowError::OutOfRange { index, len })
    }
}
