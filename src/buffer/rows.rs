use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use bytemuck::Pod;

use super::{RowBuffer, check_index, checked_rows_size};
use crate::error::RowError;
use crate::pixel::{PixelFormat, is_channel_only};

/// Row-of-objects storage: each row is a `Vec<P>` of exactly `width` pixels.
///
/// `P` must be byte-aligned with no padding (every `rgb` pixel type and
/// [`Index8`](crate::Index8) qualify); the codec reads straight into the
/// row's memory.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer<P> {
    width: u32,
    height: u32,
    rows: Vec<Vec<P>>,
}

impl<P> Default for PixelBuffer<P> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            rows: Vec::new(),
        }
    }
}

impl<P: PixelFormat + Pod> PixelBuffer<P> {
    /// An empty 0x0 buffer.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(width: u32, height: u32) -> Result<Self, RowError> {
        let mut buf = Self::new();
        buf.resize(width, height)?;
        Ok(buf)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize to `width` x `height`, keeping overlapping pixels. Grown area
    /// is zero. Sizes that cannot be allocated fail with
    /// [`RowError::DimensionsTooLarge`] and leave the buffer unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RowError> {
        const {
            assert!(
                is_channel_only::<P>(),
                "pixel type must contain whole-byte channel data only"
            )
        };
        checked_rows_size(
            width,
            height,
            (width as usize).checked_mul(size_of::<P>()),
            size_of::<Vec<P>>(),
        )?;
        self.rows.resize_with(height as usize, Vec::new);
        for row in &mut self.rows {
            row.resize(width as usize, P::zeroed());
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Row `index`, bounds-checked.
    pub fn get_row(&self, index: usize) -> Result<&[P], RowError> {
        check_index(index, self.rows.len())?;
        Ok(&self.rows[index])
    }

    pub fn get_row_mut(&mut self, index: usize) -> Result<&mut [P], RowError> {
        check_index(index, self.rows.len())?;
        Ok(&mut self.rows[index])
    }

    /// Replace row `index` with `row`, which must be exactly `width` long.
    pub fn put_row(&mut self, index: usize, row: &[P]) -> Result<(), RowError> {
        if row.len() != self.width as usize {
            return Err(RowError::RowLength {
                expected: self.width as usize,
                actual: row.len(),
            });
        }
        self.get_row_mut(index)?.copy_from_slice(row);
        Ok(())
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<P, RowError> {
        let row = self.get_row(y)?;
        check_index(x, row.len())?;
        Ok(row[x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: P) -> Result<(), RowError> {
        let row = self.get_row_mut(y)?;
        check_index(x, row.len())?;
        row[x] = pixel;
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &[P]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

/// Unchecked row access; panics when `index >= height`.
impl<P> Index<usize> for PixelBuffer<P> {
    type Output = [P];

    fn index(&self, index: usize) -> &[P] {
        &self.rows[index]
    }
}

impl<P> IndexMut<usize> for PixelBuffer<P> {
    fn index_mut(&mut self, index: usize) -> &mut [P] {
        &mut self.rows[index]
    }
}

impl<P: PixelFormat + Pod> RowBuffer for PixelBuffer<P> {
    type Pixel = P;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RowError> {
        PixelBuffer::resize(self, width, height)
    }

    fn row_bytes(&self, index: usize) -> Result<&[u8], RowError> {
        Ok(bytemuck::cast_slice(self.get_row(index)?))
    }

    fn row_bytes_mut(&mut self, index: usize) -> Result<&mut [u8], RowError> {
        Ok(bytemuck::cast_slice_mut(self.get_row_mut(index)?))
    }
}
