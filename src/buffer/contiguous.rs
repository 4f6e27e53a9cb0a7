use alloc::vec;
use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use bytemuck::Pod;

use super::{RowBuffer, check_index};
use crate::error::RowError;
use crate::pixel::{PixelFormat, is_channel_only};

/// One flat allocation of `height` rows, `stride = width * bytes_per_pixel`
/// bytes apart.
///
/// Only byte-aligned, channel-only pixel types are accepted; anything else is
/// rejected at compile time. Pixels are stored in native byte order, the
/// layout the codec delivers when 16-bit swapping is on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContiguousBuffer<P> {
    width: u32,
    height: u32,
    stride: usize,
    bytes: Vec<u8>,
    _pixel: PhantomData<P>,
}

impl<P> Default for ContiguousBuffer<P> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            bytes: Vec::new(),
            _pixel: PhantomData,
        }
    }
}

impl<P: PixelFormat + Pod> ContiguousBuffer<P> {
    pub const BYTES_PER_PIXEL: usize = {
        assert!(
            is_channel_only::<P>(),
            "pixel type must contain whole-byte channel data only"
        );
        P::CHANNELS as usize * P::BIT_DEPTH as usize / 8
    };

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

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Resize to `width` x `height`. Overlapping pixels keep their position;
    /// the grown area is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RowError> {
        let stride = (width as usize)
            .checked_mul(Self::BYTES_PER_PIXEL)
            .ok_or(RowError::DimensionsTooLarge { width, height })?;
        let total = stride
            .checked_mul(height as usize)
            .ok_or(RowError::DimensionsTooLarge { width, height })?;

        if stride == self.stride {
            self.bytes.resize(total, 0);
        } else {
            let mut bytes = vec![0u8; total];
            let keep = stride.min(self.stride);
            if keep > 0 {
                let rows = (height as usize).min(self.height as usize);
                for (dst, src) in bytes
                    .chunks_exact_mut(stride)
                    .zip(self.bytes.chunks_exact(self.stride))
                    .take(rows)
                {
                    dst[..keep].copy_from_slice(&src[..keep]);
                }
            }
            self.bytes = bytes;
        }
        self.width = width;
        self.height = height;
        self.stride = stride;
        Ok(())
    }

    /// Row `index` as bytes, bounds-checked.
    pub fn get_row(&self, index: usize) -> Result<&[u8], RowError> {
        check_index(index, self.height as usize)?;
        Ok(&self[index])
    }

    pub fn get_row_mut(&mut self, index: usize) -> Result<&mut [u8], RowError> {
        check_index(index, self.height as usize)?;
        Ok(&mut self[index])
    }

    /// Row `index` as pixels. Copies, since the byte storage carries no
    /// alignment for `P`; pairs with [`put_row`](Self::put_row).
    pub fn row_pixels(&self, index: usize) -> Result<Vec<P>, RowError> {
        Ok(bytemuck::pod_collect_to_vec(self.get_row(index)?))
    }

    /// Copy `row` (exactly `width` pixels) into row `index`.
    pub fn put_row(&mut self, index: usize, row: &[P]) -> Result<(), RowError> {
        if row.len() != self.width as usize {
            return Err(RowError::RowLength {
                expected: self.width as usize,
                actual: row.len(),
            });
        }
        self.get_row_mut(index)?
            .copy_from_slice(bytemuck::cast_slice(row));
        Ok(())
    }

    fn pixel_offset(&self, x: usize, y: usize) -> Result<usize, RowError> {
        check_index(x, self.width as usize)?;
        check_index(y, self.height as usize)?;
        Ok(y * self.stride + x * Self::BYTES_PER_PIXEL)
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<P, RowError> {
        let off = self.pixel_offset(x, y)?;
        Ok(bytemuck::pod_read_unaligned(
            &self.bytes[off..off + Self::BYTES_PER_PIXEL],
        ))
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: P) -> Result<(), RowError> {
        let off = self.pixel_offset(x, y)?;
        self.bytes[off..off + Self::BYTES_PER_PIXEL].copy_from_slice(bytemuck::bytes_of(&pixel));
        Ok(())
    }

    /// All rows, back to back.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Move the pixel data out without copying.
    ///
    /// Leaves the buffer 0x0 with stride 0; a second call returns an empty
    /// vector.
    pub fn fetch_bytes(&mut self) -> Vec<u8> {
        self.width = 0;
        self.height = 0;
        self.stride = 0;
        core::mem::take(&mut self.bytes)
    }

    /// Copy into a typed [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<P> {
        imgref::ImgVec::new(
            bytemuck::pod_collect_to_vec(&self.bytes),
            self.width as usize,
            self.height as usize,
        )
    }
}

/// Unchecked row access; panics when `index >= height`.
impl<P> Index<usize> for ContiguousBuffer<P> {
    type Output = [u8];

    fn index(&self, index: usize) -> &[u8] {
        let start = index * self.stride;
        &self.bytes[start..start + self.stride]
    }
}

impl<P> IndexMut<usize> for ContiguousBuffer<P> {
    fn index_mut(&mut self, index: usize) -> &mut [u8] {
        let start = index * self.stride;
        &mut self.bytes[start..start + self.stride]
    }
}

impl<P: PixelFormat + Pod> RowBuffer for ContiguousBuffer<P> {
    type Pixel = P;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RowError> {
        ContiguousBuffer::resize(self, width, height)
    }

    fn row_bytes(&self, index: usize) -> Result<&[u8], RowError> {
        self.get_row(index)
    }

    fn row_bytes_mut(&mut self, index: usize) -> Result<&mut [u8], RowError> {
        self.get_row_mut(index)
    }
}
