//! Bit-packed rows for 1, 2, and 4-bit pixels.
//!
//! Pixels are packed most significant bits first, matching the wire format
//! of sub-byte rasters:
//!
//! ```text
//! bit:     7 6 5 4 3 2 1 0
//! 1-bit:   0 1 2 3 4 5 6 7
//! 2-bit:   0   1   2   3
//! 4-bit:   0       1
//! ```
//!
//! Pixel `i` lives in byte `i / pixels_per_byte` at shift
//! `(8 - bits) - (i % pixels_per_byte) * bits`.

use alloc::vec::Vec;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};

use super::{RowBuffer, check_index, checked_rows_size};
use crate::error::RowError;
use crate::pixel::PackedPixel;

/// Byte index and bit shift of pixel `index`.
const fn locate(index: usize, bits: u8) -> (usize, u32) {
    let per_byte = 8 / bits as usize;
    let shift = (8 - bits as usize) - (index % per_byte) * bits as usize;
    (index / per_byte, shift as u32)
}

/// Read-only view of one packed pixel.
///
/// Borrows the byte it lives in, so it cannot outlive the row or survive a
/// resize.
#[derive(Clone, Copy, Debug)]
pub struct PackedRef<'a, P> {
    byte: &'a u8,
    shift: u32,
    _pixel: PhantomData<P>,
}

impl<P: PackedPixel> PackedRef<'_, P> {
    pub fn get(&self) -> P {
        P::from_bits((*self.byte >> self.shift) & P::BIT_MASK)
    }
}

/// Read-write view of one packed pixel. Writes are read-modify-write on the
/// shared byte; neighbours are untouched.
#[derive(Debug)]
pub struct PackedMut<'a, P> {
    byte: &'a mut u8,
    shift: u32,
    _pixel: PhantomData<P>,
}

impl<P: PackedPixel> PackedMut<'_, P> {
    pub fn get(&self) -> P {
        P::from_bits((*self.byte >> self.shift) & P::BIT_MASK)
    }

    pub fn set(&mut self, pixel: P) {
        let mask = P::BIT_MASK << self.shift;
        *self.byte = (*self.byte & !mask) | ((pixel.bits() & P::BIT_MASK) << self.shift);
    }
}

/// One row of `len` packed pixels in `ceil(len / pixels_per_byte)` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedRow<P> {
    len: usize,
    bytes: Vec<u8>,
    _pixel: PhantomData<P>,
}

impl<P> Default for PackedRow<P> {
    fn default() -> Self {
        Self {
            len: 0,
            bytes: Vec::new(),
            _pixel: PhantomData,
        }
    }
}

impl<P: PackedPixel> PackedRow<P> {
    /// A row of `len` zero pixels.
    pub fn new(len: usize) -> Self {
        let mut row = Self::default();
        row.resize(len);
        row
    }

    fn byte_len(len: usize) -> usize {
        const {
            assert!(
                P::BIT_DEPTH < 8 && 8 % P::BIT_DEPTH == 0,
                "packed rows need 1, 2, or 4-bit pixels"
            )
        };
        len.div_ceil(P::PIXELS_PER_BYTE)
    }

    /// Byte index and bit shift of pixel `index`.
    pub fn locate(index: usize) -> (usize, u32) {
        locate(index, P::BIT_DEPTH)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grow or shrink to `len` pixels. Pixels past the old length read as
    /// zero, including ones sharing a byte with surviving pixels.
    pub fn resize(&mut self, len: usize) {
        if len < self.len {
            let (byte, shift) = Self::locate(len);
            if let Some(b) = self.bytes.get_mut(byte) {
                // keep only the bits of pixels before `len`
                *b &= !((1u16 << (shift + P::BIT_DEPTH as u32)) - 1) as u8;
            }
        }
        self.bytes.resize(Self::byte_len(len), 0);
        self.len = len;
    }

    /// Checked read proxy.
    pub fn at(&self, index: usize) -> Result<PackedRef<'_, P>, RowError> {
        check_index(index, self.len)?;
        let (byte, shift) = Self::locate(index);
        Ok(PackedRef {
            byte: &self.bytes[byte],
            shift,
            _pixel: PhantomData,
        })
    }

    /// Checked read-write proxy.
    pub fn at_mut(&mut self, index: usize) -> Result<PackedMut<'_, P>, RowError> {
        check_index(index, self.len)?;
        let (byte, shift) = Self::locate(index);
        Ok(PackedMut {
            byte: &mut self.bytes[byte],
            shift,
            _pixel: PhantomData,
        })
    }

    /// Unchecked read. Indices into the padding of the last byte are not
    /// caught; indices past it panic.
    pub fn get(&self, index: usize) -> P {
        let (byte, shift) = Self::locate(index);
        P::from_bits((self.bytes[byte] >> shift) & P::BIT_MASK)
    }

    /// Unchecked write, same caveats as [`get`](Self::get).
    pub fn set(&mut self, index: usize, pixel: P) {
        let (byte, shift) = Self::locate(index);
        let b = &mut self.bytes[byte];
        *b = (*b & !(P::BIT_MASK << shift)) | ((pixel.bits() & P::BIT_MASK) << shift);
    }

    pub fn iter(&self) -> impl Iterator<Item = P> + '_ {
        (0..self.len).map(|i| self.get(i))
    }

    /// The packed bytes, as the codec reads and writes them.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl<P: PackedPixel> FromIterator<P> for PackedRow<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let pixels: Vec<P> = iter.into_iter().collect();
        let mut row = Self::new(pixels.len());
        for (i, p) in pixels.into_iter().enumerate() {
            row.set(i, p);
        }
        row
    }
}

/// Rows of bit-packed pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedBuffer<P> {
    width: u32,
    height: u32,
    rows: Vec<PackedRow<P>>,
}

impl<P> Default for PackedBuffer<P> {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            rows: Vec::new(),
        }
    }
}

impl<P: PackedPixel> PackedBuffer<P> {
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

    /// Resize to `width` x `height`; fails with
    /// [`RowError::DimensionsTooLarge`] when the rows cannot be allocated.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RowError> {
        checked_rows_size(
            width,
            height,
            Some(PackedRow::<P>::byte_len(width as usize)),
            size_of::<PackedRow<P>>(),
        )?;
        self.rows.resize_with(height as usize, PackedRow::default);
        for row in &mut self.rows {
            row.resize(width as usize);
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn get_row(&self, index: usize) -> Result<&PackedRow<P>, RowError> {
        check_index(index, self.rows.len())?;
        Ok(&self.rows[index])
    }

    pub fn get_row_mut(&mut self, index: usize) -> Result<&mut PackedRow<P>, RowError> {
        check_index(index, self.rows.len())?;
        Ok(&mut self.rows[index])
    }

    pub fn put_row(&mut self, index: usize, row: PackedRow<P>) -> Result<(), RowError> {
        if row.len() != self.width as usize {
            return Err(RowError::RowLength {
                expected: self.width as usize,
                actual: row.len(),
            });
        }
        *self.get_row_mut(index)? = row;
        Ok(())
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Result<P, RowError> {
        Ok(self.get_row(y)?.at(x)?.get())
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: P) -> Result<(), RowError> {
        self.get_row_mut(y)?.at_mut(x)?.set(pixel);
        Ok(())
    }

    pub fn rows(&self) -> impl Iterator<Item = &PackedRow<P>> {
        self.rows.iter()
    }
}

/// Unchecked row access; panics when `index >= height`.
impl<P> Index<usize> for PackedBuffer<P> {
    type Output = PackedRow<P>;

    fn index(&self, index: usize) -> &PackedRow<P> {
        &self.rows[index]
    }
}

impl<P> IndexMut<usize> for PackedBuffer<P> {
    fn index_mut(&mut self, index: usize) -> &mut PackedRow<P> {
        &mut self.rows[index]
    }
}

impl<P: PackedPixel> RowBuffer for PackedBuffer<P> {
    type Pixel = P;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), RowError> {
        PackedBuffer::resize(self, width, height)
    }

    fn row_bytes(&self, index: usize) -> Result<&[u8], RowError> {
        Ok(self.get_row(index)?.as_bytes())
    }

    fn row_bytes_mut(&mut self, index: usize) -> Result<&mut [u8], RowError> {
        Ok(self.get_row_mut(index)?.as_bytes_mut())
    }
}
