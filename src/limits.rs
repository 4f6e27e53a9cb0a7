use alloc::format;

use crate::error::RowError;
use crate::info::ImageInfo;

/// Caps on what a read may allocate, checked once the output format is known
/// and before the consumer sees its first row.
///
/// All fields default to `None` (no limit).
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for one pass of decoded rows.
    pub max_memory_bytes: Option<u64>,
}

fn exceeds(what: &str, value: u64, limit: Option<u64>) -> Result<(), RowError> {
    match limit {
        Some(max) if value > max => Err(RowError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

impl Limits {
    /// Check the header's dimensions and the size of `row_bytes * height`.
    pub(crate) fn check_image(&self, info: &ImageInfo, row_bytes: usize) -> Result<(), RowError> {
        let (width, height) = (u64::from(info.width), u64::from(info.height));
        exceeds("width", width, self.max_width)?;
        exceeds("height", height, self.max_height)?;
        exceeds("pixel count", width * height, self.max_pixels)?;

        let total = (row_bytes as u64)
            .checked_mul(height)
            .ok_or(RowError::DimensionsTooLarge {
                width: info.width,
                height: info.height,
            })?;
        exceeds("allocation bytes", total, self.max_memory_bytes)
    }
}
