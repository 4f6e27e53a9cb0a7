//! # zenrows
//!
//! Format adaptation between a scanline image codec and typed pixel buffers.
//!
//! A caller picks a pixel type at compile time (`rgb::Rgba<u8>`, `Gray2`,
//! [`Index8`], ...). The codec only learns the image's real color model, bit
//! depth, and interlacing when it parses the header. This crate bridges the
//! two:
//!
//! - **Negotiation** ([`convert_color_space`]) installs the codec transforms
//!   that turn the source format into the destination format, or fails with
//!   an error naming the capability the codec build is missing.
//! - **Buffers** ([`PixelBuffer`], [`PackedBuffer`], [`ContiguousBuffer`])
//!   hold one image of fixed-format rows, including 1/2/4-bit packed pixels
//!   addressed through borrowed proxies.
//! - **Streaming** ([`ReadRequest`], [`WriteRequest`]) moves the image one
//!   row at a time through every interlace pass, or collapses the passes for
//!   consumers that cannot take them.
//!
//! The codec itself is not part of this crate; it plugs in through the
//! [`Decoder`] and [`Encoder`] traits.
//!
//! ## Non-Goals
//!
//! - Chunk parsing, compression, or the pixel transforms themselves
//! - Resizing, blending, filtering
//! - General-purpose 2D arrays
//!
//! ## Usage
//!
//! ```no_run
//! # fn demo<D: zenrows::Decoder>(decoder: &mut D) -> Result<(), zenrows::RowError> {
//! use zenrows::{ContiguousBuffer, Limits, ReadRequest};
//!
//! let limits = Limits {
//!     max_pixels: Some(100_000_000),
//!     ..Default::default()
//! };
//! let mut buffer = ContiguousBuffer::<rgb::Rgb<u8>>::new();
//! ReadRequest::new(decoder)
//!     .with_limits(&limits)
//!     .convert_color_space()
//!     .read(&mut buffer)?;
//! let bytes: Vec<u8> = buffer.fetch_bytes();
//! # Ok(()) }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod buffer;
mod codec;
mod error;
mod info;
mod limits;
mod negotiate;
mod pixel;
mod read;
mod write;

// Re-exports
pub use buffer::{
    ContiguousBuffer, PackedBuffer, PackedMut, PackedRef, PackedRow, PixelBuffer, RowBuffer,
};
pub use codec::{
    Capabilities, Capability, Decoder, Encoder, FillerPlacement, RowInfo, RowTransformFn,
    Transform,
};
pub use error::RowError;
pub use info::{Chunk, Compression, Filter, ImageInfo, Interlace, Transparency};
pub use limits::Limits;
pub use negotiate::{convert_color_space, expand_8_to_16};
pub use pixel::{
    ColorModel, Component, Gray1, Gray2, Gray4, Index1, Index2, Index4, Index8, PackedGray,
    PackedIndex, PackedPixel, PixelFormat, is_channel_only, row_bytes,
};
pub use read::{LastPassOnly, ReadRequest, RowConsumer};
pub use write::{RowProducer, WriteRequest};
