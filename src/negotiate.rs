//! Color-space negotiation.
//!
//! Compares the source format a [`Decoder`] reports against a compile-time
//! destination [`PixelFormat`] and installs the transforms that close the gap,
//! one axis at a time:
//!
//! 1. bit depth (16→8 truncation, or 8→16 widening via a row callback)
//! 2. alpha (strip, promote transparency, or synthesize from the filler)
//! 3. palette (expand to color, or repack indices)
//! 4. color model (color↔gray)
//! 5. sub-byte gray (1/2/4-bit gray to 8-bit)
//!
//! Order matters: depth runs first because it changes what "8-bit" means for
//! the later checks. Every axis reads the *source* format; the codec only
//! rewrites its output format in [`Decoder::update_info`].

use crate::codec::{Decoder, FillerPlacement, RowInfo, Transform, install_checked};
use crate::error::RowError;
use crate::info::Chunk;
use crate::pixel::PixelFormat;

/// Install the transforms that make `decoder` produce rows of `P`, then
/// declare `P`'s color model and bit depth as the output format.
///
/// Fails with [`RowError::Capability`] when a needed transform is missing
/// from the codec build, and with [`RowError::UnsupportedConversion`] for
/// conversions no build can do (anything to indexed color, or indexed color
/// below 8 bits).
pub fn convert_color_space<P, D>(decoder: &mut D) -> Result<(), RowError>
where
    P: PixelFormat,
    D: Decoder + ?Sized,
{
    log::debug!(
        "negotiating {:?}/{} -> {:?}/{}",
        decoder.info().color_model,
        decoder.info().bit_depth,
        P::COLOR_MODEL,
        P::BIT_DEPTH
    );

    handle_depth::<P, D>(decoder)?;
    handle_alpha::<P, D>(decoder)?;
    handle_palette::<P, D>(decoder)?;
    handle_color::<P, D>(decoder)?;
    handle_sub_byte_gray::<P, D>(decoder)?;

    let info = decoder.info_mut();
    info.color_model = P::COLOR_MODEL;
    info.bit_depth = P::BIT_DEPTH;
    Ok(())
}

fn install<D: Decoder + ?Sized>(decoder: &mut D, transform: Transform) -> Result<(), RowError> {
    let caps = decoder.capabilities();
    install_checked(caps, transform, |t| decoder.install(t))
}

fn handle_depth<P: PixelFormat, D: Decoder + ?Sized>(decoder: &mut D) -> Result<(), RowError> {
    let src_depth = decoder.info().bit_depth;
    if src_depth == 16 && P::BIT_DEPTH == 8 {
        install(decoder, Transform::TruncateDepth)?;
    }
    if src_depth != 16 && P::BIT_DEPTH == 16 {
        install(
            decoder,
            Transform::UserRowTransform {
                transform: expand_8_to_16,
                bit_depth: 16,
                channels: P::CHANNELS,
            },
        )?;
    }
    Ok(())
}

fn handle_alpha<P: PixelFormat, D: Decoder + ?Sized>(decoder: &mut D) -> Result<(), RowError> {
    let src_alpha = decoder.info().color_model.has_alpha();
    let src_trns = decoder.has_chunk(Chunk::Transparency);
    let dst_alpha = P::COLOR_MODEL.has_alpha();

    if (src_alpha || src_trns) && !dst_alpha {
        install(decoder, Transform::StripAlpha)?;
    }
    if !src_alpha && dst_alpha {
        // Prefer the real transparency table; fall back to a flat filler
        // when the build cannot expand it.
        if src_trns
            && decoder
                .capabilities()
                .supports(Transform::TransparencyToAlpha.capability())
        {
            return install(decoder, Transform::TransparencyToAlpha);
        }
        install(
            decoder,
            Transform::AddAlpha {
                filler: P::alpha_filler().into(),
                placement: FillerPlacement::After,
            },
        )?;
    }
    Ok(())
}

fn handle_palette<P: PixelFormat, D: Decoder + ?Sized>(decoder: &mut D) -> Result<(), RowError> {
    let src_palette = decoder.info().color_model.is_indexed();
    let dst_palette = P::COLOR_MODEL.is_indexed();

    if src_palette && !dst_palette {
        install(decoder, Transform::ExpandPaletteToColor)?;
        decoder.info_mut().drop_palette();
    } else if !src_palette && dst_palette {
        return Err(RowError::UnsupportedConversion(
            "conversion to indexed colors is unsupported",
        ));
    } else if src_palette && dst_palette && decoder.info().bit_depth != P::BIT_DEPTH {
        if P::BIT_DEPTH == 8 {
            install(decoder, Transform::Pack)?;
        } else {
            return Err(RowError::UnsupportedConversion(
                "cannot convert to indexed colors with bit depth below 8",
            ));
        }
    }
    Ok(())
}

fn handle_color<P: PixelFormat, D: Decoder + ?Sized>(decoder: &mut D) -> Result<(), RowError> {
    let src_color = decoder.info().color_model.has_color();
    let dst_color = P::COLOR_MODEL.has_color();

    if src_color && !dst_color {
        install(decoder, Transform::ColorToGray)?;
    }
    if !src_color && dst_color {
        install(decoder, Transform::GrayToColor)?;
    }
    Ok(())
}

fn handle_sub_byte_gray<P: PixelFormat, D: Decoder + ?Sized>(
    decoder: &mut D,
) -> Result<(), RowError> {
    let info = decoder.info();
    if info.color_model.is_gray() && info.bit_depth < 8 && P::BIT_DEPTH >= 8 {
        install(decoder, Transform::ExpandSubByteGray)?;
    }
    Ok(())
}

/// Widen a row of 8-bit samples to 16-bit, in place.
///
/// `row_info.rowbytes` is the size of the widened row, so the first
/// `rowbytes / 2` bytes are the source samples. Samples are processed from
/// last to first: slot `i` occupies bytes `2i..2i+2`, which never precede
/// source byte `i`, so nothing is overwritten before it has been read.
///
/// Each widened sample holds the source byte as its value (`0x93` becomes
/// `0x0093`), stored in native byte order.
pub fn expand_8_to_16(row_info: &RowInfo, row: &mut [u8]) {
    let samples = (row_info.rowbytes / 2).min(row.len() / 2);
    for i in (0..samples).rev() {
        let wide = u16::from(row[i]).to_ne_bytes();
        row[2 * i] = wide[0];
        row[2 * i + 1] = wide[1];
    }
    log::trace!("expanded {samples} samples to 16 bits");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_u16(bytes: &[u8]) -> alloc::vec::Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect()
    }

    #[test]
    fn expand_in_place_back_to_front() {
        let mut row = [
            0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9A, 0, 0, 0, 0, 0, 0, 0, 0,
        ];
        let info = RowInfo {
            width: 8,
            rowbytes: 16,
            channels: 1,
            bit_depth: 16,
        };
        expand_8_to_16(&info, &mut row);
        assert_eq!(
            as_u16(&row),
            [0x0093, 0x0094, 0x0095, 0x0096, 0x0097, 0x0098, 0x0099, 0x009A]
        );
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn expand_little_endian_layout() {
        let mut row = [0xAB, 0xCD, 0, 0];
        let info = RowInfo {
            width: 2,
            rowbytes: 4,
            channels: 1,
            bit_depth: 16,
        };
        expand_8_to_16(&info, &mut row);
        assert_eq!(row, [0xAB, 0x00, 0xCD, 0x00]);
    }

    #[test]
    fn expand_ignores_bytes_past_rowbytes() {
        let mut row = [0x10, 0x20, 0, 0, 0xEE, 0xEE];
        let info = RowInfo {
            width: 2,
            rowbytes: 4,
            channels: 1,
            bit_depth: 16,
        };
        expand_8_to_16(&info, &mut row);
        assert_eq!(as_u16(&row[..4]), [0x10, 0x20]);
        assert_eq!(&row[4..], &[0xEE, 0xEE]);
    }
}
