//! Transform selection for every source/destination format pairing.

mod common;

use common::ScriptedDecoder;
use rgb::{Gray, GrayAlpha, Rgb, Rgba};
use zenrows::{
    Capability, ColorModel, Decoder, FillerPlacement, Gray2, Index4, Index8, PixelFormat,
    RowError, Transform, Transparency, convert_color_space,
};

fn session(model: ColorModel, depth: u8) -> ScriptedDecoder {
    ScriptedDecoder::source(model, depth, 4, 4)
}

fn negotiate<P: PixelFormat>(decoder: &mut ScriptedDecoder) -> Result<(), RowError> {
    decoder.read_header()?;
    convert_color_space::<P, _>(decoder)
}

fn with_trns(mut decoder: ScriptedDecoder) -> ScriptedDecoder {
    decoder.header_mut().transparency = Some(Transparency::Rgb(Rgb { r: 0, g: 0, b: 0 }));
    decoder
}

fn with_palette(mut decoder: ScriptedDecoder) -> ScriptedDecoder {
    decoder.header_mut().palette = vec![Rgb { r: 1, g: 2, b: 3 }; 4];
    decoder
}

fn assert_missing(result: Result<(), RowError>, expected: Capability) {
    match result {
        Err(RowError::Capability(cap)) => assert_eq!(cap, expected),
        other => panic!("expected missing {expected:?}, got {other:?}"),
    }
}

// ── identity ─────────────────────────────────────────────────────────

#[test]
fn matching_formats_install_nothing() {
    let mut dec = session(ColorModel::RgbAlpha, 8);
    negotiate::<Rgba<u8>>(&mut dec).unwrap();
    assert!(dec.installed.is_empty());

    let mut dec = with_palette(session(ColorModel::Indexed, 8));
    negotiate::<Index8>(&mut dec).unwrap();
    assert!(dec.installed.is_empty());

    let mut dec = session(ColorModel::Gray, 2);
    negotiate::<Gray2>(&mut dec).unwrap();
    assert!(dec.installed.is_empty());
}

#[test]
fn declares_destination_format() {
    let mut dec = session(ColorModel::Gray, 16);
    negotiate::<Rgba<u8>>(&mut dec).unwrap();
    assert_eq!(dec.info().color_model, ColorModel::RgbAlpha);
    assert_eq!(dec.info().bit_depth, 8);
}

// ── bit depth ────────────────────────────────────────────────────────

#[test]
fn sixteen_to_eight_truncates() {
    let mut dec = session(ColorModel::Rgb, 16);
    negotiate::<Rgb<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::TruncateDepth]));

    let mut dec = session(ColorModel::Rgb, 16).without(Capability::Strip16);
    assert_missing(negotiate::<Rgb<u8>>(&mut dec), Capability::Strip16);
}

#[test]
fn eight_to_sixteen_installs_row_widener() {
    let mut dec = session(ColorModel::Rgb, 8);
    negotiate::<Rgb<u16>>(&mut dec).unwrap();
    assert!(matches!(
        dec.installed[..],
        [Transform::UserRowTransform {
            bit_depth: 16,
            channels: 3,
            ..
        }]
    ));

    let mut dec = session(ColorModel::Rgb, 8).without(Capability::UserTransform);
    assert_missing(negotiate::<Rgb<u16>>(&mut dec), Capability::UserTransform);
}

// ── alpha ────────────────────────────────────────────────────────────

#[test]
fn alpha_is_stripped() {
    let mut dec = session(ColorModel::RgbAlpha, 8);
    negotiate::<Rgb<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::StripAlpha]));

    let mut dec = session(ColorModel::GrayAlpha, 8).without(Capability::StripAlpha);
    assert_missing(negotiate::<Gray<u8>>(&mut dec), Capability::StripAlpha);
}

#[test]
fn transparency_chunk_is_stripped_for_opaque_destination() {
    let mut dec = with_trns(session(ColorModel::Rgb, 8));
    negotiate::<Rgb<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::StripAlpha]));
}

#[test]
fn missing_alpha_is_filled() {
    let mut dec = session(ColorModel::Rgb, 8);
    negotiate::<Rgba<u8>>(&mut dec).unwrap();
    assert!(matches!(
        dec.installed[..],
        [Transform::AddAlpha {
            filler: 0xFF,
            placement: FillerPlacement::After
        }]
    ));

    let mut dec = session(ColorModel::Gray, 8).without(Capability::Filler);
    assert_missing(negotiate::<GrayAlpha<u8>>(&mut dec), Capability::Filler);
}

#[test]
fn sixteen_bit_filler_is_full_scale() {
    let mut dec = session(ColorModel::Rgb, 16);
    negotiate::<Rgba<u16>>(&mut dec).unwrap();
    assert!(matches!(
        dec.installed[..],
        [Transform::AddAlpha { filler: 0xFFFF, .. }]
    ));
}

#[test]
fn transparency_chunk_becomes_alpha() {
    let mut dec = with_trns(session(ColorModel::Rgb, 8));
    negotiate::<Rgba<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::TransparencyToAlpha]));
}

#[test]
fn transparency_falls_back_to_filler_without_expand() {
    let mut dec = with_trns(session(ColorModel::Rgb, 8)).without(Capability::Expand);
    negotiate::<Rgba<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::AddAlpha { .. }]));
}

// ── palette ──────────────────────────────────────────────────────────

#[test]
fn palette_expands_to_color_and_is_dropped() {
    let mut dec = with_palette(session(ColorModel::Indexed, 8));
    negotiate::<Rgb<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::ExpandPaletteToColor]));
    assert!(dec.info().palette.is_empty());

    let mut dec = with_palette(session(ColorModel::Indexed, 8)).without(Capability::Expand);
    assert_missing(negotiate::<Rgb<u8>>(&mut dec), Capability::Expand);
}

#[test]
fn conversion_to_indexed_is_never_possible() {
    let mut dec = session(ColorModel::Rgb, 8);
    let err = negotiate::<Index8>(&mut dec).unwrap_err();
    assert!(matches!(err, RowError::UnsupportedConversion(_)));
    assert!(!err.is_capability());
    assert!(err.to_string().contains("indexed"));
}

#[test]
fn sub_byte_indices_are_packed_to_eight_bits() {
    let mut dec = with_palette(session(ColorModel::Indexed, 2));
    negotiate::<Index8>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::Pack]));

    let mut dec = with_palette(session(ColorModel::Indexed, 2)).without(Capability::Pack);
    assert_missing(negotiate::<Index8>(&mut dec), Capability::Pack);
}

#[test]
fn indexed_below_eight_bits_is_unsupported() {
    let mut dec = with_palette(session(ColorModel::Indexed, 8));
    let err = negotiate::<Index4>(&mut dec).unwrap_err();
    assert!(matches!(err, RowError::UnsupportedConversion(_)));
    assert!(err.to_string().contains("below 8"));
}

// ── color model ──────────────────────────────────────────────────────

#[test]
fn color_to_gray() {
    let mut dec = session(ColorModel::Rgb, 8);
    negotiate::<Gray<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::ColorToGray]));

    let mut dec = session(ColorModel::Rgb, 8).without(Capability::RgbToGray);
    assert_missing(negotiate::<Gray<u8>>(&mut dec), Capability::RgbToGray);
}

#[test]
fn gray_to_color() {
    let mut dec = session(ColorModel::GrayAlpha, 8);
    negotiate::<Rgba<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::GrayToColor]));

    let mut dec = session(ColorModel::Gray, 8).without(Capability::GrayToRgb);
    assert_missing(negotiate::<Rgb<u8>>(&mut dec), Capability::GrayToRgb);
}

// ── sub-byte gray ────────────────────────────────────────────────────

#[test]
fn sub_byte_gray_expands() {
    let mut dec = session(ColorModel::Gray, 4);
    negotiate::<Gray<u8>>(&mut dec).unwrap();
    assert!(matches!(dec.installed[..], [Transform::ExpandSubByteGray]));

    let mut dec = session(ColorModel::Gray, 1).without(Capability::Expand);
    assert_missing(negotiate::<Gray<u8>>(&mut dec), Capability::Expand);
}

// ── ordering ─────────────────────────────────────────────────────────

#[test]
fn axes_are_handled_in_fixed_order() {
    let mut dec = with_trns(with_palette(session(ColorModel::Indexed, 8)));
    dec.header_mut().transparency = Some(Transparency::Indexed(vec![0, 255]));
    negotiate::<Gray<u16>>(&mut dec).unwrap();
    assert_eq!(
        dec.installed_caps(),
        [
            Capability::UserTransform,
            Capability::StripAlpha,
            Capability::Expand,
            Capability::RgbToGray,
        ]
    );
}

#[test]
fn first_missing_capability_stops_negotiation() {
    let mut dec = session(ColorModel::RgbAlpha, 16).without(Capability::StripAlpha);
    assert_missing(negotiate::<Gray<u8>>(&mut dec), Capability::StripAlpha);
    // depth ran before alpha failed; nothing after it was attempted
    assert_eq!(dec.installed_caps(), [Capability::Strip16]);
    assert_eq!(dec.info().color_model, ColorModel::RgbAlpha);
}
