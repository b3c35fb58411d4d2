use baseplan_codec::{
    decode, decode_with_format, encode, envelope, DecodeError, WireFormat, EMBED_LIMIT,
};
use baseplan_core::{BuildingStyle, ShapeKind, Vec2};
use baseplan_geometry::Piece;
use baseplan_layout::{Design, Settings};
use proptest::prelude::*;

fn pack(json: &str) -> String {
    envelope::pack(json.as_bytes()).unwrap()
}

/// Pieces laid out on a 100-unit lattice, one per cell, so none overlap
/// whatever their kind or rotation.
fn lattice_design(specs: &[(u32, usize, usize, f64, f64, f64)]) -> Design {
    let pieces = specs
        .iter()
        .enumerate()
        .map(|(i, &(floor, kind, style, rotation, jx, jy))| {
            let cell = Vec2::new(
                (i % 20) as f64 * 100.0 - 950.0,
                (i / 20) as f64 * 100.0 - 450.0,
            );
            let piece = Piece::new(
                ShapeKind::ALL[kind],
                BuildingStyle::ALL[style],
                cell + Vec2::new(jx, jy),
                rotation,
            );
            (floor, piece)
        });
    Design::from_pieces(Settings::default(), Vec::new(), pieces)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decode_reverses_encode(
        specs in prop::collection::vec(
            (0u32..3, 0usize..4, 0usize..4, 0.0f64..360.0, -5.0f64..5.0, -5.0f64..5.0),
            0..200,
        )
    ) {
        let design = lattice_design(&specs);
        let encoded = encode(&design).unwrap();
        let decoded = decode(&encoded.text).unwrap();

        prop_assert_eq!(decoded.shape_count(), design.shape_count());
        for floor in 0..3 {
            for (a, b) in design.shapes(floor).zip(decoded.shapes(floor)) {
                prop_assert_eq!(a.piece.kind(), b.piece.kind());
                prop_assert_eq!(a.piece.style(), b.piece.style());
                for (va, vb) in a.piece.vertices().iter().zip(b.piece.vertices()) {
                    prop_assert!((va.x - vb.x).abs() <= 1.0, "{:?} vs {:?}", va, vb);
                    prop_assert!((va.y - vb.y).abs() <= 1.0, "{:?} vs {:?}", va, vb);
                }
            }
        }
    }
}

#[test]
fn empty_design_round_trips() {
    let encoded = encode(&Design::new()).unwrap();
    assert!(!encoded.exceeds_limit);
    let (design, format) = decode_with_format(&encoded.text).unwrap();
    assert_eq!(format, WireFormat::Compact);
    assert_eq!(design.shape_count(), 0);
}

#[test]
fn long_designs_are_flagged_but_still_encoded() {
    let specs: Vec<_> = (0..200)
        .map(|i| (0, i % 4, (i / 4) % 4, (i * 37 % 360) as f64, 0.3, -0.4))
        .collect();
    let design = lattice_design(&specs);
    let encoded = encode(&design).unwrap();
    assert!(encoded.exceeds_limit);
    assert!(encoded.text.len() > EMBED_LIMIT);
    assert_eq!(decode(&encoded.text).unwrap().shape_count(), 200);
}

#[test]
fn newest_format_fixture() {
    let text = pack(
        r#"{"f":{"0":[[0,-25,-25,25,-25,25,25,-25,25]],"3":[[2,1,-25,-25,25,-25,-25,25]]},"g":1,"gs":25}"#,
    );
    let (design, format) = decode_with_format(&text).unwrap();
    assert_eq!(format, WireFormat::Compact);
    assert!(design.settings.grid_enabled);
    assert_eq!(design.settings.grid_size, 25.0);
    let corner = design.shapes(3).next().unwrap();
    assert_eq!(corner.piece.kind(), ShapeKind::Corner);
    assert_eq!(corner.piece.style(), BuildingStyle::B);
    assert!(corner.piece.rotation().abs() < 1e-9);
}

#[test]
fn intermediate_format_fixture() {
    let text = pack(
        r#"{"s":[{"t":0,"b":2,"v":[[-25,-25],[25,-25],[25,25],[-25,25]]},{"t":1,"x":100,"y":0,"r":30}],"st":1,"p":0.1}"#,
    );
    let (design, format) = decode_with_format(&text).unwrap();
    assert_eq!(format, WireFormat::Keyed);
    assert!(design.settings.fief_enabled);
    assert_eq!(design.settings.fief_padding, 0.1);
    let shapes: Vec<_> = design.shapes(0).collect();
    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[0].piece.style(), BuildingStyle::C);
    assert!(shapes[1].piece.centroid().approx_eq(Vec2::new(100.0, 0.0), 1e-9));
    assert!((shapes[1].piece.rotation() - 30.0).abs() < 1e-9);
}

#[test]
fn legacy_format_fixture() {
    let text = pack(
        r#"{"shapes":[
            {"type":"square","x":5,"y":5,"rotation":270,"buildingStyle":"D",
             "vertices":[{"x":25,"y":-25},{"x":75,"y":-25},{"x":75,"y":25},{"x":25,"y":25}]},
            {"type":"corner","x":0,"y":0,"rotation":90,"floor":1}
        ],"gridEnabled":false,"fiefEnabled":true,"fiefPadding":0.5}"#,
    );
    let (design, format) = decode_with_format(&text).unwrap();
    assert_eq!(format, WireFormat::Legacy);
    assert!(design.settings.fief_enabled);

    let square = design.shapes(0).next().unwrap();
    assert_eq!(square.piece.style(), BuildingStyle::D);
    assert!(square.piece.centroid().approx_eq(Vec2::new(50.0, 0.0), 1e-9));
    assert!(square.piece.rotation().abs() < 1e-9);

    let corner = design.shapes(1).next().unwrap();
    assert!((corner.piece.rotation() - 90.0).abs() < 1e-9);

    // re-encoding upgrades to the newest layout
    let again = decode_with_format(&encode(&design).unwrap().text).unwrap();
    assert_eq!(again.1, WireFormat::Compact);
    assert_eq!(again.0.shape_count(), 2);
}

#[test]
fn corrupt_strings_fail_without_partial_results() {
    assert!(matches!(decode(""), Err(DecodeError::Empty)));
    assert!(matches!(decode("%%%"), Err(DecodeError::Base64(_))));

    let good = encode(&lattice_design(&[(0, 0, 0, 0.0, 0.0, 0.0)])).unwrap().text;
    let truncated = &good[..good.len() / 2];
    assert!(decode(truncated).is_err());

    let bad_shape = pack(r#"[[0,-25,-25,25,-25,25,25,-25,25],[9,1,2,3]]"#);
    assert!(matches!(
        decode(&bad_shape),
        Err(DecodeError::InvalidShape { index: 1, .. })
    ));
}
