//! Literals that must be rejected, either by the classifier or by the parser.
//!
//! Every rejection happens before any SQL is produced and before the SRID
//! resolver is consulted.

use std::cell::Cell;

use wkt_sdo::wkt::MAX_COLLECTION_DEPTH;
use wkt_sdo::{
    CompilerOptions, Error, GrammarError, NullSridResolver, SdoCompiler, SridResolver, classify,
};

fn compile(wkt: &str) -> Result<String, Error> {
    SdoCompiler::new(CompilerOptions::default(), NullSridResolver).compile_str(wkt)
}

#[test]
fn test_invalid_literals_are_rejected() {
    for wkt in [
        "PONIT(1 1)",
        "POINT(1)",
        "POINT()",
        "Z POINT(1 1)",
        "POINTZ(1 1)",
        "POINTMZ(1 1 1 1)",
        "POINTZM(1 1)",
        "POINTZM(1 1 1)",
        "LINESTRINGs (1 1, 2 2)",
        "LINESTRING((1 1, 2 2))",
        "POLYgonm((1 1, 2 2))",
        "POLYgon((1 1, 2 2),())",
        "POLYgon((1 1, 2 2),)",
        "poligon((1 1, 2 2))",
        "multypoligon(((1 1, 2 2)))",
        "GeometryCollection ( LINESTRINGm (1 1 1, 2 2 2 )",
        "GeometryCollection ( )",
        "GeometryCollectionz ( LINESTRING (1 1, 2 2 )",
    ] {
        assert!(compile(wkt).is_err(), "{wkt:?} should be rejected");
    }
}

#[test]
fn test_classifier_rejections() {
    for wkt in [
        "",
        "   ",
        "PONIT(1 1)",
        "Z POINT(1 1)",
        "POINTMZ(1 1 1 1)",
        "LINESTRINGs (1 1, 2 2)",
        "POINT EMPTY",
        "SRID=4326;",
        "SRID=;POINT(1 2)",
        "MULTIGEOMETRYCOLLECTION(POINT(1 2))",
    ] {
        assert!(
            matches!(classify(wkt), Err(GrammarError::NotWkt(_))),
            "{wkt:?} should not classify"
        );
    }
    assert_eq!(
        classify("SRID=99999999999;POINT(1 2)").unwrap_err(),
        GrammarError::SridOutOfRange("99999999999".to_owned())
    );
}

#[test]
fn test_dimension_mismatch_in_collection() {
    let err = compile("GeometryCollectionz ( LINESTRING (1 1, 2 2 )").unwrap_err();
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 3,
            found: 2,
            ..
        }
    ));
    let err = compile("GEOMETRYCOLLECTION M(POINT ZM(1 2 3 4))").unwrap_err();
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            expected: 3,
            found: 4,
            ..
        }
    ));
}

#[test]
fn test_empty_and_nan() {
    assert!(matches!(
        compile("GEOMETRYCOLLECTION(POINT EMPTY)").unwrap_err(),
        Error::Grammar(GrammarError::EmptyGeometry { .. })
    ));
    assert!(matches!(
        compile("POINT(NaN 1)").unwrap_err(),
        Error::Grammar(GrammarError::NaN { pos: 6 })
    ));
    assert!(matches!(
        compile("POINT(1 nan)").unwrap_err(),
        Error::Grammar(GrammarError::NaN { pos: 8 })
    ));
}

#[test]
fn test_non_finite_and_malformed_numbers() {
    for (wkt, bad) in [
        ("POINT(inf 1)", "inf"),
        ("POINT(1 -Infinity)", "-Infinity"),
        ("POINT(1.2.3 4)", "1.2.3"),
        ("POINT(1e999 4)", "1e999"),
        ("POINT(0x10 4)", "0x10"),
    ] {
        match compile(wkt).unwrap_err() {
            Error::NumericFormat { value, .. } => assert_eq!(value, bad, "{wkt}"),
            other => panic!("{wkt}: unexpected error {other:?}"),
        }
    }
}

#[test]
fn test_trailing_input() {
    assert!(matches!(
        compile("POINT(1 2))").unwrap_err(),
        Error::Grammar(GrammarError::TrailingInput { pos: 10 })
    ));
}

fn nested_collections(depth: usize) -> String {
    let mut wkt = "GEOMETRYCOLLECTION(".repeat(depth);
    wkt.push_str("POINT(1 2)");
    wkt.push_str(&")".repeat(depth));
    wkt
}

#[test]
fn test_collection_nesting_limit() {
    let deepest = compile(&nested_collections(MAX_COLLECTION_DEPTH)).unwrap();
    assert!(deepest.starts_with("SDO_GEOMETRY(2004,NULL,NULL,SDO_ELEM_INFO_ARRAY(1,1,1),"));
    assert!(matches!(
        compile(&nested_collections(MAX_COLLECTION_DEPTH + 1)).unwrap_err(),
        Error::Grammar(GrammarError::NestingTooDeep { .. })
    ));
}

/// Counts lookups so the tests can check nobody asked.
#[derive(Default)]
struct CountingResolver {
    calls: Cell<usize>,
}

impl SridResolver for CountingResolver {
    fn resolve(&self, _epsg: u32) -> Result<Option<String>, Error> {
        self.calls.set(self.calls.get() + 1);
        Ok(Some("8307".to_owned()))
    }
}

#[test]
fn test_rejection_skips_srid_lookup() {
    let compiler = SdoCompiler::new(CompilerOptions::default(), CountingResolver::default());
    assert!(compiler.compile_str("SRID=4326;POINT(1)").is_err());
    assert!(compiler.compile_str("SRID=4326;GEOMETRYCOLLECTION()").is_err());
    assert_eq!(compiler.resolver().calls.get(), 0);

    compiler.compile_str("SRID=4326;POINT(1 2)").unwrap();
    assert_eq!(compiler.resolver().calls.get(), 1);
}

#[test]
fn test_error_messages() {
    assert_eq!(
        compile("PONIT(1 1)").unwrap_err().to_string(),
        "Invalid WKT: 'PONIT(1 1)' is not a supported (E)WKT literal"
    );
    assert_eq!(
        compile("POINT(1 2))").unwrap_err().to_string(),
        "Invalid WKT: trailing input at position 10"
    );
    assert!(compile("PONIT(1 1)").unwrap_err().is_grammar());
    assert!(
        !compile("GeometryCollectionz ( LINESTRING (1 1, 2 2 )")
            .unwrap_err()
            .is_grammar()
    );
}
