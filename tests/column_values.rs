//! Converting WKT/EWKT column values for each target database.

use std::borrow::Cow;

use wkt_sdo::{
    CompilerOptions, Dialect, Error, NullSridResolver, SdoCompiler, SridResolver, WktConverter,
    classify,
};

/// Knows EPSG:4326 only.
struct Wgs84Resolver;

impl SridResolver for Wgs84Resolver {
    fn resolve(&self, epsg: u32) -> Result<Option<String>, Error> {
        Ok((epsg == 4326).then(|| "8307".to_owned()))
    }
}

fn converter(dialect: Dialect) -> WktConverter<Wgs84Resolver> {
    WktConverter::new(
        dialect,
        SdoCompiler::new(CompilerOptions::default(), Wgs84Resolver),
    )
}

#[test]
fn test_non_geometry_values_pass_through() {
    for dialect in Dialect::ALL {
        let converter = converter(dialect);
        for value in [
            "test",
            "",
            "POINT",
            "42",
            "ST_GeomFromText('POINT(0 0)')",
            "LINE\u{17f}TRING(1 1, 2 2)",
            "\u{17f}RID=4326;POINT(1 1)",
        ] {
            assert_eq!(
                converter.handle_column_value(value).unwrap(),
                Cow::Borrowed(value),
                "{dialect}: {value:?}"
            );
        }
    }
}

#[test]
fn test_function_dialects() {
    let mysql = converter(Dialect::MySql);
    assert_eq!(
        mysql.handle_column_value("POINT(0 0)").unwrap(),
        "ST_GeomFromText('POINT(0 0)')"
    );
    assert_eq!(
        mysql.handle_column_value("SRID=4326;POINT(0 0)").unwrap(),
        "ST_GeomFromText('POINT(0 0)', 4326)"
    );

    let h2 = converter(Dialect::H2);
    assert!(matches!(
        h2.handle_column_value("POINT(0 0)").unwrap_err(),
        Error::MissingSrid {
            function: "ST_GeomFromText",
            ..
        }
    ));
    assert_eq!(
        h2.handle_column_value("SRID=4326;POINT Z(0 0 1)").unwrap(),
        "ST_GeomFromText('POINT Z(0 0 1)', 4326)"
    );
    let info = classify("POINT(0 0)").unwrap();
    assert_eq!(
        converter(Dialect::Derby).convert(&info, Some(3857)).unwrap(),
        "ST_GeomFromText('POINT(0 0)', 3857)"
    );
}

#[test]
fn test_postgres_keeps_ewkt() {
    let postgres = converter(Dialect::PostgreSql);
    assert_eq!(
        postgres.handle_column_value("SRID=4326;POINT(0 0)").unwrap(),
        Cow::Borrowed("SRID=4326;POINT(0 0)")
    );
    assert!(matches!(
        Dialect::PostgreSql.convert_to_function("POINT(0 0)", None),
        Err(Error::UnsupportedDialect { .. })
    ));
}

#[test]
fn test_convert_to_function() {
    let wkt = "POINT(0 0)";
    assert_eq!(
        Dialect::MySql.convert_to_function(wkt, None).unwrap(),
        "ST_GeomFromText('POINT(0 0)')"
    );
    assert_eq!(
        Dialect::MySql.convert_to_function(wkt, Some("")).unwrap(),
        "ST_GeomFromText('POINT(0 0)')"
    );
    assert_eq!(
        Dialect::H2.convert_to_function(wkt, Some("4326")).unwrap(),
        "ST_GeomFromText('POINT(0 0)', 4326)"
    );
    assert!(matches!(
        Dialect::MySql.convert_to_function("  ", Some("4326")),
        Err(Error::EmptyWkt)
    ));
    assert!(matches!(
        Dialect::Derby.convert_to_function(wkt, Some("")),
        Err(Error::MissingSrid { .. })
    ));
}

#[test]
fn test_oracle_legacy_and_native_forms() {
    let oracle = converter(Dialect::Oracle);
    assert_eq!(
        oracle.handle_column_value("POINT(0 0)").unwrap(),
        "SDO_GEOMETRY('POINT(0 0)')"
    );
    assert_eq!(
        oracle.handle_column_value("SRID=4326;POINT(0 0)").unwrap(),
        "SDO_GEOMETRY(2001,8307,NULL,SDO_ELEM_INFO_ARRAY(1,1,1),SDO_ORDINATE_ARRAY(0,0))"
    );
    assert_eq!(
        oracle.handle_column_value("POINT Z(0 0 1)").unwrap(),
        "SDO_GEOMETRY(3001,NULL,NULL,SDO_ELEM_INFO_ARRAY(1,1,1),SDO_ORDINATE_ARRAY(0,0,1))"
    );

    let info = classify("POINT(0 0)").unwrap();
    assert_eq!(
        oracle.convert(&info, Some(4326)).unwrap(),
        "SDO_GEOMETRY('POINT(0 0)', 8307)"
    );
    assert_eq!(
        oracle.convert(&info, Some(3857)).unwrap(),
        "SDO_GEOMETRY('POINT(0 0)')"
    );
}

#[test]
fn test_oracle_long_legacy_literal() {
    let coordinates: Vec<String> = (0..600).map(|i| format!("{i} {i}")).collect();
    let wkt = format!("LINESTRING({})", coordinates.join(","));
    assert!(wkt.len() > 4000);

    let sql = converter(Dialect::Oracle).handle_column_value(&wkt).unwrap();
    assert!(sql.starts_with("SDO_GEOMETRY('' || 'LINESTRING(0 0,1 1,"));
    assert!(sql.ends_with("') || '')"));
    assert_eq!(sql.matches("TO_CLOB(").count(), (wkt.len() - 1) / 4000);

    let reassembled: String = sql["SDO_GEOMETRY('' || '".len()..sql.len() - "') || '')".len()]
        .split("' || TO_CLOB('")
        .collect();
    assert_eq!(reassembled, wkt);
}

#[test]
fn test_oracle_invalid_body_is_an_error() {
    let oracle = WktConverter::new(
        Dialect::Oracle,
        SdoCompiler::new(CompilerOptions::default(), NullSridResolver),
    );
    assert!(oracle.handle_column_value("SRID=4326;POINT(0)").is_err());
}

#[test]
fn test_dialect_names() {
    for dialect in Dialect::ALL {
        assert_eq!(dialect.name().parse::<Dialect>().unwrap(), dialect);
    }
    assert_eq!("postgis".parse::<Dialect>().unwrap(), Dialect::PostgreSql);
    assert_eq!(
        "sqlite".parse::<Dialect>().unwrap_err().to_string(),
        "Unknown database dialect 'sqlite'"
    );
}
