//! Front-end classification of WKT/EWKT literals.
//!
//! Classification only looks at the outer shape of the literal: the optional
//! `SRID=n;` prefix, the geometry keyword with its `Z`/`M` qualifiers and the
//! parenthesized body. The body is checked by the parser.

use core::fmt;
use core::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::errors::GrammarError;

static EWKT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^(?:SRID\s*=\s*(?P<srid>[0-9]+)\s*;)?\s*(?P<wkt>(?:(?P<multi>MULTI)?(?P<simple>POINT|LINESTRING|POLYGON)|(?P<collection>GEOMETRYCOLLECTION))\s?(?P<z>Z)?(?P<m>M)?\s*\((?P<data>.*)\))$",
    )
    .expect("EWKT pattern is valid")
});

/// Base geometry type, without the `MULTI` prefix and qualifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// `POINT`
    Point,
    /// `LINESTRING`
    LineString,
    /// `POLYGON`
    Polygon,
    /// `GEOMETRYCOLLECTION`
    GeometryCollection,
}

impl GeometryKind {
    /// The upper-case WKT keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GeometryKind::Point => "POINT",
            GeometryKind::LineString => "LINESTRING",
            GeometryKind::Polygon => "POLYGON",
            GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryKind {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "POINT" => Ok(GeometryKind::Point),
            "LINESTRING" => Ok(GeometryKind::LineString),
            "POLYGON" => Ok(GeometryKind::Polygon),
            "GEOMETRYCOLLECTION" => Ok(GeometryKind::GeometryCollection),
            _ => Err(GrammarError::UnknownGeometryType {
                name: s.to_owned(),
                pos: 0,
            }),
        }
    }
}

/// Outer shape of a WKT/EWKT literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EwktInfo<'a> {
    /// The trimmed input.
    pub original: &'a str,
    /// The input without its `SRID=n;` prefix.
    pub wkt_without_srid: &'a str,
    /// The EPSG SRID from the prefix, if any.
    pub srid: Option<u32>,
    /// Upper-case keyword including the `MULTI` prefix and qualifiers, e.g. `MULTIPOINTZM`.
    pub geometry_type: String,
    /// Base type without prefix and qualifiers.
    pub kind: GeometryKind,
    /// A `Z` qualifier was present.
    pub has_z: bool,
    /// An `M` qualifier was present.
    pub has_m: bool,
    /// The keyword carries the `MULTI` prefix.
    pub is_multi: bool,
    /// The keyword is `GEOMETRYCOLLECTION`.
    pub is_collection: bool,
    /// The raw text between the outermost parentheses.
    pub data: &'a str,
}

impl<'a> EwktInfo<'a> {
    /// Classify a literal; see [`classify`].
    pub fn parse(input: &'a str) -> Result<Self, GrammarError> {
        classify(input)
    }

    /// Plain 2D WKT with no SRID: the form every dialect's WKT function accepts.
    #[must_use]
    pub fn is_legacy_compatible(&self) -> bool {
        self.srid.is_none() && !self.has_z && !self.has_m
    }

    /// Coordinate dimensionality declared by the qualifiers.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        2 + usize::from(self.has_z) + usize::from(self.has_m)
    }
}

/// Split a WKT/EWKT literal into its SRID, keyword, qualifiers and body.
///
/// # Errors
///
/// Returns [`GrammarError::NotWkt`] when the literal does not have the shape
/// `[SRID=n;]KEYWORD[ ][Z][M](...)`, and [`GrammarError::SridOutOfRange`] when
/// the SRID does not fit in 32 bits.
pub fn classify(input: &str) -> Result<EwktInfo<'_>, GrammarError> {
    let original = input.trim();
    let captures =
        header_captures(original).ok_or_else(|| GrammarError::NotWkt(original.to_owned()))?;

    let srid = captures
        .name("srid")
        .map(|srid| {
            srid.as_str()
                .parse::<u32>()
                .map_err(|_| GrammarError::SridOutOfRange(srid.as_str().to_owned()))
        })
        .transpose()?;

    let is_collection = captures.name("collection").is_some();
    let is_multi = captures.name("multi").is_some();
    let has_z = captures.name("z").is_some();
    let has_m = captures.name("m").is_some();
    let kind = match captures.name("simple") {
        Some(simple) => simple.as_str().parse()?,
        None => GeometryKind::GeometryCollection,
    };

    let mut geometry_type = String::with_capacity(24);
    if is_multi {
        geometry_type.push_str("MULTI");
    }
    geometry_type.push_str(kind.as_str());
    if has_z {
        geometry_type.push('Z');
    }
    if has_m {
        geometry_type.push('M');
    }

    Ok(EwktInfo {
        original,
        wkt_without_srid: captures.name("wkt").map_or(original, |m| m.as_str()),
        srid,
        geometry_type,
        kind,
        has_z,
        has_m,
        is_multi,
        is_collection,
        data: captures.name("data").map_or("", |m| m.as_str()),
    })
}

/// Whether the trimmed value has the outer shape of a WKT/EWKT literal.
#[must_use]
pub fn is_ewkt(value: &str) -> bool {
    header_captures(value.trim()).is_some()
}

/// Matches [`EWKT_RE`] with everything before the body restricted to ASCII.
///
/// `(?i)` folds case with Unicode rules, so `ſ` would otherwise match `S`
/// and a non-ASCII space would pass for `\s`.
fn header_captures(original: &str) -> Option<Captures<'_>> {
    EWKT_RE.captures(original).filter(|captures| {
        captures
            .name("data")
            .is_some_and(|data| original[..data.start()].is_ascii())
    })
}

fn normalize_type_name(geometry_type: &str) -> String {
    geometry_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Whether an OGC geometry type name such as `LinestringZm` or `Point Z` carries a `Z`.
#[must_use]
pub fn has_z_geometry_type(geometry_type: &str) -> bool {
    let name = normalize_type_name(geometry_type);
    name.ends_with('Z') || name.ends_with("ZM")
}

/// Whether an OGC geometry type name such as `LinestringZm` or `Linestring m` carries an `M`.
#[must_use]
pub fn has_m_geometry_type(geometry_type: &str) -> bool {
    normalize_type_name(geometry_type).ends_with('M')
}
