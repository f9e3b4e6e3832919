//! Shared checks for the fuzz harnesses and the regression tests that replay
//! their findings.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`test_compile`]: compile arbitrary text and check the output when it succeeds
//! - [`GeneratedGeometry`]: a structured geometry that always renders to valid WKT
//! - [`test_generated`]: compile a [`GeneratedGeometry`] and check it against its own counts

use core::num::NonZeroUsize;

use arbitrary::Arbitrary;

use crate::options::CompilerOptions;
use crate::sdo::{SdoArrays, SdoCompiler, SdoGtype};
use crate::srid::NullSridResolver;
use crate::wkt::{GeometryKind, classify, parse_wkt};

/// Collections nested deeper than this render their children as points.
const MAX_GENERATED_DEPTH: usize = 6;

/// Compile arbitrary text.
///
/// Rejection is fine. Anything that classifies and parses must compile, and
/// the arrays and the constructor must agree with the classified header.
pub fn test_compile(input: &str) {
    let Ok(info) = classify(input) else {
        return;
    };
    let compiler = SdoCompiler::new(CompilerOptions::default(), NullSridResolver);
    let Ok(arrays) = parse_wkt(info.wkt_without_srid) else {
        assert!(compiler.compile(&info, None).is_err());
        return;
    };
    check_arrays(&arrays);

    let gtype = SdoGtype::from_info(&info);
    assert_eq!(usize::from(gtype.dimensions()), arrays.dimensions);

    let sql = compiler
        .compile(&info, None)
        .expect("a parsed literal must compile");
    assert!(sql.starts_with(&format!("SDO_GEOMETRY({gtype},NULL,NULL,")));
    assert!(sql.ends_with(')'));
}

/// Array invariants that hold for every parsed geometry.
fn check_arrays(arrays: &SdoArrays<'_>) {
    assert!(!arrays.element_info.is_empty());
    assert_eq!(arrays.ordinates.len() % arrays.dimensions, 0);
    let mut previous = 0;
    for element in &arrays.element_info {
        assert!(element.offset > previous, "offsets must increase");
        assert!(element.offset <= arrays.ordinates.len());
        assert_eq!((element.offset - 1) % arrays.dimensions, 0);
        previous = element.offset;
    }
}

/// Coordinate dimensionality of a generated geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Arbitrary)]
pub enum GeneratedDimensions {
    /// `x y`
    Xy,
    /// `x y z`
    Xyz,
    /// `x y m`
    Xym,
    /// `x y z m`
    Xyzm,
}

impl GeneratedDimensions {
    /// Ordinates per coordinate.
    #[must_use]
    pub const fn count(self) -> usize {
        match self {
            GeneratedDimensions::Xy => 2,
            GeneratedDimensions::Xyz | GeneratedDimensions::Xym => 3,
            GeneratedDimensions::Xyzm => 4,
        }
    }

    const fn has_z(self) -> bool {
        matches!(self, GeneratedDimensions::Xyz | GeneratedDimensions::Xyzm)
    }

    const fn has_m(self) -> bool {
        matches!(self, GeneratedDimensions::Xym | GeneratedDimensions::Xyzm)
    }

    const fn qualifier(self) -> &'static str {
        match self {
            GeneratedDimensions::Xy => "",
            GeneratedDimensions::Xyz => " Z",
            GeneratedDimensions::Xym => " M",
            GeneratedDimensions::Xyzm => " ZM",
        }
    }
}

/// Shape of a generated geometry. Counts are reduced to small lengths when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Arbitrary)]
pub enum GeneratedShape {
    /// A single point.
    Point,
    /// A line string with the given number of coordinates.
    LineString(u8),
    /// A polygon with the given ring lengths.
    Polygon(Vec<u8>),
    /// A multipoint with the given number of points.
    MultiPoint(u8),
    /// A multilinestring with the given line lengths.
    MultiLineString(Vec<u8>),
    /// A multipolygon with the given ring lengths per polygon.
    MultiPolygon(Vec<Vec<u8>>),
    /// A collection of nested shapes.
    GeometryCollection(Vec<GeneratedShape>),
}

impl GeneratedShape {
    fn gtype(&self, dimensions: GeneratedDimensions) -> SdoGtype {
        let (kind, is_multi) = match self {
            GeneratedShape::Point => (GeometryKind::Point, false),
            GeneratedShape::LineString(_) => (GeometryKind::LineString, false),
            GeneratedShape::Polygon(_) => (GeometryKind::Polygon, false),
            GeneratedShape::MultiPoint(_) => (GeometryKind::Point, true),
            GeneratedShape::MultiLineString(_) => (GeometryKind::LineString, true),
            GeneratedShape::MultiPolygon(_) => (GeometryKind::Polygon, true),
            GeneratedShape::GeometryCollection(_) => (GeometryKind::GeometryCollection, false),
        };
        SdoGtype::new(kind, is_multi, dimensions.has_z(), dimensions.has_m())
    }
}

/// A structured geometry plus the compiler limits to use for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Arbitrary)]
pub struct GeneratedGeometry {
    /// Dimensionality shared by every nested geometry.
    pub dimensions: GeneratedDimensions,
    /// The geometry itself.
    pub shape: GeneratedShape,
    /// Optional `SRID=n;` prefix.
    pub srid: Option<u16>,
    /// Array limit minus one.
    pub array_limit: u8,
    /// CLOB chunk size minus one.
    pub clob_limit: u8,
}

/// WKT text of a [`GeneratedGeometry`] with the counts the parser must reproduce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedGeometry {
    /// The literal, including the SRID prefix.
    pub wkt: String,
    /// Every ordinate in the order it was written.
    pub ordinates: Vec<String>,
    /// Number of element-info triplets.
    pub elements: usize,
}

impl GeneratedGeometry {
    /// Render the literal.
    #[must_use]
    pub fn render(&self) -> RenderedGeometry {
        let mut renderer = Renderer {
            dimensions: self.dimensions,
            rendered: RenderedGeometry::default(),
        };
        if let Some(srid) = self.srid {
            renderer.rendered.wkt.push_str(&format!("SRID={srid};"));
        }
        renderer.shape(&self.shape, 0);
        renderer.rendered
    }

    /// The `SDO_GTYPE` the literal must compile to.
    #[must_use]
    pub fn gtype(&self) -> SdoGtype {
        self.shape.gtype(self.dimensions)
    }

    /// The compiler limits encoded in the input.
    #[must_use]
    pub fn options(&self) -> CompilerOptions {
        CompilerOptions::default()
            .with_array_limit(usize::from(self.array_limit) + 1)
            .with_clob_limit(NonZeroUsize::MIN.saturating_add(usize::from(self.clob_limit)))
    }
}

struct Renderer {
    dimensions: GeneratedDimensions,
    rendered: RenderedGeometry,
}

impl Renderer {
    fn shape(&mut self, shape: &GeneratedShape, depth: usize) {
        match shape {
            GeneratedShape::Point => {
                self.tag("POINT");
                self.rendered.wkt.push('(');
                self.coordinate();
                self.rendered.wkt.push(')');
                self.rendered.elements += 1;
            }
            GeneratedShape::LineString(len) => {
                self.tag("LINESTRING");
                self.coordinates(*len);
                self.rendered.elements += 1;
            }
            GeneratedShape::Polygon(rings) => {
                self.tag("POLYGON");
                self.rings(rings);
            }
            GeneratedShape::MultiPoint(len) => {
                self.tag("MULTIPOINT");
                self.rendered.wkt.push('(');
                for i in 0..small(*len) {
                    if i > 0 {
                        self.rendered.wkt.push_str(", ");
                    }
                    self.coordinate();
                    self.rendered.elements += 1;
                }
                self.rendered.wkt.push(')');
            }
            GeneratedShape::MultiLineString(lines) => {
                self.tag("MULTILINESTRING");
                self.rendered.wkt.push('(');
                for (i, len) in non_empty(lines, 2).iter().enumerate() {
                    if i > 0 {
                        self.rendered.wkt.push_str(", ");
                    }
                    self.coordinates(*len);
                    self.rendered.elements += 1;
                }
                self.rendered.wkt.push(')');
            }
            GeneratedShape::MultiPolygon(polygons) => {
                self.tag("MULTIPOLYGON");
                self.rendered.wkt.push('(');
                for (i, rings) in non_empty(polygons, Vec::new()).iter().enumerate() {
                    if i > 0 {
                        self.rendered.wkt.push_str(", ");
                    }
                    self.rings(rings);
                }
                self.rendered.wkt.push(')');
            }
            GeneratedShape::GeometryCollection(children) => {
                self.tag("GEOMETRYCOLLECTION");
                self.rendered.wkt.push('(');
                let children = if depth >= MAX_GENERATED_DEPTH || children.is_empty() {
                    &[GeneratedShape::Point][..]
                } else {
                    &children[..]
                };
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        self.rendered.wkt.push_str(", ");
                    }
                    self.shape(child, depth + 1);
                }
                self.rendered.wkt.push(')');
            }
        }
    }

    fn tag(&mut self, keyword: &str) {
        self.rendered.wkt.push_str(keyword);
        self.rendered.wkt.push_str(self.dimensions.qualifier());
    }

    fn rings(&mut self, rings: &[u8]) {
        self.rendered.wkt.push('(');
        for (i, len) in non_empty(rings, 3).iter().enumerate() {
            if i > 0 {
                self.rendered.wkt.push_str(", ");
            }
            self.coordinates(*len);
            self.rendered.elements += 1;
        }
        self.rendered.wkt.push(')');
    }

    fn coordinates(&mut self, len: u8) {
        self.rendered.wkt.push('(');
        for i in 0..small(len) {
            if i > 0 {
                self.rendered.wkt.push_str(", ");
            }
            self.coordinate();
        }
        self.rendered.wkt.push(')');
    }

    fn coordinate(&mut self) {
        for i in 0..self.dimensions.count() {
            if i > 0 {
                self.rendered.wkt.push(' ');
            }
            let index = self.rendered.ordinates.len();
            let ordinate = if index % 3 == 0 {
                format!("-{index}.25")
            } else {
                index.to_string()
            };
            self.rendered.wkt.push_str(&ordinate);
            self.rendered.ordinates.push(ordinate);
        }
    }
}

fn small(len: u8) -> usize {
    1 + usize::from(len % 16)
}

fn non_empty<T: Clone>(items: &[T], fallback: T) -> Vec<T> {
    if items.is_empty() {
        vec![fallback]
    } else {
        items.to_vec()
    }
}

/// Compile a generated geometry and check every array against what was rendered.
pub fn test_generated(geometry: &GeneratedGeometry) {
    let rendered = geometry.render();
    let info = classify(&rendered.wkt).expect("generated literals classify");
    assert_eq!(info.srid, geometry.srid.map(u32::from));
    assert_eq!(SdoGtype::from_info(&info), geometry.gtype());

    let arrays = parse_wkt(info.wkt_without_srid).expect("generated literals parse");
    check_arrays(&arrays);
    assert_eq!(arrays.dimensions, geometry.dimensions.count());
    assert_eq!(arrays.element_info.len(), rendered.elements);
    assert_eq!(arrays.ordinates, rendered.ordinates);

    let options = geometry.options();
    let sql = SdoCompiler::new(options, NullSridResolver)
        .compile(&info, None)
        .expect("generated literals compile");
    assert!(sql.starts_with(&format!("SDO_GEOMETRY({},NULL,NULL,", geometry.gtype())));
    if rendered.ordinates.len() < options.array_limit {
        let ordinates = format!("SDO_ORDINATE_ARRAY({}))", rendered.ordinates.join(","));
        assert!(sql.ends_with(&ordinates), "{sql}");
    } else {
        assert!(sql.ends_with("as SDO_ORDINATE_ARRAY)from dual))"), "{sql}");
    }
}
