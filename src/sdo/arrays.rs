//! `SDO_ELEM_INFO_ARRAY` triplets and the verbatim ordinate sequence.

use core::fmt;

/// The `SDO_ETYPE` of an element-info triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// A point (`1`).
    Point,
    /// A line string (`2`).
    Line,
    /// The exterior ring of a polygon (`1003`).
    ExteriorRing,
    /// An interior ring (hole) of a polygon (`2003`).
    InteriorRing,
}

impl ElementType {
    /// The numeric `SDO_ETYPE` code.
    #[must_use]
    pub const fn code(self) -> usize {
        match self {
            ElementType::Point => 1,
            ElementType::Line => 2,
            ElementType::ExteriorRing => 1003,
            ElementType::InteriorRing => 2003,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One `(offset, etype, interpretation)` triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementInfo {
    /// 1-based index into the ordinate sequence where the element starts.
    pub offset: usize,
    /// What the element describes.
    pub element_type: ElementType,
    /// `SDO_INTERPRETATION`; straight segments and single points are always `1`.
    pub interpretation: usize,
}

impl ElementInfo {
    /// Creates a triplet with interpretation `1`.
    #[must_use]
    pub const fn new(offset: usize, element_type: ElementType) -> Self {
        Self {
            offset,
            element_type,
            interpretation: 1,
        }
    }

    /// The triplet as the three numbers written to `SDO_ELEM_INFO_ARRAY`.
    #[must_use]
    pub const fn values(&self) -> [usize; 3] {
        [self.offset, self.element_type.code(), self.interpretation]
    }
}

/// The two arrays Oracle needs to rebuild a geometry, as produced by one parse.
///
/// Ordinates borrow the original numeric text from the input so no precision is
/// lost through a floating-point round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdoArrays<'a> {
    /// Coordinate dimensionality of the outermost geometry (2, 3 or 4).
    pub dimensions: usize,
    /// Element-info triplets, in input order.
    pub element_info: Vec<ElementInfo>,
    /// Flat ordinate list, as written in the input.
    pub ordinates: Vec<&'a str>,
}

impl SdoArrays<'_> {
    /// Flattened `SDO_ELEM_INFO_ARRAY` values.
    #[must_use]
    pub fn element_info_values(&self) -> Vec<usize> {
        self.element_info
            .iter()
            .flat_map(ElementInfo::values)
            .collect()
    }

    /// Number of coordinate tuples in the ordinate sequence.
    #[must_use]
    pub fn tuple_count(&self) -> usize {
        self.ordinates.len() / self.dimensions
    }
}
