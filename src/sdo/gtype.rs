//! `SDO_GTYPE` derivation.

use core::fmt;

use crate::errors::GrammarError;
use crate::wkt::{EwktInfo, GeometryKind};

/// Oracle's four-digit geometry type code `DL0T`.
///
/// `D` is the coordinate dimensionality, `L` the position of the measure
/// ordinate (`0` without `M`) and `T` the geometry type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SdoGtype {
    dimensions: u8,
    measure_position: u8,
    type_code: u8,
}

impl SdoGtype {
    /// Derive the code from the base type and its qualifiers.
    ///
    /// Collections always use type code `4`.
    #[must_use]
    pub fn new(kind: GeometryKind, is_multi: bool, has_z: bool, has_m: bool) -> Self {
        let dimensions = 2 + u8::from(has_z) + u8::from(has_m);
        let measure_position = if has_m { dimensions } else { 0 };
        let multi_offset = if is_multi { 4 } else { 0 };
        let type_code = match kind {
            GeometryKind::GeometryCollection => 4,
            GeometryKind::Point => 1 + multi_offset,
            GeometryKind::LineString => 2 + multi_offset,
            GeometryKind::Polygon => 3 + multi_offset,
        };
        Self {
            dimensions,
            measure_position,
            type_code,
        }
    }

    /// Derive the code for a classified literal.
    #[must_use]
    pub fn from_info(info: &EwktInfo<'_>) -> Self {
        Self::new(info.kind, info.is_multi, info.has_z, info.has_m)
    }

    /// Derive the code from a type name such as `MULTILINESTRING`, `PointZM` or `Polygon M`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::UnknownGeometryType`] when the base type is not
    /// one of the supported keywords.
    pub fn from_geometry_type(geometry_type: &str) -> Result<Self, GrammarError> {
        let mut name: String = geometry_type
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        let has_m = name.ends_with('M');
        if has_m {
            name.pop();
        }
        let has_z = name.ends_with('Z');
        if has_z {
            name.pop();
        }
        let (is_multi, base) = match name.strip_prefix("MULTI") {
            Some(base) => (true, base),
            None => (false, name.as_str()),
        };
        let kind: GeometryKind = base.parse()?;
        if is_multi && kind == GeometryKind::GeometryCollection {
            return Err(GrammarError::UnknownGeometryType { name, pos: 0 });
        }
        Ok(Self::new(kind, is_multi, has_z, has_m))
    }

    /// Coordinate dimensionality (`D`).
    #[must_use]
    pub const fn dimensions(self) -> u8 {
        self.dimensions
    }

    /// The code as a number, e.g. `4401`.
    #[must_use]
    pub fn code(self) -> u16 {
        u16::from(self.dimensions) * 1000
            + u16::from(self.measure_position) * 100
            + u16::from(self.type_code)
    }
}

impl fmt::Display for SdoGtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}0{}",
            self.dimensions, self.measure_position, self.type_code
        )
    }
}
