//! Per-database conversion of WKT column values into SQL expressions.
//!
//! Oracle gets the native `SDO_GEOMETRY` constructor for anything the legacy
//! `SDO_GEOMETRY('<wkt>')` form cannot express (an SRID, `Z` or `M`). The other
//! databases wrap the literal in their WKT parsing function.

use core::fmt;
use core::str::FromStr;
use std::borrow::Cow;

use tracing::trace;

use crate::errors::Error;
use crate::sdo::{SdoCompiler, split_into_clobs};
use crate::srid::SridResolver;
use crate::wkt::{EwktInfo, classify, is_ewkt};

/// A target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Oracle Spatial.
    Oracle,
    /// PostgreSQL with PostGIS.
    PostgreSql,
    /// MySQL.
    MySql,
    /// H2 with GeoDB.
    H2,
    /// Apache Derby with GeoDB.
    Derby,
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Dialect; 5] = [
        Dialect::Oracle,
        Dialect::PostgreSql,
        Dialect::MySql,
        Dialect::H2,
        Dialect::Derby,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Oracle => "Oracle",
            Dialect::PostgreSql => "PostgreSQL",
            Dialect::MySql => "MySQL",
            Dialect::H2 => "H2",
            Dialect::Derby => "Derby",
        }
    }

    /// The function that builds a geometry from WKT text.
    ///
    /// PostGIS parses EWKT string literals directly, so PostgreSQL has none.
    #[must_use]
    pub const fn geom_from_wkt_function(self) -> Option<&'static str> {
        match self {
            Dialect::Oracle => Some("SDO_GEOMETRY"),
            Dialect::MySql | Dialect::H2 | Dialect::Derby => Some("ST_GeomFromText"),
            Dialect::PostgreSql => None,
        }
    }

    /// Whether the WKT function must be given an SRID.
    #[must_use]
    pub const fn is_srid_required(self) -> bool {
        matches!(self, Dialect::H2 | Dialect::Derby)
    }

    /// Whether `value` is already a call to this dialect's WKT function.
    #[must_use]
    pub fn looks_like_function_call(self, value: &str) -> bool {
        self.geom_from_wkt_function().is_some_and(|function| {
            value
                .trim_start()
                .get(..function.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(function))
        })
    }

    /// Wrap WKT text in the dialect's function: `FN('<wkt>'[, srid])`.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyWkt`] if `wkt` is blank.
    /// * [`Error::MissingSrid`] if the dialect needs an SRID and none is given.
    /// * [`Error::UnsupportedDialect`] for PostgreSQL.
    pub fn convert_to_function(self, wkt: &str, srid: Option<&str>) -> Result<String, Error> {
        if wkt.trim().is_empty() {
            return Err(Error::EmptyWkt);
        }
        let function = self.geom_from_wkt_function().ok_or(Error::UnsupportedDialect {
            operation: "WKT conversion function",
            dialect: self.name(),
        })?;
        let srid = srid.filter(|srid| !srid.is_empty());
        if srid.is_none() && self.is_srid_required() {
            return Err(Error::MissingSrid {
                wkt: wkt.to_owned(),
                function,
            });
        }

        let mut sql = String::with_capacity(function.len() + wkt.len() + 16);
        sql.push_str(function);
        sql.push_str("('");
        for c in wkt.chars() {
            if c == '\'' {
                sql.push('\'');
            }
            sql.push(c);
        }
        sql.push('\'');
        push_srid_argument(&mut sql, srid);
        Ok(sql)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown database dialect '{0}'")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oracle" => Ok(Dialect::Oracle),
            "postgresql" | "postgres" | "postgis" => Ok(Dialect::PostgreSql),
            "mysql" => Ok(Dialect::MySql),
            "h2" => Ok(Dialect::H2),
            "derby" => Ok(Dialect::Derby),
            _ => Err(UnknownDialect(s.to_owned())),
        }
    }
}

fn push_srid_argument(sql: &mut String, srid: Option<&str>) {
    if let Some(srid) = srid {
        sql.push_str(", ");
        sql.push_str(srid);
    }
    sql.push(')');
}

/// Converts WKT/EWKT column values for one database.
#[derive(Debug, Clone)]
pub struct WktConverter<R> {
    dialect: Dialect,
    compiler: SdoCompiler<R>,
}

impl<R: SridResolver> WktConverter<R> {
    /// Creates a converter. The compiler is only used for Oracle.
    #[must_use]
    pub fn new(dialect: Dialect, compiler: SdoCompiler<R>) -> Self {
        Self { dialect, compiler }
    }

    /// The target database.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The Oracle constructor compiler.
    #[must_use]
    pub fn compiler(&self) -> &SdoCompiler<R> {
        &self.compiler
    }

    /// Convert a column value if it is a WKT/EWKT literal; anything else is
    /// returned unchanged.
    ///
    /// PostgreSQL values are always returned unchanged.
    ///
    /// # Errors
    ///
    /// See [`Self::convert`].
    pub fn handle_column_value<'v>(&self, value: &'v str) -> Result<Cow<'v, str>, Error> {
        if self.dialect == Dialect::PostgreSql || !is_ewkt(value) {
            return Ok(Cow::Borrowed(value));
        }
        let info = classify(value)?;
        self.convert(&info, None).map(Cow::Owned)
    }

    /// Convert a classified literal into a geometry expression.
    ///
    /// `srid` overrides the literal's own SRID. For Oracle the SRID is
    /// translated through the compiler's resolver.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Dialect::convert_to_function`] and, for Oracle,
    /// of [`SdoCompiler::compile`].
    pub fn convert(&self, info: &EwktInfo<'_>, srid: Option<u32>) -> Result<String, Error> {
        let epsg = srid.or(info.srid);
        if self.dialect != Dialect::Oracle {
            let srid = epsg.map(|epsg| epsg.to_string());
            return self
                .dialect
                .convert_to_function(info.wkt_without_srid, srid.as_deref());
        }

        if !info.is_legacy_compatible() {
            return self.compiler.compile(info, srid);
        }

        trace!(geometry_type = %info.geometry_type, "using SDO_GEOMETRY WKT constructor");
        let oracle_srid = match epsg {
            Some(epsg) => self
                .compiler
                .resolver()
                .resolve(epsg)?
                .filter(|srid| !srid.is_empty()),
            None => None,
        };
        let mut sql = String::with_capacity(info.wkt_without_srid.len() + 32);
        sql.push_str("SDO_GEOMETRY('");
        split_into_clobs(
            info.wkt_without_srid,
            true,
            self.compiler.options().clob_limit,
            &mut sql,
        );
        sql.push('\'');
        push_srid_argument(&mut sql, oracle_srid.as_deref());
        Ok(sql)
    }
}
