//! Spatial index DDL.
//!
//! Oracle needs a `user_sdo_geom_metadata` row describing the dimensions of
//! a geometry column before `mdsys.spatial_index` can be built on it, so the
//! Oracle statements come in sequence: delete stale metadata, insert fresh
//! metadata, create the index.

use crate::dialect::Dialect;
use crate::errors::Error;
use crate::srid::{PROJECTED_KIND, srid_expression};
use crate::wkt::{has_m_geometry_type, has_z_geometry_type};

const METADATA_VIEW: &str = "user_sdo_geom_metadata";

/// Oracle `layer_gtype` index parameter for an OGC geometry type name.
///
/// Trailing `M` and `Z` qualifiers are ignored. Types Oracle has no layer type
/// for fall back to `COLLECTION`. Blank names have no layer type.
#[must_use]
pub fn layer_gtype(ogc_geometry_type: &str) -> Option<&'static str> {
    let mut name: String = ogc_geometry_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if name.is_empty() {
        return None;
    }
    if name.ends_with('M') {
        name.pop();
    }
    if name.ends_with('Z') {
        name.pop();
    }
    Some(match name.as_str() {
        "LINESTRING" => "LINE",
        "MULTILINESTRING" => "MULTILINE",
        "TRIANGLE" | "POLYGON" => "POLYGON",
        "POINT" => "POINT",
        "MULTIPOINT" => "MULTIPOINT",
        "CURVE" => "CURVE",
        "MULTICURVE" => "MULTICURVE",
        "MULTIPOLYGON" => "MULTIPOLYGON",
        _ => "COLLECTION",
    })
}

/// `DELETE` removing every `user_sdo_geom_metadata` row of a table, to run
/// before the table is dropped.
#[must_use]
pub fn drop_table_metadata_sql(table_name: &str) -> String {
    format!(
        "DELETE FROM {METADATA_VIEW} WHERE table_name = '{}'",
        oracle_object_name(table_name)
    )
}

/// Name as stored in Oracle's dictionary views: trimmed, upper-cased, quotes doubled.
fn oracle_object_name(name: &str) -> String {
    name.trim().to_uppercase().replace('\'', "''")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// `qualifier.name`, or `name` without a qualifier.
fn qualified(qualifier: Option<&str>, name: &str) -> String {
    match qualifier {
        Some(qualifier) => format!("{qualifier}.{name}"),
        None => name.to_owned(),
    }
}

/// A spatial index to create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSpatialIndex {
    /// Name of the index.
    pub index_name: String,
    /// Catalog of the table.
    pub catalog_name: Option<String>,
    /// Schema of the table.
    pub schema_name: Option<String>,
    /// Name of the indexed table.
    pub table_name: String,
    /// Indexed geometry columns. Oracle and MySQL index only the first one.
    pub columns: Vec<String>,
    /// Oracle tablespace for the index.
    pub tablespace: Option<String>,
    /// OGC type of the indexed column, e.g. `Point` or `MultiPolygonZ`.
    pub geometry_type: Option<String>,
    /// EPSG SRID of the indexed column.
    pub srid: Option<u32>,
}

impl CreateSpatialIndex {
    /// A spatial index on `table_name(columns)`.
    #[must_use]
    pub fn new<I, S>(index_name: impl Into<String>, table_name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index_name: index_name.into(),
            table_name: table_name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the table catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog_name: impl Into<String>) -> Self {
        self.catalog_name = Some(catalog_name.into());
        self
    }

    /// Sets the table schema.
    #[must_use]
    pub fn with_schema(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    /// Sets the Oracle tablespace.
    #[must_use]
    pub fn with_tablespace(mut self, tablespace: impl Into<String>) -> Self {
        self.tablespace = Some(tablespace.into());
        self
    }

    /// Sets the OGC geometry type.
    #[must_use]
    pub fn with_geometry_type(mut self, geometry_type: impl Into<String>) -> Self {
        self.geometry_type = Some(geometry_type.into());
        self
    }

    /// Sets the EPSG SRID.
    #[must_use]
    pub fn with_srid(mut self, srid: u32) -> Self {
        self.srid = Some(srid);
        self
    }

    /// Checks that the table, index and at least one column are named.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.table_name.trim().is_empty() {
            return Err(Error::MissingField("table_name"));
        }
        if self.columns.iter().all(|column| column.trim().is_empty()) {
            return Err(Error::MissingField("columns"));
        }
        if self.index_name.trim().is_empty() {
            return Err(Error::MissingField("index_name"));
        }
        Ok(())
    }

    /// Statements creating the index, in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] for an invalid statement and
    /// [`Error::UnsupportedDialect`] for H2 and Derby.
    pub fn to_sql(&self, dialect: Dialect) -> Result<Vec<String>, Error> {
        self.validate()?;
        match dialect {
            Dialect::Oracle => Ok(vec![
                self.delete_metadata_sql(),
                self.insert_metadata_sql(),
                self.oracle_create_index_sql(),
            ]),
            Dialect::PostgreSql => Ok(vec![self.postgres_create_index_sql()]),
            Dialect::MySql => Ok(vec![self.mysql_create_index_sql()]),
            Dialect::H2 | Dialect::Derby => Err(Error::UnsupportedDialect {
                operation: "CREATE SPATIAL INDEX",
                dialect: dialect.name(),
            }),
        }
    }

    fn first_column(&self) -> &str {
        self.columns
            .iter()
            .map(|column| column.trim())
            .find(|column| !column.is_empty())
            .unwrap_or_default()
    }

    /// Catalog if set, otherwise schema.
    fn qualifier(&self) -> Option<&str> {
        non_blank(self.catalog_name.as_deref()).or_else(|| non_blank(self.schema_name.as_deref()))
    }

    /// `DELETE` of the column's `user_sdo_geom_metadata` row.
    #[must_use]
    pub fn delete_metadata_sql(&self) -> String {
        format!(
            "DELETE FROM {METADATA_VIEW} WHERE table_name = '{}' AND column_name = '{}'",
            oracle_object_name(&self.table_name),
            oracle_object_name(self.first_column())
        )
    }

    /// `INSERT` of the column's `user_sdo_geom_metadata` row.
    ///
    /// Without an SRID the dimensions are longitude and latitude. With one, a
    /// `CASE` on the coordinate system kind picks X/Y bounds for projected
    /// systems.
    #[must_use]
    pub fn insert_metadata_sql(&self) -> String {
        let geometry_type = self.geometry_type.as_deref().unwrap_or_default();
        let has_z = has_z_geometry_type(geometry_type);
        let has_m = has_m_geometry_type(geometry_type);

        let mut sql = format!(
            "INSERT INTO {METADATA_VIEW} (table_name, column_name, diminfo, srid) VALUES ('{}', '{}', ",
            oracle_object_name(&self.table_name),
            oracle_object_name(self.first_column())
        );
        match self.srid {
            None => {
                push_dim_array(false, has_z, has_m, &mut sql);
                sql.push_str(", NULL");
            }
            Some(srid) => {
                let srid = srid_expression(srid);
                sql.push_str(&format!(
                    "CASE (SELECT COORD_REF_SYS_KIND from SDO_COORD_REF_SYSTEM where srid = {srid}) WHEN '{PROJECTED_KIND}' THEN "
                ));
                push_dim_array(true, has_z, has_m, &mut sql);
                sql.push_str(" ELSE ");
                push_dim_array(false, has_z, has_m, &mut sql);
                sql.push_str(" END , ");
                sql.push_str(&srid);
            }
        }
        sql.push(')');
        sql
    }

    fn oracle_create_index_sql(&self) -> String {
        let qualifier = self.qualifier();
        let mut sql = format!(
            "CREATE INDEX {} ON {} ({}) INDEXTYPE IS mdsys.spatial_index",
            qualified(qualifier, self.index_name.trim()),
            qualified(qualifier, self.table_name.trim()),
            self.first_column()
        );

        let mut parameters = Vec::with_capacity(2);
        if let Some(gtype) = self.geometry_type.as_deref().and_then(layer_gtype) {
            parameters.push(format!("layer_gtype={gtype}"));
        }
        if let Some(tablespace) = non_blank(self.tablespace.as_deref()) {
            parameters.push(format!("tablespace={tablespace}"));
        }
        if !parameters.is_empty() {
            sql.push_str(&format!(" PARAMETERS ('{}')", parameters.join(" ")));
        }
        sql
    }

    fn postgres_create_index_sql(&self) -> String {
        let columns: Vec<&str> = self
            .columns
            .iter()
            .map(|column| column.trim())
            .filter(|column| !column.is_empty())
            .collect();
        format!(
            "CREATE INDEX {} ON {} USING GIST ({})",
            self.index_name.trim(),
            qualified(non_blank(self.schema_name.as_deref()), self.table_name.trim()),
            columns.join(", ")
        )
    }

    fn mysql_create_index_sql(&self) -> String {
        format!(
            "CREATE SPATIAL INDEX {} ON {}({})",
            self.index_name.trim(),
            qualified(self.qualifier(), self.table_name.trim()),
            self.first_column()
        )
    }
}

/// `SDO_DIM_ARRAY(...)` with X/Y bounds for projected systems or
/// longitude/latitude bounds otherwise, plus generic Z and M dimensions.
fn push_dim_array(projected: bool, has_z: bool, has_m: bool, sql: &mut String) {
    sql.push_str("SDO_DIM_ARRAY(");
    if projected {
        sql.push_str("SDO_DIM_ELEMENT('X', 0.0, 41000000.0, 0.5), ");
        sql.push_str("SDO_DIM_ELEMENT('Y', 0.0, 9300000.0, 0.5)");
    } else {
        sql.push_str("SDO_DIM_ELEMENT('Longitude', -180, 180, 0.005), ");
        sql.push_str("SDO_DIM_ELEMENT('Latitude', -90, 90, 0.005)");
    }
    if has_z {
        sql.push_str(",SDO_DIM_ELEMENT('Z', -10000000, 10000000, 0.5)");
    }
    if has_m {
        sql.push_str(",SDO_DIM_ELEMENT('M', -10000000, 10000000, 0.5)");
    }
    sql.push(')');
}

/// A spatial index to drop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropSpatialIndex {
    /// Name of the index.
    pub index_name: String,
    /// Catalog of the table.
    pub catalog_name: Option<String>,
    /// Schema of the table.
    pub schema_name: Option<String>,
    /// Name of the indexed table.
    pub table_name: String,
    /// The indexed geometry column, whose Oracle metadata is removed.
    pub column_name: String,
}

impl DropSpatialIndex {
    /// The index `index_name` on `table_name(column_name)`.
    #[must_use]
    pub fn new(
        index_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            index_name: index_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
            ..Self::default()
        }
    }

    /// Sets the table catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog_name: impl Into<String>) -> Self {
        self.catalog_name = Some(catalog_name.into());
        self
    }

    /// Sets the table schema.
    #[must_use]
    pub fn with_schema(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    /// Statements dropping the index, in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] when the index name is blank, or when
    /// the table or column is blank for Oracle and MySQL, and
    /// [`Error::UnsupportedDialect`] for H2 and Derby.
    pub fn to_sql(&self, dialect: Dialect) -> Result<Vec<String>, Error> {
        let index_name = self.index_name.trim();
        if index_name.is_empty() {
            return Err(Error::MissingField("index_name"));
        }
        let qualifier =
            non_blank(self.catalog_name.as_deref()).or_else(|| non_blank(self.schema_name.as_deref()));
        match dialect {
            Dialect::Oracle => {
                self.require_table()?;
                if self.column_name.trim().is_empty() {
                    return Err(Error::MissingField("column_name"));
                }
                Ok(vec![
                    format!(
                        "DELETE FROM {METADATA_VIEW} WHERE table_name = '{}' AND column_name = '{}'",
                        oracle_object_name(&self.table_name),
                        oracle_object_name(&self.column_name)
                    ),
                    format!("DROP INDEX {}", qualified(qualifier, index_name)),
                ])
            }
            Dialect::PostgreSql => Ok(vec![format!(
                "DROP INDEX {}",
                qualified(non_blank(self.schema_name.as_deref()), index_name)
            )]),
            Dialect::MySql => {
                self.require_table()?;
                Ok(vec![format!(
                    "DROP INDEX {index_name} ON {}",
                    qualified(qualifier, self.table_name.trim())
                )])
            }
            Dialect::H2 | Dialect::Derby => Err(Error::UnsupportedDialect {
                operation: "DROP SPATIAL INDEX",
                dialect: dialect.name(),
            }),
        }
    }

    fn require_table(&self) -> Result<(), Error> {
        if self.table_name.trim().is_empty() {
            Err(Error::MissingField("table_name"))
        } else {
            Ok(())
        }
    }
}
