#![doc = include_str!("../README.md")]
#![deny(clippy::mod_module_files)]

pub mod dialect;
pub mod errors;
pub mod index;
pub mod options;
pub mod sdo;
pub mod srid;
#[cfg(feature = "testing")]
pub mod testing;
pub mod wkt;

// Re-export main types
pub use dialect::{Dialect, WktConverter};
pub use index::{CreateSpatialIndex, DropSpatialIndex, drop_table_metadata_sql, layer_gtype};
pub use options::CompilerOptions;
pub use sdo::{ElementInfo, ElementType, SdoArrays, SdoCompiler, SdoGtype, split_into_clobs};
pub use srid::{
    InMemorySridCache, NullSridResolver, OracleSridResolver, ScalarQuery, SridCache,
    SridResolver, srid_expression,
};
pub use wkt::{EwktInfo, GeometryKind, classify, parse_wkt};

// Re-export errors
pub use errors::{Error, GrammarError};
