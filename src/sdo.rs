//! Oracle `SDO_GEOMETRY` encoding: arrays, `SDO_GTYPE`, constructors and
//! long-literal splitting.

mod arrays;
mod clob;
mod constructor;
mod gtype;

pub use arrays::{ElementInfo, ElementType, SdoArrays};
pub use clob::{DEFAULT_CLOB_LIMIT, split_into_clobs, split_into_clobs_string};
pub use constructor::{ArrayEncoding, SdoArrayType, SdoCompiler};
pub use gtype::SdoGtype;
