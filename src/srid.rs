//! EPSG to Oracle SRID resolution.
//!
//! Oracle Spatial uses its own SRID numbering. The EPSG code carried by an
//! EWKT literal is translated through a blocking scalar query whose answers
//! are memoized in an injected [`SridCache`].

mod cache;
#[cfg(feature = "oracle")]
mod oracle;
mod resolver;

pub use cache::{InMemorySridCache, SridCache};
pub use resolver::{
    EPSG_TO_ORACLE_FUNCTION, NullSridResolver, OracleSridResolver, PROJECTED_KIND,
    SridResolver, srid_expression,
};

/// Error type returned by [`ScalarQuery`] implementations.
pub type QueryError = Box<dyn std::error::Error + Send + Sync>;

/// A synchronous executor for queries returning a single value.
pub trait ScalarQuery {
    /// Runs `sql` and returns the first column of the first row.
    ///
    /// `Ok(None)` means either no row or a SQL `NULL`.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying connection reports.
    fn query_scalar(&self, sql: &str) -> Result<Option<String>, QueryError>;
}

impl<Q: ScalarQuery + ?Sized> ScalarQuery for &Q {
    fn query_scalar(&self, sql: &str) -> Result<Option<String>, QueryError> {
        (**self).query_scalar(sql)
    }
}

impl<Q: ScalarQuery + ?Sized> ScalarQuery for std::sync::Arc<Q> {
    fn query_scalar(&self, sql: &str) -> Result<Option<String>, QueryError> {
        (**self).query_scalar(sql)
    }
}
