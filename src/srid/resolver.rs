//! SRID resolvers used by the constructor generator.

use tracing::debug;

use super::{InMemorySridCache, ScalarQuery, SridCache};
use crate::errors::Error;

/// Oracle function translating an EPSG code into an Oracle SRID.
pub const EPSG_TO_ORACLE_FUNCTION: &str = "SDO_CS.MAP_EPSG_SRID_TO_ORACLE";

/// `COORD_REF_SYS_KIND` of projected coordinate reference systems.
pub const PROJECTED_KIND: &str = "PROJECTED";

/// SQL expression evaluating to the Oracle SRID of an EPSG code.
///
/// Some codes (EPSG:25830 for instance) are missing from the mapping function
/// but present in `SDO_COORD_REF_SYSTEM` under the same number, hence the
/// `COALESCE`.
#[must_use]
pub fn srid_expression(epsg: u32) -> String {
    format!(
        "COALESCE( {EPSG_TO_ORACLE_FUNCTION}({epsg}), (SELECT srid from SDO_COORD_REF_SYSTEM where srid = {epsg}))"
    )
}

/// Translates EPSG codes into the SRID written to `SDO_GEOMETRY`.
pub trait SridResolver {
    /// The Oracle SRID for `epsg`, or `None` when the database does not know it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SridResolution`] when the lookup itself fails.
    fn resolve(&self, epsg: u32) -> Result<Option<String>, Error>;
}

impl<R: SridResolver + ?Sized> SridResolver for &R {
    fn resolve(&self, epsg: u32) -> Result<Option<String>, Error> {
        (**self).resolve(epsg)
    }
}

/// Resolver that never resolves, for offline use: every SRID becomes `NULL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullSridResolver;

impl SridResolver for NullSridResolver {
    fn resolve(&self, _epsg: u32) -> Result<Option<String>, Error> {
        Ok(None)
    }
}

/// Resolver querying `SDO_CS` and `SDO_COORD_REF_SYSTEM`, with memoized answers.
#[derive(Debug)]
pub struct OracleSridResolver<Q, S = InMemorySridCache<u32>, K = InMemorySridCache<String>> {
    query: Q,
    srids: S,
    kinds: K,
}

impl<Q: ScalarQuery> OracleSridResolver<Q> {
    /// Creates a resolver with fresh in-memory caches.
    #[must_use]
    pub fn new(query: Q) -> Self {
        Self::with_caches(query, InMemorySridCache::new(), InMemorySridCache::new())
    }
}

impl<Q, S, K> OracleSridResolver<Q, S, K>
where
    Q: ScalarQuery,
    S: SridCache<u32>,
    K: SridCache<String>,
{
    /// Creates a resolver over caches shared with other resolvers.
    #[must_use]
    pub fn with_caches(query: Q, srids: S, kinds: K) -> Self {
        Self {
            query,
            srids,
            kinds,
        }
    }

    /// The query executor.
    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// The EPSG to Oracle SRID cache.
    #[must_use]
    pub fn srid_cache(&self) -> &S {
        &self.srids
    }

    /// The Oracle SRID to `COORD_REF_SYS_KIND` cache.
    #[must_use]
    pub fn kind_cache(&self) -> &K {
        &self.kinds
    }

    /// The Oracle SRID for `epsg`, from the cache or the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SridResolution`] when a query fails; the failure is not cached.
    pub fn oracle_srid(&self, epsg: u32) -> Result<Option<String>, Error> {
        self.srids
            .get_or_try_insert_with(epsg, |&epsg| self.load_oracle_srid(epsg))
    }

    /// Runs the lookup queries, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SridResolution`] when a query fails.
    pub fn load_oracle_srid(&self, epsg: u32) -> Result<Option<String>, Error> {
        debug!(epsg, "resolving Oracle SRID");
        let wrap = |source| Error::SridResolution {
            srid: epsg.to_string(),
            source,
        };

        let sql = format!("SELECT {} FROM dual", srid_expression(epsg));
        let mut srid = non_empty(self.query.query_scalar(&sql).map_err(wrap)?);
        if srid.is_none() {
            let sql = format!("SELECT srid FROM SDO_COORD_REF_SYSTEM WHERE srid = {epsg}");
            srid = non_empty(self.query.query_scalar(&sql).map_err(wrap)?);
        }

        debug!(epsg, oracle_srid = ?srid, "resolved Oracle SRID");
        Ok(srid)
    }

    /// The `COORD_REF_SYS_KIND` of an Oracle SRID, from the cache or the database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SridKind`] when the query fails; the failure is not cached.
    pub fn oracle_srid_kind(&self, oracle_srid: &str) -> Result<Option<String>, Error> {
        self.kinds
            .get_or_try_insert_with(oracle_srid.to_owned(), |oracle_srid| {
                debug!(oracle_srid = %oracle_srid, "looking up coordinate reference system kind");
                let sql = format!(
                    "Select COORD_REF_SYS_KIND from SDO_COORD_REF_SYSTEM where srid = {oracle_srid}"
                );
                self.query
                    .query_scalar(&sql)
                    .map(non_empty)
                    .map_err(|source| Error::SridKind {
                        srid: oracle_srid.clone(),
                        source,
                    })
            })
    }

    /// Whether an Oracle SRID is a projected coordinate system.
    ///
    /// # Errors
    ///
    /// See [`Self::oracle_srid_kind`].
    pub fn is_oracle_srid_projected(&self, oracle_srid: &str) -> Result<bool, Error> {
        Ok(self
            .oracle_srid_kind(oracle_srid)?
            .is_some_and(|kind| kind.eq_ignore_ascii_case(PROJECTED_KIND)))
    }

    /// Whether an EPSG code maps to a projected Oracle coordinate system.
    ///
    /// Unknown codes are not projected.
    ///
    /// # Errors
    ///
    /// See [`Self::oracle_srid`] and [`Self::oracle_srid_kind`].
    pub fn is_srid_projected(&self, epsg: u32) -> Result<bool, Error> {
        match self.oracle_srid(epsg)? {
            Some(oracle_srid) => self.is_oracle_srid_projected(&oracle_srid),
            None => Ok(false),
        }
    }
}

impl<Q, S, K> SridResolver for OracleSridResolver<Q, S, K>
where
    Q: ScalarQuery,
    S: SridCache<u32>,
    K: SridCache<String>,
{
    fn resolve(&self, epsg: u32) -> Result<Option<String>, Error> {
        self.oracle_srid(epsg)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::srid::QueryError;

    /// Answers queries from a fixed table and records them.
    #[derive(Default)]
    struct FakeQuery {
        answers: Vec<(String, Option<String>)>,
        log: RefCell<Vec<String>>,
    }

    impl FakeQuery {
        fn answer(mut self, sql: &str, value: Option<&str>) -> Self {
            self.answers.push((sql.to_owned(), value.map(str::to_owned)));
            self
        }
    }

    impl ScalarQuery for FakeQuery {
        fn query_scalar(&self, sql: &str) -> Result<Option<String>, QueryError> {
            self.log.borrow_mut().push(sql.to_owned());
            self.answers
                .iter()
                .find(|(query, _)| query == sql)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| format!("unexpected query: {sql}").into())
        }
    }

    #[test]
    fn test_srid_expression() {
        assert_eq!(
            srid_expression(25830),
            "COALESCE( SDO_CS.MAP_EPSG_SRID_TO_ORACLE(25830), (SELECT srid from SDO_COORD_REF_SYSTEM where srid = 25830))"
        );
    }

    #[test]
    fn test_resolves_and_caches() {
        let query = FakeQuery::default().answer(
            &format!("SELECT {} FROM dual", srid_expression(4326)),
            Some("8307"),
        );
        let resolver = OracleSridResolver::new(query);
        assert_eq!(resolver.resolve(4326).unwrap(), Some("8307".into()));
        assert_eq!(resolver.resolve(4326).unwrap(), Some("8307".into()));
        assert_eq!(resolver.query().log.borrow().len(), 1);
    }

    #[test]
    fn test_fallback_query() {
        let query = FakeQuery::default()
            .answer(&format!("SELECT {} FROM dual", srid_expression(25830)), None)
            .answer(
                "SELECT srid FROM SDO_COORD_REF_SYSTEM WHERE srid = 25830",
                Some("25830"),
            );
        let resolver = OracleSridResolver::new(query);
        assert_eq!(resolver.resolve(25830).unwrap(), Some("25830".into()));
        assert_eq!(resolver.query().log.borrow().len(), 2);
    }

    #[test]
    fn test_unknown_srid_is_cached_as_none() {
        let query = FakeQuery::default()
            .answer(&format!("SELECT {} FROM dual", srid_expression(1)), None)
            .answer("SELECT srid FROM SDO_COORD_REF_SYSTEM WHERE srid = 1", Some(""));
        let resolver = OracleSridResolver::new(query);
        assert_eq!(resolver.resolve(1).unwrap(), None);
        assert_eq!(resolver.resolve(1).unwrap(), None);
        assert_eq!(resolver.query().log.borrow().len(), 2);
        assert_eq!(resolver.srid_cache().get(&1), Some(None));
    }

    #[test]
    fn test_failure_is_not_cached() {
        let resolver = OracleSridResolver::new(FakeQuery::default());
        let err = resolver.resolve(4326).unwrap_err();
        assert!(matches!(err, Error::SridResolution { ref srid, .. } if srid == "4326"));
        assert!(resolver.srid_cache().is_empty());
        assert!(resolver.resolve(4326).is_err());
        assert_eq!(resolver.query().log.borrow().len(), 2);
    }

    #[test]
    fn test_projection_kind() {
        let query = FakeQuery::default()
            .answer(
                &format!("SELECT {} FROM dual", srid_expression(3857)),
                Some("3857"),
            )
            .answer(
                "Select COORD_REF_SYS_KIND from SDO_COORD_REF_SYSTEM where srid = 3857",
                Some("projected"),
            )
            .answer(
                "Select COORD_REF_SYS_KIND from SDO_COORD_REF_SYSTEM where srid = 8307",
                Some("GEOGRAPHIC2D"),
            );
        let resolver = OracleSridResolver::new(query);
        assert!(resolver.is_srid_projected(3857).unwrap());
        assert!(resolver.is_oracle_srid_projected("3857").unwrap());
        assert!(!resolver.is_oracle_srid_projected("8307").unwrap());
        assert_eq!(resolver.query().log.borrow().len(), 3);
        assert_eq!(
            resolver.kind_cache().get(&"8307".to_owned()),
            Some(Some("GEOGRAPHIC2D".into()))
        );
    }

    #[test]
    fn test_kind_failure() {
        let resolver = OracleSridResolver::new(FakeQuery::default());
        assert!(matches!(
            resolver.oracle_srid_kind("8307"),
            Err(Error::SridKind { ref srid, .. }) if srid == "8307"
        ));
        assert!(resolver.kind_cache().is_empty());
    }

    #[test]
    fn test_null_resolver() {
        assert_eq!(NullSridResolver.resolve(4326).unwrap(), None);
    }
}
