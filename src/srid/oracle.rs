//! [`ScalarQuery`] over an `oracle` crate connection.

use oracle::Connection;

use super::{QueryError, ScalarQuery};

impl ScalarQuery for Connection {
    fn query_scalar(&self, sql: &str) -> Result<Option<String>, QueryError> {
        let mut stmt = self.statement(sql).build()?;
        let mut rows = stmt.query(&[])?;
        match rows.next() {
            Some(row) => Ok(row?.get::<_, Option<String>>(0)?),
            None => Ok(None),
        }
    }
}
