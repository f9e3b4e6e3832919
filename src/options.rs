//! Size limits used by the constructor generator.

use core::num::NonZeroUsize;

use crate::sdo::DEFAULT_CLOB_LIMIT;

/// Default number of array values at which the XML-sequence encoding kicks in.
pub const DEFAULT_ARRAY_LIMIT: usize = 900;

/// Limits applied when emitting `SDO_GEOMETRY` constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompilerOptions {
    /// Arrays with at least this many values use the XML-sequence subquery
    /// instead of a `SDO_*_ARRAY(...)` constructor.
    pub array_limit: usize,
    /// String literals longer than this many characters are split into a
    /// `TO_CLOB` chain.
    pub clob_limit: NonZeroUsize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            array_limit: DEFAULT_ARRAY_LIMIT,
            clob_limit: DEFAULT_CLOB_LIMIT,
        }
    }
}

impl CompilerOptions {
    /// Sets the array-size threshold.
    #[must_use]
    pub fn with_array_limit(mut self, array_limit: usize) -> Self {
        self.array_limit = array_limit;
        self
    }

    /// Sets the string-literal length limit.
    #[must_use]
    pub fn with_clob_limit(mut self, clob_limit: NonZeroUsize) -> Self {
        self.clob_limit = clob_limit;
        self
    }
}
