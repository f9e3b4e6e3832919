//! Submodule defining the errors used across the crate.

use crate::wkt::LexerError;

/// Errors raised when the input is not a supported WKT/EWKT literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// Lexer error.
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),
    /// The input does not match the EWKT pattern at all.
    #[error("Invalid WKT: '{0}' is not a supported (E)WKT literal")]
    NotWkt(String),
    /// Unexpected token.
    #[error("Invalid WKT: unexpected {found} at position {pos}, expected {expected}")]
    UnexpectedToken {
        /// What was expected.
        expected: &'static str,
        /// Description of what was found.
        found: String,
        /// Position in input.
        pos: usize,
    },
    /// Unexpected end of input.
    #[error("Invalid WKT: unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected.
        expected: &'static str,
    },
    /// A geometry keyword with no grammar rule.
    #[error("Unknown geometry type '{name}' at position {pos}")]
    UnknownGeometryType {
        /// The keyword after qualifier stripping.
        name: String,
        /// Position in input.
        pos: usize,
    },
    /// A word after the geometry keyword that is not `Z`, `M` or `ZM`.
    #[error("Invalid WKT: unexpected string '{word}' at position {pos}, expected '(', 'Z', 'ZM' or 'M'")]
    UnexpectedQualifier {
        /// The offending word.
        word: String,
        /// Position in input.
        pos: usize,
    },
    /// `EMPTY` geometries.
    #[error("Empty geometries not supported (position {pos})")]
    EmptyGeometry {
        /// Position in input.
        pos: usize,
    },
    /// A `NaN` ordinate.
    #[error("Invalid WKT: NaN not supported (position {pos})")]
    NaN {
        /// Position in input.
        pos: usize,
    },
    /// Geometry collections nested deeper than the parser accepts.
    #[error("Invalid WKT: geometry collections nested too deeply (position {pos})")]
    NestingTooDeep {
        /// Position of the collection keyword that exceeded the limit.
        pos: usize,
    },
    /// Tokens left over after the outermost geometry.
    #[error("Invalid WKT: trailing input at position {pos}")]
    TrailingInput {
        /// Position of the first unconsumed token.
        pos: usize,
    },
    /// The `SRID=` prefix does not fit an SRID.
    #[error("SRID '{0}' is out of range")]
    SridOutOfRange(String),
}

/// Errors that can occur while compiling WKT into SQL.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or unsupported WKT.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    /// A collection member declares a different dimensionality than its collection.
    #[error(
        "Invalid WKT: mixed geometries with different dimensions ({expected} expected, {found} found at position {pos})"
    )]
    DimensionMismatch {
        /// Dimensions of the enclosing collection.
        expected: usize,
        /// Dimensions of the member.
        found: usize,
        /// Position of the member keyword.
        pos: usize,
    },
    /// A word token in ordinate position that is not a finite number.
    #[error("Invalid WKT: invalid number '{value}' at position {pos}")]
    NumericFormat {
        /// The offending token.
        value: String,
        /// Position in input.
        pos: usize,
    },
    /// The SRID lookup query failed.
    #[error("Failed to find the Oracle SRID for EPSG:{srid}")]
    SridResolution {
        /// The EPSG SRID being resolved.
        srid: String,
        /// The collaborator's error.
        #[source]
        source: crate::srid::QueryError,
    },
    /// The `COORD_REF_SYS_KIND` lookup failed.
    #[error("Failed to identify whether the Oracle SRID {srid} is projected")]
    SridKind {
        /// The Oracle SRID being looked up.
        srid: String,
        /// The collaborator's error.
        #[source]
        source: crate::srid::QueryError,
    },
    /// An empty WKT was passed to a conversion function.
    #[error("The Well-Known Text cannot be null or empty")]
    EmptyWkt,
    /// The dialect's conversion function needs an SRID and none was given.
    #[error("An SRID was not provided with '{wkt}' but is required in call to '{function}'")]
    MissingSrid {
        /// The WKT being converted.
        wkt: String,
        /// The conversion function.
        function: &'static str,
    },
    /// A required statement field is missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// The dialect has no implementation for the requested statement.
    #[error("{operation} is not supported for {dialect}")]
    UnsupportedDialect {
        /// The requested operation.
        operation: &'static str,
        /// The dialect name.
        dialect: &'static str,
    },
}

impl From<LexerError> for Error {
    fn from(error: LexerError) -> Self {
        Error::Grammar(GrammarError::Lexer(error))
    }
}

impl Error {
    /// Whether the error is a grammar error (malformed or unsupported WKT).
    #[must_use]
    pub fn is_grammar(&self) -> bool {
        matches!(self, Error::Grammar(_))
    }
}
