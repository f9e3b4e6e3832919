//! WKT/EWKT front end: classification, lexing and parsing.

mod classifier;
mod lexer;
mod parser;

pub use classifier::{
    EwktInfo, GeometryKind, classify, has_m_geometry_type, has_z_geometry_type, is_ewkt,
};
pub use lexer::{Lexer, LexerError, Token, TokenKind};
pub use parser::{MAX_COLLECTION_DEPTH, Parser, parse_wkt};
