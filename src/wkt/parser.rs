//! Recursive-descent parser producing `SDO_ELEM_INFO_ARRAY` triplets and ordinates.

use super::lexer::{Lexer, Token, TokenKind};
use crate::errors::{Error, GrammarError};
use crate::sdo::{ElementInfo, ElementType, SdoArrays};

/// Deepest `GEOMETRYCOLLECTION` nesting accepted.
pub const MAX_COLLECTION_DEPTH: usize = 64;

/// Parser over a single WKT literal (without the `SRID=n;` prefix).
///
/// A parser is consumed by [`Parser::parse`], so every parse starts from a
/// fresh cursor and empty output arrays.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    element_info: Vec<ElementInfo>,
    ordinates: Vec<&'a str>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            element_info: Vec::new(),
            ordinates: Vec::new(),
            depth: 0,
        }
    }

    /// Parse one tagged geometry and return its arrays.
    ///
    /// # Errors
    ///
    /// Returns a grammar error for malformed or unsupported input,
    /// [`Error::DimensionMismatch`] for collection members whose qualifiers
    /// disagree with their collection and [`Error::NumericFormat`] for
    /// ordinates that are not finite numbers.
    pub fn parse(mut self) -> Result<SdoArrays<'a>, Error> {
        let dimensions = self.parse_tagged_geometry(None)?;

        let token = self.lexer.next()?;
        if token.kind != TokenKind::Eof {
            return Err(GrammarError::TrailingInput { pos: token.pos }.into());
        }

        Ok(SdoArrays {
            dimensions,
            element_info: self.element_info,
            ordinates: self.ordinates,
        })
    }

    /// Parse `KEYWORD [Z|M|ZM] (...)`, returning the declared dimensionality.
    fn parse_tagged_geometry(&mut self, parent_dimensions: Option<usize>) -> Result<usize, Error> {
        let token = self.lexer.next()?;
        let TokenKind::Word(word) = token.kind else {
            return Err(unexpected("geometry type", token));
        };

        let mut keyword = word.to_ascii_uppercase();
        let mut dimensions = 2;
        let next = self.lexer.peek()?;
        match next.kind {
            TokenKind::LParen => {
                if keyword.ends_with('M') {
                    keyword.pop();
                    dimensions += 1;
                }
                if keyword.ends_with('Z') {
                    keyword.pop();
                    dimensions += 1;
                }
            }
            TokenKind::Word(qualifier) => {
                self.lexer.next()?;
                if qualifier.eq_ignore_ascii_case("ZM") {
                    dimensions += 2;
                } else if qualifier.eq_ignore_ascii_case("Z") || qualifier.eq_ignore_ascii_case("M")
                {
                    dimensions += 1;
                } else if qualifier.eq_ignore_ascii_case("EMPTY") {
                    return Err(GrammarError::EmptyGeometry { pos: next.pos }.into());
                } else {
                    return Err(GrammarError::UnexpectedQualifier {
                        word: qualifier.to_owned(),
                        pos: next.pos,
                    }
                    .into());
                }
            }
            _ => return Err(unexpected("'(', 'Z', 'ZM' or 'M'", next)),
        }

        if let Some(expected) = parent_dimensions.filter(|&expected| expected != dimensions) {
            return Err(Error::DimensionMismatch {
                expected,
                found: dimensions,
                pos: token.pos,
            });
        }

        match keyword.as_str() {
            "POINT" => self.parse_point(dimensions)?,
            "LINESTRING" => self.parse_line_string(dimensions)?,
            "POLYGON" => self.parse_polygon(dimensions)?,
            "MULTIPOINT" => self.parse_multi_point(dimensions)?,
            "MULTILINESTRING" => self.parse_multi_line_string(dimensions)?,
            "MULTIPOLYGON" => self.parse_multi_polygon(dimensions)?,
            "GEOMETRYCOLLECTION" => self.parse_collection(dimensions, token.pos)?,
            _ => {
                return Err(GrammarError::UnknownGeometryType {
                    name: keyword,
                    pos: token.pos,
                }
                .into());
            }
        }
        Ok(dimensions)
    }

    fn parse_point(&mut self, dimensions: usize) -> Result<(), Error> {
        self.expect_opener()?;
        self.push_element(ElementType::Point);
        self.parse_coordinate(dimensions)?;
        self.expect_closer()
    }

    fn parse_line_string(&mut self, dimensions: usize) -> Result<(), Error> {
        self.expect_opener()?;
        self.push_element(ElementType::Line);
        self.parse_coordinates(dimensions)
    }

    fn parse_polygon(&mut self, dimensions: usize) -> Result<(), Error> {
        self.expect_opener()?;
        self.expect_opener()?;
        self.push_element(ElementType::ExteriorRing);
        self.parse_coordinates(dimensions)?;
        while self.expect_closer_or_comma()? {
            self.expect_opener()?;
            self.push_element(ElementType::InteriorRing);
            self.parse_coordinates(dimensions)?;
        }
        Ok(())
    }

    /// Points may be written bare (`MULTIPOINT(1 1, 2 2)`) or parenthesized
    /// (`MULTIPOINT((1 1), (2 2))`).
    fn parse_multi_point(&mut self, dimensions: usize) -> Result<(), Error> {
        self.expect_opener()?;
        loop {
            self.push_element(ElementType::Point);
            if self.lexer.peek()?.kind == TokenKind::LParen {
                self.lexer.next()?;
                self.parse_coordinate(dimensions)?;
                self.expect_closer()?;
            } else {
                self.parse_coordinate(dimensions)?;
            }
            if !self.expect_closer_or_comma()? {
                return Ok(());
            }
        }
    }

    fn parse_multi_line_string(&mut self, dimensions: usize) -> Result<(), Error> {
        self.expect_opener()?;
        loop {
            self.parse_line_string(dimensions)?;
            if !self.expect_closer_or_comma()? {
                return Ok(());
            }
        }
    }

    fn parse_multi_polygon(&mut self, dimensions: usize) -> Result<(), Error> {
        self.expect_opener()?;
        loop {
            self.parse_polygon(dimensions)?;
            if !self.expect_closer_or_comma()? {
                return Ok(());
            }
        }
    }

    fn parse_collection(&mut self, dimensions: usize, pos: usize) -> Result<(), Error> {
        if self.depth == MAX_COLLECTION_DEPTH {
            return Err(GrammarError::NestingTooDeep { pos }.into());
        }
        self.expect_opener()?;
        self.depth += 1;
        loop {
            self.parse_tagged_geometry(Some(dimensions))?;
            if !self.expect_closer_or_comma()? {
                break;
            }
        }
        self.depth -= 1;
        Ok(())
    }

    /// Comma-separated coordinates up to and including the closing parenthesis.
    fn parse_coordinates(&mut self, dimensions: usize) -> Result<(), Error> {
        loop {
            self.parse_coordinate(dimensions)?;
            if !self.expect_closer_or_comma()? {
                return Ok(());
            }
        }
    }

    fn parse_coordinate(&mut self, dimensions: usize) -> Result<(), Error> {
        for _ in 0..dimensions {
            self.parse_number()?;
        }
        Ok(())
    }

    fn parse_number(&mut self) -> Result<(), Error> {
        let token = self.lexer.next()?;
        let TokenKind::Word(word) = token.kind else {
            return Err(unexpected("number", token));
        };
        if word.eq_ignore_ascii_case("NaN") {
            return Err(GrammarError::NaN { pos: token.pos }.into());
        }
        match word.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                self.ordinates.push(word);
                Ok(())
            }
            _ => Err(Error::NumericFormat {
                value: word.to_owned(),
                pos: token.pos,
            }),
        }
    }

    fn push_element(&mut self, element_type: ElementType) {
        self.element_info
            .push(ElementInfo::new(self.ordinates.len() + 1, element_type));
    }

    fn expect_opener(&mut self) -> Result<(), Error> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::LParen => Ok(()),
            TokenKind::Word(word) if word.eq_ignore_ascii_case("EMPTY") => {
                Err(GrammarError::EmptyGeometry { pos: token.pos }.into())
            }
            _ => Err(unexpected("'('", token)),
        }
    }

    fn expect_closer(&mut self) -> Result<(), Error> {
        let token = self.lexer.next()?;
        if token.kind == TokenKind::RParen {
            Ok(())
        } else {
            Err(unexpected("')'", token))
        }
    }

    /// Returns `true` after a comma, `false` after a closing parenthesis.
    fn expect_closer_or_comma(&mut self) -> Result<bool, Error> {
        let token = self.lexer.next()?;
        match token.kind {
            TokenKind::Comma => Ok(true),
            TokenKind::RParen => Ok(false),
            _ => Err(unexpected("',' or ')'", token)),
        }
    }
}

fn unexpected(expected: &'static str, token: Token<'_>) -> Error {
    let error = match token.kind {
        TokenKind::Eof => GrammarError::UnexpectedEof { expected },
        kind => GrammarError::UnexpectedToken {
            expected,
            found: kind.describe(),
            pos: token.pos,
        },
    };
    error.into()
}

/// Parse a WKT literal (without the `SRID=n;` prefix) into its arrays.
///
/// # Errors
///
/// See [`Parser::parse`].
pub fn parse_wkt(input: &str) -> Result<SdoArrays<'_>, Error> {
    Parser::new(input).parse()
}
