//! WKT lexer for tokenizing geometry literals.

/// A token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The kind of token.
    pub kind: TokenKind<'a>,
    /// The position in the input where this token starts.
    pub pos: usize,
}

/// The different kinds of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// Left parenthesis
    LParen,
    /// Right parenthesis
    RParen,
    /// Comma
    Comma,
    /// A run of letters, digits, `+`, `-` and `.`: keywords, qualifiers and numbers alike.
    Word(&'a str),
    /// End of input
    Eof,
}

impl TokenKind<'_> {
    /// Short description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Word(word) => format!("'{word}'"),
            TokenKind::Eof => "end of input".into(),
        }
    }
}

/// WKT lexer that produces tokens from input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    peeked: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            peeked: None,
        }
    }

    /// Get the current position in the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.peeked.map_or(self.pos, |token| token.pos)
    }

    /// Peek at the next token without consuming it.
    pub fn peek(&mut self) -> Result<Token<'a>, LexerError> {
        match self.peeked {
            Some(token) => Ok(token),
            None => {
                let token = self.next_token()?;
                self.peeked = Some(token);
                Ok(token)
            }
        }
    }

    /// Consume and return the next token.
    pub fn next(&mut self) -> Result<Token<'a>, LexerError> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }
        self.next_token()
    }

    /// Skip whitespace and `#` comments.
    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            if b <= b' ' {
                self.pos += 1;
            } else if b == b'#' {
                while self.pos < bytes.len() && bytes[self.pos] != b'\n' && bytes[self.pos] != b'\r'
                {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token<'a>, LexerError> {
        self.skip_whitespace();

        let start_pos = self.pos;
        let Some(c) = self.input[self.pos..].chars().next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                pos: start_pos,
            });
        };

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            _ if is_word_char(c) => return Ok(self.read_word(start_pos)),
            _ => {
                return Err(LexerError::UnexpectedChar {
                    char: c,
                    pos: start_pos,
                });
            }
        };
        self.pos += 1;

        Ok(Token {
            kind,
            pos: start_pos,
        })
    }

    fn read_word(&mut self, start_pos: usize) -> Token<'a> {
        let len: usize = self.input[self.pos..]
            .chars()
            .take_while(|&c| is_word_char(c))
            .map(char::len_utf8)
            .sum();
        self.pos += len;

        Token {
            kind: TokenKind::Word(&self.input[start_pos..self.pos]),
            pos: start_pos,
        }
    }
}

/// Check if a character belongs to a word token.
///
/// Besides ASCII letters and digits, the Latin-1 letters in `U+00A0..=U+00FF`
/// are word characters, so accented keywords surface as unknown types rather
/// than as lexer errors.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '\u{a0}'..='\u{ff}')
}

/// Errors that can occur during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    /// Unexpected character in input.
    #[error("Unexpected character '{char}' at position {pos}")]
    UnexpectedChar {
        /// The unexpected character.
        char: char,
        /// Position in input.
        pos: usize,
    },
}
