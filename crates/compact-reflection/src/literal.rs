//! # Structured Literals
//!
//! A small parser for the literal syntax accepted in command-line arguments:
//!
//! | Form | Example |
//! |------|---------|
//! | Number | `100`, `-2.5`, `1e3` |
//! | String | `'hosky'`, `"hosky"` |
//! | Boolean / null | `true`, `false`, `null` |
//! | Array | `[100, ['hosky', false], true]` |
//! | Object | `{ x: 'ffffff', "y": 100, }` |
//!
//! Object keys may be bare identifiers. Trailing commas are allowed. Arrays
//! and objects nest at most [`MAX_DEPTH`] levels deep.

use std::fmt;
use thiserror::Error;

/// Deepest nesting of arrays and objects accepted.
pub const MAX_DEPTH: usize = 128;

/// A parsed literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric text, kept verbatim.
    Number(String),
    /// String contents, unquoted.
    String(String),
    /// `true` / `false`.
    Boolean(bool),
    /// `null`.
    Null,
    /// `[...]`.
    Array(Vec<Literal>),
    /// `{...}`, fields in source order.
    Object(Vec<(String, Literal)>),
}

impl Literal {
    /// Parse `text` as exactly one literal.
    pub fn parse(text: &str) -> Result<Literal, LiteralError> {
        let mut parser = Parser::new(text);
        parser.skip_whitespace();
        let literal = parser.parse_value()?;
        parser.skip_whitespace();
        match parser.peek() {
            None => Ok(literal),
            Some(c) => Err(parser.unexpected(c)),
        }
    }

    /// Field `name` of an object literal.
    pub fn field(&self, name: &str) -> Option<&Literal> {
        match self {
            Literal::Object(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

/// Renders back to literal syntax, strings single-quoted.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(text) => f.write_str(text),
            Literal::String(s) => write!(f, "'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Null => f.write_str("null"),
            Literal::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Literal::Object(fields) => {
                f.write_str("{")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key}:{value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Literal syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// Input ended inside a literal.
    #[error("Unexpected end of input")]
    UnexpectedEnd,

    /// A character that cannot start or continue the current literal.
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Character offset.
        position: usize,
    },

    /// A bare word that is not `true`, `false` or `null`.
    #[error("Invalid identifier '{word}' at position {position}")]
    InvalidIdentifier {
        /// The word.
        word: String,
        /// Character offset of its first character.
        position: usize,
    },

    /// A malformed number.
    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber {
        /// The text scanned as a number.
        text: String,
        /// Character offset of its first character.
        position: usize,
    },

    /// Arrays or objects nested deeper than [`MAX_DEPTH`].
    #[error("Literal nested too deeply at position {position}")]
    TooDeep {
        /// Character offset of the opening bracket.
        position: usize,
    },
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser {
    input: Vec<char>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            input: text.chars().collect(),
            position: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::UnexpectedCharacter {
            found,
            position: self.position,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.position += 1;
                Ok(())
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn parse_value(&mut self) -> Result<Literal, LiteralError> {
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[') => self.nested(Self::parse_array),
            Some('{') => self.nested(Self::parse_object),
            Some(quote @ ('\'' | '"')) => Ok(Literal::String(self.parse_string(quote)?)),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_identifier_start(c) => {
                let position = self.position;
                match self.parse_identifier().as_str() {
                    "true" => Ok(Literal::Boolean(true)),
                    "false" => Ok(Literal::Boolean(false)),
                    "null" => Ok(Literal::Null),
                    word => Err(LiteralError::InvalidIdentifier {
                        word: word.to_string(),
                        position,
                    }),
                }
            }
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Literal, LiteralError>,
    ) -> Result<Literal, LiteralError> {
        if self.depth == MAX_DEPTH {
            return Err(LiteralError::TooDeep {
                position: self.position,
            });
        }
        self.depth += 1;
        let literal = parse(self);
        self.depth -= 1;
        literal
    }

    fn parse_array(&mut self) -> Result<Literal, LiteralError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.position += 1;
                return Ok(Literal::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.advance() {
                Some(',') => continue,
                Some(']') => return Ok(Literal::Array(items)),
                Some(c) => {
                    self.position -= 1;
                    return Err(self.unexpected(c));
                }
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn parse_object(&mut self) -> Result<Literal, LiteralError> {
        self.expect('{')?;
        let mut fields = Vec::new();
        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some('}') => {
                    self.position += 1;
                    return Ok(Literal::Object(fields));
                }
                Some(quote @ ('\'' | '"')) => self.parse_string(quote)?,
                Some(c) if is_identifier_start(c) => self.parse_identifier(),
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(LiteralError::UnexpectedEnd),
            };
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.parse_value()?;
            // Later duplicates win.
            fields.retain(|(k, _): &(String, Literal)| *k != key);
            fields.push((key, value));
            self.skip_whitespace();
            match self.advance() {
                Some(',') => continue,
                Some('}') => return Ok(Literal::Object(fields)),
                Some(c) => {
                    self.position -= 1;
                    return Err(self.unexpected(c));
                }
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.expect(quote)?;
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.advance() {
                    None => return Err(LiteralError::UnexpectedEnd),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some(c) => value.push(c),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
        {
            self.position += 1;
        }
        let text: String = self.input[start..self.position].iter().collect();
        let body = text.strip_prefix(&['-', '+'][..]).unwrap_or(&text);
        let well_formed = body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
            && body.parse::<f64>().is_ok_and(f64::is_finite);
        if well_formed {
            Ok(Literal::Number(text))
        } else {
            Err(LiteralError::InvalidNumber {
                text,
                position: start,
            })
        }
    }

    fn parse_identifier(&mut self) -> String {
        let start = self.position;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            self.position += 1;
        }
        self.input[start..self.position].iter().collect()
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}
