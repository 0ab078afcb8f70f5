//! Parser for serialized mapping literals.
//!
//! `contact_info` cells hold a mapping written in Python literal syntax,
//! for example `{'email': 'a@b.com', 'address': {'zip': '10001'}}`. The
//! parser accepts the subset of that syntax such mappings use, and plain
//! JSON:
//!
//! - strings in single or double quotes, with backslash escapes
//! - integers and floats (with optional sign and exponent)
//! - `True`/`False`/`None` and `true`/`false`/`null`
//! - mappings, lists and tuples (tuples become arrays), trailing commas
//!
//! Sets, bytes and prefixed strings (`b'..'`, `r'..'`), implicit string
//! concatenation (`'a' 'b'`) and complex numbers are rejected. Containers
//! nest at most [`MAX_DEPTH`] levels.
//!
//! Values are returned as `serde_json::Value` with key order preserved.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Why a literal could not be parsed. Offsets count characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("unknown name '{name}' at offset {offset}")]
    UnknownName { name: String, offset: usize },

    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },

    #[error("mapping key at offset {offset} is not a string or number")]
    InvalidKey { offset: usize },

    #[error("trailing characters at offset {offset}")]
    TrailingCharacters { offset: usize },

    #[error("expected a mapping literal, found {found}")]
    NotAMapping { found: &'static str },

    #[error("nesting deeper than {max} levels at offset {offset}", max = MAX_DEPTH)]
    TooDeep { offset: usize },
}

type Result<T> = std::result::Result<T, LiteralError>;

/// Deepest container nesting accepted.
pub const MAX_DEPTH: usize = 128;

/// Parses any supported literal.
pub fn parse_literal(text: &str) -> Result<Value> {
    let mut parser = Parser::new(text);
    let value = parser.value()?;
    parser.skip_whitespace();
    if let Some(offset) = parser.remaining_offset() {
        return Err(LiteralError::TrailingCharacters { offset });
    }
    Ok(value)
}

/// Parses a literal that must be a mapping.
pub fn parse_mapping_literal(text: &str) -> Result<Map<String, Value>> {
    match parse_literal(text)? {
        Value::Object(map) => Ok(map),
        other => Err(LiteralError::NotAMapping {
            found: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn remaining_offset(&self) -> Option<usize> {
        (self.pos < self.chars.len()).then_some(self.pos)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(found) => Err(LiteralError::UnexpectedChar {
                found,
                offset: self.pos - 1,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        let offset = self.pos;
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('{') => self.nested(offset, Self::mapping),
            Some('[') => self.nested(offset, |p| p.sequence('[', ']')),
            Some('(') => self.nested(offset, |p| p.sequence('(', ')')),
            Some(quote @ ('\'' | '"')) => self.string(quote).map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(found) => Err(LiteralError::UnexpectedChar { found, offset }),
        }
    }

    fn nested(
        &mut self,
        offset: usize,
        parse: impl FnOnce(&mut Self) -> Result<Value>,
    ) -> Result<Value> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep { offset });
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn mapping(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                Some(_) => {}
            }
            let key_offset = self.pos;
            let key = match self.value()? {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                _ => return Err(LiteralError::InvalidKey { offset: key_offset }),
            };
            self.expect(':')?;
            let value = self.value()?;
            map.insert(key, value);
            if !self.separator('}')? {
                return Ok(Value::Object(map));
            }
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Value> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == close => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                Some(_) => {}
            }
            items.push(self.value()?);
            if !self.separator(close)? {
                return Ok(Value::Array(items));
            }
        }
    }

    /// Consumes `,` (returns true, more items may follow) or the closing
    /// delimiter (returns false).
    fn separator(&mut self, close: char) -> Result<bool> {
        self.skip_whitespace();
        match self.bump() {
            Some(',') => Ok(true),
            Some(c) if c == close => Ok(false),
            Some(found) => Err(LiteralError::UnexpectedChar {
                found,
                offset: self.pos - 1,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn string(&mut self, quote: char) -> Result<String> {
        self.pos += 1;
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.escape(&mut out)?,
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<()> {
        let offset = self.pos - 1;
        let c = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        match c {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'x' => out.push(self.hex_char(2, offset)?),
            'u' => out.push(self.hex_char(4, offset)?),
            'U' => out.push(self.hex_char(8, offset)?),
            // Unknown escapes keep their backslash, as in Python.
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn hex_char(&mut self, digits: usize, offset: usize) -> Result<char> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or(LiteralError::InvalidEscape { offset })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape { offset })
    }

    fn number(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        let invalid = || LiteralError::InvalidNumber {
            text: text.clone(),
            offset: start,
        };

        let is_integer = !text.contains(['.', 'e', 'E']);
        if is_integer {
            if let Ok(int) = text.parse::<i64>() {
                return Ok(Value::Number(int.into()));
            }
        }
        let float = text.parse::<f64>().map_err(|_| invalid())?;
        Number::from_f64(float).map(Value::Number).ok_or_else(invalid)
    }

    fn name(&mut self) -> Result<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        match name.as_str() {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(LiteralError::UnknownName {
                name,
                offset: start,
            }),
        }
    }
}
