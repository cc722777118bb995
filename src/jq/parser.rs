//! Parser for jq-like query expressions.
//!
//! Supported filters:
//! - `.` - identity
//! - `.foo`, `."foo"`, `.foo?` - property access, chained: `.foo.bar`
//! - `.["foo"]`, `.[0]`, `.[-1]`, `.[foo]` - bracket indexing
//! - `.[1:3]`, `.[1:]`, `.[:3]`, `.[:]` - slices (float bounds round up)
//! - `.[]`, `.[]?` - value iteration
//! - `A, B` - concatenation (binds tighter than `|`)
//! - `A | B` - pipeline
//! - primitive literals: `null`, `true`, `false`, numbers, strings
//! - `#` comments to end of line

use crate::error::{Error, Result};

use super::expr::{Expr, IndexKey, Literal, Property, Query};

/// Parse a query string into a [`Query`].
pub fn parse(input: &str) -> Result<Query> {
    let mut parser = Parser::new(input);
    let query = parser.parse_pipeline()?;
    parser.skip_ws();
    if !parser.is_eof() {
        return Err(parser.unexpected());
    }
    Ok(query)
}

/// Parser state.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser { input, pos: 0 }
    }

    /// Peek at the current character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consume and return the current character.
    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace and `#` comments.
    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.next();
            } else if c == '#' {
                while let Some(c) = self.next() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn err(&self, message: impl Into<String>) -> Error {
        Error::parse(message, self.pos)
    }

    fn unexpected(&self) -> Error {
        match self.peek() {
            Some(c) => self.err(format!("unexpected character '{}'", c)),
            None => self.err("unexpected end of input"),
        }
    }

    /// Consume a specific character or return an error.
    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.next();
                Ok(())
            }
            Some(c) => Err(self.err(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.err(format!("expected '{}', found end of input", expected))),
        }
    }

    /// Consume a trailing `?` if present.
    fn eat_optional(&mut self) -> bool {
        self.skip_ws();
        if self.peek() == Some('?') {
            self.next();
            true
        } else {
            false
        }
    }

    /// query := expression ("|" expression)*
    fn parse_pipeline(&mut self) -> Result<Query> {
        let mut stages = vec![self.parse_expression()?];
        loop {
            self.skip_ws();
            if self.peek() == Some('|') {
                self.next();
                stages.push(self.parse_expression()?);
            } else {
                break;
            }
        }
        Ok(Query { stages })
    }

    /// expression := simple ("," simple)*
    fn parse_expression(&mut self) -> Result<Expr> {
        let first = self.parse_simple()?;
        self.skip_ws();
        if self.peek() != Some(',') {
            return Ok(first);
        }
        let mut exprs = vec![first];
        while self.peek() == Some(',') {
            self.next();
            exprs.push(self.parse_simple()?);
            self.skip_ws();
        }
        Ok(Expr::Concat(exprs))
    }

    /// A single expression: identity, literal, properties, indexer, or
    /// iterator.
    fn parse_simple(&mut self) -> Result<Expr> {
        self.skip_ws();
        match self.peek() {
            Some('.') => {
                self.next();
                self.parse_dot()
            }
            Some('"') => Ok(Expr::Literal(Literal::Str(self.parse_string()?))),
            Some(c) if c.is_ascii_digit() || c == '-' => {
                Ok(Expr::Literal(self.parse_number_literal()?))
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                let start = self.pos;
                let word = self.parse_ident()?;
                match word.as_str() {
                    "null" => Ok(Expr::Literal(Literal::Null)),
                    "true" => Ok(Expr::Literal(Literal::Bool(true))),
                    "false" => Ok(Expr::Literal(Literal::Bool(false))),
                    _ => Err(Error::parse(format!("unexpected identifier '{}'", word), start)),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    /// Everything after a leading `.`.
    fn parse_dot(&mut self) -> Result<Expr> {
        match self.peek() {
            Some('[') => self.parse_bracket(),
            Some('"') => self.parse_properties(),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_properties(),
            // bare '.' - identity (possibly followed by '|' or ',')
            _ => Ok(Expr::Identity),
        }
    }

    /// properties := (("." (name | string)) "?"?)+ ; the first dot has
    /// already been consumed.
    fn parse_properties(&mut self) -> Result<Expr> {
        let mut steps = Vec::new();
        loop {
            let name = if self.peek() == Some('"') {
                self.parse_string()?
            } else {
                self.parse_ident()?
            };
            let optional = self.eat_optional();
            steps.push(Property { name, optional });

            // another step only when '.' is followed by a name or string
            let mark = self.pos;
            if self.peek() == Some('.') {
                self.next();
                match self.peek() {
                    Some('"') => continue,
                    Some(c) if c.is_alphabetic() || c == '_' => continue,
                    _ => {
                        self.pos = mark;
                        break;
                    }
                }
            }
            break;
        }
        Ok(Expr::Properties(steps))
    }

    /// A bracket expression after `.`: indexer, iterator, or slice.
    fn parse_bracket(&mut self) -> Result<Expr> {
        self.expect('[')?;
        self.skip_ws();

        // `.[]` - iterate
        if self.peek() == Some(']') {
            self.next();
            return Ok(Expr::Iterator {
                optional: self.eat_optional(),
            });
        }

        let key = match self.peek() {
            Some(':') => self.parse_slice(None)?,
            Some('"') => {
                let s = self.parse_string()?;
                self.promote_or_key(IndexKey::Str(s.clone()), Literal::Str(s))?
            }
            Some(c) if c.is_ascii_digit() || c == '-' => {
                let lit = self.parse_number_literal()?;
                self.skip_ws();
                if self.peek() == Some(':') {
                    self.parse_slice(Some(literal_index(&lit)))?
                } else {
                    self.promote_or_key(IndexKey::Int(literal_index(&lit)), lit)?
                }
            }
            Some('.') => {
                let expr = self.parse_expression()?;
                IndexKey::Expr(Box::new(expr))
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                let word = self.parse_ident()?;
                IndexKey::Str(word)
            }
            _ => return Err(self.unexpected()),
        };

        self.expect(']')?;
        Ok(Expr::Indexer {
            key,
            optional: self.eat_optional(),
        })
    }

    /// After the first bracket item, a comma promotes the whole bracket
    /// content to a concatenation expression.
    fn promote_or_key(&mut self, key: IndexKey, first: Literal) -> Result<IndexKey> {
        self.skip_ws();
        if self.peek() != Some(',') {
            return Ok(key);
        }
        let mut exprs = vec![Expr::Literal(first)];
        while self.peek() == Some(',') {
            self.next();
            exprs.push(self.parse_simple()?);
            self.skip_ws();
        }
        Ok(IndexKey::Expr(Box::new(Expr::Concat(exprs))))
    }

    /// slice := [start] ":" [end] ; the start (if any) has been parsed.
    fn parse_slice(&mut self, start: Option<i64>) -> Result<IndexKey> {
        self.expect(':')?;
        self.skip_ws();
        let end = match self.peek() {
            Some(']') => None,
            Some(c) if c.is_ascii_digit() || c == '-' => {
                Some(literal_index(&self.parse_number_literal()?))
            }
            _ => return Err(self.unexpected()),
        };
        Ok(IndexKey::Slice { start, end })
    }

    /// Parse an identifier (property name / cname).
    fn parse_ident(&mut self) -> Result<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {
                self.next();
            }
            Some(c) => return Err(self.err(format!("expected identifier, found '{}'", c))),
            None => return Err(self.err("expected identifier, found end of input")),
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.next();
            } else {
                break;
            }
        }
        Ok(self.input[start..self.pos].to_string())
    }

    /// Parse a JSON-style string literal, returning its raw content
    /// (escape sequences preserved).
    fn parse_string(&mut self) -> Result<String> {
        self.expect('"')?;
        let start = self.pos;
        loop {
            match self.next() {
                None => return Err(self.err("unterminated string")),
                Some('\\') => {
                    if self.next().is_none() {
                        return Err(self.err("unterminated string"));
                    }
                }
                Some('"') => break,
                Some(_) => {}
            }
        }
        Ok(self.input[start..self.pos - 1].to_string())
    }

    /// Parse a signed number literal, distinguishing ints from floats.
    fn parse_number_literal(&mut self) -> Result<Literal> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.next();
        }
        match self.peek() {
            Some(c) if c.is_ascii_digit() => {}
            _ => return Err(self.err("expected digit")),
        }
        let mut float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.next();
            } else if c == '.' && !float {
                // a digit must follow; `.foo` after a number is not ours
                let mut rest = self.input[self.pos..].chars();
                rest.next();
                if !rest.next().is_some_and(|d| d.is_ascii_digit()) {
                    break;
                }
                float = true;
                self.next();
            } else if c == 'e' || c == 'E' {
                float = true;
                self.next();
                if matches!(self.peek(), Some('+') | Some('-')) {
                    self.next();
                }
            } else {
                break;
            }
        }
        let text = &self.input[start..self.pos];
        if float {
            text.parse::<f64>()
                .map(Literal::Float)
                .map_err(|_| Error::parse("invalid number", start))
        } else {
            text.parse::<i64>()
                .map(Literal::Int)
                .map_err(|_| Error::parse("invalid number", start))
        }
    }
}

/// Convert a number literal into a list index; non-integral floats round
/// up (ceiling).
fn literal_index(lit: &Literal) -> i64 {
    match lit {
        Literal::Int(n) => *n,
        Literal::Float(f) => f.ceil() as i64,
        _ => unreachable!("number literals only"),
    }
}
