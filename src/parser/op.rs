use std::collections::BTreeMap;

use crate::base::*;
use crate::base::types::*;
use crate::utils;

use super::cc::CharClass;
use super::cursor::ByteCursor;

/// The kind of object implied by the dictionary key through which it is referenced, for objects
/// whose own dictionary may not carry a `/Type`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Hint {
    /// Referenced via `/Contents`: a page content stream.
    Content,
    /// Referenced via `/XObject`: a reusable graphics object.
    XObject,
}

impl Hint {
    pub fn for_key(key: &Name) -> Option<Hint> {
        match key.as_slice() {
            b"Contents" => Some(Hint::Content),
            b"XObject" => Some(Hint::XObject),
            _ => None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hint::Content => "Content",
            Hint::XObject => "XObject",
        }
    }
}

/// Inferred kinds of objects, keyed by object number, collected while parsing.
pub type TypeHints = BTreeMap<ObjNum, Hint>;

/// How deep arrays and dictionaries may nest inside one another.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent parser for a single object starting at the cursor position.
///
/// The cursor is left right after the last character of the object. On error, its position is
/// unspecified.
pub struct ObjParser<'c, 'a> {
    cur: &'c mut ByteCursor<'a>,
    hints: Option<&'c mut TypeHints>,
    allow_refs: bool,
    depth: usize,
}

impl<'c, 'a> ObjParser<'c, 'a> {
    pub fn new(cur: &'c mut ByteCursor<'a>) -> Self {
        Self { cur, hints: None, allow_refs: true, depth: 0 }
    }

    /// Records a [`Hint`] for every reference found under a hinting key into `hints`.
    pub fn with_hints(self, hints: &'c mut TypeHints) -> Self {
        Self { hints: Some(hints), ..self }
    }

    /// Disables the indirect reference lookahead, so that `1 0 R` reads as two numbers. Used in
    /// content streams, where `R` could be an operator.
    pub fn without_refs(self) -> Self {
        Self { allow_refs: false, ..self }
    }

    /// Shorthand for parsing one object with default settings.
    pub fn read_obj(cur: &'c mut ByteCursor<'a>) -> Result<Object, Error> {
        ObjParser::new(cur).parse()
    }

    pub fn parse(&mut self) -> Result<Object, Error> {
        self.parse_hinted(None)
    }

    fn parse_hinted(&mut self, hint: Option<Hint>) -> Result<Object, Error> {
        let c = self.cur.read_non_whitespace()?;
        match c {
            b'<' => {
                if self.cur.peek_char() == Some(b'<') {
                    self.cur.advance(1);
                    self.nested(|p| p.read_dict(hint))
                } else {
                    self.read_hex_string()
                }
            },
            b'(' => self.read_lit_string(),
            b'/' => Ok(Object::Name(self.read_name())),
            b'[' => self.nested(|p| p.read_array(hint)),
            b'f' => self.read_literal(b"alse", Object::Bool(false)),
            b't' => self.read_literal(b"rue", Object::Bool(true)),
            b'n' => self.read_literal(b"ull", Object::Null),
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                self.cur.rewind();
                self.read_number_or_ref(hint)
            },
            _ => Err(self.unknown_char(c))
        }
    }

    fn nested(&mut self, read: impl FnOnce(&mut Self) -> Result<Object, Error>) -> Result<Object, Error> {
        if self.depth >= MAX_NESTING {
            return Err(Error::syntax(self.cur.pos() - 1, format!("objects nested deeper than {MAX_NESTING} levels")));
        }
        self.depth += 1;
        let result = read(self);
        self.depth -= 1;
        result
    }

    fn unknown_char(&self, c: u8) -> Error {
        Error::syntax(self.cur.pos() - 1, format!("unknown character {:?}", c as char))
    }

    fn read_literal(&mut self, tail: &[u8], value: Object) -> Result<Object, Error> {
        if self.cur.peek_chars(tail.len()) == tail {
            self.cur.advance(tail.len());
            Ok(value)
        } else {
            self.cur.rewind();
            let c = self.cur.read_char()?;
            Err(self.unknown_char(c))
        }
    }

    fn read_dict(&mut self, hint: Option<Hint>) -> Result<Object, Error> {
        let mut dict = Vec::new();
        loop {
            self.cur.skip_whitespace();
            if self.cur.peek_chars(2) == b">>" {
                self.cur.advance(2);
                return Ok(Object::Dict(Dict(dict)));
            }
            let key_offset = self.cur.pos();
            let Object::Name(key) = self.parse_hinted(None)? else {
                return Err(Error::syntax(key_offset, "dictionary can only have name objects for keys"));
            };
            let value = self.parse_hinted(hint.or_else(|| Hint::for_key(&key)))?;
            dict.push((key, value));
        }
    }

    fn read_array(&mut self, hint: Option<Hint>) -> Result<Object, Error> {
        let mut vec = Vec::new();
        loop {
            if self.cur.skip_whitespace() == Some(b']') {
                self.cur.advance(1);
                return Ok(Object::Array(vec));
            }
            vec.push(self.parse_hinted(hint)?);
        }
    }

    fn read_hex_string(&mut self) -> Result<Object, Error> {
        let mut digits = String::new();
        loop {
            match self.cur.read_char()? {
                b'>' => return Ok(Object::HexString(digits)),
                c if c.is_ascii_hexdigit() => digits.push(c as char),
                c => return Err(Error::syntax(self.cur.pos() - 1,
                    format!("invalid character {:?} in hex string", c as char)))
            }
        }
    }

    fn read_lit_string(&mut self) -> Result<Object, Error> {
        let mut ret = Vec::new();
        let mut depth = 0usize;
        let mut escape = false;
        loop {
            let c = self.cur.read_char()?;
            match c {
                b'(' if !escape => depth += 1,
                b')' if !escape => {
                    if depth == 0 {
                        return Ok(Object::LitString(ret));
                    }
                    depth -= 1;
                },
                _ => ()
            }
            escape = c == b'\\' && !escape;
            ret.push(c);
        }
    }

    fn read_name(&mut self) -> Name {
        Name::from(self.cur.read_while(CharClass::is_regular))
    }

    fn read_number_or_ref(&mut self, hint: Option<Hint>) -> Result<Object, Error> {
        let start = self.cur.pos();
        let lead = self.cur.read_char()?;
        let mut seen_dot = lead == b'.';
        self.cur.read_while(|c| {
            if c == b'.' && !seen_dot {
                seen_dot = true;
                true
            } else {
                c.is_ascii_digit()
            }
        });
        let text = &self.cur.data()[start..self.cur.pos()];
        let value = utils::parse_num::<f64>(text)
            .ok_or_else(|| Error::syntax(start, format!("malformed number {:?}", utils::latin1(text))))?;

        if self.allow_refs {
            if let Some(num) = utils::parse_digits::<ObjNum>(text) {
                if let Some(objref) = self.read_ref_tail(num) {
                    if let (Some(hint), Some(hints)) = (hint, self.hints.as_deref_mut()) {
                        hints.insert(num, hint);
                    }
                    return Ok(Object::Ref(objref));
                }
            }
        }
        Ok(Object::Number(value))
    }

    /// Having read a non-negative integer, speculatively reads ` G R`. Restores the cursor if
    /// that does not follow.
    fn read_ref_tail(&mut self, num: ObjNum) -> Option<ObjRef> {
        self.cur.checkpoint(|cur| {
            if !CharClass::is_space(cur.peek_char()?) {
                return None;
            }
            cur.skip_whitespace();
            let gen = utils::parse_digits::<ObjGen>(cur.read_while(|c| c.is_ascii_digit()))?;
            if !CharClass::is_space(cur.peek_char()?) {
                return None;
            }
            cur.skip_whitespace();
            if cur.read_char().ok()? != b'R' {
                return None;
            }
            match cur.peek_char() {
                Some(c) if CharClass::is_regular(c) => None,
                _ => Some(ObjRef { num, gen })
            }
        })
    }
}
