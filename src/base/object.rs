use std::fmt::{Display, Formatter};

use super::name::Name;
use super::dict::Dict;
use super::types::*;
use crate::utils;

/// The base type of all PDF objects.
///
/// Streams are not a variant of their own: a stream is a [`Dict`] followed by a payload, see
/// [`ParsedObject`](super::ParsedObject).
#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    /// Null object (`null`). Also used as a fall-back for missing dictionary entries and free
    /// objects.
    Null,
    /// Bool (`true` or `false`)
    Bool(bool),
    /// Numbers. Integers and reals share the representation.
    Number(f64),
    /// Name (like `/Length`)
    Name(Name),
    /// Literal string (`(text)`), stored as the source text between the outer parentheses with
    /// escape sequences left untouched.
    LitString(Vec<u8>),
    /// Hexadecimal string (`<901FA3>`), stored as the hex digit text.
    HexString(String),
    /// Array (`[1 2 3]`)
    Array(Vec<Object>),
    /// Dictionary (`<< /Root 1 0 R >>`)
    Dict(Dict),
    /// Indirect object reference (`3 0 R`)
    Ref(ObjRef),
}

impl Object {
    /// A utility method to create [`Object::LitString`] from a byte slice.
    pub fn new_string(s: &[u8]) -> Object {
        Object::LitString(s.to_owned())
    }

    /// A utility method to create [`Object::Name`] from a byte slice. Don't pass the initial
    /// `'/'`.
    pub fn new_name(s: &[u8]) -> Object {
        Object::Name(Name::from(s))
    }

    /// Human-readable name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::Null => "null",
            Object::Bool(_) => "boolean",
            Object::Number(_) => "number",
            Object::Name(_) => "name",
            Object::LitString(_) => "literal string",
            Object::HexString(_) => "hexadecimal string",
            Object::Array(_) => "array",
            Object::Dict(_) => "dictionary",
            Object::Ref(_) => "indirect reference",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            &Object::Bool(val) => Some(val),
            _ => None
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            &Object::Number(val) => Some(val),
            _ => None
        }
    }

    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Object::Name(val) => Some(val),
            _ => None
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(val) => Some(val),
            _ => None
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dict(val) => Some(val),
            _ => None
        }
    }

    pub fn as_objref(&self) -> Option<&ObjRef> {
        match self {
            Object::Ref(val) => Some(val),
            _ => None
        }
    }

    pub fn into_array(self) -> Option<Vec<Object>> {
        match self {
            Object::Array(val) => Some(val),
            _ => None
        }
    }

    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Object::Dict(val) => Some(val),
            _ => None
        }
    }

    /// For an integral `Object::Number`, extracts the value and casts it into the required type.
    /// Returns `None` for other types of objects, for fractional numbers and for values not
    /// fitting into `T`.
    pub fn num_value<T: TryFrom<i64>>(&self) -> Option<T> {
        match self {
            &Object::Number(num) if num.is_finite() && num.fract() == 0.
                && num >= i64::MIN as f64 && num <= i64::MAX as f64 =>
                (num as i64).try_into().ok(),
            _ => None
        }
    }

    /// For an [`Object::HexString`], decodes the digit text into bytes. An odd digit count is
    /// completed with a zero low nibble (`<901fa>` is `90 1F A0`).
    pub fn hex_bytes(&self) -> Option<Vec<u8>> {
        let Object::HexString(digits) = self else { return None };
        let digits = digits.as_bytes()
            .iter()
            .map(|&c| utils::hex_value(c))
            .collect::<Option<Vec<_>>>()?;
        Some(digits.chunks(2)
            .map(|pair| match *pair {
                [hi, lo] => (hi << 4) | lo,
                [hi] => hi << 4,
                _ => unreachable!()
            })
            .collect())
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Null => f.write_str("null"),
            Object::Bool(true) => f.write_str("true"),
            Object::Bool(false) => f.write_str("false"),
            Object::Number(x) => write!(f, "{x}"),
            Object::Name(name) => write!(f, "{}", name),
            Object::LitString(s) => {
                f.write_str("(")?;
                for &c in s {
                    write!(f, "{}", c as char)?;
                }
                f.write_str(")")
            },
            Object::HexString(s) => write!(f, "<{s}>"),
            Object::Array(arr) => {
                f.write_str("[ ")?;
                for obj in arr {
                    write!(f, "{obj} ")?;
                }
                f.write_str("]")
            },
            Object::Dict(dict) => write!(f, "{}", dict),
            Object::Ref(ObjRef{num, gen}) => write!(f, "{num} {gen} R"),
        }
    }
}

/// An indirect object reference.
#[derive(PartialEq, Eq, Debug, Clone, Copy, PartialOrd, Ord)]
pub struct ObjRef {
    pub num: ObjNum,
    pub gen: ObjGen
}

impl Display for ObjRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.num, self.gen)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Object::Number(-1.)), "-1");
        assert_eq!(format!("{}", Object::Number(0.25)), "0.25");
        assert_eq!(format!("{}", Object::new_string(b"")), "()");
        assert_eq!(format!("{}", Object::new_string(b"a\\)b")), "(a\\)b)");
        assert_eq!(format!("{}", Object::HexString("901FA3".into())), "<901FA3>");
        assert_eq!(format!("{}", Object::Array(vec![
                Object::Number(549.),
                Object::Number(3.14),
                Object::Bool(false),
                Object::new_string(b"Ralph"),
                Object::new_name(b"SomeName"),
                Object::Null,
        ])), "[ 549 3.14 false (Ralph) /SomeName null ]");
        assert_eq!(format!("{}", Object::Dict(Dict::from(vec![
            (Name::from(b"Length"), Object::Ref(ObjRef{num: 8, gen: 0}))]))), "<< /Length 8 0 R >>");
    }

    #[test]
    fn test_num_value() {
        assert_eq!(Object::Number(12.).num_value::<u64>(), Some(12));
        assert_eq!(Object::Number(-3.).num_value::<i32>(), Some(-3));
        assert_eq!(Object::Number(-3.).num_value::<u64>(), None);
        assert_eq!(Object::Number(1.5).num_value::<i64>(), None);
        assert_eq!(Object::Number(300.).num_value::<u8>(), None);
        assert_eq!(Object::Null.num_value::<u8>(), None);
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(Object::HexString("901FA3".into()).hex_bytes(), Some(vec![0x90, 0x1F, 0xA3]));
        assert_eq!(Object::HexString("901fa".into()).hex_bytes(), Some(vec![0x90, 0x1F, 0xA0]));
        assert_eq!(Object::HexString(String::new()).hex_bytes(), Some(vec![]));
        assert_eq!(Object::Null.hex_bytes(), None);
    }
}
