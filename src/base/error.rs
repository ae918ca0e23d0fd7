use thiserror::Error;

use super::types::*;

/// Errors raised while reading a PDF buffer.
///
/// All kinds are fatal to the operation that raised them except [`Error::Unsupported`], which
/// [`codecs::decode`](crate::codecs::decode) turns into a placeholder payload.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed token or structure.
    #[error("syntax error at offset {offset}: {detail}")]
    Syntax { offset: Offset, detail: String },

    /// A read ran past the end of the buffer while more data was expected.
    #[error("unexpected end of data at offset {offset}")]
    EndOfInput { offset: Offset },

    /// A required dictionary entry is absent or has the wrong type.
    #[error("missing or malformed required field at offset {offset}: {detail}")]
    MissingField { offset: Offset, detail: String },

    /// An indirect reference could not be followed to its target.
    #[error("could not resolve object {num}: {detail}")]
    Unresolved { num: ObjNum, detail: String },

    /// A structural keyword was expected but something else was found.
    #[error("expecting {expected} at offset {offset}, found {found:?}")]
    UnexpectedKeyword { offset: Offset, expected: &'static str, found: String },

    /// Filter or predictor this crate does not implement.
    #[error("don't know {what}")]
    Unsupported { what: String },

    /// The file framing (header line, `startxref`, `%%EOF`) is not as expected.
    #[error("invalid file framing at offset {offset}: {detail}")]
    Framing { offset: Offset, detail: String },

    /// Stream data could not be decoded.
    #[error("failed to decode stream data at offset {offset}: {detail}")]
    Decode { offset: Offset, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// `false` only for errors which are expected to degrade into placeholder content.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Unsupported { .. })
    }

    pub(crate) fn syntax(offset: impl TryInto<Offset>, detail: impl Into<String>) -> Error {
        Error::Syntax { offset: offset.try_into().unwrap_or(Offset::MAX), detail: detail.into() }
    }

    pub(crate) fn missing(offset: Offset, detail: impl Into<String>) -> Error {
        Error::MissingField { offset, detail: detail.into() }
    }
}
