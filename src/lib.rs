//! Reading the physical structure of PDF files: objects, cross-reference tables and streams,
//! in the order they appear in the file.
//!
//! [`reader::SimpleReader`] validates the file framing and builds the unified cross-reference
//! table; its [`sweep()`](reader::SimpleReader::sweep) walks the whole buffer and yields every
//! top-level section ([`TLO`]). The [`inspect`] module interprets stream payloads for display.

pub mod base;
pub mod parser;
pub mod codecs;
pub mod reader;
pub mod inspect;

mod utils;

#[cfg(test)]
mod testpdf;

pub use base::*;
pub use base::types::*;
