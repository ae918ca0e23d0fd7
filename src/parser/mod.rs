pub(crate) mod cc;
mod cursor;
mod op;
mod fp;

pub use cursor::ByteCursor;
pub use op::{ObjParser, Hint, TypeHints, MAX_NESTING};
pub use fp::{FileParser, parse_xref_stream};
