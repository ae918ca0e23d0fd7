pub mod types {
    /// Object number: type alias for `u64`.
    pub type ObjNum = u64;
    /// Object generation: type alias for `u64`.
    ///
    /// Cross-reference streams default the generation of free entries to 65536, which does not
    /// fit into 16 bits, so the full width is kept.
    pub type ObjGen = u64;
    /// Index within an object stream.
    pub type ObjIndex = u64;
    /// Byte offset within the file buffer.
    pub type Offset = u64;
}

mod name;
pub use name::*;

mod dict;
pub use dict::*;

mod object;
pub use object::*;

mod stream;
pub use stream::*;

mod xref;
pub use xref::*;

mod locator;
pub use locator::*;

mod resolver;
pub use resolver::*;

mod error;
pub use error::*;

mod header;
pub use header::*;

mod tlo;
pub use tlo::*;
