/// Encodes information about the file header line (`%PDF-1.7`).
///
/// Available through [`FileParser::header()`](crate::parser::FileParser::header).
#[derive(Debug, PartialEq, Clone)]
pub struct Header {
    /// The part between `%` and `-`, normally `PDF`.
    pub signature: String,
    /// Version (major, minor).
    pub version: (u16, u16),
}
