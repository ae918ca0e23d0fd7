use crate::base::*;
use crate::base::types::*;

/// A sentence about what objects of the given kind do, for the common structural types.
pub fn type_description(kind: &str) -> Option<&'static str> {
    Some(match kind {
        "Catalog" => "The Catalog object sits at the root of the document and points to its pages object",
        "Pages" => "The Pages object points to the individual pages in this document",
        "Page" => "The Page object sets up the resources for a page and points to its graphical content",
        "XRef" => "The XRef object provides a lookup table for objects so they can be quickly found",
        "ObjStm" => "The ObjStm (object stream) object contains multiple objects compressed in its stream data",
        "XObject" => "The XObject object holds graphics content that can be reused multiple times",
        "Content" => "This object contains graphical content",
        _ => return None
    })
}

pub fn comment_explanation(kind: &CommentKind) -> Option<String> {
    match kind {
        CommentKind::Version(version) => Some(format!("This is a PDF version {version} compliant file")),
        CommentKind::BinaryMarker => Some("This comment marks that there is binary data contained in this file".into()),
        CommentKind::EndOfFile => Some("This marks the end of the document, although may be appended to after this point with more PDF content".into()),
        CommentKind::Plain => None
    }
}

pub const STARTXREF_NOTE: &str = "Points to the last cross-reference table which stores object offsets";
pub const XREF_STREAM_NOTE: &str = "XRef streams are stored as binary data. Following is an interpretation of that data:";
pub const OBJSTM_NOTE: &str = "Pairs of numbers: the object number and its offset in this stream";

/// Describes a single cross-reference entry in words.
pub fn record_line(num: ObjNum, rec: &Record) -> String {
    match *rec {
        Record::Free { gen, next } =>
            format!("object {num} is not in use; next free object at {next}, next generation will be {gen}"),
        Record::Used { gen, offset } =>
            format!("object {num} is at offset {offset} in generation {gen}"),
        Record::Compr { num_within, index } =>
            format!("object {num} is inside object stream {num_within} at index {index}"),
    }
}
