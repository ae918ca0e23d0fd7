use super::*;
use super::types::*;

/// A top-level section of the file, as encountered by a linear sweep from the start of the
/// buffer.
#[derive(Debug, Clone)]
pub enum TLO {
    /// An indirect object (`N G obj ...`), with its inferred kind (`Type` or `Type/Subtype`, or
    /// a hint from the referring key) if any.
    Object { obj: ParsedObject, kind: Option<String> },
    /// A comment line, including the leading `%`.
    Comment { offset: Offset, text: Vec<u8>, kind: CommentKind },
    /// A cross-reference table (`xref` keyword and its subsections).
    XRef { offset: Offset, sections: Vec<Subsection> },
    /// The `trailer` keyword followed by its dictionary.
    Trailer { offset: Offset, dict: Object },
    /// The `startxref` keyword followed by the offset value.
    StartXRef { offset: Offset, value: Object },
    /// A stray `endobj` keyword closing the preceding object.
    EndObj { offset: Offset },
}

impl TLO {
    pub fn offset(&self) -> Offset {
        match self {
            TLO::Object { obj, .. } => obj.offset,
            TLO::Comment { offset, .. }
                | TLO::XRef { offset, .. }
                | TLO::Trailer { offset, .. }
                | TLO::StartXRef { offset, .. }
                | TLO::EndObj { offset } => *offset,
        }
    }
}

/// Classification of comment lines seen outside objects.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentKind {
    /// `%PDF-x.y`, with the version text.
    Version(String),
    /// `%` followed by four bytes above 0x7F, marking the file as containing binary data.
    BinaryMarker,
    /// `%%EOF`
    EndOfFile,
    Plain,
}

impl CommentKind {
    pub fn of(line: &[u8]) -> CommentKind {
        if line == b"%%EOF" {
            return CommentKind::EndOfFile;
        }
        if let Some(version) = line.strip_prefix(b"%PDF-") {
            if !version.is_empty() && version.iter().all(|c| c.is_ascii_digit() || *c == b'.') {
                return CommentKind::Version(String::from_utf8_lossy(version).into_owned());
            }
        }
        match line {
            [b'%', rest @ ..] if rest.len() == 4 && rest.iter().all(|&c| c >= 0x80) => CommentKind::BinaryMarker,
            _ => CommentKind::Plain
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_kind() {
        assert_eq!(CommentKind::of(b"%PDF-1.7"), CommentKind::Version("1.7".into()));
        assert_eq!(CommentKind::of(b"%\xE2\xE3\xCF\xD3"), CommentKind::BinaryMarker);
        assert_eq!(CommentKind::of(b"%\xE2\xE3\xCF"), CommentKind::Plain);
        assert_eq!(CommentKind::of(b"%%EOF"), CommentKind::EndOfFile);
        assert_eq!(CommentKind::of(b"% just a comment"), CommentKind::Plain);
        assert_eq!(CommentKind::of(b"%PDF-"), CommentKind::Plain);
    }
}
