use crate::base::*;
use crate::parser::{ByteCursor, FileParser, ObjParser, TypeHints};
use crate::utils;

use super::simple::SimpleReader;

/// A linear pass over the whole buffer, yielding top-level sections ([`TLO`]) in file order.
///
/// Indirect objects met on the way are dereferenced through the owning [`SimpleReader`]. While
/// parsing, references found under keys like `/Contents` or `/XObject` are remembered, so that
/// an object appearing later without a `/Type` still receives a kind. The first error ends the
/// iteration.
pub struct Sweep<'r, 'a> {
    reader: &'r SimpleReader<'a>,
    cur: ByteCursor<'a>,
    hints: TypeHints,
    failed: bool,
}

impl<'r, 'a> Sweep<'r, 'a> {
    pub(crate) fn new(reader: &'r SimpleReader<'a>) -> Self {
        Self { reader, cur: ByteCursor::new(reader.data()), hints: TypeHints::new(), failed: false }
    }

    /// Kinds inferred from the referring keys so far.
    pub fn hints(&self) -> &TypeHints {
        &self.hints
    }

    fn read_section(&mut self, first: u8) -> Result<TLO, Error> {
        let offset = self.cur.offset();
        match first {
            b'0'..=b'9' => {
                let obj = FileParser::read_record(&mut self.cur, self.reader, Some(&mut self.hints))?;
                let kind = self.kind_of(&obj)?;
                Ok(TLO::Object { obj, kind })
            },
            b'%' => {
                let text = utils::trim_end(self.cur.read_line().unwrap_or_default()).to_vec();
                let kind = CommentKind::of(&text);
                Ok(TLO::Comment { offset, text, kind })
            },
            _ => match self.cur.read_keyword() {
                b"endobj" => Ok(TLO::EndObj { offset }),
                b"xref" => Ok(TLO::XRef { offset, sections: FileParser::read_xref_sections(&mut self.cur)? }),
                b"trailer" => Ok(TLO::Trailer { offset, dict: ObjParser::read_obj(&mut self.cur)? }),
                b"startxref" => Ok(TLO::StartXRef { offset, value: ObjParser::read_obj(&mut self.cur)? }),
                kw => Err(Error::UnexpectedKeyword {
                    offset,
                    expected: "an object, a comment or a keyword",
                    found: utils::latin1(kw)
                })
            }
        }
    }

    /// `/Type`, followed by `/Subtype` if present, or the kind hinted by a preceding reference.
    fn kind_of(&self, obj: &ParsedObject) -> Result<Option<String>, Error> {
        let name_of = |key: &[u8], dict: &Dict| -> Result<Option<String>, Error> {
            Ok(self.reader.resolve_obj(dict.lookup(key))?.as_name().map(Name::to_text))
        };
        if let Object::Dict(dict) = &obj.value {
            if let Some(tpe) = name_of(b"Type", dict)? {
                return Ok(Some(match name_of(b"Subtype", dict)? {
                    Some(subtype) => format!("{tpe}/{subtype}"),
                    None => tpe
                }));
            }
        }
        Ok(self.hints.get(&obj.oref.num).map(|hint| hint.as_str().to_owned()))
    }
}

impl Iterator for Sweep<'_, '_> {
    type Item = Result<TLO, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let first = self.cur.skip_whitespace()?;
        let item = self.read_section(first);
        if let Err(err) = &item {
            log::error!("Sweep stopped: {err}");
            self.failed = true;
        }
        Some(item)
    }
}
