use std::collections::VecDeque;

use crate::base::*;
use crate::base::types::*;

use super::base::BaseReader;

/// Walks the revisions reachable from `entry` and folds them into one table, newest first.
///
/// A text table's `/XRefStm` section is read right after the table itself and before its
/// `/Prev`, so that in a hybrid file the table's own entries win, then the stream's, then those
/// of older revisions. Indirect objects needed while reading a section are looked up in the
/// table as accumulated so far. An offset visited twice ends the walk.
pub fn build_table(reader: &BaseReader, entry: Offset) -> Result<XRefTable, Error> {
    let mut queue = VecDeque::from([(entry, false)]);
    let mut visited = Vec::new();
    let mut table: Option<XRefTable> = None;
    while let Some((offset, is_aside)) = queue.pop_front() {
        if visited.contains(&offset) {
            log::warn!("Breaking xref chain detected at {offset}.");
            break;
        }
        visited.push(offset);
        let locator: &dyn Locator = match &table {
            Some(table) => table,
            None => &()
        };
        let xref = reader.read_xref_at(offset, locator)?;
        log::debug!("Revision at {offset}: {} subsection(s)", xref.sections.len());
        let at_offset = |err: Error| match err {
            Error::MissingField { detail, .. } => Error::MissingField { offset, detail },
            err => err
        };
        if is_aside {
            if xref.tpe == XRefType::Table {
                log::warn!("/XRefStm pointed to a classical section.");
            }
            if xref.prev().map_err(at_offset)?.is_some() {
                log::warn!("Ignoring /Prev in a /XRefStm.");
            }
        } else {
            if xref.tpe == XRefType::Table {
                if let Some(stm) = xref.xref_stm().map_err(at_offset)? {
                    queue.push_back((stm, true));
                }
            }
            if let Some(prev) = xref.prev().map_err(at_offset)? {
                queue.push_back((prev, false));
            }
        }
        match &mut table {
            Some(table) => table.merge_prev(xref),
            None => table = Some(XRefTable::from(xref))
        }
    }
    table.ok_or_else(|| Error::Framing { offset: entry, detail: "could not parse xref table".into() })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FileParser;
    use crate::testpdf::*;

    fn build(data: &[u8]) -> Result<XRefTable, Error> {
        let parser = FileParser::new(data);
        let entry = parser.entrypoint()?;
        build_table(&BaseReader::new(parser), entry)
    }

    fn used(offset: Offset) -> Option<Record> {
        Some(Record::Used { gen: 0, offset })
    }

    #[test]
    fn test_prev_chain() {
        let mut b = PdfBuilder::new();
        for num in 1..=5 {
            b.obj(num, &format!("({num})"));
        }
        let old5 = b.offset(5);
        let x1 = b.xref_table(&[0, 1, 2, 3, 4, 5], "<< /Size 6 /Root 1 0 R >>");
        let new5 = b.obj(5, "(5 updated)");
        let x2 = b.xref_table(&[5], &format!("<< /Size 6 /Root 1 0 R /Prev {x1} >>"));
        let table = build(&b.finish(x2)).unwrap();
        assert_ne!(old5, new5);
        assert_eq!(table.len(), 6);
        assert_eq!(table.get(5).copied(), used(new5));
        assert!(matches!(table.get(0), Some(Record::Free { next: 0, gen: 65535 })));
        assert!(table.get(1).is_some());
        assert_eq!(table.trailer.lookup(b"Prev"), &Object::Number(x1 as f64));
    }

    #[test]
    fn test_hybrid() {
        let mut b = PdfBuilder::new();
        let off1 = b.obj(1, "<< /Type /Catalog >>");
        b.obj(2, "(two)");
        let off4 = b.obj(4, "(four)");
        let records = xref_stream_data(&[(1, 9999, 0), (1, off4 as u16, 0)]);
        let off3 = b.stream(3, "/Type /XRef /Size 5 /W [1 2 1] /Index [1 1 4 1]", &records);
        let x = b.xref_table(&[0, 1, 2], &format!("<< /Size 5 /Root 1 0 R /XRefStm {off3} >>"));
        let table = build(&b.finish(x)).unwrap();
        assert_eq!(table.get(1).copied(), used(off1));
        assert_eq!(table.get(4).copied(), used(off4));
        assert_eq!(table.get(3), None);
        assert_eq!(table.trailer.lookup(b"XRefStm"), &Object::Number(off3 as f64));
    }

    #[test]
    fn test_xref_stream_entry() {
        let mut b = PdfBuilder::new();
        let off1 = b.obj(1, "<< /Type /Catalog >>");
        let off2 = b.pos();
        let records = xref_stream_data(&[(0, 0, 255), (1, off1 as u16, 0), (1, off2 as u16, 0)]);
        b.stream(2, "/Type /XRef /Size 3 /W [1 2 1] /Root 1 0 R /Filter /FlateDecode", &deflate(&records));
        let table = build(&b.finish(off2)).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1).copied(), used(off1));
        assert_eq!(table.get(2).copied(), used(off2));
        assert_eq!(table.trailer.lookup(b"Type"), &Object::new_name(b"XRef"));
    }

    #[test]
    fn test_cycle() {
        let mut b = PdfBuilder::new();
        let off1 = b.obj(1, "null");
        let x = b.pos();
        b.xref_table(&[0, 1], &format!("<< /Size 2 /Prev {x} >>"));
        let table = build(&b.finish(x)).unwrap();
        assert_eq!(table.get(1).copied(), used(off1));
    }

    #[test]
    fn test_errors() {
        let mut b = PdfBuilder::new();
        b.obj(1, "null");
        let x = b.xref_table(&[0, 1], "<< /Size 2 /Prev /Oops >>");
        assert!(matches!(build(&b.finish(x)), Err(Error::MissingField { offset, .. }) if offset == x));

        let mut b = PdfBuilder::new();
        b.obj(1, "null");
        let x = b.xref_table(&[0, 1], "<< /Size 2 /Prev 10000 >>");
        assert!(matches!(build(&b.finish(x)), Err(Error::EndOfInput { .. })));

        let mut b = PdfBuilder::new();
        let off1 = b.obj(1, "null");
        let records = xref_stream_data(&[(1, off1 as u16, 0)]);
        let x = b.raw(b"2 0 obj\n<< /Type /XRef /Size 2 /W [1 2 1] /Index [1 1] /Length 3 0 R >>\nstream\n");
        b.raw(&records);
        b.raw(b"\nendstream\nendobj\n");
        b.obj(3, &records.len().to_string());
        assert!(matches!(build(&b.finish(x)), Err(Error::Unresolved { num: 3, .. })));
    }
}
