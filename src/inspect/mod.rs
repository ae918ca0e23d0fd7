//! Best-effort interpretation of stream payloads and other sections for display.
//!
//! Nothing here fails: a payload that cannot be interpreted the way its kind suggests is
//! reported with a warning and shown as raw data.

mod content;
mod describe;

pub use content::{Command, disassemble};
pub use describe::*;

use crate::base::*;
use crate::base::types::*;
use crate::parser::parse_xref_stream;
use crate::reader::ObjStm;

/// Text payloads longer than this are not shown.
pub const MAX_TEXT_LEN: usize = 32 * 1024;

/// How the decoded payload of a stream is presented.
#[derive(Debug, PartialEq)]
pub enum StreamView<'d> {
    /// Cross-reference stream entries.
    XRef(Vec<Subsection>),
    /// Objects packed in an object stream: number, offset relative to `/First` and the object.
    ObjStm(Vec<(ObjNum, Offset, Object)>),
    /// A disassembled content stream.
    Commands(Vec<Command>),
    /// Image data, not shown.
    Image,
    /// Payload containing bytes above 0x7F, not shown. Holds the length.
    Binary(usize),
    /// Text payload longer than [`MAX_TEXT_LEN`], not shown. Holds the length.
    LargeText(usize),
    /// Text payload.
    Text(&'d [u8]),
    /// Payload which could not be interpreted according to its kind.
    Raw(&'d [u8]),
}

/// Chooses the presentation for the payload of `obj` according to `kind` (as found by the
/// sweep) and, failing that, by its contents. `None` if `obj` is not a stream.
pub fn view_stream<'d>(obj: &'d ParsedObject, kind: Option<&str>, res: &impl Resolver) -> Option<StreamView<'d>> {
    let (dict, stream) = obj.stream_dict()?;
    let data = &stream.decoded[..];
    let view = match kind {
        Some("XRef") => match parse_xref_stream(dict, data, stream.offset) {
            Ok(sections) => StreamView::XRef(sections),
            Err(err) => {
                log::warn!("Showing xref stream {} undecoded: {err}", obj.oref);
                StreamView::Raw(&stream.raw)
            }
        },
        Some("ObjStm") => match unpack(obj, res) {
            Ok(objects) => StreamView::ObjStm(objects),
            Err(err) => {
                log::warn!("Showing object stream {} without unpacking: {err}", obj.oref);
                StreamView::Raw(data)
            }
        },
        Some("Content" | "XObject" | "XObject/Form") => match disassemble(data) {
            Ok(commands) => StreamView::Commands(commands),
            Err(err) => {
                log::warn!("Showing content stream {} without disassembly: {err}", obj.oref);
                StreamView::Raw(data)
            }
        },
        Some("XObject/Image") => StreamView::Image,
        _ if data.iter().any(|&c| c > 127) => StreamView::Binary(data.len()),
        _ if data.len() > MAX_TEXT_LEN => StreamView::LargeText(data.len()),
        _ => StreamView::Text(data)
    };
    Some(view)
}

fn unpack(obj: &ParsedObject, res: &impl Resolver) -> Result<Vec<(ObjNum, Offset, Object)>, Error> {
    ObjStm::parse(obj, res)?
        .objects()
        .map(|(num, offset, obj)| Ok((num, offset, obj?)))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn stream(entries: Vec<(&str, Object)>, data: &[u8]) -> ParsedObject {
        let dict = Dict::from(entries.into_iter().map(|(k, v)| (Name::from(k.as_bytes()), v)).collect::<Vec<_>>());
        ParsedObject {
            oref: ObjRef { num: 1, gen: 0 },
            offset: 0,
            value: Object::Dict(dict),
            stream: Some(StreamData { offset: 30, raw: data.to_vec(), decoded: data.to_vec() }),
        }
    }

    fn nums(vals: &[f64]) -> Object {
        Object::Array(vals.iter().copied().map(Object::Number).collect())
    }

    #[test]
    fn test_xref_view() {
        let obj = stream(vec![("Size", Object::Number(2.)), ("W", nums(&[1., 1., 1.]))], &[1, 100, 0, 1, 200, 0]);
        let Some(StreamView::XRef(sections)) = view_stream(&obj, Some("XRef"), &()) else { panic!() };
        assert_eq!(sections[0].iter().map(|(num, rec)| (num, *rec)).collect::<Vec<_>>(), vec![
            (0, Record::Used { gen: 0, offset: 100 }),
            (1, Record::Used { gen: 0, offset: 200 }),
        ]);

        let obj = stream(vec![("Size", Object::Number(2.))], &[1, 100, 0]);
        assert_eq!(view_stream(&obj, Some("XRef"), &()), Some(StreamView::Raw(&[1, 100, 0])));
    }

    #[test]
    fn test_objstm_view() {
        let obj = stream(vec![("N", Object::Number(2.)), ("First", Object::Number(8.))], b"4 0 5 2 1 /X");
        assert_eq!(view_stream(&obj, Some("ObjStm"), &()), Some(StreamView::ObjStm(vec![
            (4, 0, Object::Number(1.)),
            (5, 2, Object::new_name(b"X")),
        ])));

        let obj = stream(vec![("N", Object::Number(2.)), ("First", Object::Number(8.))], b"4 0 5 2 1 )");
        assert_eq!(view_stream(&obj, Some("ObjStm"), &()), Some(StreamView::Raw(b"4 0 5 2 1 )")));

        let obj = stream(vec![("N", Object::Number(1e18)), ("First", Object::Number(4.))], b"1 0 true");
        assert_eq!(view_stream(&obj, Some("ObjStm"), &()), Some(StreamView::Raw(b"1 0 true")));
    }

    #[test]
    fn test_content_view() {
        let obj = stream(vec![], b"0 0 m 10 10 l S");
        let Some(StreamView::Commands(cmds)) = view_stream(&obj, Some("Content"), &()) else { panic!() };
        assert_eq!(cmds.iter().map(|cmd| cmd.operator.as_str()).collect::<Vec<_>>(), vec!["m", "l", "S"]);

        let obj = stream(vec![], b"0 0 m 10 10 l S");
        assert_eq!(view_stream(&obj, None, &()), Some(StreamView::Text(b"0 0 m 10 10 l S")));

        let deep = format!("{} Do", "[".repeat(200_000));
        let obj = stream(vec![], deep.as_bytes());
        assert_eq!(view_stream(&obj, Some("Content"), &()), Some(StreamView::Raw(deep.as_bytes())));

        let obj = stream(vec![], b"0 0 m ) S");
        assert_eq!(view_stream(&obj, Some("XObject"), &()), Some(StreamView::Raw(b"0 0 m ) S")));
    }

    #[test]
    fn test_classification() {
        let obj = stream(vec![], b"\x89PNG");
        assert_eq!(view_stream(&obj, Some("XObject/Image"), &()), Some(StreamView::Image));
        assert_eq!(view_stream(&obj, Some("Metadata"), &()), Some(StreamView::Binary(4)));
        let big = vec![b'a'; MAX_TEXT_LEN + 1];
        let obj = stream(vec![], &big);
        assert_eq!(view_stream(&obj, None, &()), Some(StreamView::LargeText(MAX_TEXT_LEN + 1)));
        let obj = ParsedObject { stream: None, ..stream(vec![], b"") };
        assert_eq!(view_stream(&obj, None, &()), None);
    }
}
