use crate::base::*;
use crate::base::types::*;
use crate::codecs;
use crate::utils;

use super::cc::CharClass;
use super::cursor::ByteCursor;
use super::op::{ObjParser, TypeHints};

/// File-level syntax: the framing lines, indirect object records with their stream payloads, and
/// cross-reference sections in both text and stream form.
///
/// Every read starts from a fresh [`ByteCursor`], so calls are independent of each other and may
/// nest (as happens when a stream's `/Length` is itself an indirect object).
#[derive(Debug, Clone, Copy)]
pub struct FileParser<'a> {
    data: &'a [u8],
}

impl<'a> FileParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// A cursor positioned at `pos`.
    pub fn cursor_at(&self, pos: Offset) -> Result<ByteCursor<'a>, Error> {
        let pos = usize::try_from(pos).map_err(|_| Error::EndOfInput { offset: pos })?;
        Ok(ByteCursor::at(self.data, pos))
    }

    /// Validates the first line of the file, `%SIGNATURE-major.minor`.
    pub fn header(&self) -> Result<Header, Error> {
        let err = || Error::Framing { offset: 0, detail: "not a recognized version".into() };
        let line = ByteCursor::new(self.data).read_line().ok_or_else(err)?;
        let rest = utils::trim_end(line).strip_prefix(b"%").ok_or_else(err)?;
        let dash = rest.iter().position(|&c| c == b'-').ok_or_else(err)?;
        let (signature, version) = (&rest[..dash], &rest[(dash + 1)..]);
        let dot = version.iter().position(|&c| c == b'.').ok_or_else(err)?;
        let major = utils::parse_digits(&version[..dot]).ok_or_else(err)?;
        let minor = utils::parse_digits(&version[(dot + 1)..]).ok_or_else(err)?;
        let header = Header { signature: utils::latin1(signature), version: (major, minor) };
        log::info!("{} version {major}.{minor}", header.signature);
        Ok(header)
    }

    /// Reads the `startxref` value from the last three lines of the file: `startxref`, the
    /// number and `%%EOF`.
    pub fn entrypoint(&self) -> Result<Offset, Error> {
        let mut cur = ByteCursor::new(self.data);
        cur.seek_to_end();
        let framing = |cur: &ByteCursor, detail: &str| Error::Framing { offset: cur.offset(), detail: detail.into() };

        if cur.read_line_backwards() != b"%%EOF" {
            return Err(framing(&cur, "file does not end with %%EOF"));
        }
        let value = cur.read_line_backwards();
        let value_cur = cur.clone();
        if cur.read_line_backwards().trim_ascii() != b"startxref" {
            return Err(framing(&cur, "couldn't find startxref keyword on the third-to-last line"));
        }
        let value = utils::parse_num::<i64>(value.trim_ascii())
            .ok_or_else(|| framing(&value_cur, "malformed startxref value"))?;
        if value < 1 {
            return Err(framing(&value_cur, "invalid startxref value"));
        }
        Ok(value as Offset)
    }

    /// Reads the indirect object whose `N G obj` header starts at `pos`.
    pub fn read_obj_at(&self, pos: Offset, res: &impl Resolver) -> Result<ParsedObject, Error> {
        let mut cur = self.cursor_at(pos)?;
        Self::read_record(&mut cur, res, None)
    }

    /// Reads an indirect object record: the header line, the value and, for a dictionary followed
    /// by `stream`, the payload up to and including `endstream`. The closing `endobj` is not
    /// consumed.
    ///
    /// `res` resolves an indirect `/Length` and the filter parameters. If `hints` is given,
    /// references under hinting keys are recorded there.
    pub fn read_record(cur: &mut ByteCursor<'a>, res: &impl Resolver, hints: Option<&mut TypeHints>)
        -> Result<ParsedObject, Error>
    {
        cur.skip_whitespace();
        let offset = cur.offset();
        let oref = Self::read_obj_header(cur)?;
        let value = match hints {
            Some(hints) => ObjParser::new(cur).with_hints(hints).parse()?,
            None => ObjParser::new(cur).parse()?
        };
        cur.skip_whitespace();
        let stream = match &value {
            Object::Dict(dict) if cur.peek_chars(6) == b"stream" => {
                cur.advance(6);
                let eol_offset = cur.pos();
                let eol_ok = match cur.read_char()? {
                    b'\n' => true,
                    b'\r' => cur.read_char()? == b'\n',
                    _ => false
                };
                if !eol_ok {
                    return Err(Error::syntax(eol_offset,
                        "stream keyword must be followed by either a line feed or a carriage return and line feed"));
                }
                Some(Self::read_stream(cur, dict, res)?)
            },
            _ => None
        };
        Ok(ParsedObject { oref, offset, value, stream })
    }

    /// Reads `N G obj`.
    pub fn read_obj_header(cur: &mut ByteCursor<'a>) -> Result<ObjRef, Error> {
        let offset = cur.pos();
        let err = || Error::syntax(offset, "invalid object header line");
        cur.skip_whitespace();
        let num = utils::parse_digits(cur.read_while(|c| c.is_ascii_digit())).ok_or_else(err)?;
        if cur.read_while(CharClass::is_space).is_empty() {
            return Err(err());
        }
        let gen = utils::parse_digits(cur.read_while(|c| c.is_ascii_digit())).ok_or_else(err)?;
        if cur.read_while(CharClass::is_space).is_empty() {
            return Err(err());
        }
        if cur.read_keyword() != b"obj" {
            return Err(err());
        }
        Ok(ObjRef { num, gen })
    }

    fn read_stream(cur: &mut ByteCursor<'a>, dict: &Dict, res: &impl Resolver) -> Result<StreamData, Error> {
        let offset = cur.offset();
        let length = res.resolve_obj(dict.lookup(b"Length"))?;
        let len = match length.num_value::<usize>() {
            Some(len) if len > 0 => len,
            _ => return Err(Error::missing(offset,
                format!("stream /Length must be a positive integer, found {length}")))
        };
        let raw = cur.read_bytes(len)?.to_vec();
        let kw_offset = cur.offset();
        let kw = cur.read_keyword();
        if kw != b"endstream" {
            return Err(Error::UnexpectedKeyword { offset: kw_offset, expected: "endstream", found: utils::latin1(kw) });
        }
        let decoded = codecs::decode(&raw, dict, res, offset)?;
        Ok(StreamData { offset, raw, decoded })
    }

    /// Reads the subsections of a text cross-reference table. The cursor should be right after
    /// the `xref` keyword. Stops before the first line not starting with a digit.
    pub fn read_xref_sections(cur: &mut ByteCursor<'a>) -> Result<Vec<Subsection>, Error> {
        let mut sections = Vec::new();
        while cur.skip_whitespace().is_some_and(|c| c.is_ascii_digit()) {
            let line_offset = cur.pos();
            let line = utils::trim_end(cur.read_line().unwrap_or_default());
            let (start, count) = line.iter()
                .position(|&c| c == b' ')
                .and_then(|sp| Some((
                    utils::parse_digits::<ObjNum>(&line[..sp])?,
                    utils::parse_digits::<ObjNum>(&line[(sp + 1)..])?
                )))
                .ok_or_else(|| Error::syntax(line_offset, "invalid xref subsection header"))?;
            let mut records = Vec::new();
            for _ in 0..count {
                let entry_offset = cur.offset();
                let line = cur.read_line().ok_or(Error::EndOfInput { offset: entry_offset })?;
                let rec = Self::parse_xref_entry(utils::trim_end(line))
                    .ok_or_else(|| Error::syntax(entry_offset, "invalid xref line"))?;
                records.push(Some(rec));
            }
            sections.push(Subsection { start, records });
        }
        Ok(sections)
    }

    /// `oooooooooo ggggg n` or `... f`
    fn parse_xref_entry(line: &[u8]) -> Option<Record> {
        if line.len() != 18 || line[10] != b' ' || line[16] != b' ' {
            return None;
        }
        let value = utils::parse_digits(&line[0..10])?;
        let gen = utils::parse_digits(&line[11..16])?;
        match line[17] {
            b'n' => Some(Record::Used { gen, offset: value }),
            b'f' => Some(Record::Free { gen, next: value }),
            _ => None
        }
    }

    /// Reads one revision's cross-reference section at `pos`: either a text table with its
    /// trailer, or a cross-reference stream object.
    pub fn read_xref_at(&self, pos: Offset, res: &impl Resolver) -> Result<XRef, Error> {
        let mut cur = self.cursor_at(pos)?;
        match cur.peek_char() {
            Some(b'x') => {
                let kw = cur.read_keyword();
                if kw != b"xref" {
                    return Err(Error::UnexpectedKeyword { offset: pos, expected: "xref", found: utils::latin1(kw) });
                }
                let sections = Self::read_xref_sections(&mut cur)?;
                cur.skip_whitespace();
                let kw_offset = cur.offset();
                let kw = cur.read_keyword();
                if kw != b"trailer" {
                    return Err(Error::UnexpectedKeyword { offset: kw_offset, expected: "trailer", found: utils::latin1(kw) });
                }
                let dict = ObjParser::read_obj(&mut cur)?
                    .into_dict()
                    .ok_or_else(|| Error::syntax(kw_offset, "trailer must be a dictionary"))?;
                Ok(XRef { tpe: XRefType::Table, sections, dict })
            },
            Some(b'0'..=b'9') => {
                let ParsedObject { oref, value, stream, .. } = Self::read_record(&mut cur, res, None)?;
                let (Object::Dict(dict), Some(stream)) = (value, stream) else {
                    return Err(Error::syntax(pos, "xref objects must be stream dictionaries"));
                };
                if dict.lookup(b"Type") != &Object::new_name(b"XRef") {
                    return Err(Error::syntax(pos, "object pointed to by startxref or /Prev does not have /Type /XRef"));
                }
                let sections = parse_xref_stream(&dict, &stream.decoded, stream.offset)?;
                Ok(XRef { tpe: XRefType::Stream(oref), sections, dict })
            },
            Some(_) => Err(Error::syntax(pos, "need an xref keyword or xref object")),
            None => Err(Error::EndOfInput { offset: pos })
        }
    }
}

/// Interprets the decoded payload of a cross-reference stream according to its dictionary's
/// `/Size`, `/W` and `/Index`. `offset` locates the stream in the file for error reporting;
/// read failures report offsets relative to `data`.
pub fn parse_xref_stream(dict: &Dict, data: &[u8], offset: Offset) -> Result<Vec<Subsection>, Error> {
    let size = match dict.lookup(b"Size").num_value::<ObjNum>() {
        Some(size) if size > 0 => size,
        _ => return Err(Error::missing(offset, "/Size must be a positive integer for XRef objects"))
    };
    let w: [usize; 3] = dict.lookup(b"W")
        .as_array()
        .and_then(|arr| arr.iter()
            .map(|obj| obj.num_value::<usize>().filter(|&w| w <= 8))
            .collect::<Option<Vec<_>>>())
        .and_then(|vec| vec.try_into().ok())
        .ok_or_else(|| Error::missing(offset, "/W must be an array of three field widths for XRef objects"))?;
    if w.iter().sum::<usize>() == 0 {
        return Err(Error::missing(offset, "/W must not be all zeros for XRef objects"));
    }
    let index = match dict.lookup(b"Index") {
        Object::Null => vec![0, size],
        obj => obj.as_array()
            .and_then(|arr| arr.iter().map(Object::num_value::<ObjNum>).collect::<Option<Vec<_>>>())
            .ok_or_else(|| Error::missing(offset, "/Index must be an array of integers for XRef objects"))?
    };
    if index.is_empty() || index.len() % 2 != 0 {
        return Err(Error::missing(offset,
            "there must be a positive even number of elements in the /Index array for XRef objects"));
    }

    fn field(cur: &mut ByteCursor, width: usize, default: u64) -> Result<u64, Error> {
        if width > 0 { cur.read_fixed_width(width) } else { Ok(default) }
    }

    let mut cur = ByteCursor::new(data);
    let mut sections = Vec::new();
    for pair in index.chunks_exact(2) {
        let (start, count) = (pair[0], pair[1]);
        let mut records = Vec::new();
        for _ in 0..count {
            let tpe = field(&mut cur, w[0], 1)?;
            let f1 = field(&mut cur, w[1], 0)?;
            let f2 = field(&mut cur, w[2], if tpe == 0 { 65536 } else { 0 })?;
            records.push(match tpe {
                0 => Some(Record::Free { next: f1, gen: f2 }),
                1 => Some(Record::Used { offset: f1, gen: f2 }),
                2 => Some(Record::Compr { num_within: f1, index: f2 }),
                _ => None
            });
        }
        sections.push(Subsection { start, records });
    }
    Ok(sections)
}
