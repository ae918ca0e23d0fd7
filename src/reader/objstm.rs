use crate::base::*;
use crate::base::types::*;
use crate::parser::{ByteCursor, ObjParser};
use crate::utils;

/// The unpacked header of an object stream (`/Type /ObjStm`), borrowing the decoded payload.
#[derive(Debug)]
pub struct ObjStm<'d> {
    /// Object numbers and their offsets relative to `/First`, in stream order.
    pub entries: Vec<(ObjNum, Offset)>,
    first: usize,
    data: &'d [u8],
}

impl<'d> ObjStm<'d> {
    /// Reads `/N` pairs of numbers from the part of the decoded payload before `/First`.
    pub fn parse(obj: &'d ParsedObject, res: &impl Resolver) -> Result<Self, Error> {
        let Some((dict, stream)) = obj.stream_dict() else {
            return Err(Error::syntax(obj.offset, "object stream must be a stream object"));
        };
        if dict.lookup(b"Type") != &Object::new_name(b"ObjStm") {
            log::warn!("Object stream {} is missing /Type /ObjStm", obj.oref);
        }
        let count = res.resolve_obj(dict.lookup(b"N"))?
            .num_value::<usize>()
            .ok_or_else(|| Error::missing(obj.offset, "malformed object stream (/N)"))?;
        let first = res.resolve_obj(dict.lookup(b"First"))?
            .num_value::<usize>()
            .ok_or_else(|| Error::missing(obj.offset, "malformed object stream (/First)"))?;
        let data = &stream.decoded[..];
        let header = data.get(..first)
            .ok_or_else(|| Error::missing(obj.offset, "/First points past the end of object stream data"))?;
        let mut cur = ByteCursor::new(header);
        // each pair takes at least four bytes of header
        let mut entries = Vec::with_capacity(count.min(header.len() / 4));
        for _ in 0..count {
            let pos = cur.pos();
            let num = utils::parse_digits::<ObjNum>(cur.read_keyword());
            let offset = utils::parse_digits::<Offset>(cur.read_keyword());
            let (Some(num), Some(offset)) = (num, offset) else {
                return Err(Error::syntax(stream.offset + pos as Offset, "malformed object stream header"));
            };
            entries.push((num, offset));
        }
        Ok(ObjStm { entries, first, data })
    }

    /// The offset of object `num`. The entry at position `index` is checked first, then the
    /// whole header is searched.
    pub fn locate(&self, num: ObjNum, index: ObjIndex) -> Option<Offset> {
        let by_index = usize::try_from(index).ok()
            .and_then(|index| self.entries.get(index))
            .filter(|&&(n, _)| n == num);
        by_index.or_else(|| self.entries.iter().find(|&&(n, _)| n == num))
            .map(|&(_, offset)| offset)
    }

    /// Parses the object found at `offset` past `/First`.
    pub fn object_at(&self, offset: Offset) -> Result<Object, Error> {
        let pos = usize::try_from(offset).ok()
            .and_then(|offset| offset.checked_add(self.first))
            .filter(|&pos| pos <= self.data.len())
            .ok_or(Error::EndOfInput { offset })?;
        let mut cur = ByteCursor::at(self.data, pos);
        ObjParser::read_obj(&mut cur)
    }

    /// All objects in stream order, each with its number and relative offset.
    pub fn objects(&self) -> impl Iterator<Item = (ObjNum, Offset, Result<Object, Error>)> + '_ {
        self.entries.iter()
            .map(|&(num, offset)| (num, offset, self.object_at(offset)))
    }
}
