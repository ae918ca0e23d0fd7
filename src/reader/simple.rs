use crate::base::*;
use crate::base::types::*;
use crate::parser::FileParser;

use super::base::BaseReader;
use super::chain;
use super::sweep::Sweep;

/// Allows finding and parsing objects in a PDF buffer through the cross-reference table.
///
/// Upon construction, the header and the file tail are validated and the complete table is
/// built from all revisions for a quick lookup. Objects are parsed anew on every request.
pub struct SimpleReader<'a> {
    base: BaseReader<'a>,
    /// The file header line.
    pub header: Header,
    /// The `startxref` value.
    pub entry: Offset,
    /// The unified cross-reference table.
    pub xref: XRefTable,
}

impl<'a> SimpleReader<'a> {
    /// Creates a `SimpleReader` over a complete file buffer.
    ///
    /// Returns with an error if the framing is not recognized or the cross-reference table is
    /// not found or damaged. Framing is checked before any object is read.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        let parser = FileParser::new(data);
        let header = parser.header()?;
        let entry = parser.entrypoint()?;
        let base = BaseReader::new(parser);
        let xref = chain::build_table(&base, entry)?;
        log::info!("Cross-reference table has {} entries", xref.len());
        Ok(Self { base, header, entry, xref })
    }

    pub fn data(&self) -> &'a [u8] {
        self.base.parser.data()
    }

    /// Iterates over all object numbers marked as used, in increasing number.
    ///
    /// Each object is parsed at the moment of retrieval, which can result in an [`Error`]. Such
    /// errors usually have no consequences for the subsequent objects, so the iterator can be used
    /// further.
    pub fn objects(&self) -> impl Iterator<Item = (ObjRef, Result<Object, Error>)> + '_ {
        self.xref.map.iter()
            .filter_map(move |(&num, rec)| match *rec {
                Record::Used { gen, offset } => {
                    let objref = ObjRef { num, gen };
                    Some((objref, self.base.read_uncompressed(offset, &objref, &self.xref).map(|obj| obj.value)))
                },
                Record::Compr { num_within, index } => {
                    let objref = ObjRef { num, gen: 0 };
                    Some((objref, self.base.read_compressed(num_within, index, &objref, &self.xref)))
                },
                Record::Free { .. } => None
            })
    }

    /// Reads the full record of an uncompressed object, including its stream payload if any.
    /// `Ok(None)` for objects which are free, compressed or not in the table.
    pub fn read_record(&self, objref: &ObjRef) -> Result<Option<ParsedObject>, Error> {
        match self.xref.get(objref.num) {
            Some(&Record::Used { offset, .. }) => self.base.read_uncompressed(offset, objref, &self.xref).map(Some),
            _ => Ok(None)
        }
    }

    /// Walks the buffer from the start, yielding top-level sections in file order.
    pub fn sweep(&self) -> Sweep<'_, 'a> {
        Sweep::new(self)
    }
}

impl Resolver for SimpleReader<'_> {
    fn resolve_ref(&self, objref: &ObjRef) -> Result<Object, Error> {
        self.base.resolve_ref(objref, &self.xref)
    }
}
