use std::cell::Cell;

use crate::base::*;
use crate::base::types::*;
use crate::parser::FileParser;

use super::objstm::ObjStm;

/// Locates and parses objects on demand. Holds no cache: every dereference reads the object anew
/// from the buffer.
pub struct BaseReader<'a> {
    pub parser: FileParser<'a>,
    depth: Cell<usize>,
}

struct DepthGuard<'r>(&'r Cell<usize>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl<'a> BaseReader<'a> {
    pub fn new(parser: FileParser<'a>) -> Self {
        Self { parser, depth: Cell::new(0) }
    }

    /// Bounds the nesting of dereferences which happen while another one is in progress, like an
    /// indirect `/Length` of a stream, or the container of a compressed object.
    fn enter(&self, num: ObjNum) -> Result<DepthGuard<'_>, Error> {
        let depth = self.depth.get();
        if depth >= MAX_HOPS {
            return Err(Error::Unresolved { num, detail: format!("dereferences nested more than {MAX_HOPS} levels deep") });
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard(&self.depth))
    }

    /// Reads one revision's cross-reference section. Indirect objects needed for that (like an
    /// xref stream's `/Length`) are looked up using `locator`.
    pub fn read_xref_at(&self, offset: Offset, locator: &dyn Locator) -> Result<XRef, Error> {
        let res = BorrowedResolver { reader: self, locator };
        self.parser.read_xref_at(offset, &res)
    }

    /// Follows a single indirection. An entry marked as free gives [`Object::Null`], an object
    /// number not covered by `locator` is an error.
    pub fn resolve_ref(&self, objref: &ObjRef, locator: &dyn Locator) -> Result<Object, Error> {
        match locator.locate(objref.num) {
            Some(Record::Used { offset, .. }) => Ok(self.read_uncompressed(offset, objref, locator)?.value),
            Some(Record::Compr { num_within, index }) => self.read_compressed(num_within, index, objref, locator),
            Some(Record::Free { .. }) => Ok(Object::Null),
            None => Err(Error::Unresolved {
                num: objref.num,
                detail: "couldn't find that object in the xref tables".into()
            })
        }
    }

    /// Reads the object record at `offset`, which is expected to be `objref`. A different number
    /// in the header is only reported as a warning.
    pub fn read_uncompressed(&self, offset: Offset, objref: &ObjRef, locator: &dyn Locator) -> Result<ParsedObject, Error> {
        let _guard = self.enter(objref.num)?;
        let res = BorrowedResolver { reader: self, locator };
        let obj = self.parser.read_obj_at(offset, &res)?;
        if obj.oref.num != objref.num {
            log::warn!("Object number mismatch: expected {objref} at offset {offset}, found {}", obj.oref);
        }
        Ok(obj)
    }

    /// Reads object `objref` from the object stream `num_within`, trying the position `index`
    /// first and searching the stream's header if that does not match.
    pub fn read_compressed(&self, num_within: ObjNum, index: ObjIndex, objref: &ObjRef, locator: &dyn Locator) -> Result<Object, Error> {
        let _guard = self.enter(objref.num)?;
        let Some(Record::Used { offset, gen }) = locator.locate(num_within) else {
            return Err(Error::Unresolved {
                num: objref.num,
                detail: format!("object stream {num_within} not located")
            });
        };
        let container = self.read_uncompressed(offset, &ObjRef { num: num_within, gen }, locator)?;
        let objstm = ObjStm::parse(&container, &BorrowedResolver { reader: self, locator })?;
        let Some(start) = objstm.locate(objref.num, index) else {
            return Err(Error::Unresolved {
                num: objref.num,
                detail: format!("couldn't find the offset in object stream {num_within}")
            });
        };
        objstm.object_at(start)
    }
}

/// Binds a [`BaseReader`] to a [`Locator`] to form a [`Resolver`].
pub(crate) struct BorrowedResolver<'r, 'a> {
    pub reader: &'r BaseReader<'a>,
    pub locator: &'r dyn Locator,
}

impl Resolver for BorrowedResolver<'_, '_> {
    fn resolve_ref(&self, objref: &ObjRef) -> Result<Object, Error> {
        self.reader.resolve_ref(objref, self.locator)
    }
}
