use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::*;
use super::types::*;

/// A single record in a cross-reference table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record {
    /// An uncompressed object (`n` entry, type 1 in xref streams).
    Used {
        /// The generation number.
        gen: ObjGen,
        /// Location of the object header in the file.
        offset: Offset,
    },
    /// An object number marked as free (`f` entry, type 0 in xref streams).
    Free {
        /// The generation number to be used if this object number is reused for a new object.
        gen: ObjGen,
        /// The next number in the free object list.
        next: ObjNum,
    },
    /// An object which is stored compressed within an object stream (type 2 in xref streams).
    Compr {
        /// The object number of the object stream.
        num_within: ObjNum,
        /// 0-based order of this compressed object within the object stream.
        index: ObjIndex,
    },
}

/// A run of consecutive object numbers within one revision.
///
/// A `None` slot stands for a cross-reference stream record of an unknown type: the object
/// number is consumed but no entry is provided for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Subsection {
    pub start: ObjNum,
    pub records: Vec<Option<Record>>,
}

impl Subsection {
    pub fn count(&self) -> ObjNum {
        self.records.len() as ObjNum
    }

    /// Iterates over the provided entries along with their object numbers.
    pub fn iter(&self) -> impl Iterator<Item = (ObjNum, &Record)> + '_ {
        (self.start..).zip(&self.records)
            .filter_map(|(num, rec)| Some((num, rec.as_ref()?)))
    }
}

/// The format in which a revision's table appears in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum XRefType {
    /// Classical table (`xref ... trailer << ... >>`)
    Table,
    /// A cross-reference stream (`<< /Type/XRef ... >> stream ... endstream`)
    Stream(ObjRef)
}

/// One revision's cross-reference section: a text table with its trailer, or a cross-reference
/// stream with its dictionary.
#[derive(Debug, Clone)]
pub struct XRef {
    pub tpe: XRefType,
    pub sections: Vec<Subsection>,
    /// The trailer dictionary (for [`XRefType::Table`]) or the cross-reference stream dictionary
    /// (for [`XRefType::Stream`]).
    pub dict: Dict,
}

impl XRef {
    /// The `/Prev` pointer of this revision. `Ok(None)` if absent or zero.
    pub fn prev(&self) -> Result<Option<Offset>, Error> {
        Self::pointer(&self.dict, b"Prev")
    }

    /// The `/XRefStm` pointer of a hybrid file's text table. `Ok(None)` if absent or zero.
    pub fn xref_stm(&self) -> Result<Option<Offset>, Error> {
        Self::pointer(&self.dict, b"XRefStm")
    }

    fn pointer(dict: &Dict, key: &[u8]) -> Result<Option<Offset>, Error> {
        match dict.lookup(key) {
            Object::Null => Ok(None),
            obj => match obj.num_value::<Offset>() {
                Some(0) => Ok(None),
                Some(offset) => Ok(Some(offset)),
                None => Err(Error::missing(0, format!("/{} must be a non-negative integer, found {obj}",
                    String::from_utf8_lossy(key))))
            }
        }
    }

    fn flatten(sections: Vec<Subsection>) -> BTreeMap<ObjNum, Record> {
        let mut map = BTreeMap::new();
        for (num, rec) in sections.iter().flat_map(Subsection::iter) {
            match map.entry(num) {
                Entry::Vacant(entry) => { entry.insert(*rec); },
                Entry::Occupied(_) => log::warn!("Duplicate object number {num} in xref section")
            }
        }
        map
    }
}

/// The unified cross-reference table, folded from all revisions reachable from `startxref`.
#[derive(Debug, Clone, Default)]
pub struct XRefTable {
    /// The mapping itself.
    pub map: BTreeMap<ObjNum, Record>,
    /// The trailer (or xref stream) dictionary of the newest revision.
    pub trailer: Dict,
}

impl XRefTable {
    pub fn get(&self, num: ObjNum) -> Option<&Record> {
        self.map.get(&num)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Fills in entries missing from this table by those from an older revision `prev`. An entry
    /// already present always has preference. The trailer of `prev` is ignored.
    pub fn merge_prev(&mut self, prev: XRef) {
        let mut map = XRef::flatten(prev.sections);
        map.append(&mut self.map);
        self.map = map;
    }
}

impl From<XRef> for XRefTable {
    fn from(xref: XRef) -> XRefTable {
        XRefTable { map: XRef::flatten(xref.sections), trailer: xref.dict }
    }
}
