use super::*;
use super::types::*;

/// Maps object numbers to cross-reference records.
pub trait Locator {
    fn locate(&self, num: ObjNum) -> Option<Record>;
}

impl Locator for () {
    fn locate(&self, _num: ObjNum) -> Option<Record> {
        None
    }
}

impl Locator for XRefTable {
    fn locate(&self, num: ObjNum) -> Option<Record> {
        self.get(num).copied()
    }
}
