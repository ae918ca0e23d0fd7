use super::*;

/// The maximum number of indirections followed by [`Resolver::resolve_obj()`].
pub const MAX_HOPS: usize = 100;

/// This trait provides means of resolving indirect object references ([`ObjRef`]) into the
/// actual [`Object`]s.
pub trait Resolver {
    /// Resolves an [`ObjRef`] into an owned [`Object`], following a single indirection. The
    /// result may itself be an [`Object::Ref`].
    fn resolve_ref(&self, objref: &ObjRef) -> Result<Object, Error>;

    /// For an [`Object::Ref`], follows references until a direct object is reached, otherwise
    /// returns a copy of `obj`. Fails after [`MAX_HOPS`] indirections.
    fn resolve_obj(&self, obj: &Object) -> Result<Object, Error> {
        let mut obj = match obj {
            Object::Ref(objref) => self.resolve_ref(objref)?,
            _ => return Ok(obj.clone())
        };
        for _ in 1..MAX_HOPS {
            match obj {
                Object::Ref(objref) => obj = self.resolve_ref(&objref)?,
                _ => return Ok(obj)
            }
        }
        match obj {
            Object::Ref(objref) => Err(Error::Unresolved {
                num: objref.num,
                detail: format!("gave up after following {MAX_HOPS} references")
            }),
            obj => Ok(obj)
        }
    }
}

impl Resolver for () {
    fn resolve_ref(&self, objref: &ObjRef) -> Result<Object, Error> {
        Err(Error::Unresolved { num: objref.num, detail: "no cross-reference table available".into() })
    }
}
