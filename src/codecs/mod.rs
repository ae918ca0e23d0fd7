mod flate;
mod predictor;

use crate::base::*;
use crate::base::types::*;

pub use predictor::unfilter;

/// Supported PDF filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    /// `/FlateDecode`
    Flate,
}

impl TryFrom<&Name> for Filter {
    type Error = Error;

    fn try_from(name: &Name) -> Result<Filter, Error> {
        if name == b"FlateDecode" {
            Ok(Filter::Flate)
        } else {
            Err(Error::Unsupported { what: format!("filter \"{}\"", name.to_text()) })
        }
    }
}

/// Applies the stream dictionary's `/Filter` chain and `/DecodeParms` to `raw`.
///
/// Unsupported filters or predictors do not fail: the result is then a short placeholder text
/// saying what was not understood, in place of the rest of the decoding. All other errors are
/// returned. `offset` locates the stream data for diagnostics.
pub fn decode(raw: &[u8], dict: &Dict, res: &impl Resolver, offset: Offset) -> Result<Vec<u8>, Error> {
    match decode_inner(raw, dict, res, offset) {
        Err(Error::Unsupported { what }) => {
            log::warn!("Stream data at offset {offset}: don't know {what}");
            Ok(format!("(don't know {what})").into_bytes())
        },
        other => other
    }
}

fn decode_inner(raw: &[u8], dict: &Dict, res: &impl Resolver, offset: Offset) -> Result<Vec<u8>, Error> {
    let filter = res.resolve_obj(dict.lookup(b"Filter"))?;
    let mut data = raw.to_vec();
    for name in to_filters(&filter, res)? {
        data = apply_filter(&data, &name, offset)?;
    }
    let params = res.resolve_obj(dict.lookup(b"DecodeParms"))?;
    for params in wrap_array(params) {
        let params = res.resolve_obj(&params)?;
        data = apply_decoder(data, &params, res, offset)?;
    }
    Ok(data)
}

fn wrap_array(obj: Object) -> Vec<Object> {
    match obj {
        Object::Null => vec![],
        Object::Array(vec) => vec,
        obj => vec![obj]
    }
}

/// Resolves the value of `/Filter` into a list of filter names. Entries which are not names are
/// skipped.
fn to_filters(obj: &Object, res: &impl Resolver) -> Result<Vec<Name>, Error> {
    let mut names = Vec::new();
    for obj in wrap_array(obj.clone()) {
        match res.resolve_obj(&obj)? {
            Object::Name(name) => names.push(name),
            obj => log::warn!("Skipping /Filter entry {obj} which is not a name")
        }
    }
    Ok(names)
}

/// Applies a single named filter.
pub fn apply_filter(data: &[u8], name: &Name, offset: Offset) -> Result<Vec<u8>, Error> {
    match Filter::try_from(name)? {
        Filter::Flate => flate::inflate(data, offset)
    }
}

/// Applies a single `/DecodeParms` dictionary. Only the `/Predictor` entry is taken into account.
pub fn apply_decoder(data: Vec<u8>, params: &Object, res: &impl Resolver, offset: Offset) -> Result<Vec<u8>, Error> {
    let Object::Dict(params) = params else {
        return Ok(data);
    };
    let predictor = match res.resolve_obj(params.lookup(b"Predictor"))? {
        Object::Null => return Ok(data),
        obj => obj
    };
    match predictor.num_value::<i64>() {
        Some(1) => Ok(data),
        Some(pred) if pred >= 10 => {
            let cols = res.resolve_obj(params.lookup(b"Columns"))?
                .num_value::<usize>()
                .filter(|&cols| cols > 0)
                .unwrap_or(1);
            unfilter(&data, cols, offset)
        },
        _ => Err(Error::Unsupported { what: format!("how to decode predictor {predictor}") })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    struct Objects(BTreeMap<ObjNum, Object>);

    impl Resolver for Objects {
        fn resolve_ref(&self, objref: &ObjRef) -> Result<Object, Error> {
            Ok(self.0.get(&objref.num).cloned().unwrap_or(Object::Null))
        }
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn dict(entries: Vec<(&str, Object)>) -> Dict {
        Dict::from(entries.into_iter().map(|(k, v)| (Name::from(k.as_bytes()), v)).collect::<Vec<_>>())
    }

    fn params(predictor: f64, cols: f64) -> Object {
        Object::Dict(dict(vec![("Predictor", Object::Number(predictor)), ("Columns", Object::Number(cols))]))
    }

    #[test]
    fn test_no_filter() {
        assert_eq!(decode(b"abc", &Dict::default(), &(), 0).unwrap(), b"abc");
    }

    #[test]
    fn test_flate() {
        let raw = deflate(b"Hello, world!");
        let d = dict(vec![("Filter", Object::new_name(b"FlateDecode"))]);
        assert_eq!(decode(&raw, &d, &(), 0).unwrap(), b"Hello, world!");

        let raw = deflate(&deflate(b"twice"));
        let d = dict(vec![("Filter", Object::Array(vec![
            Object::new_name(b"FlateDecode"), Object::new_name(b"FlateDecode")]))]);
        assert_eq!(decode(&raw, &d, &(), 0).unwrap(), b"twice");

        let d = dict(vec![("Filter", Object::new_name(b"FlateDecode"))]);
        assert!(matches!(decode(b"not zlib", &d, &(), 7), Err(Error::Decode { offset: 7, .. })));
    }

    #[test]
    fn test_unknown_filter() {
        let d = dict(vec![("Filter", Object::Array(vec![
            Object::new_name(b"ASCII85Decode"), Object::new_name(b"FlateDecode")]))]);
        assert_eq!(decode(b"<~87cURD]i,\"Ebo80~>", &d, &(), 0).unwrap(), b"(don't know filter \"ASCII85Decode\")");
    }

    #[test]
    fn test_indirect() {
        let res = Objects(BTreeMap::from([
            (1, Object::new_name(b"FlateDecode")),
            (2, Object::Ref(ObjRef { num: 3, gen: 0 })),
            (3, params(12., 2.)),
        ]));
        let raw = deflate(&[2, 1, 2, 2, 1, 1]);
        let d = dict(vec![
            ("Filter", Object::Array(vec![Object::Ref(ObjRef { num: 1, gen: 0 })])),
            ("DecodeParms", Object::Ref(ObjRef { num: 2, gen: 0 })),
        ]);
        assert_eq!(decode(&raw, &d, &res, 0).unwrap(), vec![1, 2, 2, 3]);
    }

    #[test]
    fn test_decoder() {
        let data = vec![2, 10, 20, 30, 2, 5, 5, 5];
        assert_eq!(apply_decoder(data.clone(), &params(12., 3.), &(), 0).unwrap(), vec![10, 20, 30, 15, 25, 35]);
        assert_eq!(apply_decoder(data.clone(), &params(1., 3.), &(), 0).unwrap(), data);
        assert_eq!(apply_decoder(data.clone(), &Object::Null, &(), 0).unwrap(), data);
        assert_eq!(apply_decoder(data.clone(), &Object::Dict(Dict::default()), &(), 0).unwrap(), data);
        assert!(matches!(apply_decoder(data.clone(), &params(2., 3.), &(), 0),
            Err(Error::Unsupported { .. })));
        assert!(matches!(apply_decoder(data.clone(), &params(12., 4.), &(), 0),
            Err(Error::Decode { .. })));

        assert_eq!(apply_decoder(vec![], &params(12., 1e18), &(), 0).unwrap(), Vec::<u8>::new());
        assert!(matches!(apply_decoder(data.clone(), &params(12., 1e18), &(), 0),
            Err(Error::Decode { .. })));

        let d = dict(vec![("DecodeParms", params(2., 3.))]);
        assert_eq!(decode(&data, &d, &(), 0).unwrap(), b"(don't know how to decode predictor 2)");
        let d = dict(vec![("DecodeParms", Object::Array(vec![Object::Null, params(10., 0.)]))]);
        assert_eq!(decode(&[1, 5, 0, 6], &d, &(), 0).unwrap(), vec![5, 6]);
    }
}
