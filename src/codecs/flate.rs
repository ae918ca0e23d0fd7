use std::io::Read;
use flate2::bufread::ZlibDecoder;

use crate::base::Error;
use crate::base::types::*;

pub fn inflate(data: &[u8], offset: Offset) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|err| Error::Decode { offset, detail: format!("inflate failed: {err}") })?;
    Ok(out)
}
