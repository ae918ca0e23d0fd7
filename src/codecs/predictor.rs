use crate::base::Error;
use crate::base::types::*;

/// Reverses PNG row filtering. Each row of the input is a filter tag byte followed by `cols`
/// data bytes.
///
/// Only the None, Sub and Up row filters are supported. For Sub, the byte left of column 0 is
/// taken as zero. For Up, the row above the first one is taken as all zeros.
pub fn unfilter(data: &[u8], cols: usize, offset: Offset) -> Result<Vec<u8>, Error> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let width = cols.checked_add(1)
        .ok_or_else(|| Error::Decode { offset, detail: format!("invalid /Columns {cols}") })?;
    if width > data.len() || data.len() % width != 0 {
        return Err(Error::Decode { offset, detail: format!(
            "data length is not divisible by specified columns plus 1 ({} / {width})", data.len()) });
    }
    let mut out = Vec::with_capacity(data.len() / width * cols);
    let mut prev_row = vec![0u8; cols];
    for enc_row in data.chunks_exact(width) {
        let (enc, in_row) = (enc_row[0], &enc_row[1..]);
        let mut new_row = Vec::with_capacity(cols);
        match enc {
            0 => new_row.extend_from_slice(in_row),
            1 => {
                let mut out_val = 0u8;
                for &in_val in in_row {
                    out_val = out_val.wrapping_add(in_val);
                    new_row.push(out_val);
                }
            },
            2 => {
                for (&old_val, &in_val) in std::iter::zip(&prev_row, in_row) {
                    new_row.push(old_val.wrapping_add(in_val));
                }
            },
            _ => return Err(Error::Decode { offset, detail: format!("don't know how to decode PNG row filter {enc}") })
        }
        out.extend_from_slice(&new_row);
        prev_row = new_row;
    }
    Ok(out)
}
