//! In-memory construction of small test documents with exact cross-reference data.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::base::types::*;

pub struct PdfBuilder {
    data: Vec<u8>,
    offsets: BTreeMap<ObjNum, Offset>,
}

impl PdfBuilder {
    /// Starts a document with a version line and a binary marker comment.
    pub fn new() -> Self {
        Self { data: b"%PDF-1.5\n%\xE2\xE3\xCF\xD3\n".to_vec(), offsets: BTreeMap::new() }
    }

    pub fn pos(&self) -> Offset {
        self.data.len() as Offset
    }

    pub fn offset(&self, num: ObjNum) -> Offset {
        self.offsets[&num]
    }

    pub fn raw(&mut self, bytes: &[u8]) -> Offset {
        let pos = self.pos();
        self.data.extend_from_slice(bytes);
        pos
    }

    /// Writes `num 0 obj <body> endobj`.
    pub fn obj(&mut self, num: ObjNum, body: &str) -> Offset {
        let pos = self.raw(format!("{num} 0 obj\n{body}\nendobj\n").as_bytes());
        self.offsets.insert(num, pos);
        pos
    }

    /// Writes a stream object. `entries` are added to the dictionary after a direct `/Length`.
    pub fn stream(&mut self, num: ObjNum, entries: &str, data: &[u8]) -> Offset {
        let pos = self.raw(format!("{num} 0 obj\n<< /Length {} {entries} >>\nstream\n", data.len()).as_bytes());
        self.raw(data);
        self.raw(b"\nendstream\nendobj\n");
        self.offsets.insert(num, pos);
        pos
    }

    /// Writes a text cross-reference table listing the given objects, with `0` standing for the
    /// head of the free list, followed by `trailer` and `trailer_dict`.
    pub fn xref_table(&mut self, nums: &[ObjNum], trailer_dict: &str) -> Offset {
        let mut text = String::from("xref\n");
        let mut nums = nums.to_vec();
        nums.sort();
        let mut runs: Vec<Vec<ObjNum>> = Vec::new();
        for num in nums {
            match runs.last_mut() {
                Some(run) if run.last() == Some(&(num - 1)) => run.push(num),
                _ => runs.push(vec![num])
            }
        }
        for run in runs {
            text += &format!("{} {}\n", run[0], run.len());
            for num in run {
                if num == 0 {
                    text += "0000000000 65535 f \n";
                } else {
                    text += &format!("{:010} 00000 n \n", self.offset(num));
                }
            }
        }
        text += &format!("trailer\n{trailer_dict}\n");
        self.raw(text.as_bytes())
    }

    pub fn finish(mut self, startxref: Offset) -> Vec<u8> {
        self.raw(format!("startxref\n{startxref}\n%%EOF\n").as_bytes());
        self.data
    }
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Packs cross-reference stream records with field widths `[1, 2, 1]`.
pub fn xref_stream_data(records: &[(u8, u16, u8)]) -> Vec<u8> {
    records.iter()
        .flat_map(|&(tpe, f1, f2)| [tpe, (f1 >> 8) as u8, f1 as u8, f2])
        .collect()
}
