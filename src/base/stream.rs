use super::*;
use super::types::*;

/// An indirect object as read from the file: the `N G obj` header, its value and, for streams,
/// the payload.
#[derive(Debug, PartialEq, Clone)]
pub struct ParsedObject {
    /// Object number and generation from the header line.
    pub oref: ObjRef,
    /// Offset of the header line within the buffer the object was read from.
    pub offset: Offset,
    /// The object's value. For streams, this is the stream dictionary.
    pub value: Object,
    /// Present iff the value is a dictionary followed by the `stream` keyword.
    pub stream: Option<StreamData>,
}

impl ParsedObject {
    /// The stream dictionary, if this object is a stream.
    pub fn stream_dict(&self) -> Option<(&Dict, &StreamData)> {
        match (&self.value, &self.stream) {
            (Object::Dict(dict), Some(data)) => Some((dict, data)),
            _ => None
        }
    }
}

/// The payload of a stream object.
#[derive(Debug, PartialEq, Clone)]
pub struct StreamData {
    /// Offset of the first payload byte (right after the EOL following `stream`).
    pub offset: Offset,
    /// The payload exactly as stored, `/Length` bytes.
    pub raw: Vec<u8>,
    /// The payload after applying `/Filter` and `/DecodeParms`, or a placeholder text if those
    /// are not supported.
    pub decoded: Vec<u8>,
}
