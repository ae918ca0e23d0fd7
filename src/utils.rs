pub fn parse_num<T: std::str::FromStr>(bstr: &[u8]) -> Option<T> {
    std::str::from_utf8(bstr).ok()?
        .parse::<T>().ok()
}

/// Like [`parse_num()`], but only accepts a non-empty run of ASCII digits (no sign, no
/// whitespace).
pub fn parse_digits<T: std::str::FromStr>(bstr: &[u8]) -> Option<T> {
    if bstr.is_empty() || !bstr.iter().all(u8::is_ascii_digit) {
        return None;
    }
    parse_num(bstr)
}

pub fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None
    }
}

pub fn trim_end(bstr: &[u8]) -> &[u8] {
    use crate::parser::cc::CharClass;
    let end = bstr.iter()
        .rposition(|&c| CharClass::of(c) != CharClass::Space)
        .map_or(0, |pos| pos + 1);
    &bstr[..end]
}

/// Bytes as Latin-1 text.
pub fn latin1(bstr: &[u8]) -> String {
    bstr.iter().map(|&c| c as char).collect()
}
