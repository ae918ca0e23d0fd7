use crate::base::Error;
use crate::base::types::*;

use super::cc::CharClass;

/// A read position over an immutable byte buffer.
///
/// All reads are bounds-checked: those that need data return [`Error::EndOfInput`] when the
/// buffer runs out, those that can legitimately come up empty return an `Option` or an empty
/// slice. Knows nothing of the object syntax beyond the whitespace and delimiter classes.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// A cursor over `data` positioned at `pos`.
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn offset(&self) -> Offset {
        self.pos as Offset
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn eof(&self) -> Error {
        Error::EndOfInput { offset: self.offset() }
    }

    pub fn read_char(&mut self) -> Result<u8, Error> {
        let c = self.peek_char().ok_or_else(|| self.eof())?;
        self.pos += 1;
        Ok(c)
    }

    pub fn peek_char(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Up to `count` bytes from the current position, without advancing.
    pub fn peek_chars(&self, count: usize) -> &'a [u8] {
        let start = self.pos.min(self.data.len());
        let end = self.pos.saturating_add(count).min(self.data.len());
        &self.data[start..end]
    }

    /// Reads up to the next CR, LF or CRLF, consuming the terminator but not returning it.
    /// Returns `None` at the end of the buffer.
    pub fn read_line(&mut self) -> Option<&'a [u8]> {
        if self.at_end() {
            return None;
        }
        let start = self.pos;
        let rest = &self.data[start..];
        match rest.iter().position(|&c| c == b'\r' || c == b'\n') {
            Some(len) => {
                self.pos = start + len + 1;
                if rest[len] == b'\r' && self.peek_char() == Some(b'\n') {
                    self.pos += 1;
                }
                Some(&rest[..len])
            },
            None => {
                self.pos = self.data.len();
                Some(rest)
            }
        }
    }

    /// Skips whitespace backwards from the current position, then reads the preceding line
    /// back to the previous CR/LF or the start of the buffer. The cursor is left at the start of
    /// the returned line, so that repeated calls walk the file's lines from the end.
    pub fn read_line_backwards(&mut self) -> &'a [u8] {
        let mut end = self.pos.min(self.data.len());
        while end > 0 && CharClass::is_space(self.data[end - 1]) {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && !matches!(self.data[start - 1], b'\r' | b'\n') {
            start -= 1;
        }
        self.pos = start;
        &self.data[start..end]
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], Error> {
        let end = self.pos.checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.eof())?;
        let ret = &self.data[self.pos..end];
        self.pos = end;
        Ok(ret)
    }

    /// Reads a big-endian unsigned integer stored in exactly `count` bytes (at most 8).
    pub fn read_fixed_width(&mut self, count: usize) -> Result<u64, Error> {
        debug_assert!(count <= 8);
        Ok(self.read_bytes(count)?
            .iter()
            .fold(0u64, |acc, &c| (acc << 8) | c as u64))
    }

    /// Consumes bytes while `cond` holds and returns them.
    pub fn read_while(&mut self, mut cond: impl FnMut(u8) -> bool) -> &'a [u8] {
        let start = self.pos.min(self.data.len());
        while self.peek_char().is_some_and(&mut cond) {
            self.pos += 1;
        }
        &self.data[start..self.pos.max(start)]
    }

    /// Skips whitespace, then reads regular characters up to a delimiter, whitespace or the end
    /// of the buffer.
    ///
    /// A whitespace terminator is consumed, except that of a CRLF pair only the CR is, leaving
    /// the LF for the next read. A delimiter terminator is left in place.
    pub fn read_keyword(&mut self) -> &'a [u8] {
        self.skip_whitespace();
        let keyword = self.read_while(CharClass::is_regular);
        if let Some(c) = self.peek_char() {
            if CharClass::is_space(c) {
                self.pos += 1;
            }
        }
        keyword
    }

    /// Skips whitespace and returns the next character without consuming it.
    pub fn skip_whitespace(&mut self) -> Option<u8> {
        self.read_while(CharClass::is_space);
        self.peek_char()
    }

    pub fn read_non_whitespace(&mut self) -> Result<u8, Error> {
        self.skip_whitespace();
        self.read_char()
    }

    pub fn advance(&mut self, count: usize) {
        self.pos = self.pos.saturating_add(count);
    }

    /// Steps back one position, undoing a single-character read.
    pub fn rewind(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn seek_to_end(&mut self) {
        self.pos = self.data.len();
    }

    /// Runs a speculative read. If `f` returns `None`, the position is restored to where it was
    /// before the call.
    pub fn checkpoint<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.pos;
        let ret = f(self);
        if ret.is_none() {
            self.pos = saved;
        }
        ret
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line() {
        let mut cur = ByteCursor::new(b"line 1\nline 2\rline 3\r\nline 4\n\rline 5");
        assert_eq!(cur.read_line().unwrap(), b"line 1");
        assert_eq!(cur.read_line().unwrap(), b"line 2");
        assert_eq!(cur.read_line().unwrap(), b"line 3");
        assert_eq!(cur.read_line().unwrap(), b"line 4");
        assert_eq!(cur.read_line().unwrap(), b"");
        assert_eq!(cur.read_line().unwrap(), b"line 5");
        assert!(cur.read_line().is_none());
    }

    #[test]
    fn test_read_line_backwards() {
        let mut cur = ByteCursor::new(b"%PDF-1.4\nstartxref\r\n123\r%%EOF \r\n\n");
        cur.seek_to_end();
        assert_eq!(cur.read_line_backwards(), b"%%EOF");
        assert_eq!(cur.read_line_backwards(), b"123");
        assert_eq!(cur.read_line_backwards(), b"startxref");
        assert_eq!(cur.read_line_backwards(), b"%PDF-1.4");
        assert_eq!(cur.pos(), 0);
        assert_eq!(cur.read_line_backwards(), b"");
    }

    #[test]
    fn test_read_keyword() {
        let mut cur = ByteCursor::new(b"  endstream\r\nendobj<<trailer");
        assert_eq!(cur.read_keyword(), b"endstream");
        assert_eq!(cur.peek_char(), Some(b'\n'));
        assert_eq!(cur.read_keyword(), b"endobj");
        assert_eq!(cur.peek_char(), Some(b'<'));
        assert_eq!(cur.read_keyword(), b"");
        cur.advance(2);
        assert_eq!(cur.read_keyword(), b"trailer");
        assert!(cur.at_end());
        assert_eq!(cur.read_keyword(), b"");
    }

    #[test]
    fn test_read_bytes() {
        let mut cur = ByteCursor::new(b"\x01\x02\x03\x04\x05");
        assert_eq!(cur.read_fixed_width(2).unwrap(), 0x0102);
        assert_eq!(cur.read_fixed_width(0).unwrap(), 0);
        assert_eq!(cur.read_bytes(2).unwrap(), b"\x03\x04");
        assert!(matches!(cur.read_bytes(2), Err(Error::EndOfInput { offset: 4 })));
        assert_eq!(cur.pos(), 4);
        assert_eq!(cur.read_char().unwrap(), 5);
        assert!(cur.read_char().is_err());
        assert!(cur.at_end());
    }

    #[test]
    fn test_peek_rewind() {
        let mut cur = ByteCursor::new(b" \t\nabc");
        assert_eq!(cur.read_non_whitespace().unwrap(), b'a');
        assert_eq!(cur.peek_chars(5), b"bc");
        cur.rewind();
        assert_eq!(cur.peek_char(), Some(b'a'));
        cur.seek(10);
        assert!(cur.at_end());
        assert_eq!(cur.peek_chars(2), b"");
        assert_eq!(cur.read_while(|_| true), b"");
    }

    #[test]
    fn test_checkpoint() {
        let mut cur = ByteCursor::new(b"12 0 obj");
        let res = cur.checkpoint(|cur| {
            cur.advance(3);
            None::<()>
        });
        assert!(res.is_none());
        assert_eq!(cur.pos(), 0);
        let res = cur.checkpoint(|cur| {
            cur.advance(3);
            Some(())
        });
        assert!(res.is_some());
        assert_eq!(cur.pos(), 3);
    }
}
