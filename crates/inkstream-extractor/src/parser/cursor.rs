//! Character cursor over possibly-truncated JSON text

/// Forward-only cursor over a `str`, always positioned on a char boundary
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

/// Result of reading four hex digits after `\u`
pub(crate) enum Hex4 {
    Value(u16),
    /// Input ended before four digits arrived
    Truncated,
    Invalid,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Consume characters until `stop` matches one (not consumed) or input ends.
    /// Returns the consumed slice and whether a stop character was reached.
    pub(crate) fn take_until(&mut self, stop: impl Fn(char) -> bool) -> (&'a str, bool) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if stop(c) {
                return (&self.src[start..self.pos], true);
            }
            self.pos += c.len_utf8();
        }
        (&self.src[start..], false)
    }

    pub(crate) fn hex4(&mut self) -> Hex4 {
        let rest = self.rest();
        let digits = rest
            .bytes()
            .take(4)
            .take_while(u8::is_ascii_hexdigit)
            .count();

        if digits == 4 {
            // ASCII hex digits, so the slice ends on a char boundary
            match u16::from_str_radix(&rest[..4], 16) {
                Ok(value) => {
                    self.pos += 4;
                    Hex4::Value(value)
                }
                Err(_) => Hex4::Invalid,
            }
        } else if digits == rest.len() {
            Hex4::Truncated
        } else {
            Hex4::Invalid
        }
    }
}
