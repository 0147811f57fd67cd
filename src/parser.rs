//! One-pass template parser: turns `"text {0:>5} more"` into a stream of
//! [`Event`]s without ever materializing them as a `Vec`. The engine drives
//! this by calling [`Parser::next_event`] in a loop.

use crate::arg::ArgRef;
use crate::error::FormatError;
use crate::spec::{Align, DynValue, RawFormatSpec, Sign};

#[derive(Debug)]
pub enum Event<'a> {
    Text(&'a str),
    Field {
        arg: ArgRef<'a>,
        spec: RawFormatSpec<'a>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum IndexMode {
    Unset,
    Auto(usize),
    Manual,
}

impl IndexMode {
    fn auto(&mut self) -> Result<usize, FormatError> {
        match *self {
            Self::Unset => {
                *self = Self::Auto(1);
                Ok(0)
            }
            Self::Auto(n) => {
                *self = Self::Auto(n + 1);
                Ok(n)
            }
            Self::Manual => Err(FormatError::IndexingMode(
                "cannot switch from manual to automatic argument indexing",
            )),
        }
    }

    fn manual(&mut self) -> Result<(), FormatError> {
        match *self {
            Self::Unset => {
                *self = Self::Manual;
                Ok(())
            }
            Self::Manual => Ok(()),
            Self::Auto(_) => Err(FormatError::IndexingMode(
                "cannot switch from automatic to manual argument indexing",
            )),
        }
    }
}

pub struct Parser<'a> {
    template: &'a str,
    pos: usize,
    mode: IndexMode,
}

impl<'a> Parser<'a> {
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            pos: 0,
            mode: IndexMode::Unset,
        }
    }

    pub fn next_event(&mut self) -> Result<Option<Event<'a>>, FormatError> {
        let bytes = self.template.as_bytes();
        if self.pos >= bytes.len() {
            return Ok(None);
        }

        let start = self.pos;
        while self.pos < bytes.len() && bytes[self.pos] != b'{' && bytes[self.pos] != b'}' {
            self.pos += 1;
        }
        if self.pos > start {
            return Ok(Some(Event::Text(&self.template[start..self.pos])));
        }

        match bytes[self.pos] {
            b'{' => {
                if bytes.get(self.pos + 1) == Some(&b'{') {
                    self.pos += 2;
                    Ok(Some(Event::Text(&self.template[start..start + 1])))
                } else {
                    self.pos += 1;
                    match self.parse_field() {
                        Ok(event) => Ok(Some(event)),
                        // Running out of input before a field's closing `}`
                        // takes precedence over whatever inner error the
                        // partial field produced.
                        Err(_) if self.pos >= bytes.len() => {
                            Err(FormatError::TemplateSyntax("unmatched '{' in format"))
                        }
                        Err(e) => Err(e),
                    }
                }
            }
            b'}' => {
                if bytes.get(self.pos + 1) == Some(&b'}') {
                    self.pos += 2;
                    Ok(Some(Event::Text(&self.template[start..start + 1])))
                } else {
                    Err(FormatError::TemplateSyntax("unmatched '}' in format string"))
                }
            }
            _ => unreachable!("loop above only stops at '{' or '}'"),
        }
    }

    /// Parses everything between an already-consumed opening `{` and its
    /// closing `}`.
    fn parse_field(&mut self) -> Result<Event<'a>, FormatError> {
        let arg = self.parse_arg_ref(&[b':', b'}'])?;
        match self.peek_byte() {
            Some(b'}') => {
                self.pos += 1;
                Ok(Event::Field {
                    arg,
                    spec: RawFormatSpec::default(),
                })
            }
            Some(b':') => {
                self.pos += 1;
                let spec = self.parse_format_spec()?;
                match self.peek_byte() {
                    Some(b'}') => {
                        self.pos += 1;
                        Ok(Event::Field { arg, spec })
                    }
                    _ => Err(FormatError::TemplateSyntax("missing '}' in format string")),
                }
            }
            _ => Err(FormatError::TemplateSyntax("invalid format string")),
        }
    }

    /// Parses an `arg_id`: empty (automatic), a decimal index (manual), or
    /// an identifier (named). Leaves `self.pos` right after the id, without
    /// consuming whatever terminator follows. The empty form is only valid
    /// when immediately followed by one of `terminators` — a character that
    /// is neither a digit, an identifier start, nor an allowed terminator is
    /// `"invalid argument index in format string"` outright, never an
    /// automatic-index attempt (this is what tells `"{0:{?}}"` apart from
    /// `"{0:{}}"`, which are handled completely differently).
    fn parse_arg_ref(&mut self, terminators: &[u8]) -> Result<ArgRef<'a>, FormatError> {
        let start = self.pos;
        let first = self.template.as_bytes().get(self.pos).copied();

        if matches!(first, Some(b) if b.is_ascii_digit()) {
            while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
            self.mode.manual()?;
            let index = self.parse_checked_u32(start)?;
            return Ok(ArgRef::Index(index as usize));
        }

        if matches!(first, Some(b'_')) || matches!(first, Some(b) if b.is_ascii_alphabetic()) {
            while matches!(self.peek_byte(), Some(b'_')) || matches!(self.peek_byte(), Some(b) if b.is_ascii_alphanumeric()) {
                self.pos += 1;
            }
            return Ok(ArgRef::Name(&self.template[start..self.pos]));
        }

        match first {
            Some(b) if terminators.contains(&b) => {
                let index = self.mode.auto()?;
                Ok(ArgRef::Index(index))
            }
            _ => Err(FormatError::TemplateSyntax("invalid argument index in format string")),
        }
    }

    /// Converts the already-scanned digit run `self.template[start..self.pos]`
    /// into a bounds-checked `u32`, mirroring fmtlib's `int`-sized index.
    fn parse_checked_u32(&self, start: usize) -> Result<u32, FormatError> {
        let digits = &self.template[start..self.pos];
        let mut value: u64 = 0;
        for byte in digits.bytes() {
            value = value * 10 + u64::from(byte - b'0');
            if value > i32::MAX as u64 {
                return Err(FormatError::NumericOverflow("number is too big in format"));
            }
        }
        Ok(value as u32)
    }

    fn parse_format_spec(&mut self) -> Result<RawFormatSpec<'a>, FormatError> {
        let mut spec = RawFormatSpec::default();

        self.parse_fill_and_align(&mut spec)?;

        match self.peek_byte() {
            Some(b'+') => {
                spec.sign = Sign::Plus;
                self.pos += 1;
            }
            Some(b'-') => {
                spec.sign = Sign::Minus;
                self.pos += 1;
            }
            Some(b' ') => {
                spec.sign = Sign::Space;
                self.pos += 1;
            }
            _ => {}
        }

        if self.peek_byte() == Some(b'#') {
            spec.alt = true;
            self.pos += 1;
        }

        if self.peek_byte() == Some(b'0') {
            spec.zero = true;
            self.pos += 1;
        }

        spec.width = self.parse_dyn_value()?;

        if self.peek_byte() == Some(b'.') {
            self.pos += 1;
            spec.precision = self.parse_precision_value()?;
        }

        if self.peek_byte() == Some(b'L') {
            spec.localized = true;
            self.pos += 1;
        }

        match self.peek_byte() {
            Some(b'}') | None => {}
            Some(b) if b.is_ascii_alphabetic() || b == b'?' => {
                spec.ty = Some(b as char);
                self.pos += 1;
            }
            _ => {}
        }

        Ok(spec)
    }

    fn parse_fill_and_align(&mut self, spec: &mut crate::spec::RawFormatSpec<'a>) -> Result<(), FormatError> {
        let rest = &self.template[self.pos..];
        let mut chars = rest.chars();
        let Some(c1) = chars.next() else {
            return Ok(());
        };
        let c2 = chars.next();

        let as_align = |c: char| match c {
            '<' => Some(Align::Left),
            '>' => Some(Align::Right),
            '^' => Some(Align::Center),
            '=' => Some(Align::Numeric),
            _ => None,
        };

        if let Some(align) = c2.and_then(as_align) {
            if c1 == '{' || c1 == '}' {
                return Err(FormatError::TemplateSyntax("invalid fill character '{'"));
            }
            spec.fill = c1;
            spec.align = align;
            self.pos += c1.len_utf8() + 1;
        } else if let Some(align) = as_align(c1) {
            spec.align = align;
            self.pos += 1;
        }
        Ok(())
    }

    fn parse_dyn_value(&mut self) -> Result<DynValue<'a>, FormatError> {
        match self.peek_byte() {
            Some(b) if b.is_ascii_digit() => {
                let start = self.pos;
                while matches!(self.peek_byte(), Some(b) if b.is_ascii_digit()) {
                    self.pos += 1;
                }
                let value = self.parse_checked_u32(start)?;
                Ok(DynValue::Fixed(value))
            }
            Some(b'{') => {
                self.pos += 1;
                let arg = self.parse_arg_ref(&[b'}'])?;
                match self.peek_byte() {
                    Some(b'}') => {
                        self.pos += 1;
                        Ok(DynValue::Dynamic(arg))
                    }
                    _ => Err(FormatError::TemplateSyntax("invalid format string")),
                }
            }
            _ => Ok(DynValue::None),
        }
    }

    /// Like [`Self::parse_dyn_value`] but for `.precision`, where an absent
    /// value (nothing or a non-digit, non-`{` byte right after the `.`) is
    /// its own distinct error rather than "no precision given".
    fn parse_precision_value(&mut self) -> Result<DynValue<'a>, FormatError> {
        match self.peek_byte() {
            Some(b) if b.is_ascii_digit() => self.parse_dyn_value(),
            Some(b'{') => self.parse_dyn_value(),
            _ => Err(FormatError::TemplateSyntax("missing precision specifier")),
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.template.as_bytes().get(self.pos).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Align as A;

    fn events(template: &str) -> Result<alloc::vec::Vec<Event<'_>>, FormatError> {
        let mut parser = Parser::new(template);
        let mut out = alloc::vec::Vec::new();
        while let Some(event) = parser.next_event()? {
            out.push(event);
        }
        Ok(out)
    }

    #[test]
    fn plain_text_with_escaped_braces() {
        let evs = events("a{{b}}c").unwrap();
        assert_eq!(evs.len(), 3);
        assert!(matches!(evs[0], Event::Text("a")));
        assert!(matches!(evs[1], Event::Text("{")));
    }

    #[test]
    fn automatic_indices_increment() {
        let evs = events("{} {}").unwrap();
        let Event::Field { arg: ArgRef::Index(0), .. } = evs[0] else { panic!() };
        let Event::Field { arg: ArgRef::Index(1), .. } = evs[2] else { panic!() };
    }

    #[test]
    fn mixing_auto_and_manual_errors() {
        let err = events("{0}{}").unwrap_err();
        assert_eq!(
            err,
            FormatError::IndexingMode("cannot switch from manual to automatic argument indexing")
        );
    }

    #[test]
    fn unmatched_closing_brace_errors() {
        assert_eq!(
            events("}").unwrap_err(),
            FormatError::TemplateSyntax("unmatched '}' in format string")
        );
    }

    #[test]
    fn unterminated_field_is_unmatched_brace() {
        assert_eq!(
            events("{").unwrap_err(),
            FormatError::TemplateSyntax("unmatched '{' in format")
        );
        assert_eq!(
            events("{0").unwrap_err(),
            FormatError::TemplateSyntax("unmatched '{' in format")
        );
    }

    #[test]
    fn fill_and_align_parses() {
        let evs = events("{0:*>5}").unwrap();
        let Event::Field { spec, .. } = &evs[0] else { panic!() };
        assert_eq!(spec.fill, '*');
        assert_eq!(spec.align, A::Right);
    }

    #[test]
    fn invalid_fill_character_rejected() {
        assert_eq!(
            events("{0:{<5}}").unwrap_err(),
            FormatError::TemplateSyntax("invalid fill character '{'")
        );
    }

    #[test]
    fn dynamic_width_and_precision() {
        let evs = events("{0:{1}.{2}}").unwrap();
        let Event::Field { spec, .. } = &evs[0] else { panic!() };
        assert!(matches!(spec.width, DynValue::Dynamic(ArgRef::Index(1))));
        assert!(matches!(spec.precision, DynValue::Dynamic(ArgRef::Index(2))));
    }

    #[test]
    fn missing_precision_specifier() {
        assert_eq!(
            events("{0:.}").unwrap_err(),
            FormatError::TemplateSyntax("missing precision specifier")
        );
    }

    #[test]
    fn garbage_arg_id_is_invalid_argument_index() {
        assert_eq!(
            events("{!}").unwrap_err(),
            FormatError::TemplateSyntax("invalid argument index in format string")
        );
    }
}
