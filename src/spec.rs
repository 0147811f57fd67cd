//! [`FormatSpec`] and its parse-time counterpart [`RawFormatSpec`].

use crate::arg::ArgRef;

/// Field alignment, as carried by a parsed spec. `Default` lets each
/// formatter pick its own natural alignment (left for strings, right/numeric
/// for numbers) rather than forcing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Default,
    Left,
    Right,
    Center,
    /// Pad between the sign/prefix and the digits rather than before/after
    /// the whole field; only meaningful for numeric formatters.
    Numeric,
}

/// Requested sign rendering for numeric arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    None,
    Plus,
    Minus,
    Space,
}

/// A fully resolved format specification: every dynamic width/precision
/// reference has already been looked up against the argument table. This is
/// what [`formatters`](crate::formatters) actually consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatSpec {
    pub fill: char,
    pub align: Align,
    pub sign: Sign,
    pub alt: bool,
    pub zero: bool,
    pub localized: bool,
    pub width: u32,
    pub precision: Option<u32>,
    pub ty: Option<char>,
}

impl Default for FormatSpec {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Default,
            sign: Sign::None,
            alt: false,
            zero: false,
            localized: false,
            width: 0,
            precision: None,
            ty: None,
        }
    }
}

impl FormatSpec {
    /// `align`, defaulting numeric fields to [`Align::Numeric`] when
    /// the `0` flag was given and no explicit alignment overrode it.
    pub(crate) fn effective_align(&self, numeric: bool) -> Align {
        match self.align {
            Align::Default if numeric && self.zero => Align::Numeric,
            Align::Default if numeric => Align::Right,
            Align::Default => Align::Left,
            other => other,
        }
    }
}

/// Width or precision as written in the template: either a literal, a
/// reference to another argument (`{0:.{1}}`), or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DynValue<'a> {
    #[default]
    None,
    Fixed(u32),
    Dynamic(ArgRef<'a>),
}

/// Parse-time format specification: width/precision may still be dynamic
/// argument references that the orchestrator resolves before formatting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFormatSpec<'a> {
    pub fill: char,
    pub align: Align,
    pub sign: Sign,
    pub alt: bool,
    pub zero: bool,
    pub localized: bool,
    pub width: DynValue<'a>,
    pub precision: DynValue<'a>,
    pub ty: Option<char>,
}

impl Default for RawFormatSpec<'_> {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Default,
            sign: Sign::None,
            alt: false,
            zero: false,
            localized: false,
            width: DynValue::None,
            precision: DynValue::None,
            ty: None,
        }
    }
}
