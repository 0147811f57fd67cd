//! Type-erased argument values and the argument table.

use crate::{error::FormatError, spec::FormatSpec};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Maximum number of positional arguments kept in the table's inline,
/// allocation-free storage. Beyond this the table spills into a `Vec`
/// (`alloc` feature only); both representations are otherwise equivalent.
pub const MAX_PACKED: usize = 15;

/// Runtime discriminant of an [`ArgValue`]. Ordered so that `kind <=
/// Kind::Double` is a cheap "is this a numeric argument" test, mirroring the
/// ordering convention of the engine this crate's argument model follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    None = 0,
    Bool,
    Int,
    UInt,
    Float,
    Double,
    Char,
    Str,
    Pointer,
    Custom,
}

impl Kind {
    /// Last numeric variant; any `Kind` at or below this (and above `None`)
    /// is a number.
    pub const LAST_NUMERIC: Kind = Kind::Double;

    pub fn is_numeric(self) -> bool {
        self > Kind::None && self <= Kind::LAST_NUMERIC
    }
}

/// Callback-style protocol for arguments of a type this crate doesn't know
/// natively. Analogous to `fmt::formatter<T>` specializations in template-
/// based formatting engines: a type opts in explicitly rather than being
/// picked up by a blanket `Display`-style impl, so that `{:#x}` etc. keep
/// meaning something precise for the types this crate *does* know.
pub trait CustomFormat {
    /// Consumes the (already-parsed) [`FormatSpec`] and writes to `sink`.
    /// Implementations are responsible for honouring whatever parts of the
    /// spec make sense for them; unsupported parts should simply be
    /// ignored, not rejected, the way the built-in formatters ignore e.g.
    /// `precision` for integers only after validating it's absent.
    fn format(&self, spec: &FormatSpec, sink: &mut dyn crate::buffer::Sink) -> Result<(), FormatError>;
}

/// A single type-erased argument. Copy because every payload is either a
/// primitive or a borrow; nothing here owns allocated storage.
#[derive(Clone, Copy)]
pub enum ArgValue<'a> {
    None,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(&'a str),
    Pointer(usize),
    Custom(&'a dyn CustomFormat),
}

impl<'a> ArgValue<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Self::None => Kind::None,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::UInt(_) => Kind::UInt,
            Self::Float(_) => Kind::Float,
            Self::Double(_) => Kind::Double,
            Self::Char(_) => Kind::Char,
            Self::Str(_) => Kind::Str,
            Self::Pointer(_) => Kind::Pointer,
            Self::Custom(_) => Kind::Custom,
        }
    }

    /// Reads this argument as a non-negative width/precision value, per the
    /// orchestrator contract in the base spec: only integer kinds are
    /// accepted, and negative values are rejected. `not_integer`/`negative`
    /// are the distinct messages `{:width$}`/`{:.prec$}` use (fmtlib itself
    /// tells these apart: `"width is not integer"` vs. `"negative width"`).
    pub(crate) fn as_dynamic_count(
        &self,
        not_integer: &'static str,
        negative: &'static str,
    ) -> Result<u32, FormatError> {
        let value = match *self {
            Self::Int(v) if v >= 0 => v as u64,
            Self::Int(_) => return Err(FormatError::ArgumentBinding(negative)),
            Self::UInt(v) => v,
            _ => return Err(FormatError::ArgumentBinding(not_integer)),
        };
        if value > i32::MAX as u64 {
            return Err(FormatError::NumericOverflow("number is too big in format"));
        }
        Ok(value as u32)
    }
}

impl core::fmt::Debug for ArgValue<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Self::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Self::UInt(v) => f.debug_tuple("UInt").field(v).finish(),
            Self::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Self::Double(v) => f.debug_tuple("Double").field(v).finish(),
            Self::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Self::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Self::Pointer(v) => f.debug_tuple("Pointer").field(v).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How a field in the template refers to an argument. `{}`/`{0}`/`{name}`
/// all resolve to one of these; automatic indices are resolved to a
/// concrete [`ArgRef::Index`] by the parser itself, since by the time an
/// event is emitted the running auto-index is already known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRef<'a> {
    Index(usize),
    Name(&'a str),
}

/// Converts a borrowed value into its type-erased [`ArgValue`]. Implemented
/// for every type the `format!`/`write!` macros accept directly; arbitrary
/// user types opt in via [`CustomFormat`] instead (see its docs).
pub trait ToArgValue {
    fn to_arg_value(&self) -> ArgValue<'_>;
}

impl ToArgValue for bool {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Bool(*self)
    }
}

impl ToArgValue for char {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Char(*self)
    }
}

impl ToArgValue for str {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Str(self)
    }
}

#[cfg(feature = "alloc")]
impl ToArgValue for alloc::string::String {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Str(self.as_str())
    }
}

macro_rules! impl_to_arg_value_for_signed {
    ($($int:ty),+) => {
        $(
        impl ToArgValue for $int {
            fn to_arg_value(&self) -> ArgValue<'_> {
                ArgValue::Int(i64::from(*self))
            }
        }
        )+
    };
}
impl_to_arg_value_for_signed!(i8, i16, i32, i64);

macro_rules! impl_to_arg_value_for_unsigned {
    ($($uint:ty),+) => {
        $(
        impl ToArgValue for $uint {
            fn to_arg_value(&self) -> ArgValue<'_> {
                ArgValue::UInt(u64::from(*self))
            }
        }
        )+
    };
}
impl_to_arg_value_for_unsigned!(u8, u16, u32, u64);

impl ToArgValue for isize {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Int(*self as i64)
    }
}

impl ToArgValue for usize {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::UInt(*self as u64)
    }
}

impl ToArgValue for f32 {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Float(*self)
    }
}

impl ToArgValue for f64 {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Double(*self)
    }
}

/// Explicit opt-in wrapper that lets a value implementing [`CustomFormat`]
/// be passed to `format!`/`write!` like any built-in argument, e.g.
/// `format!("{}", fmt_core::custom(&my_value))`.
///
/// A blanket `impl<T: CustomFormat> ToArgValue for T` would be the more
/// ergonomic shape, but it would conflict with the concrete impls above
/// under Rust's coherence rules (stable Rust cannot prove that no built-in
/// type will ever implement `CustomFormat`, so the two impl sets are
/// treated as potentially overlapping). The explicit wrapper sidesteps
/// that entirely, at the cost of one extra function call at use sites.
pub struct Custom<'a, T: CustomFormat>(&'a T);

/// Wraps `value` for use as a `format!`/`write!` argument of a user-defined
/// type. See [`CustomFormat`] for the protocol `T` must implement.
pub fn custom<T: CustomFormat>(value: &T) -> Custom<'_, T> {
    Custom(value)
}

impl<T: CustomFormat> ToArgValue for Custom<'_, T> {
    fn to_arg_value(&self) -> ArgValue<'_> {
        ArgValue::Custom(self.0)
    }
}

/// Storage tier for the positional arguments of one formatting call.
enum Positional<'a> {
    Packed {
        values: [ArgValue<'a>; MAX_PACKED],
        len: usize,
    },
    #[cfg(feature = "alloc")]
    Spilled(Vec<ArgValue<'a>>),
}

/// Type-erased, by-index and by-name argument table for one formatting
/// call. Up to [`MAX_PACKED`] positional arguments live in a stack array;
/// named arguments are always a borrowed `(name, index)` slice built by the
/// call-site macro, never heap-allocated.
pub struct Arguments<'a> {
    positional: Positional<'a>,
    named: &'a [(&'a str, usize)],
}

impl<'a> Arguments<'a> {
    /// Builds a table from a positional slice and a name table. Used by the
    /// `format!`/`write!` macros; rarely called directly.
    pub fn new(values: &[ArgValue<'a>], named: &'a [(&'a str, usize)]) -> Self {
        if values.len() <= MAX_PACKED {
            let mut packed = [ArgValue::None; MAX_PACKED];
            packed[..values.len()].copy_from_slice(values);
            Self {
                positional: Positional::Packed {
                    values: packed,
                    len: values.len(),
                },
                named,
            }
        } else {
            #[cfg(feature = "alloc")]
            {
                Self {
                    positional: Positional::Spilled(values.to_vec()),
                    named,
                }
            }
            #[cfg(not(feature = "alloc"))]
            {
                // Without `alloc` there is no spill tier; truncate to the
                // packed capacity rather than silently dropping the table.
                let mut packed = [ArgValue::None; MAX_PACKED];
                packed.copy_from_slice(&values[..MAX_PACKED]);
                Self {
                    positional: Positional::Packed {
                        values: packed,
                        len: MAX_PACKED,
                    },
                    named,
                }
            }
        }
    }

    /// An empty argument table, for templates with no fields.
    pub fn empty() -> Self {
        Self::new(&[], &[])
    }

    pub fn len(&self) -> usize {
        match &self.positional {
            Positional::Packed { len, .. } => *len,
            #[cfg(feature = "alloc")]
            Positional::Spilled(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_by_index(&self, index: usize) -> ArgValue<'a> {
        match &self.positional {
            Positional::Packed { values, len } => {
                if index < *len {
                    values[index]
                } else {
                    ArgValue::None
                }
            }
            #[cfg(feature = "alloc")]
            Positional::Spilled(v) => v.get(index).copied().unwrap_or(ArgValue::None),
        }
    }

    pub fn get_by_name(&self, name: &str) -> ArgValue<'a> {
        for &(candidate, index) in self.named {
            if candidate == name {
                return self.get_by_index(index);
            }
        }
        ArgValue::None
    }

    pub fn resolve(&self, arg_ref: ArgRef<'_>) -> ArgValue<'a> {
        match arg_ref {
            ArgRef::Index(n) => self.get_by_index(n),
            ArgRef::Name(name) => self.get_by_name(name),
        }
    }
}
