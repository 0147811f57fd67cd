//! [`FormatError`] and its `Display`/`Error` impls.

use core::fmt;

#[cfg(feature = "alloc")]
use alloc::string::String;

/// Everything that can go wrong while parsing a template or applying a
/// [`FormatSpec`](crate::FormatSpec) to an argument.
///
/// Variants map 1:1 onto the error kinds of the engine this crate's grammar
/// is modeled after: template syntax, argument binding, auto/manual
/// indexing mode, spec/type mismatches, numeric overflow in the template
/// itself, and allocation failure. All entry points in this crate return
/// `Result<_, FormatError>` rather than panicking, except for programmer
/// errors that indicate a broken invariant inside this crate (those use
/// `debug_assert!`/`unreachable!`, never user-input errors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The template itself is malformed (unmatched braces, bad argument
    /// index syntax, missing precision, ...).
    TemplateSyntax(&'static str),
    /// An argument reference could not be resolved against the argument
    /// table (out-of-range index, unknown name, null string, ...).
    ArgumentBinding(&'static str),
    /// The template mixes automatic (`{}`) and manual (`{0}`) argument
    /// indexing.
    IndexingMode(&'static str),
    /// A presentation type or flag does not apply to the bound argument's
    /// kind. This message is built at format time (it names the offending
    /// type code), hence the owned `String`.
    #[cfg(feature = "alloc")]
    SpecTypeMismatch(String),
    /// A width, precision, or argument index literal does not fit a signed
    /// 32-bit integer.
    NumericOverflow(&'static str),
    /// The output sink's backing allocation could not grow.
    Allocation,
}

impl FormatError {
    /// Returns the human-readable message, without allocating.
    pub fn message(&self) -> &str {
        match self {
            Self::TemplateSyntax(msg)
            | Self::ArgumentBinding(msg)
            | Self::IndexingMode(msg)
            | Self::NumericOverflow(msg) => msg,
            #[cfg(feature = "alloc")]
            Self::SpecTypeMismatch(msg) => msg.as_str(),
            Self::Allocation => "failed to grow the output buffer",
        }
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

// `std::error::Error` is a re-export of this same trait as of Rust 1.81 (this
// crate's MSRV), so implementing it here unconditionally also satisfies
// `std::error::Error` without a `std` feature gate or an `extern crate std`.
impl core::error::Error for FormatError {}
