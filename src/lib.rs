//! A typed, allocation-conscious string formatting engine with a
//! Python-`str.format`-style template grammar.
//!
//! # What?
//!
//! This crate parses templates such as `"{0:>8.2} / {name:#x}"` in a single
//! pass and renders them against a type-erased table of arguments. Unlike
//! `printf`-style engines, an argument's position in the template and its
//! index (or name) in the argument list are independent: `{1} {0}` is valid
//! and swaps the two arguments, and `{value}`/`{value:+}` refer to the same
//! named argument with different presentation rules.
//!
//! Features:
//!
//! - No required heap allocation: [`format_into`] and [`format_to_n`] write
//!   into a caller-supplied [`Sink`] or fixed buffer, and [`formatted_size`]
//!   computes an output length without writing anything at all.
//! - `#[no_std]`-compatible; the `alloc` feature (on by default via `std`)
//!   unlocks [`format`], which returns an owned `String`, and lets the
//!   argument table spill past its inline capacity.
//! - User types opt in to custom rendering via [`CustomFormat`] and
//!   [`custom()`], without the coherence headaches of a blanket `ToArgValue`
//!   impl.
//!
//! # Why?
//!
//! `core::fmt` ties a type's textual rendering to a single `Display`/`Debug`
//! impl decided by the type's author, and its template language is fixed at
//! compile time via the `format_args!` built-in. This crate instead resolves
//! templates and argument bindings at runtime, which is useful for
//! translated/localized message catalogs, user-configurable log formats, and
//! any other place where the template string itself isn't known until the
//! program is running.
//!
//! # Limitations
//!
//! - Padding logic assumes every `char` has the same displayed width, which
//!   isn't really true (combining characters, East Asian wide characters).
//!   `core::fmt`'s own padding makes the same assumption.
//! - There is no compile-time checking of templates against the argument
//!   list; a missing or mistyped argument is a runtime [`FormatError`].
//!
//! # Examples
//!
//! ```
//! use fmt_core::format;
//!
//! let s = format!("{0} + {0} = {1}", 2, 4).unwrap();
//! assert_eq!(s, "2 + 2 = 4");
//!
//! let s = format!("{name} is {age:03}"; name = "Ada", age = 36).unwrap();
//! assert_eq!(s, "Ada is 036");
//! ```
//!
//! ## Formatting without allocating
//!
//! ```
//! use fmt_core::{write, Buffer};
//!
//! let mut buf = Buffer::new();
//! write!(&mut buf, "{:>6.2f}", 3.14159).unwrap();
//! assert_eq!(buf.as_str(), "  3.14");
//! ```

#![no_std]
#![warn(missing_debug_implementations, missing_docs, bare_trait_objects)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(test)]
extern crate std;

mod arg;
mod buffer;
mod digits;
mod engine;
mod error;
mod float;
mod formatters;
mod parser;
mod spec;
#[macro_use]
mod macros;
#[cfg(test)]
mod tests;

pub use crate::{
    arg::{custom, ArgRef, ArgValue, Arguments, Custom, CustomFormat, Kind, ToArgValue, MAX_PACKED},
    buffer::{Buffer, CountingSink, FixedSink, Sink, INLINE_CAP},
    engine::{format_into, format_to_n, formatted_size, FormatToNResult},
    error::FormatError,
    spec::{Align, FormatSpec, Sign},
};

#[cfg(feature = "alloc")]
pub use crate::engine::format;
