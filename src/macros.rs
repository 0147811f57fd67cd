//! `format!`, `write!`, and `format_to_n!`: declarative macro front end over
//! [`crate::Arguments`]. No proc-macro machinery is involved — these are
//! plain `macro_rules!`, in keeping with this crate's "no proc macros"
//! property — so unlike `std::format!` they cannot capture a bare identifier
//! out of the template (`format!("{x}")` reading a local `x`); every argument
//! must be passed explicitly, positionally or as `name = expr`.
//!
//! Named arguments are separated from positional ones by a `;`, e.g.
//! `format!("{0} {name}", 42; name = "Ada")`, rather than mixed into one
//! comma list: `macro_rules!` can't tell a plain `expr` apart from the start
//! of an `ident = expr` pair by lookahead alone, so the grammar makes the
//! split explicit instead of guessing.
//!
//! # Internals
//!
//! Building the `[ArgValue; N]` array these macros pass to [`crate::Arguments`]
//! needs every argument expression bound to a named local *before*
//! [`crate::ToArgValue::to_arg_value`] borrows it (a bare
//! `to_arg_value(&some_literal)` would borrow a temporary that's dropped at
//! the end of its statement). [`__fmt_core_bind`] does this one argument at a
//! time, nesting each binding inside the previous one's block — and, unlike
//! an approach that builds the array and hands it back to its caller, it
//! calls all the way through to the actual `format`/`format_into`/
//! `format_to_n` call (the "continuation", named by `$cont`) from *inside*
//! the innermost nested block, while every binding up the chain is still in
//! scope. Returning the finished array out of that chain instead would tie
//! its element type's lifetime to locals that no longer exist by the time
//! the array is used.

/// Binds a nonempty, flat list of argument expressions one at a time and,
/// once the last one is bound, invokes `$cont!($($contargs)* values)` as the
/// tail expression of the innermost binding's block — so `$cont`'s expansion
/// runs while every `let` this macro introduced is still alive.
#[macro_export]
#[doc(hidden)]
macro_rules! __fmt_core_bind {
    ([$($elem:expr),*]; $head:expr; $cont:path ! ($($contargs:tt)*)) => {{
        let __fmt_core_v = $head;
        let __fmt_core_values = [$($elem,)* $crate::ToArgValue::to_arg_value(&__fmt_core_v)];
        $cont!($($contargs)* __fmt_core_values)
    }};
    ([$($elem:expr),*]; $head:expr, $($tail:expr),+; $cont:path ! ($($contargs:tt)*)) => {{
        let __fmt_core_v = $head;
        $crate::__fmt_core_bind!(
            [$($elem,)* $crate::ToArgValue::to_arg_value(&__fmt_core_v)];
            $($tail),+;
            $cont!($($contargs)*)
        )
    }};
}

/// Continuation invoked by [`__fmt_core_bind`] on behalf of `format!`.
#[macro_export]
#[doc(hidden)]
macro_rules! __fmt_core_finish_format {
    ($template:expr, $named:expr, $values:expr) => {
        $crate::format($template, &$crate::Arguments::new(&$values, $named))
    };
}

/// Continuation invoked by [`__fmt_core_bind`] on behalf of `write!`.
#[macro_export]
#[doc(hidden)]
macro_rules! __fmt_core_finish_write {
    ($sink:expr, $template:expr, $named:expr, $values:expr) => {
        $crate::format_into($sink, $template, &$crate::Arguments::new(&$values, $named))
    };
}

/// Continuation invoked by [`__fmt_core_bind`] on behalf of `format_to_n!`.
#[macro_export]
#[doc(hidden)]
macro_rules! __fmt_core_finish_format_to_n {
    ($buf:expr, $template:expr, $named:expr, $values:expr) => {
        $crate::format_to_n($buf, $template, &$crate::Arguments::new(&$values, $named))
    };
}

/// Replaces any expression with `$sub` without evaluating it; used to turn a
/// list of expressions into a list of units for counting.
#[macro_export]
#[doc(hidden)]
macro_rules! __fmt_core_replace_expr {
    ($_t:expr, $sub:expr) => {
        $sub
    };
}

/// Counts a nonempty comma-separated expression list without evaluating any
/// of them.
#[macro_export]
#[doc(hidden)]
macro_rules! __fmt_core_count {
    ($($e:expr),+) => {
        <[()]>::len(&[$($crate::__fmt_core_replace_expr!($e, ())),+])
    };
}

/// Builds the `&[(&str, usize)]` name table for a nonempty list of
/// `name = expr` pairs, with indices starting at `$start` (the number of
/// positional arguments already occupying the front of the values array).
/// Every `@build` arm expands to a bare `&[...]` array-literal borrow (no
/// intervening cast or function call) so that binding it via
/// `let x: &[(&str, usize)] = ...;` benefits from Rust's temporary lifetime
/// extension for that exact shape, rather than expiring at the end of the
/// `let` statement.
#[macro_export]
#[doc(hidden)]
macro_rules! __fmt_core_names {
    ($start:expr; $($name:ident = $val:expr),+) => {
        $crate::__fmt_core_names!(@build $start; []; $($name = $val),+)
    };
    (@build $idx:expr; [$($acc:expr),*]; $name:ident = $val:expr) => {
        &[$($acc,)* (::core::stringify!($name), $idx)]
    };
    (@build $idx:expr; [$($acc:expr),*]; $name:ident = $val:expr, $($rest:tt)*) => {
        $crate::__fmt_core_names!(@build ($idx + 1); [$($acc,)* (::core::stringify!($name), $idx)]; $($rest)*)
    };
}

/// Builds a fresh string from `template` and its arguments.
///
/// Positional arguments are a plain comma list; named arguments follow a
/// `;` as `name = expr` pairs (see the module docs for why the two lists
/// aren't interleaved the way `std::format!` allows).
///
/// ```
/// use fmt_core::format;
///
/// let s = format!("{0} + {0} = {1}", 2, 4).unwrap();
/// assert_eq!(s, "2 + 2 = 4");
///
/// let s = format!("{name} is {age:03}"; name = "Ada", age = 36).unwrap();
/// assert_eq!(s, "Ada is 036");
/// ```
#[cfg(feature = "alloc")]
#[macro_export]
macro_rules! format {
    ($template:expr $(,)?) => {
        $crate::format($template, &$crate::Arguments::empty())
    };
    ($template:expr, $($pos:expr),+ $(,)?) => {
        $crate::__fmt_core_bind!(
            [];
            $($pos),+;
            $crate::__fmt_core_finish_format!($template, &[])
        )
    };
    ($template:expr; $($name:ident = $val:expr),+ $(,)?) => {{
        let __fmt_core_names: &[(&str, usize)] = $crate::__fmt_core_names!(0usize; $($name = $val),+);
        $crate::__fmt_core_bind!(
            [];
            $($val),+;
            $crate::__fmt_core_finish_format!($template, __fmt_core_names)
        )
    }};
    ($template:expr, $($pos:expr),+ ; $($name:ident = $val:expr),+ $(,)?) => {{
        let __fmt_core_pos_count = $crate::__fmt_core_count!($($pos),+);
        let __fmt_core_names: &[(&str, usize)] =
            $crate::__fmt_core_names!(__fmt_core_pos_count; $($name = $val),+);
        $crate::__fmt_core_bind!(
            [];
            $($pos),+, $($val),+;
            $crate::__fmt_core_finish_format!($template, __fmt_core_names)
        )
    }};
}

/// Formats `template` and its arguments into a caller-supplied
/// [`Sink`](crate::Sink), returning the number of bytes appended.
///
/// ```
/// use fmt_core::{write, Buffer};
///
/// let mut buf = Buffer::new();
/// write!(&mut buf, "{:>6.2f}", 3.14159).unwrap();
/// assert_eq!(buf.as_str(), "  3.14");
/// ```
#[macro_export]
macro_rules! write {
    ($sink:expr, $template:expr $(,)?) => {
        $crate::format_into($sink, $template, &$crate::Arguments::empty())
    };
    ($sink:expr, $template:expr, $($pos:expr),+ $(,)?) => {
        $crate::__fmt_core_bind!(
            [];
            $($pos),+;
            $crate::__fmt_core_finish_write!($sink, $template, &[])
        )
    };
    ($sink:expr, $template:expr; $($name:ident = $val:expr),+ $(,)?) => {{
        let __fmt_core_names: &[(&str, usize)] = $crate::__fmt_core_names!(0usize; $($name = $val),+);
        $crate::__fmt_core_bind!(
            [];
            $($val),+;
            $crate::__fmt_core_finish_write!($sink, $template, __fmt_core_names)
        )
    }};
    ($sink:expr, $template:expr, $($pos:expr),+ ; $($name:ident = $val:expr),+ $(,)?) => {{
        let __fmt_core_pos_count = $crate::__fmt_core_count!($($pos),+);
        let __fmt_core_names: &[(&str, usize)] =
            $crate::__fmt_core_names!(__fmt_core_pos_count; $($name = $val),+);
        $crate::__fmt_core_bind!(
            [];
            $($pos),+, $($val),+;
            $crate::__fmt_core_finish_write!($sink, $template, __fmt_core_names)
        )
    }};
}

/// Formats `template` and its arguments into a fixed-size byte slice,
/// truncating rather than growing if the output doesn't fit.
///
/// ```
/// use fmt_core::format_to_n;
///
/// let mut buf = [0u8; 3];
/// let result = format_to_n!(&mut buf, "{}", 12345).unwrap();
/// assert_eq!(&buf, b"123");
/// assert_eq!(result.size, 5);
/// ```
#[macro_export]
macro_rules! format_to_n {
    ($buf:expr, $template:expr $(,)?) => {
        $crate::format_to_n($buf, $template, &$crate::Arguments::empty())
    };
    ($buf:expr, $template:expr, $($pos:expr),+ $(,)?) => {
        $crate::__fmt_core_bind!(
            [];
            $($pos),+;
            $crate::__fmt_core_finish_format_to_n!($buf, $template, &[])
        )
    };
    ($buf:expr, $template:expr; $($name:ident = $val:expr),+ $(,)?) => {{
        let __fmt_core_names: &[(&str, usize)] = $crate::__fmt_core_names!(0usize; $($name = $val),+);
        $crate::__fmt_core_bind!(
            [];
            $($val),+;
            $crate::__fmt_core_finish_format_to_n!($buf, $template, __fmt_core_names)
        )
    }};
    ($buf:expr, $template:expr, $($pos:expr),+ ; $($name:ident = $val:expr),+ $(,)?) => {{
        let __fmt_core_pos_count = $crate::__fmt_core_count!($($pos),+);
        let __fmt_core_names: &[(&str, usize)] =
            $crate::__fmt_core_names!(__fmt_core_pos_count; $($name = $val),+);
        $crate::__fmt_core_bind!(
            [];
            $($pos),+, $($val),+;
            $crate::__fmt_core_finish_format_to_n!($buf, $template, __fmt_core_names)
        )
    }};
}

#[cfg(test)]
mod tests {
    use crate::FormatError;

    #[test]
    fn positional_and_named_macro() {
        let s = format!("{0} + {0} = {1}", 2, 4).unwrap();
        assert_eq!(s, "2 + 2 = 4");

        let s = format!("{name} is {age:03}"; name = "Ada", age = 36).unwrap();
        assert_eq!(s, "Ada is 036");
    }

    #[test]
    fn mixed_positional_and_named() {
        let s = format!("{0}-{extra}", 1; extra = "x").unwrap();
        assert_eq!(s, "1-x");
    }

    #[test]
    fn no_args() {
        assert_eq!(format!("plain text").unwrap(), "plain text");
    }

    #[test]
    fn owned_primitive_arguments_bind_correctly() {
        // Regression check: earlier revisions of this macro built the
        // argument array in a block that returned it to its caller, which
        // only happened to work for reference-backed arguments (`&str`);
        // by-value arguments (`i32`, `bool`, `f64`, `char`, ...) need the
        // final call nested inside the same binding chain instead.
        assert_eq!(format!("{} {} {} {}", 1i32, true, 2.5f64, 'x').unwrap(), "1 true 2.5 x");
    }

    #[test]
    fn write_into_buffer() {
        let mut buf = crate::Buffer::new();
        write!(&mut buf, "{:>6.2f}", 3.141_59).unwrap();
        assert_eq!(buf.as_str(), "  3.14");
    }

    #[test]
    fn format_to_n_macro_truncates() {
        let mut buf = [0u8; 3];
        let result = format_to_n!(&mut buf, "{}", 12345).unwrap();
        assert_eq!(&buf, b"123");
        assert_eq!(result.size, 5);
    }

    #[test]
    fn propagates_template_errors() {
        let err = format!("{0}").unwrap_err();
        assert_eq!(
            err,
            FormatError::ArgumentBinding("argument index is out of range in format")
        );
    }
}
