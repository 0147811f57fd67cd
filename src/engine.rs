//! The orchestrator: drives the parser, resolves arguments and dynamic
//! width/precision, and hands each field to [`formatters::format_arg`].

#[cfg(feature = "alloc")]
use alloc::string::String;

use crate::arg::{ArgRef, ArgValue, Arguments};
use crate::buffer::{Buffer, CountingSink, FixedSink, Sink};
use crate::error::FormatError;
use crate::formatters;
use crate::parser::{Event, Parser};
use crate::spec::{DynValue, FormatSpec, RawFormatSpec};

fn resolve_value<'a>(args: &Arguments<'a>, arg_ref: ArgRef<'_>) -> Result<ArgValue<'a>, FormatError> {
    let value = args.resolve(arg_ref);
    if matches!(value, ArgValue::None) {
        return Err(FormatError::ArgumentBinding(match arg_ref {
            ArgRef::Index(_) => "argument index is out of range in format",
            ArgRef::Name(_) => "argument not found",
        }));
    }
    Ok(value)
}

fn resolve_dyn(
    args: &Arguments<'_>,
    value: DynValue<'_>,
    not_integer: &'static str,
    negative: &'static str,
) -> Result<Option<u32>, FormatError> {
    match value {
        DynValue::None => Ok(None),
        DynValue::Fixed(v) => Ok(Some(v)),
        DynValue::Dynamic(arg_ref) => {
            let resolved = resolve_value(args, arg_ref)?;
            Ok(Some(resolved.as_dynamic_count(not_integer, negative)?))
        }
    }
}

fn resolve_spec(args: &Arguments<'_>, raw: &RawFormatSpec<'_>) -> Result<FormatSpec, FormatError> {
    let width = resolve_dyn(args, raw.width, "width is not integer", "negative width")?.unwrap_or(0);
    let precision = resolve_dyn(args, raw.precision, "precision is not integer", "negative precision")?;
    Ok(FormatSpec {
        fill: raw.fill,
        align: raw.align,
        sign: raw.sign,
        alt: raw.alt,
        zero: raw.zero,
        localized: raw.localized,
        width,
        precision,
        ty: raw.ty,
    })
}

/// Runs `template` against `args`, writing output to `sink`. Shared by every
/// public entry point below; the only thing that differs between them is
/// which [`Sink`] they hand in.
fn run<S: Sink>(sink: &mut S, template: &str, args: &Arguments<'_>) -> Result<(), FormatError> {
    let mut parser = Parser::new(template);
    while let Some(event) = parser.next_event()? {
        match event {
            Event::Text(text) => sink.append(text.as_bytes())?,
            Event::Field { arg, spec: raw } => {
                let value = resolve_value(args, arg)?;
                let spec = resolve_spec(args, &raw)?;
                formatters::format_arg(value, &spec, sink)?;
            }
        }
    }
    Ok(())
}

/// Formats `template` against `args`, returning a freshly allocated string.
#[cfg(feature = "alloc")]
pub fn format(template: &str, args: &Arguments<'_>) -> Result<String, FormatError> {
    let mut buffer = Buffer::new();
    run(&mut buffer, template, args)?;
    Ok(buffer.into_string())
}

/// Formats into a caller-provided [`Sink`], returning the number of bytes
/// written.
pub fn format_into<S: Sink>(sink: &mut S, template: &str, args: &Arguments<'_>) -> Result<usize, FormatError> {
    let before = sink.size();
    run(sink, template, args)?;
    Ok(sink.size() - before)
}

/// Result of [`format_to_n`]: `written` is how many bytes actually landed in
/// the caller's buffer, `size` is how many bytes the full, untruncated
/// output would have needed (mirroring `snprintf`'s return value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatToNResult {
    /// Bytes actually landed in the caller's buffer.
    pub written: usize,
    /// Bytes the full, untruncated output would have needed.
    pub size: usize,
}

/// Formats into a fixed-size buffer, truncating output that doesn't fit
/// rather than growing or failing.
pub fn format_to_n(buf: &mut [u8], template: &str, args: &Arguments<'_>) -> Result<FormatToNResult, FormatError> {
    let mut sink = FixedSink::new(buf);
    run(&mut sink, template, args)?;
    Ok(FormatToNResult {
        written: sink.written(),
        size: sink.logical_size(),
    })
}

/// Computes the output length `format` would produce, without allocating or
/// writing any content — runs the identical code path through a
/// [`CountingSink`] so the number can never drift from what a real write
/// produces.
pub fn formatted_size(template: &str, args: &Arguments<'_>) -> Result<usize, FormatError> {
    let mut sink = CountingSink::default();
    run(&mut sink, template, args)?;
    Ok(sink.size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arg::ToArgValue;

    #[test]
    fn formats_positional_and_named() {
        let values = [42i32.to_arg_value(), "answer".to_arg_value()];
        let args = Arguments::new(&values, &[]);
        assert_eq!(format("{1} = {0}", &args).unwrap(), "answer = 42");
    }

    #[test]
    fn formatted_size_matches_format_len() {
        let values = [1.5f64.to_arg_value()];
        let args = Arguments::new(&values, &[]);
        let s = format("pi-ish: {:.3}", &args).unwrap();
        assert_eq!(formatted_size("pi-ish: {:.3}", &args).unwrap(), s.len());
    }

    #[test]
    fn format_to_n_truncates_and_reports_logical_size() {
        let values = [12345i32.to_arg_value()];
        let args = Arguments::new(&values, &[]);
        let mut buf = [0u8; 3];
        let result = format_to_n(&mut buf, "{}", &args).unwrap();
        assert_eq!(&buf, b"123");
        assert_eq!(result.written, 3);
        assert_eq!(result.size, 5);
    }

    #[test]
    fn missing_argument_is_reported() {
        let args = Arguments::empty();
        assert_eq!(
            format("{0}", &args).unwrap_err(),
            FormatError::ArgumentBinding("argument index is out of range in format")
        );
    }
}
