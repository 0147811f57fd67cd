//! Per-kind argument rendering: turns a resolved [`ArgValue`] plus its
//! [`FormatSpec`] into bytes on a [`Sink`], including fill/align/width.

use crate::arg::ArgValue;
use crate::buffer::Sink;
use crate::digits::{self, Radix};
use crate::error::FormatError;
use crate::float::{self, Float};
use crate::spec::{Align, FormatSpec, Sign};

/// Builds the `"unknown format code 'T' for C"` error from §4.6's error
/// table for an unrecognised presentation type `ty` on an argument of
/// `category`, non-printable `ty` spelled as `'\xNN'` as the table requires.
/// Needs `alloc` to build the message text; without it this degrades to a
/// fixed message naming neither the type code nor the category.
fn unknown_type_error(ty: char, category: &str) -> FormatError {
    #[cfg(feature = "alloc")]
    {
        let repr = if ty.is_ascii_graphic() {
            alloc::format!("'{ty}'")
        } else {
            alloc::format!("'\\x{:02x}'", ty as u32)
        };
        FormatError::SpecTypeMismatch(alloc::format!("unknown format code {repr} for {category}"))
    }
    #[cfg(not(feature = "alloc"))]
    {
        let _ = (ty, category);
        FormatError::TemplateSyntax("unknown format code for this argument type")
    }
}

/// Dispatches on `value`'s kind and writes the fully-formatted argument to
/// `sink`.
pub fn format_arg(value: ArgValue<'_>, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    match value {
        ArgValue::None => Ok(()),
        ArgValue::Bool(b) => format_bool(b, spec, sink),
        ArgValue::Int(v) => format_signed(v, spec, sink),
        ArgValue::UInt(v) => format_unsigned(v, spec, sink),
        ArgValue::Float(v) => format_float(v, spec, sink),
        ArgValue::Double(v) => format_float(v, spec, sink),
        ArgValue::Char(c) => format_char(c, spec, sink),
        ArgValue::Str(s) => format_str(s, spec, sink),
        ArgValue::Pointer(addr) => format_pointer(addr, spec, sink),
        ArgValue::Custom(custom) => custom.format(spec, sink),
    }
}

/// Writes `count` copies of `fill` to `sink`.
fn write_fill(sink: &mut dyn Sink, fill: char, count: usize) -> Result<(), FormatError> {
    if count == 0 {
        return Ok(());
    }
    let mut buf = [0u8; 4];
    let encoded = fill.encode_utf8(&mut buf).as_bytes();
    for _ in 0..count {
        sink.append(encoded)?;
    }
    Ok(())
}

/// Lays out `prefix` (sign/radix-prefix, stays before any zero-padding)
/// followed by `body` (digits or text), applying width/fill/align.
/// `numeric` governs the default alignment fmtlib uses for this kind.
fn write_field(
    sink: &mut dyn Sink,
    spec: &FormatSpec,
    numeric: bool,
    prefix: &str,
    body: &str,
) -> Result<(), FormatError> {
    let prefix_chars = prefix.chars().count();
    let body_chars = body.chars().count();
    let total = (prefix_chars + body_chars) as u32;
    let pad_count = spec.width.saturating_sub(total) as usize;
    let align = spec.effective_align(numeric);
    let fill = if spec.zero && spec.align == Align::Default {
        '0'
    } else {
        spec.fill
    };

    match align {
        Align::Numeric => {
            sink.append(prefix.as_bytes())?;
            write_fill(sink, fill, pad_count)?;
            sink.append(body.as_bytes())
        }
        Align::Right => {
            write_fill(sink, fill, pad_count)?;
            sink.append(prefix.as_bytes())?;
            sink.append(body.as_bytes())
        }
        Align::Center => {
            let left = pad_count / 2;
            let right = pad_count - left;
            write_fill(sink, fill, left)?;
            sink.append(prefix.as_bytes())?;
            sink.append(body.as_bytes())?;
            write_fill(sink, fill, right)
        }
        Align::Left | Align::Default => {
            sink.append(prefix.as_bytes())?;
            sink.append(body.as_bytes())?;
            write_fill(sink, fill, pad_count)
        }
    }
}

fn sign_str(spec: &FormatSpec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else {
        match spec.sign {
            Sign::Plus => "+",
            Sign::Space => " ",
            Sign::None | Sign::Minus => "",
        }
    }
}

fn format_bool(value: bool, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    match spec.ty {
        None | Some('s') => format_str(if value { "true" } else { "false" }, spec, sink),
        Some('b') | Some('B') | Some('o') | Some('d') | Some('x') | Some('X') => {
            format_unsigned(u64::from(value), spec, sink)
        }
        Some(c) => Err(unknown_type_error(c, "bool")),
    }
}

fn format_signed(value: i64, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    let (negative, magnitude) = digits::split_sign(value);
    format_integer(negative, magnitude, true, spec, sink)
}

fn format_unsigned(value: u64, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    format_integer(false, value, false, spec, sink)
}

fn format_integer(
    negative: bool,
    magnitude: u64,
    is_signed: bool,
    spec: &FormatSpec,
    sink: &mut dyn Sink,
) -> Result<(), FormatError> {
    if spec.precision.is_some() {
        return Err(FormatError::ArgumentBinding(
            "precision not allowed for this argument type",
        ));
    }
    if !is_signed && spec.sign != Sign::None {
        return Err(FormatError::ArgumentBinding(
            "format specifier requires signed argument",
        ));
    }
    if spec.ty == Some('c') {
        return format_int_as_char(magnitude, spec, sink);
    }

    // `n` is its own presentation type (decimal with grouping turned on),
    // distinct from the `L` flag, which grouping in other radixes/types
    // ignores; both land on the same grouped-decimal rendering below.
    let (radix, radix_prefix) = match spec.ty {
        None | Some('d') | Some('n') => (Radix::Decimal, ""),
        Some('b') => (Radix::Binary, "0b"),
        Some('B') => (Radix::Binary, "0B"),
        Some('o') => (Radix::Octal, "0"),
        Some('x') => (Radix::Hex { upper: false }, "0x"),
        Some('X') => (Radix::Hex { upper: true }, "0X"),
        Some(c) => return Err(unknown_type_error(c, "integer")),
    };

    let digit_count = match radix {
        Radix::Decimal => digits::decimal_digit_count(magnitude),
        _ => digits::based_digit_count(magnitude, radix),
    };
    let mut digit_buf = [0u8; 64];
    match radix {
        Radix::Decimal => digits::write_decimal(magnitude, &mut digit_buf[..digit_count]),
        _ => digits::write_based(magnitude, radix, &mut digit_buf[..digit_count]),
    }
    let raw_digits = core::str::from_utf8(&digit_buf[..digit_count]).expect("ASCII digits");

    let mut grouped_buf = [0u8; 32];
    let group = spec.localized || spec.ty == Some('n');
    let body = if group && radix == Radix::Decimal && digit_count > 3 {
        let grouped_len = digits::grouped_len(digit_count);
        digits::group_digits(raw_digits.as_bytes(), &mut grouped_buf[..grouped_len]);
        core::str::from_utf8(&grouped_buf[..grouped_len]).expect("ASCII digits and separators")
    } else {
        raw_digits
    };

    let show_prefix = spec.alt && !(radix == Radix::Octal && magnitude == 0);
    let prefix = if show_prefix { radix_prefix } else { "" };

    let sign = sign_str(spec, negative);
    let mut prefix_buf = [0u8; 8];
    let combined_prefix = {
        let sign_bytes = sign.as_bytes();
        let prefix_bytes = prefix.as_bytes();
        prefix_buf[..sign_bytes.len()].copy_from_slice(sign_bytes);
        prefix_buf[sign_bytes.len()..sign_bytes.len() + prefix_bytes.len()].copy_from_slice(prefix_bytes);
        core::str::from_utf8(&prefix_buf[..sign_bytes.len() + prefix_bytes.len()]).expect("ASCII prefix")
    };

    write_field(sink, spec, true, combined_prefix, body)
}

fn format_int_as_char(magnitude: u64, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    let c = char::from_u32(magnitude as u32).ok_or(FormatError::ArgumentBinding(
        "format specifier requires numeric argument",
    ))?;
    format_char(c, spec, sink)
}

fn format_float<F: Float>(value: F, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    match spec.ty {
        None | Some('f') | Some('F') | Some('e') | Some('E') | Some('g') | Some('G') | Some('a') | Some('A') => {}
        Some(c) => return Err(unknown_type_error(c, "float")),
    }

    if value.is_nan() || value.is_infinite() {
        let upper = matches!(spec.ty, Some('F') | Some('E') | Some('G') | Some('A'));
        let word = if value.is_nan() {
            if upper { "NAN" } else { "nan" }
        } else if upper {
            "INF"
        } else {
            "inf"
        };
        let sign = sign_str(spec, value.is_sign_negative());
        // Zero-padding a non-finite value makes no sense; fall back to a
        // plain space-filled right align for it regardless of the `0` flag.
        let plain_spec = FormatSpec { zero: false, ..*spec };
        return write_field(sink, &plain_spec, true, sign, word);
    }

    let body = float::render(value, spec.ty, spec.precision, spec.alt)?;
    let sign = sign_str(spec, body.negative);
    write_field(sink, spec, true, sign, body.as_str())
}

fn format_char(c: char, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    match spec.ty {
        Some('b') | Some('B') | Some('o') | Some('d') | Some('x') | Some('X') => {
            return format_unsigned(u64::from(c), spec, sink);
        }
        None | Some('c') => {}
        Some(c) => return Err(unknown_type_error(c, "char")),
    }
    if spec.precision.is_some() {
        return Err(FormatError::ArgumentBinding(
            "precision not allowed for this argument type",
        ));
    }
    if spec.sign != Sign::None || spec.alt || spec.zero || spec.align == Align::Numeric {
        return Err(FormatError::ArgumentBinding("invalid format specifier for char"));
    }
    let mut buf = [0u8; 4];
    let encoded = c.encode_utf8(&mut buf);
    write_field(sink, spec, false, "", encoded)
}

/// Writes the debug-escaped form of `value` (the `?` presentation type):
/// `\\`, `"`, and ASCII control characters become their C-style escapes,
/// everything else passes through verbatim, and the whole thing is
/// surrounded by `"`.
fn write_debug_escaped(value: &str, sink: &mut dyn Sink) -> Result<(), FormatError> {
    sink.push(b'"')?;
    for c in value.chars() {
        match c {
            '\n' => sink.append(b"\\n")?,
            '\r' => sink.append(b"\\r")?,
            '\t' => sink.append(b"\\t")?,
            '\\' => sink.append(b"\\\\")?,
            '"' => sink.append(b"\\\"")?,
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                let mut buf = [0u8; 4];
                let hex = format_hex_escape(c as u8, &mut buf);
                sink.append(hex)?;
            }
            c => {
                let mut buf = [0u8; 4];
                sink.append(c.encode_utf8(&mut buf).as_bytes())?;
            }
        }
    }
    sink.push(b'"')
}

fn format_hex_escape(byte: u8, buf: &mut [u8; 4]) -> &[u8] {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    buf[0] = b'\\';
    buf[1] = b'x';
    buf[2] = HEX[(byte >> 4) as usize];
    buf[3] = HEX[(byte & 0xf) as usize];
    buf
}

fn format_str(value: &str, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    if spec.ty == Some('?') {
        if spec.sign != Sign::None || spec.alt || spec.zero || spec.align == Align::Numeric {
            return Err(FormatError::ArgumentBinding(
                "format specifier requires numeric argument",
            ));
        }
        // Debug-escaping is applied before width/fill, same as any other
        // string body; precision still truncates the *source* text first.
        let truncated = truncate_str(value, spec.precision);
        if spec.width == 0 {
            return write_debug_escaped(truncated, sink);
        }
        let mut scratch = crate::buffer::Buffer::new();
        write_debug_escaped(truncated, &mut scratch)?;
        let escaped = core::str::from_utf8(scratch.as_bytes()).expect("ASCII/UTF-8 escape output");
        return write_field(sink, spec, false, "", escaped);
    }

    if spec.sign != Sign::None || spec.alt || spec.zero || spec.align == Align::Numeric {
        return Err(FormatError::ArgumentBinding(
            "format specifier requires numeric argument",
        ));
    }
    match spec.ty {
        None | Some('s') => {}
        Some(c) => return Err(unknown_type_error(c, "string")),
    }
    let truncated = truncate_str(value, spec.precision);
    write_field(sink, spec, false, "", truncated)
}

/// Truncates `value` to its first `precision` code points, or returns it
/// whole when `precision` is unset.
fn truncate_str(value: &str, precision: Option<u32>) -> &str {
    match precision {
        Some(p) => {
            let end = value
                .char_indices()
                .nth(p as usize)
                .map(|(idx, _)| idx)
                .unwrap_or(value.len());
            &value[..end]
        }
        None => value,
    }
}

fn format_pointer(addr: usize, spec: &FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
    if spec.precision.is_some() {
        return Err(FormatError::ArgumentBinding(
            "precision not allowed for this argument type",
        ));
    }
    if spec.sign != Sign::None {
        return Err(FormatError::ArgumentBinding(
            "format specifier requires numeric argument",
        ));
    }
    match spec.ty {
        None | Some('p') => {}
        Some(c) => return Err(unknown_type_error(c, "pointer")),
    }
    // Null is special-cased to the bare `0x0` the base spec calls out; every
    // other address is zero-padded to the platform's full pointer width (the
    // "hex zero-padding for pointers" property: `len - 2 == ceil(addr_bits /
    // 4)` regardless of how many of the leading nibbles happen to be zero).
    if addr == 0 {
        return write_field(sink, spec, true, "0x", "0");
    }
    let width = core::mem::size_of::<usize>() * 2;
    let mut digit_buf = [0u8; 16];
    digits::write_based(addr as u64, Radix::Hex { upper: false }, &mut digit_buf[..width]);
    let body = core::str::from_utf8(&digit_buf[..width]).expect("ASCII hex digits");
    write_field(sink, spec, true, "0x", body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use alloc::string::ToString;

    fn render(value: ArgValue<'_>, spec: FormatSpec) -> alloc::string::String {
        let mut buf = Buffer::new();
        format_arg(value, &spec, &mut buf).unwrap();
        core::str::from_utf8(buf.as_bytes()).unwrap().to_string()
    }

    #[test]
    fn signed_zero_padding_keeps_sign_before_zeros() {
        let spec = FormatSpec {
            width: 5,
            zero: true,
            ..FormatSpec::default()
        };
        assert_eq!(render(ArgValue::Int(-42), spec), "-0042");
    }

    #[test]
    fn hex_alt_prefix() {
        let spec = FormatSpec {
            ty: Some('x'),
            alt: true,
            ..FormatSpec::default()
        };
        assert_eq!(render(ArgValue::UInt(0x42), spec), "0x42");
    }

    #[test]
    fn string_precision_truncates() {
        let spec = FormatSpec {
            precision: Some(2),
            ..FormatSpec::default()
        };
        assert_eq!(render(ArgValue::Str("str"), spec), "st");
    }

    #[test]
    fn char_center_align() {
        let spec = FormatSpec {
            width: 5,
            align: Align::Center,
            ..FormatSpec::default()
        };
        assert_eq!(render(ArgValue::Char('c'), spec), "  c  ");
    }

    #[test]
    fn unsigned_rejects_plus_sign() {
        let spec = FormatSpec {
            sign: Sign::Plus,
            ..FormatSpec::default()
        };
        let mut buf = Buffer::new();
        let err = format_arg(ArgValue::UInt(42), &spec, &mut buf).unwrap_err();
        assert_eq!(
            err,
            FormatError::ArgumentBinding("format specifier requires signed argument")
        );
    }

    #[test]
    fn pointer_zero_pads_to_full_address_width() {
        let spec = FormatSpec::default();
        let rendered = render(ArgValue::Pointer(0xcafe), spec);
        let expected_nibbles = core::mem::size_of::<usize>() * 2;
        assert_eq!(rendered.len() - 2, expected_nibbles);
        assert!(rendered.ends_with("cafe"));
        assert!(rendered.starts_with("0x"));
    }

    #[test]
    fn null_pointer_is_bare_0x0() {
        let spec = FormatSpec::default();
        assert_eq!(render(ArgValue::Pointer(0), spec), "0x0");
    }

    #[test]
    fn string_debug_escape() {
        let spec = FormatSpec {
            ty: Some('?'),
            ..FormatSpec::default()
        };
        assert_eq!(render(ArgValue::Str("t\nst"), spec), "\"t\\nst\"");
    }

    #[test]
    fn n_type_groups_without_the_l_flag() {
        let spec = FormatSpec {
            ty: Some('n'),
            ..FormatSpec::default()
        };
        assert_eq!(render(ArgValue::UInt(1_234_567), spec), "1,234,567");
    }

    #[test]
    fn unknown_integer_type_names_the_code_and_category() {
        let spec = FormatSpec {
            ty: Some('q'),
            ..FormatSpec::default()
        };
        let mut buf = Buffer::new();
        let err = format_arg(ArgValue::UInt(1), &spec, &mut buf).unwrap_err();
        assert_eq!(
            err,
            FormatError::SpecTypeMismatch("unknown format code 'q' for integer".to_string())
        );
    }

    #[test]
    fn char_as_hex_renders_code_point() {
        let spec = FormatSpec {
            ty: Some('x'),
            ..FormatSpec::default()
        };
        assert_eq!(render(ArgValue::Char('A'), spec), "41");
    }
}
