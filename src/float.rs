//! Finite-float → decimal/hexfloat digit conversion.
//!
//! Shortest-round-trip and arbitrary-precision correctly-rounded digit
//! generation are both delegated to `core::fmt`'s own `f32`/`f64` `Display`
//! and `LowerExp` implementations (themselves a Grisu/Dragon-family
//! algorithm shipped in `core`, usable from `#![no_std]`). Everything
//! downstream — choosing fixed vs. scientific layout, the `g`/`G` exponent
//! threshold, the `#` trailing-zero policy, hexfloat — is this module's own
//! code. See `SPEC_FULL.md` §4.3 for the rationale.

use core::fmt::{self, Write as _};

use crate::error::FormatError;

/// Large enough for any fixed-precision request this crate is willing to
/// honour in one shot (subnormal `f64` values need up to ~767 significant
/// digits at maximum precision; this leaves generous headroom).
const SCRATCH_CAP: usize = 1280;

pub(crate) struct Scratch {
    buf: [u8; SCRATCH_CAP],
    len: usize,
}

impl Scratch {
    fn new() -> Self {
        Self {
            buf: [0; SCRATCH_CAP],
            len: 0,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        // SAFETY: only ever appended to via `fmt::Write::write_str`/`write_char`
        // and `push`, all of which push valid UTF-8 (ASCII, here).
        unsafe { core::str::from_utf8_unchecked(&self.buf[..self.len]) }
    }

    fn push(&mut self, byte: u8) -> Result<(), FormatError> {
        if self.len >= self.buf.len() {
            return Err(FormatError::Allocation);
        }
        self.buf[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        if self.len + bytes.len() > self.buf.len() {
            return Err(FormatError::Allocation);
        }
        self.buf[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    fn truncate(&mut self, new_len: usize) {
        self.len = new_len;
    }
}

impl fmt::Write for Scratch {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

/// Abstracts over `f32`/`f64` for the conversion routines below.
pub trait Float: Copy {
    fn is_nan(self) -> bool;
    fn is_infinite(self) -> bool;
    fn is_sign_negative(self) -> bool;
    fn abs_value(self) -> Self;
    fn fmt_fixed(self, w: &mut Scratch, precision: usize) -> Result<(), FormatError>;
    /// Scientific notation, lowercase `e`. `precision = None` asks for the
    /// shortest digit string that round-trips.
    fn fmt_exp(self, w: &mut Scratch, precision: Option<usize>) -> Result<(), FormatError>;
    fn hex_parts(self) -> HexFloatParts;
}

macro_rules! impl_float {
    ($ty:ty, $bits:ty, $exp_bits:expr, $mantissa_bits:expr, $bias:expr) => {
        impl Float for $ty {
            fn is_nan(self) -> bool {
                <$ty>::is_nan(self)
            }
            fn is_infinite(self) -> bool {
                <$ty>::is_infinite(self)
            }
            fn is_sign_negative(self) -> bool {
                <$ty>::is_sign_negative(self)
            }
            fn abs_value(self) -> Self {
                <$ty>::abs(self)
            }
            fn fmt_fixed(self, w: &mut Scratch, precision: usize) -> Result<(), FormatError> {
                write!(w, "{:.*}", precision, self).map_err(|_| FormatError::Allocation)
            }
            fn fmt_exp(self, w: &mut Scratch, precision: Option<usize>) -> Result<(), FormatError> {
                match precision {
                    Some(p) => write!(w, "{:.*e}", p, self),
                    None => write!(w, "{:e}", self),
                }
                .map_err(|_| FormatError::Allocation)
            }
            fn hex_parts(self) -> HexFloatParts {
                let bits: $bits = self.to_bits();
                let exp_bits = ((bits >> $mantissa_bits) & ((1 << $exp_bits) - 1)) as i32;
                let mantissa_mask: $bits = (1 << $mantissa_bits) - 1;
                let mantissa = bits & mantissa_mask;
                let (leading, exponent) = if exp_bits == 0 {
                    (0u8, 1 - $bias)
                } else {
                    (1u8, exp_bits - $bias)
                };
                // Pad the mantissa to a whole number of hex nibbles.
                let pad = (4 - ($mantissa_bits % 4)) % 4;
                let padded = (mantissa as u64) << pad;
                let nibble_count = ($mantissa_bits + pad) / 4;
                let mut nibbles = [0u8; 13];
                for i in 0..nibble_count {
                    let shift = (nibble_count - 1 - i) * 4;
                    nibbles[i] = ((padded >> shift) & 0xf) as u8;
                }
                HexFloatParts {
                    leading,
                    nibbles,
                    nibble_count,
                    exponent,
                }
            }
        }
    };
}

impl_float!(f32, u32, 8u32, 23u32, 127i32);
impl_float!(f64, u64, 11u32, 52u32, 1023i32);

pub struct HexFloatParts {
    leading: u8,
    nibbles: [u8; 13],
    nibble_count: usize,
    exponent: i32,
}

/// Body of a rendered finite float: the digits/decimal point/exponent, with
/// no sign, fill, or width applied yet — those are [`crate::formatters`]'s
/// job, uniformly across every argument category.
pub struct FloatBody {
    pub negative: bool,
    text: Scratch,
}

impl FloatBody {
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

fn trim_trailing_zeros(s: &mut Scratch) {
    let bytes = s.as_str().as_bytes();
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == b'0' {
        end -= 1;
    }
    if end > 0 && bytes[end - 1] == b'.' {
        end -= 1;
    }
    s.truncate(end);
}

fn write_signed_exp(exp: i32, out: &mut Scratch) -> Result<(), FormatError> {
    out.push(if exp < 0 { b'-' } else { b'+' })?;
    let magnitude = exp.unsigned_abs();
    if magnitude < 10 {
        out.push(b'0')?;
        out.push(b'0' + magnitude as u8)?;
    } else {
        let len = crate::digits::decimal_digit_count(magnitude as u64);
        let start = out.len;
        out.len += len;
        if out.len > out.buf.len() {
            return Err(FormatError::Allocation);
        }
        crate::digits::write_decimal(magnitude as u64, &mut out.buf[start..out.len]);
    }
    Ok(())
}

/// Splits a `core`-produced `"d[.ddd]e[-]dd"` string into its bare digit run
/// (no `.`) and the signed decimal exponent.
fn parse_exp_form(s: &str) -> (&str, i32) {
    let e_pos = s.find('e').expect("core always emits an 'e' in {:e} output");
    let (mantissa, rest) = s.split_at(e_pos);
    let exp_str = &rest[1..];
    let exp: i32 = exp_str.parse().expect("core emits a valid integer exponent");
    (mantissa, exp)
}

fn digits_only(mantissa: &str, out: &mut [u8]) -> usize {
    let mut n = 0;
    for b in mantissa.bytes() {
        if b != b'.' {
            out[n] = b;
            n += 1;
        }
    }
    n
}

/// Renders a finite, non-negative `value` (caller strips the sign) per the
/// presentation rules of §4.3/§4.5: `f`/`F` fixed, `e`/`E` scientific,
/// `g`/`G`/unset shortest-with-threshold, `a`/`A` hexfloat.
pub fn render<F: Float>(
    value: F,
    ty: Option<char>,
    precision: Option<u32>,
    alt: bool,
) -> Result<FloatBody, FormatError> {
    let negative = value.is_sign_negative();
    let value = value.abs_value();
    let mut out = Scratch::new();

    match ty {
        Some('f') | Some('F') => {
            let p = precision.unwrap_or(6) as usize;
            value.fmt_fixed(&mut out, p)?;
            if alt && p == 0 {
                out.push(b'.')?;
            }
        }
        Some('e') | Some('E') => {
            let upper = ty == Some('E');
            let p = precision.unwrap_or(6) as usize;
            let mut tmp = Scratch::new();
            value.fmt_exp(&mut tmp, Some(p))?;
            let (mantissa, exp) = parse_exp_form(tmp.as_str());
            out.write_bytes(mantissa.as_bytes())?;
            if alt && p == 0 {
                out.push(b'.')?;
            }
            out.push(if upper { b'E' } else { b'e' })?;
            write_signed_exp(exp, &mut out)?;
        }
        Some('a') | Some('A') => {
            render_hex(value.hex_parts(), precision, alt, ty == Some('A'), &mut out)?;
        }
        None | Some('g') | Some('G') => {
            let upper = ty == Some('G');
            let mut tmp = Scratch::new();
            let mut digit_buf = [0u8; SCRATCH_CAP];
            let (digits, exp, sig_digits) = match precision {
                Some(p) => {
                    let p = core::cmp::max(p, 1) as usize;
                    value.fmt_exp(&mut tmp, Some(p - 1))?;
                    let (mantissa, exp) = parse_exp_form(tmp.as_str());
                    let n = digits_only(mantissa, &mut digit_buf);
                    (&digit_buf[..n], exp, p)
                }
                None => {
                    value.fmt_exp(&mut tmp, None)?;
                    let (mantissa, exp) = parse_exp_form(tmp.as_str());
                    let n = digits_only(mantissa, &mut digit_buf);
                    // The shortest digit string can be much shorter than the
                    // integer part it needs to fill out in fixed notation
                    // (e.g. `100.0` is `n=1` digit at `exp=2`): use the wider
                    // of the two as the fixed/scientific threshold, or a
                    // whole-ish magnitude like `100.0`/`1000.0` would wrongly
                    // read as having "more exponent than precision" and flip
                    // to scientific notation.
                    let threshold = core::cmp::max(n, (exp + 1).max(0) as usize);
                    (&digit_buf[..n], exp, threshold)
                }
            };
            assemble_general(digits, exp, sig_digits, alt, upper, &mut out)?;
        }
        _ => unreachable!("presentation type validated by formatters::validate_float_type"),
    }

    Ok(FloatBody {
        negative,
        text: out,
    })
}

fn assemble_general(
    digits: &[u8],
    exp: i32,
    precision: usize,
    alt: bool,
    upper: bool,
    out: &mut Scratch,
) -> Result<(), FormatError> {
    let use_scientific = exp < -4 || exp as i64 >= precision as i64;
    if use_scientific {
        out.push(digits[0])?;
        if digits.len() > 1 || alt {
            out.push(b'.')?;
            out.write_bytes(&digits[1..])?;
        }
        if !alt {
            trim_trailing_zeros(out);
        }
        out.push(if upper { b'E' } else { b'e' })?;
        write_signed_exp(exp, out)?;
    } else {
        build_fixed(digits, exp, out)?;
        if !alt {
            trim_trailing_zeros(out);
        }
    }
    Ok(())
}

/// Lays `digits` out as plain fixed notation with the decimal point placed
/// according to `exp` (no trimming — caller decides whether to trim).
fn build_fixed(digits: &[u8], exp: i32, out: &mut Scratch) -> Result<(), FormatError> {
    let p = digits.len() as i32;
    if exp >= 0 {
        let int_digits = exp + 1;
        if int_digits >= p {
            out.write_bytes(digits)?;
            for _ in 0..(int_digits - p) {
                out.push(b'0')?;
            }
            out.push(b'.')?;
            out.push(b'0')?;
        } else {
            out.write_bytes(&digits[..int_digits as usize])?;
            out.push(b'.')?;
            out.write_bytes(&digits[int_digits as usize..])?;
        }
    } else {
        out.push(b'0')?;
        out.push(b'.')?;
        for _ in 0..(-exp - 1) {
            out.push(b'0')?;
        }
        out.write_bytes(digits)?;
    }
    Ok(())
}

fn render_hex(
    parts: HexFloatParts,
    precision: Option<u32>,
    alt: bool,
    upper: bool,
    out: &mut Scratch,
) -> Result<(), FormatError> {
    let nibble_table: &[u8; 16] = if upper {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };
    out.write_bytes(if upper { b"0X" } else { b"0x" })?;
    out.push(nibble_table[parts.leading as usize])?;

    let shown: &[u8] = match precision {
        Some(p) => {
            let p = p as usize;
            if p >= parts.nibble_count {
                &parts.nibbles[..parts.nibble_count]
            } else {
                // Truncate; a fully round-to-nearest hexfloat would need
                // carry propagation on the dropped nibble, which this
                // rarely-used presentation type doesn't attempt.
                &parts.nibbles[..p]
            }
        }
        None => &parts.nibbles[..parts.nibble_count],
    };

    let has_fraction = shown.iter().any(|&n| n != 0) || precision == Some(shown.len());
    if !shown.is_empty() && (has_fraction || alt) {
        out.push(b'.')?;
        for &nibble in shown {
            out.push(nibble_table[nibble as usize])?;
        }
        if !alt && precision.is_none() {
            trim_trailing_zeros(out);
        }
    }
    out.push(if upper { b'P' } else { b'p' })?;
    write_signed_exp(parts.exponent, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_str(value: f64, ty: Option<char>, precision: Option<u32>, alt: bool) -> (bool, alloc::string::String) {
        let body = render(value, ty, precision, alt).unwrap();
        (body.negative, alloc::string::ToString::to_string(&body.as_str()))
    }

    #[test]
    fn default_shortest_matches_scenario_table() {
        assert_eq!(render_str(1.5, None, None, false).1, "1.5");
    }

    #[test]
    fn fixed_precision_rounds() {
        assert_eq!(render_str(1.2345, Some('f'), Some(2), false).1, "1.23");
    }

    #[test]
    fn general_with_precision_matches_scenario_table() {
        // 392.65 at 4 significant digits, per the base spec's scenario #5.
        assert_eq!(render_str(392.65, Some('g'), Some(4), false).1, "392.6");
    }

    #[test]
    fn general_trims_trailing_zeros() {
        assert_eq!(render_str(100.0, Some('g'), None, false).1, "100");
    }

    #[test]
    fn general_switches_to_scientific_for_small_magnitudes() {
        let (_, s) = render_str(0.000_012_3, Some('g'), None, false);
        assert!(s.contains('e'), "expected scientific form, got {s}");
    }
}
