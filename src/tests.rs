//! Cross-cutting scenario and invariant tests that exercise the parser,
//! argument table, and formatters together through the public macro front
//! end, rather than any one module in isolation.

use crate::{Arguments, Buffer, FormatError, Sink, ToArgValue};
use alloc::string::ToString;

fn fmt(template: &str, values: &[crate::ArgValue<'_>]) -> Result<alloc::string::String, FormatError> {
    crate::format(template, &Arguments::new(values, &[]))
}

// --- 8.3 concrete end-to-end scenarios -------------------------------------

#[test]
fn scenario_positional_and_named_mix() {
    let s = format!("{} and {} and {}", 42, "abc1", 1.5).unwrap();
    assert_eq!(s, "42 and abc1 and 1.5");
}

#[test]
fn scenario_repeated_manual_index() {
    let s = format!("{0}{1}{0}", "abra", "cad").unwrap();
    assert_eq!(s, "abracadabra");
}

#[test]
fn scenario_center_pads_by_char_count() {
    // The base scenario table centers a 4-byte emoji in a width-6 field and
    // describes the result as "byte-wise", which this crate does not
    // replicate: width here counts `char`s (Unicode scalar values), the same
    // unit `core::fmt`'s own padding uses, not UTF-8 bytes or UTF-16 units.
    // See DESIGN.md for this open question's resolution.
    let s = format!("{:*^6}", "\u{1F921}").unwrap();
    assert_eq!(s, "**\u{1F921}***");
}

#[test]
fn scenario_float_default_precision() {
    let s = format!("{:.2}", 1.2345).unwrap();
    assert_eq!(s, "1.2");
}

#[test]
fn scenario_general_signed_zero_padded() {
    let s = format!("{:+010.4g}", 392.65).unwrap();
    assert_eq!(s, "+0000392.6");
}

#[test]
fn scenario_dynamic_precision() {
    let s = format!("{0:.{1}}", 1.2345, 2).unwrap();
    assert_eq!(s, "1.2");
}

#[test]
fn scenario_alt_binary() {
    let s = format!("{:#b}", 42).unwrap();
    assert_eq!(s, "0b101010");
}

#[test]
fn scenario_negative_hex_with_prefix() {
    let s = format!("{:#x}", -0x42).unwrap();
    assert_eq!(s, "-0x42");
}

#[test]
fn scenario_nan() {
    let s = format!("{}", f64::NAN).unwrap();
    assert_eq!(s, "nan");
}

#[test]
fn scenario_infinity_right_aligned() {
    let s = format!("{:>7}", f64::INFINITY).unwrap();
    assert_eq!(s, "    inf");
}

#[test]
fn scenario_precision_on_integer_is_rejected() {
    // The base spec offers two equivalent wordings for this error
    // ("precision specifier requires floating-point argument" /
    // "precision not allowed for this argument type"); this crate uses the
    // latter uniformly across every non-float, non-string argument kind.
    let err = format!("{0:.2}", 42).unwrap_err();
    assert_eq!(
        err,
        FormatError::ArgumentBinding("precision not allowed for this argument type")
    );
}

#[test]
fn scenario_manual_then_automatic_index_errors() {
    let err = format!("{0}{}", 'a', 'b').unwrap_err();
    assert_eq!(
        err,
        FormatError::IndexingMode("cannot switch from manual to automatic argument indexing")
    );
}

#[test]
fn scenario_nested_auto_index_as_precision() {
    let s = format!("{:.{}}", "str", 2).unwrap();
    assert_eq!(s, "st");
}

#[test]
fn scenario_debug_escapes_control_characters() {
    let s = format!("{:?}", "t\nst").unwrap();
    assert_eq!(s, "\"t\\nst\"");
}

// --- 8.1 quantified invariants ----------------------------------------------

#[test]
fn literal_text_is_idempotent() {
    let s = format!("plain text, no fields at all").unwrap();
    assert_eq!(s, "plain text, no fields at all");
}

#[test]
fn escape_round_trip() {
    assert_eq!(format!("{{{{").unwrap(), "{{");
    assert_eq!(format!("}}}}").unwrap(), "}}");
    assert_eq!(format!("{{}}").unwrap(), "{}");
}

#[test]
fn auto_indexing_matches_explicit_indices() {
    let auto = format!("{} {} {}", 1, 2, 3).unwrap();
    let explicit = format!("{0} {1} {2}", 1, 2, 3).unwrap();
    assert_eq!(auto, explicit);
}

#[test]
fn width_is_a_lower_bound_on_output_length() {
    let s = format!("{:10}", 42).unwrap();
    assert!(s.chars().count() >= 10);
}

#[test]
fn fill_padding_does_not_alter_the_core_content() {
    let padded = format!("{:*>8}", "core").unwrap();
    let bare = format!("{}", "core").unwrap();
    assert!(padded.ends_with(bare.as_str()));
    assert_eq!(padded.len() - bare.len(), 4);
}

#[test]
fn sign_flags_are_consistent_with_the_bare_rendering() {
    let bare = format!("{}", 7).unwrap();
    assert_eq!(format!("{:+}", 7).unwrap(), alloc::format!("+{bare}"));
    assert_eq!(format!("{: }", 7).unwrap(), alloc::format!(" {bare}"));
    assert_eq!(format!("{:-}", 7).unwrap(), bare);
}

#[test]
fn shortest_decimal_float_round_trips() {
    let values: [f64; 4] = [0.1, 1234.5678, -9.999_999, 3.141_592_653_589_79];
    for &v in &values {
        let s = format!("{}", v).unwrap();
        let parsed: f64 = s.parse().unwrap();
        assert_eq!(parsed, v, "{s} did not round-trip to {v}");
    }
}

#[test]
fn no_heap_allocation_under_inline_capacity() {
    let mut buf = Buffer::new();
    write!(&mut buf, "{}", "well under the inline region").unwrap();
    assert!(matches!(buf, Buffer::Inline { .. }));
}

// --- 8.2 boundary behaviours -------------------------------------------------

#[test]
fn argument_index_past_i32_max_is_numeric_overflow() {
    let err = format!("{2147483648}").unwrap_err();
    assert_eq!(err, FormatError::NumericOverflow("number is too big in format"));
}

#[test]
fn width_past_i32_max_is_numeric_overflow() {
    let err = format!("{:2147483648}", 1).unwrap_err();
    assert_eq!(err, FormatError::NumericOverflow("number is too big in format"));
}

#[test]
fn argument_count_at_and_past_max_packed_both_succeed() {
    let packed: [crate::ArgValue<'_>; crate::MAX_PACKED] =
        core::array::from_fn(|i| (i as i32).to_arg_value());
    let args = Arguments::new(&packed, &[]);
    assert_eq!(args.len(), crate::MAX_PACKED);
    assert_eq!(crate::format_into(&mut Buffer::new(), "{14}", &args).unwrap(), 2);

    let mut spilled = packed.to_vec();
    spilled.push(99i32.to_arg_value());
    let args = Arguments::new(&spilled, &[]);
    assert_eq!(args.len(), crate::MAX_PACKED + 1);
    let s = crate::format("{15}", &args).unwrap();
    assert_eq!(s, "99");
}

#[test]
fn zero_precision_general_float_still_emits_a_digit() {
    let s = format!("{:.0g}", 0.000_3).unwrap();
    assert!(!s.is_empty());
    assert!(s.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn multi_byte_fill_character_pads_by_char_unit() {
    let s = format!("{:\u{2605}>5}", "x").unwrap();
    assert_eq!(s.chars().count(), 5);
    assert_eq!(s, "\u{2605}\u{2605}\u{2605}\u{2605}x");
}

// --- a few extra cross-cutting checks exercised through the macro front end -

#[test]
fn named_arguments_resolve_alongside_positional_ones() {
    let s = format!("{0}-{extra}", 1; extra = "x").unwrap();
    assert_eq!(s, "1-x");
}

#[test]
fn missing_named_argument_is_reported() {
    let err = fmt("{missing}", &[]).unwrap_err();
    assert_eq!(err, FormatError::ArgumentBinding("argument not found"));
}

#[test]
fn custom_format_type_round_trips_through_the_macro() {
    struct Point {
        x: i32,
        y: i32,
    }

    impl crate::CustomFormat for Point {
        fn format(&self, spec: &crate::FormatSpec, sink: &mut dyn Sink) -> Result<(), FormatError> {
            let text = alloc::format!("({}, {})", self.x, self.y);
            crate::format_into(sink, "{}", &Arguments::new(&[text.as_str().to_arg_value()], &[]))?;
            let _ = spec;
            Ok(())
        }
    }

    let p = Point { x: 1, y: 2 };
    let s = format!("{}", crate::custom(&p)).unwrap();
    assert_eq!(s, "(1, 2)");
}

#[test]
fn format_to_n_reports_both_written_and_logical_size() {
    let mut buf = [0u8; 4];
    let result = format_to_n!(&mut buf, "{}-{}", 12, 3456).unwrap();
    assert_eq!(&buf, b"12-3");
    assert_eq!(result.written, 4);
    assert_eq!(result.size, 7);
}

#[test]
fn formatted_size_matches_real_output_length() {
    let s = format!("{:>8.3}", 3.141_59).unwrap();
    assert_eq!(
        crate::formatted_size("{:>8.3}", &Arguments::new(&[3.141_59f64.to_arg_value()], &[])).unwrap(),
        s.to_string().len()
    );
}
