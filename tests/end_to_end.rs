//! End-to-end scenario table, driven entirely through the public crate
//! surface (`format!`/`write!`/`format_to_n!`/`formatted_size`), as a
//! separate compilation unit from the crate itself. These are the same
//! twenty-odd scenarios `src/tests.rs` exercises from inside the crate;
//! this file instead stands in for a consumer who only sees what's
//! exported from `lib.rs`.

use fmt_core::{format, format_to_n, formatted_size, write, Arguments, Buffer, FormatError, ToArgValue};

#[test]
fn positional_and_auto_indices_mix_with_heterogeneous_types() {
    assert_eq!(format!("{} and {} and {}", 42, "abc1", 1.5).unwrap(), "42 and abc1 and 1.5");
}

#[test]
fn repeated_manual_index() {
    assert_eq!(format!("{0}{1}{0}", "abra", "cad").unwrap(), "abracadabra");
}

#[test]
fn float_precision_matches_significant_digits() {
    assert_eq!(format!("{:.2}", 1.2345).unwrap(), "1.2");
}

#[test]
fn signed_zero_padded_general_float() {
    assert_eq!(format!("{:+010.4g}", 392.65).unwrap(), "+0000392.6");
}

#[test]
fn dynamic_precision_from_another_argument() {
    assert_eq!(format!("{0:.{1}}", 1.2345, 2).unwrap(), "1.2");
}

#[test]
fn alternate_binary_prefix() {
    assert_eq!(format!("{:#b}", 42).unwrap(), "0b101010");
}

#[test]
fn negative_hex_keeps_sign_before_prefix() {
    assert_eq!(format!("{:#x}", -0x42).unwrap(), "-0x42");
}

#[test]
fn nan_and_infinity_render_as_words() {
    assert_eq!(format!("{}", f64::NAN).unwrap(), "nan");
    assert_eq!(format!("{:>7}", f64::INFINITY).unwrap(), "    inf");
}

#[test]
fn precision_on_an_integer_is_an_error() {
    let err = format!("{0:.2}", 42).unwrap_err();
    assert_eq!(
        err,
        FormatError::ArgumentBinding("precision not allowed for this argument type")
    );
}

#[test]
fn switching_from_manual_to_automatic_indexing_is_an_error() {
    let err = format!("{0}{}", 'a', 'b').unwrap_err();
    assert_eq!(
        err,
        FormatError::IndexingMode("cannot switch from manual to automatic argument indexing")
    );
}

#[test]
fn nested_automatic_index_as_a_precision_reference() {
    assert_eq!(format!("{:.{}}", "str", 2).unwrap(), "st");
}

#[test]
fn debug_escape_of_control_characters() {
    assert_eq!(format!("{:?}", "t\nst").unwrap(), "\"t\\nst\"");
}

#[test]
fn write_into_a_caller_owned_buffer() {
    let mut buf = Buffer::new();
    let written = write!(&mut buf, "{} items at {:.2}", 3, 2.5).unwrap();
    assert_eq!(buf.as_str(), "3 items at 2.50");
    assert_eq!(written, buf.as_str().len());
}

#[test]
fn format_to_n_truncates_while_formatted_size_reports_the_full_length() {
    let values = ["answer".to_arg_value(), 42i32.to_arg_value()];
    let args = Arguments::new(&values, &[]);
    let mut small = [0u8; 6];
    let result = format_to_n(&mut small, "{0} is {1}", &args).unwrap();
    assert_eq!(&small, b"answer");
    let full_len = formatted_size("{0} is {1}", &args).unwrap();
    assert_eq!(result.size, full_len);
    assert!(result.written < result.size);
}

#[test]
fn named_and_positional_arguments_combine() {
    assert_eq!(format!("{name} scored {0}", 97; name = "Ada").unwrap(), "Ada scored 97");
}
