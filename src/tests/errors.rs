use crate::{ParserError, StreamingDecoder};

fn run_to_error(source: &str) -> ParserError {
    let mut decoder = StreamingDecoder::new();
    decoder.feed(source);
    decoder.finish();
    loop {
        match decoder.next_snapshot() {
            Ok(Some(_)) => continue,
            Ok(None) => panic!("expected an error, stream blocked instead"),
            Err(e) => return e,
        }
    }
}

#[test]
fn trailing_content_after_top_level_value() {
    assert!(matches!(
        run_to_error("1 garbage"),
        ParserError::UnexpectedTrailingContent(_)
    ));
}

#[test]
fn truncated_document_is_unexpected_end_of_content() {
    let mut decoder = StreamingDecoder::new();
    decoder.feed(r#"{"a":"#);
    decoder.finish();
    let err = loop {
        match decoder.next_snapshot() {
            Ok(Some(_)) => continue,
            Ok(None) => continue,
            Err(e) => break e,
        }
    };
    assert_eq!(err, ParserError::UnexpectedEndOfContent);
}

#[test]
fn bad_escape_character() {
    assert!(matches!(run_to_error(r#""\q""#), ParserError::BadEscape('q')));
}

#[test]
fn bad_unicode_escape_sequence() {
    assert!(matches!(run_to_error(r#""\uZZZZ""#), ParserError::BadUnicodeEscape));
}

#[test]
fn invalid_number_leading_zero() {
    assert!(matches!(run_to_error("01"), ParserError::InvalidNumber(_)));
}

#[test]
fn invalid_number_bare_minus() {
    assert!(matches!(run_to_error("[-]"), ParserError::InvalidNumber(_)));
}

#[test]
fn control_character_in_string_literal() {
    let err = run_to_error("\"a\u{1}b\"");
    assert_eq!(err, ParserError::ControlCharacterInString('\u{1}'));
}

#[test]
fn missing_colon_after_key() {
    assert!(matches!(run_to_error(r#"{"a" 1}"#), ParserError::ExpectedColon('1')));
}

#[test]
fn missing_comma_in_array() {
    assert!(matches!(
        run_to_error("[1 2]"),
        ParserError::ExpectedCommaOrBracket('2')
    ));
}

#[test]
fn missing_comma_in_object() {
    assert!(matches!(
        run_to_error(r#"{"a":1 "b":2}"#),
        ParserError::ExpectedCommaOrBrace('"')
    ));
}

#[test]
fn object_key_must_be_a_string() {
    assert!(matches!(run_to_error("{1:2}"), ParserError::ExpectedObjectKey('1')));
}
