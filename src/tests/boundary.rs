use super::decode_complete;
use crate::JsonValue;

#[test]
fn large_and_small_magnitude_numbers() {
    assert_eq!(decode_complete("1e308"), JsonValue::Number(1e308));
    assert_eq!(decode_complete("1e-308"), JsonValue::Number(1e-308));
    assert_eq!(decode_complete("0"), JsonValue::Number(0.0));
    assert_eq!(decode_complete("-0"), JsonValue::Number(-0.0));
}

#[test]
fn forward_slash_escape() {
    assert_eq!(decode_complete(r#""a\/b""#), JsonValue::String("a/b".into()));
}

#[test]
fn null_character_escape() {
    let source = "\"\\u0000\"";
    assert_eq!(decode_complete(source), JsonValue::String("\u{0}".into()));
}

#[test]
fn all_short_escapes() {
    assert_eq!(
        decode_complete(r#""\n\r\t\b\f\\\"\/""#),
        JsonValue::String("\n\r\t\u{08}\u{0C}\\\"/".into())
    );
}

#[test]
fn top_level_scalars_need_no_container() {
    assert_eq!(decode_complete("  true  "), JsonValue::Boolean(true));
    assert_eq!(decode_complete("\n\t 7 \n"), JsonValue::Number(7.0));
}

#[test]
fn deeply_nested_arrays() {
    const DEPTH: usize = 64;
    let source = format!("{}{}{}", "[".repeat(DEPTH), "1", "]".repeat(DEPTH));
    let value = decode_complete(&source);
    let mut current = &value;
    for _ in 0..DEPTH - 1 {
        let JsonValue::Array(items) = current else {
            panic!("expected nested array")
        };
        assert_eq!(items.len(), 1);
        current = &items[0];
    }
    let JsonValue::Array(items) = current else {
        panic!("expected innermost array")
    };
    assert_eq!(items, &vec![JsonValue::Number(1.0)]);
}

#[test]
fn empty_string_value() {
    assert_eq!(decode_complete(r#""""#), JsonValue::String(String::new()));
}

#[test]
fn duplicate_object_keys_last_write_wins() {
    let value = decode_complete(r#"{"a":1,"a":2}"#);
    let JsonValue::Object(map) = value else {
        panic!("expected object")
    };
    assert_eq!(map.get("a"), Some(&JsonValue::Number(2.0)));
    assert_eq!(map.len(), 1);
    // Insertion order is preserved even though the value was overwritten.
    assert_eq!(map.keys().next().map(String::as_str), Some("a"));
}
