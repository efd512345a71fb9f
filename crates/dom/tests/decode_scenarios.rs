use pretty_assertions::assert_eq;
use rstest::rstest;
use sdlite_dom::{decode_value, CivilDate, Pool, Value};
use sdlite_lexer::lex;

fn decode_first(source: &[u8]) -> Value {
    let mut lexer = lex(source, "test.sdl");
    let token = lexer.next().expect("at least one token");
    let mut chars = Pool::new();
    let mut bytes = Pool::new();
    decode_value(&token, source, &mut chars, &mut bytes).expect("decodes")
}

#[rstest]
#[case(b"null", Value::Null)]
#[case(b"true", Value::Bool(true))]
#[case(b"false", Value::Bool(false))]
#[case(b"on", Value::Bool(true))]
#[case(b"off", Value::Bool(false))]
#[case(b"42", Value::I32(42))]
#[case(b"-7", Value::I32(-7))]
#[case(b"42L", Value::I64(42))]
#[case(b"1.5f", Value::F32(1.5))]
#[case(b"1.5d", Value::F64(1.5))]
fn decodes_scalar_matrix(#[case] source: &[u8], #[case] expected: Value) {
    assert_eq!(decode_first(source), expected);
}

#[test]
fn decodes_quoted_string_escapes() {
    let value = decode_first(br#""a\"b\\c\n\t""#);
    assert_eq!(value, Value::Text("a\"b\\c\n\t".into()));
}

#[test]
fn quoted_string_continuation_drops_leading_indent() {
    let value = decode_first(b"\"a\\\n   b\"");
    assert_eq!(value, Value::Text("ab".into()));
}

#[test]
fn wysiwyg_string_is_verbatim() {
    let value = decode_first(b"`a\\nb`");
    assert_eq!(value, Value::Text("a\\nb".into()));
}

#[test]
fn binary_round_trips_through_base64() {
    let value = decode_first(b"[aGVsbG8=]");
    assert_eq!(value, Value::Binary(b"hello".to_vec().into_boxed_slice()));
}

#[test]
fn plain_date_decodes() {
    let value = decode_first(b"2015/12/06");
    assert_eq!(value, Value::Date(CivilDate::new(2015, 12, 6).unwrap()));
}

#[test]
fn date_time_with_fixed_offset() {
    let value = decode_first(b"2015/12/06 12:00:00-GMT-02:30");
    match value {
        Value::DateTime(dt) => {
            assert_eq!(dt.datetime.date, CivilDate::new(2015, 12, 6).unwrap());
            assert_eq!(dt.datetime.time.hour, 12);
            assert_eq!(dt.timezone, sdlite_dom::Timezone::FixedOffset(-150));
        }
        other => panic!("expected DateTime, got {other:?}"),
    }
}

#[test]
fn duration_with_days_decodes_to_hnsecs() {
    let value = decode_first(b"2d:12:14:34");
    let expected_seconds = 2 * 86_400 + 12 * 3600 + 14 * 60 + 34;
    assert_eq!(value, Value::Duration(expected_seconds * 10_000_000));
}

#[test]
fn negative_duration_decodes_to_negative_hnsecs() {
    let value = decode_first(b"-00:00:05");
    assert_eq!(value, Value::Duration(-5 * 10_000_000));
}
