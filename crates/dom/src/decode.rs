use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use sdlite_lexer::{Token, TokenKind};

use crate::error::{SdlError, SdlErrorKind};
use crate::pool::Pool;
use crate::value::{CivilDate, CivilDateTime, CivilTime, DateTimeValue, Hnsecs, Timezone, Value};

/// Decodes a token's text range into its typed [`Value`].
///
/// Tokens whose kind is not one of the scalar kinds decode to `Value::Null`.
/// String and binary payloads are accumulated through `chars`/`bytes` and
/// extracted as independent owned slices before this function returns, so
/// the pools are ready for the next token immediately afterwards.
pub fn decode_value(token: &Token, source: &[u8], chars: &mut Pool<u8>, bytes: &mut Pool<u8>) -> Result<Value, SdlError> {
    let text = token.text(source);
    match token.kind {
        TokenKind::Null => Ok(Value::Null),
        TokenKind::Text => decode_text(text, chars),
        TokenKind::Binary => decode_binary(token, text, bytes),
        TokenKind::Number => decode_number(token, text),
        TokenKind::Boolean => Ok(decode_boolean(text)),
        TokenKind::Date => decode_date(token, text).map(Value::Date),
        TokenKind::Duration => decode_duration(token, text).map(Value::Duration),
        TokenKind::DateTime => decode_date_time(token, text).map(Value::DateTime),
        _ => Ok(Value::Null),
    }
}

/// Extension trait adding `Token::decode` as an inherent-feeling convenience
/// over the free `decode_value` function.
pub trait TokenDecode {
    fn decode(&self, source: &[u8], chars: &mut Pool<u8>, bytes: &mut Pool<u8>) -> Result<Value, SdlError>;
}

impl TokenDecode for Token {
    fn decode(&self, source: &[u8], chars: &mut Pool<u8>, bytes: &mut Pool<u8>) -> Result<Value, SdlError> {
        decode_value(self, source, chars, bytes)
    }
}

fn malformed(token: &Token, what: &str) -> SdlError {
    SdlError::new(SdlErrorKind::OutOfRangeComponent, token.location.clone(), format!("malformed {what} literal"))
}

fn decode_text(text: &[u8], chars: &mut Pool<u8>) -> Result<Value, SdlError> {
    let body = &text[1..text.len() - 1];
    if text.first() == Some(&b'`') {
        chars.put_slice(body);
    } else {
        let mut i = 0;
        while i < body.len() {
            match body[i] {
                b'\\' => {
                    i += 1;
                    match body[i] {
                        b'"' => {
                            chars.put(b'"');
                            i += 1;
                        }
                        b'\\' => {
                            chars.put(b'\\');
                            i += 1;
                        }
                        b'n' => {
                            chars.put(b'\n');
                            i += 1;
                        }
                        b'r' => {
                            chars.put(b'\r');
                            i += 1;
                        }
                        b't' => {
                            chars.put(b'\t');
                            i += 1;
                        }
                        b'\r' => {
                            i += 1;
                            if body.get(i) == Some(&b'\n') {
                                i += 1;
                            }
                            while matches!(body.get(i), Some(b' ') | Some(b'\t')) {
                                i += 1;
                            }
                        }
                        b'\n' => {
                            i += 1;
                            while matches!(body.get(i), Some(b' ') | Some(b'\t')) {
                                i += 1;
                            }
                        }
                        other => unreachable!("lexer already rejected escape '\\{}'", other as char),
                    }
                }
                b => {
                    chars.put(b);
                    i += 1;
                }
            }
        }
    }
    let owned = chars.extract_array().into_vec();
    let s = String::from_utf8(owned).expect("token text is a slice of valid UTF-8 input");
    Ok(Value::Text(s.into_boxed_str()))
}

fn decode_binary(token: &Token, text: &[u8], bytes: &mut Pool<u8>) -> Result<Value, SdlError> {
    let body = &text[1..text.len() - 1];
    let filtered: Vec<u8> = body.iter().copied().filter(|b| !matches!(b, b' ' | b'\t' | b'\r' | b'\n')).collect();
    let decoded = BASE64
        .decode(&filtered)
        .map_err(|e| SdlError::new(SdlErrorKind::OutOfRangeComponent, token.location.clone(), format!("invalid base64 data: {e}")))?;
    bytes.put_slice(&decoded);
    Ok(Value::Binary(bytes.extract_array()))
}

fn split_numeric_suffix(s: &str) -> (&str, Option<char>) {
    match s.chars().next_back() {
        Some(c @ ('l' | 'L' | 'd' | 'D' | 'f' | 'F')) => (&s[..s.len() - c.len_utf8()], Some(c)),
        _ => (s, None),
    }
}

fn clamp_i32(v: i64) -> i32 {
    if v > i32::MAX as i64 {
        i32::MAX
    } else if v < i32::MIN as i64 {
        i32::MIN
    } else {
        v as i32
    }
}

fn decode_number(token: &Token, text: &[u8]) -> Result<Value, SdlError> {
    let s = std::str::from_utf8(text).expect("numeric token text is ASCII");
    if !text.contains(&b'.') {
        let (core, suffix) = split_numeric_suffix(s);
        let parsed: i64 = core.parse().map_err(|_| malformed(token, "number"))?;
        Ok(match suffix {
            Some('l') | Some('L') => Value::I64(parsed),
            Some('d') | Some('D') => Value::F64(parsed as f64),
            Some('f') | Some('F') => Value::F32(parsed as f32),
            _ => Value::I32(clamp_i32(parsed)),
        })
    } else {
        let lower = s.to_ascii_lowercase();
        if lower.ends_with("bd") {
            return Ok(Value::Null);
        }
        if s.ends_with('f') || s.ends_with('F') {
            let core = &s[..s.len() - 1];
            return core.parse::<f32>().map(Value::F32).map_err(|_| malformed(token, "number"));
        }
        let core = if s.ends_with('d') || s.ends_with('D') { &s[..s.len() - 1] } else { s };
        core.parse::<f64>().map(Value::F64).map_err(|_| malformed(token, "number"))
    }
}

fn decode_boolean(text: &[u8]) -> Value {
    Value::Bool(matches!(text, b"true" | b"on"))
}

fn decode_date(token: &Token, text: &[u8]) -> Result<CivilDate, SdlError> {
    let s = std::str::from_utf8(text).expect("date token text is ASCII");
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s),
    };
    let mut parts = rest.splitn(3, '/');
    let year: i32 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(|| malformed(token, "date"))?;
    let month: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(|| malformed(token, "date"))?;
    let day: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(|| malformed(token, "date"))?;
    CivilDate::new(sign * year, month, day).map_err(|msg| SdlError::new(SdlErrorKind::OutOfRangeComponent, token.location.clone(), msg))
}

/// Parses `SS` or `SS.frac`, right-padding `frac` to 7 digits before
/// conversion to hundred-nanosecond ticks. Shared between
/// duration and date-time decoding.
fn split_seconds_fraction(s: &str, token: &Token) -> Result<(i64, i64), SdlError> {
    match s.split_once('.') {
        Some((sec, frac)) => {
            let seconds: i64 = sec.parse().map_err(|_| malformed(token, "time"))?;
            let mut padded = frac.to_string();
            if padded.len() > 7 {
                padded.truncate(7);
            }
            while padded.len() < 7 {
                padded.push('0');
            }
            let ticks: i64 = padded.parse().map_err(|_| malformed(token, "time"))?;
            Ok((seconds, ticks))
        }
        None => {
            let seconds: i64 = s.parse().map_err(|_| malformed(token, "time"))?;
            Ok((seconds, 0))
        }
    }
}

fn decode_duration(token: &Token, text: &[u8]) -> Result<Hnsecs, SdlError> {
    let s = std::str::from_utf8(text).expect("duration token text is ASCII");
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, s),
    };
    let (days, rest) = match rest.split_once('d') {
        Some((d, r)) => (d.parse::<i64>().map_err(|_| malformed(token, "duration"))?, r.strip_prefix(':').unwrap_or(r)),
        None => (0, rest),
    };
    let mut segments = rest.split(':');
    let hours: i64 = segments.next().and_then(|p| p.parse().ok()).ok_or_else(|| malformed(token, "duration"))?;
    let minutes: i64 = segments.next().and_then(|p| p.parse().ok()).ok_or_else(|| malformed(token, "duration"))?;
    let sec_and_frac = segments.next().ok_or_else(|| malformed(token, "duration"))?;
    let (seconds, fractional_hnsecs) = split_seconds_fraction(sec_and_frac, token)?;
    let total_seconds = ((days * 24 + hours) * 60 + minutes) * 60 + seconds;
    Ok(sign * (total_seconds * 10_000_000 + fractional_hnsecs))
}

fn split_timezone(rest: &str) -> (&str, Option<&str>) {
    match rest.split_once('-') {
        Some((time, tz)) => (time, Some(tz)),
        None => (rest, None),
    }
}

fn decode_timezone(tz: Option<&str>, token: &Token) -> Result<Timezone, SdlError> {
    let Some(tz) = tz else {
        return Ok(Timezone::Local);
    };
    if tz.len() < 3 {
        return Err(malformed(token, "timezone"));
    }
    let (name, offset) = tz.split_at(3);
    if offset.is_empty() {
        return Ok(if name == "UTC" || name == "GMT" { Timezone::Utc } else { Timezone::Named(name.into()) });
    }
    let mut chars = offset.chars();
    let sign = match chars.next() {
        Some('+') => 1i32,
        Some('-') => -1i32,
        _ => return Err(malformed(token, "timezone")),
    };
    let digits: String = chars.collect();
    let (hh, mm) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None => (digits.as_str(), "0"),
    };
    let hh: i32 = hh.parse().map_err(|_| malformed(token, "timezone"))?;
    let mm: i32 = mm.parse().map_err(|_| malformed(token, "timezone"))?;
    Ok(Timezone::FixedOffset(sign * (hh * 60 + mm)))
}

fn decode_date_time(token: &Token, text: &[u8]) -> Result<DateTimeValue, SdlError> {
    let s = std::str::from_utf8(text).expect("date-time token text is ASCII");
    let (date_part, rest) = s.split_once(' ').ok_or_else(|| malformed(token, "date-time"))?;
    let date = decode_date(token, date_part.as_bytes())?;
    let (time_part, tz_part) = split_timezone(rest);
    let mut segments = time_part.split(':');
    let hour: u8 = segments.next().and_then(|p| p.parse().ok()).ok_or_else(|| malformed(token, "date-time"))?;
    let minute: u8 = segments.next().and_then(|p| p.parse().ok()).ok_or_else(|| malformed(token, "date-time"))?;
    let (second, fractional_hnsecs) = match segments.next() {
        Some(sec_and_frac) => split_seconds_fraction(sec_and_frac, token)?,
        None => (0, 0),
    };
    let second = u8::try_from(second).map_err(|_| malformed(token, "date-time"))?;
    let time = CivilTime::new(hour, minute, second).map_err(|msg| SdlError::new(SdlErrorKind::OutOfRangeComponent, token.location.clone(), msg))?;
    let timezone = decode_timezone(tz_part, token)?;
    Ok(DateTimeValue { datetime: CivilDateTime { date, time }, fractional_hnsecs: fractional_hnsecs as u32, timezone })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sdlite_lexer::lex;

    use super::*;

    fn decode_first(source: &str) -> Value {
        let bytes = source.as_bytes();
        let token = lex(bytes, "test.sdl").next().unwrap();
        let mut chars = Pool::new();
        let mut binary = Pool::new();
        decode_value(&token, bytes, &mut chars, &mut binary).expect("decode")
    }

    #[rstest]
    #[case("1", Value::I32(1))]
    #[case("-1", Value::I32(-1))]
    #[case("1L", Value::I64(1))]
    #[case("1.5", Value::F64(1.5))]
    #[case("1.5f", Value::F32(1.5))]
    #[case("1.0bd", Value::Null)]
    #[case("true", Value::Bool(true))]
    #[case("off", Value::Bool(false))]
    #[case("null", Value::Null)]
    fn scalar_decode_matrix(#[case] input: &str, #[case] expected: Value) {
        assert_eq!(decode_first(input), expected);
    }

    #[test]
    fn decodes_quoted_escape_sequences() {
        assert_eq!(decode_first(r#""foo\"bar""#), Value::Text("foo\"bar".into()));
    }

    #[test]
    fn decodes_line_continuation_inside_quoted_string() {
        assert_eq!(decode_first("\"foo\\\n  bar\""), Value::Text("foobar".into()));
    }

    #[test]
    fn decodes_wysiwyg_verbatim() {
        assert_eq!(decode_first("`foo\\bar`"), Value::Text("foo\\bar".into()));
    }

    #[test]
    fn decodes_binary_base64() {
        assert_eq!(decode_first("[aGVsbG8sIHdvcmxkIQ==]"), Value::Binary(b"hello, world!".to_vec().into_boxed_slice()));
    }

    #[test]
    fn decodes_date_time_with_fixed_offset() {
        let value = decode_first("2015/12/06 12:00:00-GMT-02:30");
        match value {
            Value::DateTime(dt) => {
                assert_eq!(dt.datetime.date, CivilDate::new(2015, 12, 6).unwrap());
                assert_eq!(dt.datetime.time, CivilTime::new(12, 0, 0).unwrap());
                assert_eq!(dt.timezone, Timezone::FixedOffset(-150));
            }
            other => panic!("expected DateTime, got {other:?}"),
        }
    }

    #[test]
    fn decodes_duration_with_days() {
        let days = 2i64;
        let hours = 12i64;
        let minutes = 14i64;
        let seconds = 34i64;
        let expected = ((days * 24 + hours) * 60 + minutes) * 60 + seconds;
        assert_eq!(decode_first("2d:12:14:34"), Value::Duration(expected * 10_000_000));
    }

    #[test]
    fn rejects_invalid_month() {
        let bytes = "2015/13/06".as_bytes();
        let token = lex(bytes, "test.sdl").next().unwrap();
        let mut chars = Pool::new();
        let mut binary = Pool::new();
        assert!(decode_value(&token, bytes, &mut chars, &mut binary).is_err());
    }
}
