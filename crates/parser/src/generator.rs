use std::io;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use sdlite_dom::{Node, Timezone, Value};

/// Renders `nodes` back to SDLang text, one top-level node per call
/// to `write_node`, each followed by its own trailing newline. `level`
/// sets the starting indentation depth, so a caller embedding the
/// output inside an already-indented context doesn't need to
/// post-process the result.
pub fn generate<W: io::Write>(sink: &mut W, nodes: &[Node], level: usize) -> io::Result<()> {
    for node in nodes {
        write_node(sink, node, level)?;
    }
    Ok(())
}

fn write_indent<W: io::Write>(sink: &mut W, level: usize) -> io::Result<()> {
    for _ in 0..level {
        sink.write_all(b"\t")?;
    }
    Ok(())
}

fn write_node<W: io::Write>(sink: &mut W, node: &Node, level: usize) -> io::Result<()> {
    write_indent(sink, level)?;

    let anonymous = node.is_anonymous();
    if !anonymous {
        sink.write_all(node.qualified_name.as_bytes())?;
    }

    for (i, value) in node.values.iter().enumerate() {
        if i > 0 || !anonymous {
            sink.write_all(b" ")?;
        }
        write_value(sink, value)?;
    }

    for attribute in node.attributes.iter() {
        sink.write_all(b" ")?;
        sink.write_all(attribute.qualified_name.as_bytes())?;
        sink.write_all(b"=")?;
        write_value(sink, &attribute.value)?;
    }

    if !node.children.is_empty() {
        sink.write_all(b" {\n")?;
        for child in node.children.iter() {
            write_node(sink, child, level + 1)?;
        }
        write_indent(sink, level)?;
        sink.write_all(b"}\n")?;
    } else {
        sink.write_all(b"\n")?;
    }
    Ok(())
}

fn write_value<W: io::Write>(sink: &mut W, value: &Value) -> io::Result<()> {
    match value {
        Value::Null => sink.write_all(b"null"),
        Value::Text(text) => escape_sdl_string(sink, text),
        Value::Binary(bytes) => {
            sink.write_all(b"[")?;
            sink.write_all(BASE64.encode(bytes.as_ref()).as_bytes())?;
            sink.write_all(b"]")
        }
        Value::I32(v) => write!(sink, "{v}"),
        Value::I64(v) => write!(sink, "{v}L"),
        // A `bd`-suffixed literal always decodes to `Value::Null` (see
        // `sdlite_dom::Value`'s doc comment), so there is nothing to render
        // here that differs from the `Null` arm; kept distinct so a future
        // arbitrary-precision payload doesn't silently fall through to it.
        Value::Decimal => sink.write_all(b"null"),
        Value::F32(v) => {
            write_float32(sink, *v)?;
            sink.write_all(b"f")
        }
        Value::F64(v) => write_float(sink, *v),
        Value::Bool(v) => sink.write_all(if *v { b"true" } else { b"false" }),
        Value::Date(date) => write!(sink, "{:04}/{:02}/{:02}", date.year, date.month, date.day),
        Value::DateTime(dt) => {
            write!(
                sink,
                "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
                dt.datetime.date.year, dt.datetime.date.month, dt.datetime.date.day,
                dt.datetime.time.hour, dt.datetime.time.minute, dt.datetime.time.second
            )?;
            write_fraction(sink, dt.fractional_hnsecs as u64)?;
            write_timezone(sink, &dt.timezone)
        }
        Value::Duration(hnsecs) => write_duration(sink, *hnsecs),
    }
}

fn write_timezone<W: io::Write>(sink: &mut W, timezone: &Timezone) -> io::Result<()> {
    match timezone {
        Timezone::Local => Ok(()),
        Timezone::Utc => sink.write_all(b"-UTC"),
        Timezone::FixedOffset(minutes) => {
            let sign = if *minutes < 0 { '-' } else { '+' };
            let abs = minutes.unsigned_abs();
            write!(sink, "-GMT{sign}{:02}:{:02}", abs / 60, abs % 60)
        }
        Timezone::Named(name) => write!(sink, "-{name}"),
    }
}

/// Duration rendering: `[Nd:]HH:MM[:SS[.frac]]`, negated as a whole
/// when `hnsecs` is negative. Seconds and the fractional part are both
/// omitted when both are zero.
fn write_duration<W: io::Write>(sink: &mut W, hnsecs: i64) -> io::Result<()> {
    if hnsecs < 0 {
        sink.write_all(b"-")?;
    }
    let mut remaining = hnsecs.unsigned_abs();

    const HNSECS_PER_SECOND: u64 = 10_000_000;
    let fraction = remaining % HNSECS_PER_SECOND;
    remaining /= HNSECS_PER_SECOND;

    let seconds = remaining % 60;
    remaining /= 60;
    let minutes = remaining % 60;
    remaining /= 60;
    let hours = remaining % 24;
    let days = remaining / 24;

    if days > 0 {
        write!(sink, "{days}d:")?;
    }
    write!(sink, "{hours:02}:{minutes:02}")?;
    if seconds > 0 || fraction > 0 {
        write!(sink, ":{seconds:02}")?;
        write_fraction(sink, fraction)?;
    }
    Ok(())
}

/// Fractional-seconds rendering shared by durations and date-times: zero
/// prints nothing; a value that lands on a whole millisecond prints the
/// compact 3-digit form; anything finer prints the full 7-digit hnsecs.
fn write_fraction<W: io::Write>(sink: &mut W, hnsecs: u64) -> io::Result<()> {
    const HNSECS_PER_MS: u64 = 10_000;
    if hnsecs == 0 {
        Ok(())
    } else if hnsecs % HNSECS_PER_MS == 0 {
        write!(sink, ".{:03}", hnsecs / HNSECS_PER_MS)
    } else {
        write!(sink, ".{hnsecs:07}")
    }
}

/// Rust's own `Display` for `f64` already yields the shortest decimal that
/// round-trips, which satisfies the "no redundant trailing zeros" rule
/// more directly than recomputing significant digits by hand. Integer-
/// valued floats still force one fractional digit, and non-finite values
/// collapse to the conventional `"0.0"`.
pub fn write_float<W: io::Write>(sink: &mut W, v: f64) -> io::Result<()> {
    if !v.is_finite() || v == 0.0 {
        sink.write_all(b"0.0")
    } else if v.fract() == 0.0 {
        write!(sink, "{v:.1}")
    } else {
        write!(sink, "{v}")
    }
}

/// `f32` counterpart to [`write_float`], formatted through `f32`'s own
/// `Display` rather than widened to `f64` first — widening is lossless for
/// the value itself but not for its shortest decimal rendering (e.g.
/// `0.2f32` widened to `f64` prints as `0.20000000298023224`, not `0.2`).
pub fn write_float32<W: io::Write>(sink: &mut W, v: f32) -> io::Result<()> {
    if !v.is_finite() || v == 0.0 {
        sink.write_all(b"0.0")
    } else if v.fract() == 0.0 {
        write!(sink, "{v:.1}")
    } else {
        write!(sink, "{v}")
    }
}

/// String escaping: backslash, double quote, and the three
/// whitespace control characters are escaped; everything else (including
/// non-ASCII) passes through unchanged.
pub fn escape_sdl_string<W: io::Write>(sink: &mut W, text: &str) -> io::Result<()> {
    sink.write_all(b"\"")?;
    for ch in text.chars() {
        match ch {
            '\\' => sink.write_all(b"\\\\")?,
            '"' => sink.write_all(b"\\\"")?,
            '\n' => sink.write_all(b"\\n")?,
            '\r' => sink.write_all(b"\\r")?,
            '\t' => sink.write_all(b"\\t")?,
            other => {
                let mut buf = [0u8; 4];
                sink.write_all(other.encode_utf8(&mut buf).as_bytes())?;
            }
        }
    }
    sink.write_all(b"\"")
}

/// Convenience wrapper for callers that want an owned `String` rather than
/// driving a byte sink themselves.
pub fn generate_to_string(nodes: &[Node]) -> String {
    let mut buf = Vec::new();
    generate(&mut buf, nodes, 0).expect("writing to a Vec<u8> never fails");
    String::from_utf8(buf).expect("generator only ever writes valid UTF-8")
}
