/*!
CBOR to text rendering

Renders one CBOR item as diagnostic-style text:

- integers in decimal, byte strings as `h'0a0b'`, text strings quoted and escaped
- arrays as `[1, 2]`, maps as `{1: 2}`, tags as `24(h'01')`
- `false`, `true`, `null`, `undefined`, `simple(n)` and floats (`1.5`, `NaN`, `-Infinity`)

Indefinite-length items render exactly like their definite counterparts.
Containers nested deeper than the caller's `max_depth` are shown as `...`.
Nesting is otherwise bounded by [`DEFAULT_MAX_DEPTH`] exactly as for
[`skip`](crate::decode::skip): a container rendered beyond it fails with
[`Error::NotImplemented`].
*/

use super::decode::{Array, Cursor, DEFAULT_MAX_DEPTH, Error, Header, Length, Major, Map};
use super::skip::skip_nested;
use alloc::string::String;
use core::fmt::{Debug, Write};
use num_traits::Float;

/// A `fmt::Write` over caller storage that refuses to write past its end.
struct BoundedWriter<'o> {
    out: &'o mut [u8],
    len: usize,
}

impl Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let end = self
            .len
            .checked_add(s.len())
            .filter(|end| *end <= self.out.len())
            .ok_or(core::fmt::Error)?;
        self.out[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Render the item at `cursor` into `out`, returning the number of bytes
/// written.
///
/// The output is UTF-8. If it does not fit, rendering fails with
/// [`Error::Memory`]; nothing is ever written beyond `out.len()`.
pub fn render(cursor: &mut Cursor<'_>, out: &mut [u8], max_depth: usize) -> Result<usize, Error> {
    let mut writer = BoundedWriter { out, len: 0 };
    render_to(cursor, &mut writer, max_depth)?;
    Ok(writer.len)
}

/// Render the first item of `data` into a new string.
pub fn to_text(data: &[u8], max_depth: usize) -> Result<String, Error> {
    let mut text = String::new();
    render_to(&mut Cursor::new(data), &mut text, max_depth)?;
    Ok(text)
}

/// Render the item at `cursor` into any `fmt::Write` sink.
pub fn render_to<W>(cursor: &mut Cursor<'_>, w: &mut W, max_depth: usize) -> Result<(), Error>
where
    W: Write + ?Sized,
{
    render_item(cursor, w, max_depth, DEFAULT_MAX_DEPTH)
}

/// `shown` counts down to elision, `budget` to the nesting limit.
fn render_item<W>(
    cursor: &mut Cursor<'_>,
    w: &mut W,
    shown: usize,
    budget: usize,
) -> Result<(), Error>
where
    W: Write + ?Sized,
{
    let header = cursor.read_header()?;
    match (header.major, header.length) {
        (Major::Unsigned, Length::Definite(n)) => write!(w, "{n}")?,
        (Major::Negative, Length::Definite(n)) => write!(w, "{}", -1 - n as i128)?,
        (Major::Bytes, _) => {
            w.write_str("h'")?;
            for_each_chunk(cursor, header, |chunk| {
                for b in chunk {
                    write!(w, "{b:02x}")?;
                }
                Ok(())
            })?;
            w.write_char('\'')?;
        }
        (Major::Text, _) => {
            w.write_char('"')?;
            for_each_chunk(cursor, header, |chunk| Ok(write_escaped(w, chunk)?))?;
            w.write_char('"')?;
        }
        (Major::Array | Major::Map | Major::Tagged, _) if budget == 0 => {
            return Err(Error::NotImplemented);
        }
        (Major::Array | Major::Map | Major::Tagged, _) if shown == 0 => {
            w.write_str("...")?;
            skip_nested(cursor, header)?;
        }
        (Major::Array, _) => {
            let mut array = Array::from_header(cursor, header)?;
            w.write_char('[')?;
            let mut first = true;
            while !array.at_end()? {
                if !first {
                    w.write_str(", ")?;
                }
                first = false;
                array.parse_item(|cursor| render_item(cursor, w, shown - 1, budget - 1))?;
            }
            w.write_char(']')?;
        }
        (Major::Map, _) => {
            let mut map = Map::from_header(cursor, header)?;
            w.write_char('{')?;
            let mut first = true;
            while !map.at_end()? {
                if !first {
                    w.write_str(", ")?;
                }
                first = false;
                map.parse_item(|cursor| render_item(cursor, w, shown - 1, budget - 1))?;
                w.write_str(": ")?;
                map.parse_item(|cursor| render_item(cursor, w, shown - 1, budget - 1))?;
            }
            w.write_char('}')?;
        }
        (Major::Tagged, Length::Definite(tag)) => {
            write!(w, "{tag}(")?;
            render_item(cursor, w, shown - 1, budget - 1)?;
            w.write_char(')')?;
        }
        (Major::Simple, Length::Definite(v)) => match header.minor {
            20 => w.write_str("false")?,
            21 => w.write_str("true")?,
            22 => w.write_str("null")?,
            23 => w.write_str("undefined")?,
            25 => write_float(w, half::f16::from_bits(v as u16))?,
            26 => write_float(w, f32::from_bits(v as u32))?,
            27 => write_float(w, f64::from_bits(v))?,
            _ => write!(w, "simple({v})")?,
        },
        // A break outside an indefinite-length item
        (Major::Simple, Length::Indefinite) => return Err(Error::MalformedValue),
        (Major::Unsigned | Major::Negative | Major::Tagged, Length::Indefinite) => {
            return Err(Error::Unexpected);
        }
    }
    Ok(())
}

fn for_each_chunk<'a, F>(cursor: &mut Cursor<'a>, header: Header, mut f: F) -> Result<(), Error>
where
    F: FnMut(&'a [u8]) -> Result<(), Error>,
{
    match header.length {
        Length::Definite(len) => f(cursor.read_bytes(len)?),
        Length::Indefinite => {
            while let Some(chunk) = cursor.read_chunk(header.major)? {
                f(chunk)?;
            }
            Ok(())
        }
    }
}

fn write_escaped<W>(w: &mut W, bytes: &[u8]) -> core::fmt::Result
where
    W: Write + ?Sized,
{
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '"' => w.write_str("\\\"")?,
                '\\' => w.write_str("\\\\")?,
                '\n' => w.write_str("\\n")?,
                '\r' => w.write_str("\\r")?,
                '\t' => w.write_str("\\t")?,
                c if c.is_control() => write!(w, "\\u{:04x}", c as u32)?,
                c => w.write_char(c)?,
            }
        }
        for b in chunk.invalid() {
            write!(w, "\\x{b:02x}")?;
        }
    }
    Ok(())
}

fn write_float<W, F>(w: &mut W, f: F) -> core::fmt::Result
where
    W: Write + ?Sized,
    F: Float + Debug,
{
    if f.is_nan() {
        w.write_str("NaN")
    } else if f.is_infinite() {
        w.write_str(if f.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        })
    } else {
        write!(w, "{f:?}")
    }
}
