use alloc::{string::String, vec::Vec};
use num_traits::FromPrimitive;
use thiserror::Error;

pub use super::decode_seq::*;
pub use super::owned::*;
pub use super::skip::*;

/// The stop code terminating indefinite-length items.
pub const BREAK: u8 = 0xFF;

/// Nesting limit applied when a caller has no better bound.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("Malformed value")]
    MalformedValue,

    #[error("Illegal value")]
    IllegalValue,

    #[error("Not implemented")]
    NotImplemented,

    #[error("Unexpected decoder state")]
    Unexpected,

    #[error("Memory allocation or output capacity exhausted")]
    Memory,

    #[error("End of array")]
    EndOfArray,
}

impl Error {
    /// The numeric error code, stable across releases.
    pub fn code(&self) -> i32 {
        match self {
            Error::EndOfArray => -1,
            Error::IllegalValue => -2,
            Error::MalformedValue => -3,
            Error::NotImplemented => -4,
            Error::Unexpected => -5,
            Error::Memory => -6,
        }
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::Memory
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Major {
    Unsigned,
    Negative,
    Bytes,
    Text,
    Array,
    Map,
    Tagged,
    Simple,
}

impl Major {
    fn from_initial(initial: u8) -> Self {
        match initial >> 5 {
            0 => Major::Unsigned,
            1 => Major::Negative,
            2 => Major::Bytes,
            3 => Major::Text,
            4 => Major::Array,
            5 => Major::Map,
            6 => Major::Tagged,
            _ => Major::Simple,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Major::Unsigned => "Unsigned Integer",
            Major::Negative => "Negative Integer",
            Major::Bytes => "Byte String",
            Major::Text => "Text String",
            Major::Array => "Array",
            Major::Map => "Map",
            Major::Tagged => "Tag",
            Major::Simple => "Simple Value",
        }
    }
}

impl core::fmt::Display for Major {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The length/value field of an item header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(u64),
    Indefinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub major: Major,
    pub minor: u8,
    pub length: Length,
}

impl Header {
    /// True for the `0xFF` stop code.
    pub fn is_break(&self) -> bool {
        self.major == Major::Simple && self.length == Length::Indefinite
    }
}

/// A read position into a borrowed buffer.
///
/// The end of the slice is the exclusive bound of every read: all accessors
/// fail with [`Error::MalformedValue`] rather than read past it. After an
/// `Err` the position is unspecified and the cursor should be discarded.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    pub fn peek(&self) -> Result<u8, Error> {
        self.data
            .get(self.offset)
            .copied()
            .ok_or(Error::MalformedValue)
    }

    pub fn at_break(&self) -> Result<bool, Error> {
        Ok(self.peek()? == BREAK)
    }

    pub(crate) fn advance(&mut self, len: usize) {
        debug_assert!(self.offset + len <= self.data.len());
        self.offset += len;
    }

    fn read_be<const N: usize>(&self, at: usize) -> Result<[u8; N], Error> {
        self.data
            .get(at..)
            .and_then(|d| d.get(..N))
            .and_then(|d| d.try_into().ok())
            .ok_or(Error::MalformedValue)
    }

    /// Decode the initial byte and any following length bytes.
    ///
    /// The cursor only moves if the whole header is present.
    pub fn read_header(&mut self) -> Result<Header, Error> {
        let initial = self.peek()?;
        let major = Major::from_initial(initial);
        let minor = initial & 0x1F;
        let at = self.offset + 1;

        let (length, len) = match minor {
            0..=23 => (Length::Definite(minor as u64), 0),
            24 => (Length::Definite(self.read_be::<1>(at)?[0] as u64), 1),
            25 => (
                Length::Definite(u16::from_be_bytes(self.read_be(at)?) as u64),
                2,
            ),
            26 => (
                Length::Definite(u32::from_be_bytes(self.read_be(at)?) as u64),
                4,
            ),
            27 => (Length::Definite(u64::from_be_bytes(self.read_be(at)?)), 8),
            31 if !matches!(major, Major::Unsigned | Major::Negative | Major::Tagged) => {
                (Length::Indefinite, 0)
            }
            _ => return Err(Error::MalformedValue),
        };

        self.offset = at + len;
        Ok(Header {
            major,
            minor,
            length,
        })
    }

    /// Take the next `len` bytes verbatim.
    pub fn read_bytes(&mut self, len: u64) -> Result<&'a [u8], Error> {
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| self.offset.checked_add(len))
            .filter(|end| *end <= self.data.len())
            .ok_or(Error::MalformedValue)?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    /// Read one chunk of an indefinite-length string of type `major`.
    ///
    /// Returns `None` once the terminating break has been consumed.
    pub fn read_chunk(&mut self, major: Major) -> Result<Option<&'a [u8]>, Error> {
        if self.at_break()? {
            self.advance(1);
            return Ok(None);
        }
        match self.read_header()? {
            Header {
                major: m,
                length: Length::Definite(len),
                ..
            } if m == major => self.read_bytes(len).map(Some),
            _ => Err(Error::MalformedValue),
        }
    }

    #[inline]
    pub fn parse<T>(&mut self) -> Result<T, Error>
    where
        T: FromCbor,
    {
        T::from_cbor(self)
    }
}

/// A type that can decode itself from the item at a cursor.
///
/// Implementations consume exactly one item and leave the cursor just past
/// it.
pub trait FromCbor: Sized {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error>;
}

/// Decode a `T` from the start of `data`, returning it with the number of
/// bytes consumed.
pub fn parse_detail<T>(data: &[u8]) -> Result<(T, usize), Error>
where
    T: FromCbor,
{
    let mut cursor = Cursor::new(data);
    T::from_cbor(&mut cursor).map(|v| (v, cursor.offset()))
}

pub fn parse<T>(data: &[u8]) -> Result<T, Error>
where
    T: FromCbor,
{
    parse_detail(data).map(|(v, _)| v)
}

fn read_unsigned(cursor: &mut Cursor<'_>) -> Result<u64, Error> {
    match cursor.read_header()? {
        Header {
            major: Major::Unsigned,
            length: Length::Definite(v),
            ..
        } => Ok(v),
        _ => Err(Error::MalformedValue),
    }
}

fn read_signed(cursor: &mut Cursor<'_>) -> Result<i64, Error> {
    match cursor.read_header()? {
        Header {
            major: Major::Unsigned,
            length: Length::Definite(v),
            ..
        } => i64::try_from(v).map_err(|_| Error::IllegalValue),
        Header {
            major: Major::Negative,
            length: Length::Definite(v),
            ..
        } => i64::try_from(v)
            .map(|v| -1 - v)
            .map_err(|_| Error::IllegalValue),
        _ => Err(Error::MalformedValue),
    }
}

fn narrow_unsigned<T: FromPrimitive>(cursor: &mut Cursor<'_>) -> Result<T, Error> {
    T::from_u64(read_unsigned(cursor)?).ok_or(Error::IllegalValue)
}

fn narrow_signed<T: FromPrimitive>(cursor: &mut Cursor<'_>) -> Result<T, Error> {
    T::from_i64(read_signed(cursor)?).ok_or(Error::IllegalValue)
}

impl FromCbor for u8 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        narrow_unsigned(cursor)
    }
}

impl FromCbor for u16 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        narrow_unsigned(cursor)
    }
}

impl FromCbor for u32 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        narrow_unsigned(cursor)
    }
}

impl FromCbor for u64 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        read_unsigned(cursor)
    }
}

impl FromCbor for i8 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        narrow_signed(cursor)
    }
}

impl FromCbor for i16 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        narrow_signed(cursor)
    }
}

impl FromCbor for i32 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        narrow_signed(cursor)
    }
}

impl FromCbor for i64 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        read_signed(cursor)
    }
}

impl FromCbor for bool {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        match cursor.read_header()? {
            Header {
                major: Major::Simple,
                minor: 20,
                ..
            } => Ok(false),
            Header {
                major: Major::Simple,
                minor: 21,
                ..
            } => Ok(true),
            _ => Err(Error::MalformedValue),
        }
    }
}

impl FromCbor for f64 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        match cursor.read_header()? {
            Header {
                major: Major::Simple,
                minor,
                length: Length::Definite(bits),
            } => match minor {
                25 => Ok(half::f16::from_bits(bits as u16).into()),
                26 => Ok(f32::from_bits(bits as u32).into()),
                27 => Ok(f64::from_bits(bits)),
                _ => Err(Error::MalformedValue),
            },
            _ => Err(Error::MalformedValue),
        }
    }
}

impl FromCbor for f32 {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        let v = f64::from_cbor(cursor)?;
        if v.is_finite() && v.abs() > f32::MAX as f64 {
            Err(Error::IllegalValue)
        } else {
            Ok(v as f32)
        }
    }
}

impl FromCbor for String {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        let text = Text::from_cbor(cursor)?;
        String::from_utf8(text.into_bytes()).map_err(|_| Error::IllegalValue)
    }
}

/// `null` decodes as `None`, anything else as `Some(T)`.
impl<T> FromCbor for Option<T>
where
    T: FromCbor,
{
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        if cursor.peek()? == (7 << 5) | 22 {
            cursor.advance(1);
            Ok(None)
        } else {
            T::from_cbor(cursor).map(Some)
        }
    }
}

impl<T> FromCbor for Vec<T>
where
    T: FromCbor,
{
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        parse_array(cursor)
    }
}
