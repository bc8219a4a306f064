use super::decode::{Cursor, DEFAULT_MAX_DEPTH, Error, FromCbor, Header, Length, Major};
use super::skip::skip;
use alloc::vec::Vec;

/// Like [`FromCbor`], but with access to caller state shared by every
/// element of a container.
pub trait FromCborWith<C: ?Sized>: Sized {
    fn from_cbor_with(cursor: &mut Cursor<'_>, ctx: &mut C) -> Result<Self, Error>;
}

/// Receives the entries of an integer-keyed map.
pub trait MapReceiver {
    /// Decode the value for `index`, consuming exactly one item.
    fn parse_map_item(&mut self, cursor: &mut Cursor<'_>, index: i64) -> Result<(), Error>;
}

/// Incremental reader over the items of an array (`D == 1`) or map
/// (`D == 2`, keys and values counted separately).
pub struct Sequence<'c, 'a, const D: usize> {
    cursor: &'c mut Cursor<'a>,
    count: Option<u64>,
    definite: bool,
    parsed: u64,
}

pub type Array<'c, 'a> = Sequence<'c, 'a, 1>;
pub type Map<'c, 'a> = Sequence<'c, 'a, 2>;

impl<'c, 'a, const D: usize> Sequence<'c, 'a, D> {
    const MAJOR: Major = if D == 2 { Major::Map } else { Major::Array };

    /// Read the container header at `cursor`.
    pub fn open(cursor: &'c mut Cursor<'a>) -> Result<Self, Error> {
        let header = cursor.read_header()?;
        Self::from_header(cursor, header)
    }

    pub(crate) fn from_header(cursor: &'c mut Cursor<'a>, header: Header) -> Result<Self, Error> {
        if header.major != Self::MAJOR {
            return Err(Error::MalformedValue);
        }
        let count = match header.length {
            Length::Definite(n) => Some(n.checked_mul(D as u64).ok_or(Error::MalformedValue)?),
            Length::Indefinite => None,
        };
        Ok(Self {
            cursor,
            count,
            definite: count.is_some(),
            parsed: 0,
        })
    }

    /// Number of elements (map entries), once known.
    pub fn len(&self) -> Option<u64> {
        self.count.map(|c| c / D as u64)
    }

    pub fn is_definite(&self) -> bool {
        self.definite
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    fn check_for_end(&mut self) -> Result<bool, Error> {
        match self.count {
            Some(count) if self.parsed >= count => Ok(true),
            Some(_) => {
                if self.cursor.at_break()? {
                    Err(Error::MalformedValue)
                } else {
                    Ok(false)
                }
            }
            None => {
                if !self.cursor.at_break()? {
                    Ok(false)
                } else if self.parsed % D as u64 != 0 {
                    // Break between a key and its value
                    Err(Error::MalformedValue)
                } else {
                    self.cursor.advance(1);
                    self.count = Some(self.parsed);
                    Ok(true)
                }
            }
        }
    }

    /// True once every item has been read; consumes the break of an
    /// indefinite container.
    pub fn at_end(&mut self) -> Result<bool, Error> {
        self.check_for_end()
    }

    /// Run `f` over the next item, or return `None` at the end.
    ///
    /// `f` must consume exactly one item; one that consumes nothing fails
    /// with [`Error::Unexpected`].
    pub fn try_parse_item<T, F>(&mut self, f: F) -> Result<Option<T>, Error>
    where
        F: FnOnce(&mut Cursor<'a>) -> Result<T, Error>,
    {
        if self.check_for_end()? {
            return Ok(None);
        }
        let start = self.cursor.offset();
        let value = f(&mut *self.cursor)?;
        if self.cursor.offset() == start {
            return Err(Error::Unexpected);
        }
        self.parsed += 1;
        Ok(Some(value))
    }

    #[inline]
    pub fn parse_item<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Cursor<'a>) -> Result<T, Error>,
    {
        self.try_parse_item(f)?.ok_or(Error::EndOfArray)
    }

    pub fn try_parse<T>(&mut self) -> Result<Option<T>, Error>
    where
        T: FromCbor,
    {
        self.try_parse_item(T::from_cbor)
    }

    /// Parse the next item; [`Error::EndOfArray`] once there are none left.
    #[inline]
    pub fn parse<T>(&mut self) -> Result<T, Error>
    where
        T: FromCbor,
    {
        self.try_parse()?.ok_or(Error::EndOfArray)
    }

    pub fn try_parse_with<T, C>(&mut self, ctx: &mut C) -> Result<Option<T>, Error>
    where
        T: FromCborWith<C>,
        C: ?Sized,
    {
        self.try_parse_item(|cursor| T::from_cbor_with(cursor, ctx))
    }

    /// Skip the next item, returning false at the end.
    pub fn skip_item(&mut self, max_depth: usize) -> Result<bool, Error> {
        self.try_parse_item(|cursor| skip(cursor, max_depth))
            .map(|o| o.is_some())
    }

    pub fn skip_to_end(&mut self, max_depth: usize) -> Result<(), Error> {
        while self.skip_item(max_depth)? {}
        Ok(())
    }
}

fn push<T>(items: &mut Vec<T>, item: T) -> Result<(), Error> {
    items.try_reserve(1).map_err(|_| Error::Memory)?;
    items.push(item);
    Ok(())
}

/// Decode an array of `T`, definite or indefinite.
///
/// The output grows by one element per decoded item; the declared count is
/// never used to pre-allocate.
pub fn parse_array<T>(cursor: &mut Cursor<'_>) -> Result<Vec<T>, Error>
where
    T: FromCbor,
{
    let mut array = Array::open(cursor)?;
    let mut items = Vec::new();
    while let Some(item) = array.try_parse()? {
        push(&mut items, item)?;
    }
    Ok(items)
}

/// As [`parse_array`], threading `ctx` through every element.
pub fn parse_array_with<T, C>(cursor: &mut Cursor<'_>, ctx: &mut C) -> Result<Vec<T>, Error>
where
    T: FromCborWith<C>,
    C: ?Sized,
{
    let mut array = Array::open(cursor)?;
    let mut items = Vec::new();
    while let Some(item) = array.try_parse_with(ctx)? {
        push(&mut items, item)?;
    }
    Ok(items)
}

/// Decode an integer-keyed map, handing every value to `receiver`.
///
/// Keys must be unsigned or negative integers.
pub fn parse_map<R>(cursor: &mut Cursor<'_>, receiver: &mut R) -> Result<(), Error>
where
    R: MapReceiver + ?Sized,
{
    let mut map = Map::open(cursor)?;
    while let Some(index) = map.try_parse::<i64>()? {
        map.parse_item(|cursor| receiver.parse_map_item(cursor, index))?;
    }
    Ok(())
}

/// A [`MapReceiver`] helper for keys the caller does not recognise.
pub fn skip_map_item(cursor: &mut Cursor<'_>) -> Result<(), Error> {
    skip(cursor, DEFAULT_MAX_DEPTH)
}
