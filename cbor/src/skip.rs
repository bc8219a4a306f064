use super::decode::{Cursor, Error, Header, Length, Major};
use alloc::vec::Vec;

/// Advance `cursor` past exactly one complete item without materialising it.
///
/// Arrays, maps and tags count against `max_depth`; an item nested deeper
/// than that fails with [`Error::NotImplemented`].
pub fn skip(cursor: &mut Cursor<'_>, max_depth: usize) -> Result<(), Error> {
    let header = cursor.read_header()?;
    skip_body(cursor, header, max_depth)
}

/// Skip whatever follows an already decoded `header`.
fn skip_body(
    cursor: &mut Cursor<'_>,
    header: Header,
    max_depth: usize,
) -> Result<(), Error> {
    match (header.major, header.length) {
        (Major::Unsigned | Major::Negative, _) => Ok(()),
        (Major::Bytes | Major::Text, Length::Definite(len)) => cursor.read_bytes(len).map(|_| ()),
        (Major::Bytes | Major::Text, Length::Indefinite) => {
            while cursor.read_chunk(header.major)?.is_some() {}
            Ok(())
        }
        (Major::Array | Major::Map, length) => {
            if max_depth == 0 {
                return Err(Error::NotImplemented);
            }
            let per_entry = if header.major == Major::Map { 2 } else { 1 };
            match length {
                Length::Definite(count) => {
                    for _ in 0..count {
                        for _ in 0..per_entry {
                            skip(cursor, max_depth - 1)?;
                        }
                    }
                }
                Length::Indefinite => {
                    while !cursor.at_break()? {
                        // A break in the value position falls through to
                        // skip() and is rejected there
                        for _ in 0..per_entry {
                            skip(cursor, max_depth - 1)?;
                        }
                    }
                    cursor.advance(1);
                }
            }
            Ok(())
        }
        (Major::Tagged, _) => {
            if max_depth == 0 {
                return Err(Error::NotImplemented);
            }
            skip(cursor, max_depth - 1)
        }
        (Major::Simple, Length::Definite(_)) => Ok(()),
        (Major::Simple, Length::Indefinite) => Err(Error::MalformedValue),
    }
}

/// Items still owed by a container being passed over.
enum Pending {
    Items(u64),
    UntilBreak { pairs: bool, in_value: bool },
}

/// Skip whatever follows `header` however deeply it nests.
///
/// Walks with an explicit stack rather than recursing, so no depth bound
/// applies. Framing is checked exactly as [`skip`] checks it.
pub(crate) fn skip_nested(cursor: &mut Cursor<'_>, mut header: Header) -> Result<(), Error> {
    let mut pending: Vec<Pending> = Vec::new();
    loop {
        let owed = match (header.major, header.length) {
            (Major::Unsigned | Major::Negative, _) => None,
            (Major::Bytes | Major::Text, Length::Definite(len)) => {
                cursor.read_bytes(len)?;
                None
            }
            (Major::Bytes | Major::Text, Length::Indefinite) => {
                while cursor.read_chunk(header.major)?.is_some() {}
                None
            }
            (Major::Array, Length::Definite(count)) => Some(Pending::Items(count)),
            (Major::Tagged, _) => Some(Pending::Items(1)),
            (Major::Map, Length::Definite(count)) => Some(Pending::Items(
                count.checked_mul(2).ok_or(Error::MalformedValue)?,
            )),
            (Major::Array | Major::Map, Length::Indefinite) => Some(Pending::UntilBreak {
                pairs: header.major == Major::Map,
                in_value: false,
            }),
            (Major::Simple, Length::Definite(_)) => None,
            (Major::Simple, Length::Indefinite) => return Err(Error::MalformedValue),
        };
        if let Some(owed) = owed {
            pending.try_reserve(1).map_err(|_| Error::Memory)?;
            pending.push(owed);
        }

        // Find the container owed the next item, closing finished ones
        loop {
            match pending.last_mut() {
                None => return Ok(()),
                Some(Pending::Items(0)) => {
                    pending.pop();
                }
                Some(Pending::Items(count)) => {
                    *count -= 1;
                    break;
                }
                Some(Pending::UntilBreak { pairs, in_value }) => {
                    // A break in the value position is read as an item
                    // header below and rejected
                    if !*in_value && cursor.at_break()? {
                        cursor.advance(1);
                        pending.pop();
                    } else {
                        if *pairs {
                            *in_value = !*in_value;
                        }
                        break;
                    }
                }
            }
        }
        header = cursor.read_header()?;
    }
}
