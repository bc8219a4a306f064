use super::decode::{Cursor, Error, FromCbor, Length, Major};
use alloc::{string::String, vec, vec::Vec};
use core::ffi::CStr;

fn reserve(data: &mut Vec<u8>, additional: usize) -> Result<(), Error> {
    data.try_reserve_exact(additional).map_err(|_| Error::Memory)
}

/// Copy the payload of a byte or text string, definite or chunked, leaving
/// room for `extra` trailing bytes.
fn read_string(cursor: &mut Cursor<'_>, major: Major, extra: usize) -> Result<Vec<u8>, Error> {
    let header = cursor.read_header()?;
    if header.major != major {
        return Err(Error::MalformedValue);
    }

    let mut data = Vec::new();
    match header.length {
        Length::Definite(len) => {
            let bytes = cursor.read_bytes(len)?;
            reserve(&mut data, bytes.len() + extra)?;
            data.extend_from_slice(bytes);
        }
        Length::Indefinite => {
            while let Some(chunk) = cursor.read_chunk(major)? {
                reserve(&mut data, chunk.len())?;
                data.extend_from_slice(chunk);
            }
            reserve(&mut data, extra)?;
        }
    }
    Ok(data)
}

/// An owned copy of a byte string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(Vec<u8>);

impl Bytes {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl core::ops::Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromCbor for Bytes {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        read_string(cursor, Major::Bytes, 0).map(Self)
    }
}

/// An owned copy of a text string.
///
/// The content is stored with a trailing NUL so it can be handed to C APIs
/// through [`Text::as_c_str`]. The bytes are kept as received; use
/// [`Text::as_str`] to check them as UTF-8.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Text {
    data: Vec<u8>,
}

impl Text {
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// `None` if the text contains an interior NUL.
    pub fn as_c_str(&self) -> Option<&CStr> {
        CStr::from_bytes_with_nul(&self.data).ok()
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.data.pop();
        self.data
    }
}

impl Default for Text {
    fn default() -> Self {
        Self { data: vec![0] }
    }
}

impl core::fmt::Debug for Text {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Text")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl FromCbor for Text {
    fn from_cbor(cursor: &mut Cursor<'_>) -> Result<Self, Error> {
        let mut data = read_string(cursor, Major::Text, 1)?;
        data.push(0);
        Ok(Self { data })
    }
}
