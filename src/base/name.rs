use std::fmt::{Debug, Display, Formatter, Write};

use crate::parser::cc::CharClass;

/// A PDF name such as `/Length`, holding the bytes after the solidus with `#xx` escapes already
/// resolved.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Name(pub(crate) Vec<u8>);

impl Name {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Bytes which can appear in a serialized name without a `#xx` escape.
fn is_plain(c: u8) -> bool {
    c != b'#' && c.is_ascii_graphic() && CharClass::of(c) == CharClass::Reg
}

impl Display for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_char('/')?;
        for &c in &self.0 {
            match is_plain(c) {
                true => f.write_char(c as char)?,
                false => write!(f, "#{c:02X}")?
            }
        }
        Ok(())
    }
}

impl Debug for Name {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl From<Vec<u8>> for Name {
    fn from(bytes: Vec<u8>) -> Name {
        Name(bytes)
    }
}

impl From<&[u8]> for Name {
    fn from(bytes: &[u8]) -> Name {
        Name(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Name {
    fn from(bytes: &[u8; N]) -> Name {
        Name::from(bytes.as_slice())
    }
}

impl From<Name> for Vec<u8> {
    fn from(name: Name) -> Vec<u8> {
        name.0
    }
}

// Keys are given without the solidus: `name == b"Length"`.
impl<T: AsRef<[u8]> + ?Sized> PartialEq<T> for Name {
    fn eq(&self, other: &T) -> bool {
        self.as_slice() == other.as_ref()
    }
}
