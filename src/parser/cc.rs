/// Character classes of the PDF syntax.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CharClass {
    Space,
    Delim,
    Reg
}

impl CharClass {
    pub fn of(ch: u8) -> CharClass {
        match ch {
            b'\x00' | b'\x09' | b'\x0A' | b'\x0C' | b'\x0D' | b'\x20' => CharClass::Space,
            b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' => CharClass::Delim,
            _ => CharClass::Reg
        }
    }
}

pub fn is_eol(ch: u8) -> bool {
    ch == b'\n' || ch == b'\r'
}
