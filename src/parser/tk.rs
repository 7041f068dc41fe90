use std::fmt::{Display, Formatter};
use std::io::BufRead;

use crate::base::Name;
use crate::utils;

use super::bp::ByteProvider;
use super::cc::{self, CharClass};

/// A lexical unit of the PDF / PostScript syntax, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// No token has been read yet.
    None,
    /// End of input.
    Eof,
    /// Any regular token that is not a number, as well as `{`, `}` and stray `)` and `>`.
    Keyword(Vec<u8>),
    Integer(i64),
    Real(f64),
    /// `(...)`, with escapes resolved.
    LitString(Vec<u8>),
    /// `<...>`, decoded.
    HexString(Vec<u8>),
    /// `/Name`, with `#xx` escapes resolved.
    Name(Name),
    OpenArray,
    CloseArray,
    OpenDict,
    CloseDict
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::None => f.write_str("(none)"),
            Token::Eof => f.write_str("(eof)"),
            Token::Keyword(kw) => f.write_str(&String::from_utf8_lossy(kw)),
            Token::Integer(num) => write!(f, "{num}"),
            Token::Real(num) => write!(f, "{num}"),
            Token::LitString(_) => f.write_str("(string)"),
            Token::HexString(_) => f.write_str("<string>"),
            Token::Name(name) => write!(f, "{name}"),
            Token::OpenArray => f.write_str("["),
            Token::CloseArray => f.write_str("]"),
            Token::OpenDict => f.write_str("<<"),
            Token::CloseDict => f.write_str(">>")
        }
    }
}

/// Splits a `BufRead` into [`Token`]s, keeping the most recent one.
///
/// Malformed content (unterminated strings, bad hex digits, bad name escapes) is tolerated
/// and produces a best-effort token. The only errors are those of the underlying reader.
pub struct Lexer<R: BufRead> {
    reader: R,
    token: Token
}

impl<R: BufRead> Lexer<R> {
    pub fn new(reader: R) -> Self {
        Lexer { reader, token: Token::None }
    }

    /// Forgets the current token.
    pub fn initialize_token(&mut self) {
        self.token = Token::None;
    }

    /// The most recently read token.
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Skips whitespace and, if `skip_comments` is set, comments up to the end of their line.
    pub fn skip_spaces(&mut self, skip_comments: bool) -> std::io::Result<()> {
        loop {
            self.reader.skip_while(|c| CharClass::of(c) == CharClass::Space)?;
            if skip_comments && self.reader.next_if(|c| c == b'%')?.is_some() {
                self.reader.skip_while(|c| !cc::is_eol(c))?;
            } else {
                return Ok(());
            }
        }
    }

    /// Advances to the next token, skipping whitespace and comments before it.
    pub fn next_token(&mut self) -> std::io::Result<&Token> {
        self.skip_spaces(true)?;
        self.token = match self.reader.next_byte()? {
            None => Token::Eof,
            Some(b'(') => Token::LitString(self.read_lit_string()?),
            Some(b'<') => match self.reader.next_if(|c| c == b'<')? {
                Some(_) => Token::OpenDict,
                None => Token::HexString(self.read_hex_string()?)
            },
            Some(b'>') => match self.reader.next_if(|c| c == b'>')? {
                Some(_) => Token::CloseDict,
                None => Token::Keyword(vec![b'>'])
            },
            Some(b'[') => Token::OpenArray,
            Some(b']') => Token::CloseArray,
            Some(b'/') => Token::Name(self.read_name()?),
            Some(c) if CharClass::of(c) == CharClass::Delim => Token::Keyword(vec![c]),
            Some(c) => {
                let mut tk = vec![c];
                while let Some(c) = self.reader.next_if(|c| CharClass::of(c) == CharClass::Reg)? {
                    tk.push(c);
                }
                classify(tk)
            }
        };
        log::trace!("token {}", self.token);
        Ok(&self.token)
    }

    fn read_lit_string(&mut self) -> std::io::Result<Vec<u8>> {
        let mut ret = Vec::new();
        let mut parens = 0;
        loop {
            let Some(c) = self.reader.next_byte()? else {
                log::debug!("Unterminated literal string");
                break;
            };
            match c {
                b'\\' => {
                    let Some(c) = self.reader.next_byte()? else { continue };
                    match c {
                        b'n' => ret.push(b'\x0a'),
                        b'r' => ret.push(b'\x0d'),
                        b't' => ret.push(b'\x09'),
                        b'b' => ret.push(b'\x08'),
                        b'f' => ret.push(b'\x0c'),
                        b'0'..=b'7' => {
                            let mut val = c - b'0';
                            for _ in 0..2 {
                                match self.reader.next_if(|c| matches!(c, b'0'..=b'7'))? {
                                    Some(d) => val = (val << 3) | (d - b'0'),
                                    None => break
                                }
                            }
                            ret.push(val);
                        },
                        // line continuation
                        b'\r' => { self.reader.next_if(|c| c == b'\n')?; },
                        b'\n' => (),
                        c => ret.push(c)
                    }
                },
                b'\r' => {
                    self.reader.next_if(|c| c == b'\n')?;
                    ret.push(b'\n');
                },
                b'(' => {
                    parens += 1;
                    ret.push(c);
                },
                b')' => {
                    if parens == 0 { break; }
                    parens -= 1;
                    ret.push(c);
                },
                c => ret.push(c)
            }
        }
        Ok(ret)
    }

    fn read_hex_string(&mut self) -> std::io::Result<Vec<u8>> {
        let mut msd = None;
        let mut ret = Vec::new();
        loop {
            let Some(c) = self.reader.next_byte()? else {
                log::debug!("Unterminated hex string");
                break;
            };
            if c == b'>' { break; }
            if CharClass::of(c) == CharClass::Space { continue; }
            let Some(dig) = utils::hex_value(c) else {
                log::debug!("Invalid character in hex string: {c:#04x}");
                continue;
            };
            match msd.take() {
                None => msd = Some(dig),
                Some(d) => ret.push((d << 4) | dig)
            }
        }
        if let Some(d) = msd { ret.push(d << 4); }
        Ok(ret)
    }

    fn read_name(&mut self) -> std::io::Result<Name> {
        let mut ret = Vec::new();
        while let Some(c) = self.reader.next_if(|c| CharClass::of(c) == CharClass::Reg)? {
            if c != b'#' {
                ret.push(c);
                continue;
            }
            let d1 = self.reader.next_if(|c| utils::hex_value(c).is_some())?;
            let d2 = match d1 {
                Some(_) => self.reader.next_if(|c| utils::hex_value(c).is_some())?,
                None => None
            };
            match (d1.and_then(utils::hex_value), d2.and_then(utils::hex_value)) {
                (Some(d1), Some(d2)) => ret.push((d1 << 4) | d2),
                _ => {
                    log::debug!("Malformed escape in name");
                    ret.push(b'#');
                    ret.extend(d1);
                }
            }
        }
        Ok(Name::from(ret))
    }
}

fn classify(tk: Vec<u8>) -> Token {
    if !utils::is_number(&tk) {
        return Token::Keyword(tk);
    }
    if !tk.contains(&b'.') {
        if let Some(num) = utils::parse_num::<i64>(&tk) {
            return Token::Integer(num);
        }
    }
    match utils::parse_num::<f64>(&tk) {
        Some(num) => Token::Real(num),
        None => Token::Keyword(tk)
    }
}
