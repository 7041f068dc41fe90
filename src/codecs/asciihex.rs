use std::io::{BufRead, BufReader, Read, Error, ErrorKind};
use crate::parser::bp::ByteProvider;
use crate::parser::cc::CharClass;
use crate::utils;

pub fn decode<R: BufRead>(input: R) -> BufReader<AsciiHexDecoder<R>> {
    BufReader::new(AsciiHexDecoder::new(input))
}

pub struct AsciiHexDecoder<R: BufRead> {
    reader: R,
    done: bool
}

impl<R: BufRead> AsciiHexDecoder<R> {
    fn new(input: R) -> Self {
        AsciiHexDecoder { reader: input, done: false }
    }

    /// The next hex digit, or `None` at `>` or the end of input.
    fn next_in(&mut self) -> std::io::Result<Option<u8>> {
        if self.done { return Ok(None); }
        self.reader.skip_while(|c| CharClass::of(c) == CharClass::Space)?;
        match self.reader.next_byte()? {
            None | Some(b'>') => {
                self.done = true;
                Ok(None)
            },
            Some(c) => utils::hex_value(c)
                .map(Some)
                .ok_or(Error::new(ErrorKind::InvalidData, "invalid character in ASCIIHex data"))
        }
    }

    fn next_out(&mut self) -> std::io::Result<Option<u8>> {
        let Some(msd) = self.next_in()? else { return Ok(None) };
        // An odd final digit is completed by 0.
        let lsd = self.next_in()?.unwrap_or(0);
        Ok(Some((msd << 4) | lsd))
    }
}

impl<R: BufRead> Read for AsciiHexDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut bytes = 0;
        for b in buf {
            if let Some(c) = self.next_out()? {
                *b = c;
                bytes += 1;
            } else {
                break;
            }
        }
        Ok(bytes)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(input: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut ret = Vec::new();
        decode(input).read_to_end(&mut ret)?;
        Ok(ret)
    }

    #[test]
    fn test_asciihex() {
        assert_eq!(decode_all(b"48656c6C6f>").unwrap(), b"Hello");
        assert_eq!(decode_all(b"48 65\n6c\t6c 6f >trailing").unwrap(), b"Hello");
        assert_eq!(decode_all(b"7>").unwrap(), b"\x70");
        assert_eq!(decode_all(b"414").unwrap(), b"A\x40");
        assert_eq!(decode_all(b">").unwrap(), b"");
        assert_eq!(decode_all(b"").unwrap(), b"");
        assert!(decode_all(b"4G>").is_err());
    }
}
