use std::io::{BufRead, BufReader, Read, Error, ErrorKind};
use crate::parser::bp::ByteProvider;
use crate::parser::cc::CharClass;

pub fn decode<R: BufRead>(input: R) -> BufReader<Ascii85Decoder<R>> {
    BufReader::new(Ascii85Decoder::new(input))
}

/// Decodes base-85 data up to the `~>` marker. A missing marker is tolerated.
pub struct Ascii85Decoder<R: BufRead> {
    reader: R,
    buf: [u8; 4],
    len: usize,
    index: usize,
    done: bool
}

impl<R: BufRead> Ascii85Decoder<R> {
    fn new(input: R) -> Self {
        Ascii85Decoder {
            reader: input,
            buf: [0; 4],
            len: 0,
            index: 0,
            done: false
        }
    }

    fn next_in(&mut self) -> std::io::Result<Option<u8>> {
        if self.done { return Ok(None); }
        self.reader.skip_while(|c| CharClass::of(c) == CharClass::Space)?;
        match self.reader.next_byte()? {
            Some(b'~') | None => {
                self.done = true;
                Ok(None)
            },
            Some(c) => Ok(Some(c))
        }
    }

    /// Decodes the next group into `buf`, returning the number of bytes.
    fn next_group(&mut self) -> std::io::Result<usize> {
        let mut digits = [b'u'; 5];
        let mut count = 0;
        while count < 5 {
            match self.next_in()? {
                None => break,
                Some(b'z') if count == 0 => {
                    self.buf = [0; 4];
                    return Ok(4);
                },
                Some(c @ b'!'..=b'u') => {
                    digits[count] = c;
                    count += 1;
                },
                Some(_) => return Err(Error::new(ErrorKind::InvalidData, "invalid character in ASCII85 data"))
            }
        }
        match count {
            0 => Ok(0),
            1 => Err(Error::new(ErrorKind::InvalidData, "incomplete ASCII85 group")),
            _ => {
                let val = digits.iter()
                    .fold(0u64, |acc, &c| acc * 85 + (c - b'!') as u64);
                let val: u32 = val.try_into()
                    .map_err(|_| Error::new(ErrorKind::InvalidData, "ASCII85 group out of range"))?;
                self.buf = val.to_be_bytes();
                Ok(count - 1)
            }
        }
    }
}

impl<R: BufRead> BufRead for Ascii85Decoder<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        if self.index >= self.len {
            self.len = self.next_group()?;
            self.index = 0;
        }
        Ok(&self.buf[self.index..self.len])
    }

    fn consume(&mut self, amt: usize) {
        self.index += amt;
    }
}

impl<R: BufRead> Read for Ascii85Decoder<R> {
    fn read(&mut self, out_buf: &mut [u8]) -> std::io::Result<usize> {
        let in_buf = self.fill_buf()?;
        let len = std::cmp::min(in_buf.len(), out_buf.len());
        out_buf[..len].copy_from_slice(&in_buf[..len]);
        self.consume(len);
        Ok(len)
    }
}
