use std::io::{BufRead, ErrorKind};

/// Byte-wise access on top of `BufRead`. Faults of the underlying reader are always passed on;
/// the end of input is `Ok(None)`.
pub trait ByteProvider: BufRead {
    fn peek(&mut self) -> std::io::Result<Option<u8>> {
        loop {
            match self.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err)
            }
        }
    }

    fn next_byte(&mut self) -> std::io::Result<Option<u8>> {
        let c = self.peek()?;
        if c.is_some() {
            self.consume(1);
        }
        Ok(c)
    }

    fn next_if(&mut self, cond: impl FnOnce(u8) -> bool) -> std::io::Result<Option<u8>> {
        match self.peek()? {
            Some(c) if cond(c) => {
                self.consume(1);
                Ok(Some(c))
            },
            _ => Ok(None)
        }
    }

    /// Consumes bytes as long as `cond` holds, returning how many.
    fn skip_while(&mut self, mut cond: impl FnMut(u8) -> bool) -> std::io::Result<usize> {
        let mut count = 0;
        while self.next_if(&mut cond)?.is_some() {
            count += 1;
        }
        Ok(count)
    }
}

impl<T: BufRead + ?Sized> ByteProvider for T { }
