use std::io::{BufRead, Read};
use log::warn;
use crate::parser::bp::ByteProvider;

pub fn decode<R: BufRead>(input: R) -> RunLengthDecoder<R> {
    RunLengthDecoder::new(input)
}

/// Decodes run-length data one run at a time. Runs cut short by the end of input are kept
/// as far as they go.
pub struct RunLengthDecoder<R: BufRead> {
    reader: R,
    run: Vec<u8>,
    index: usize,
    done: bool
}

impl<R: BufRead> RunLengthDecoder<R> {
    fn new(input: R) -> Self {
        RunLengthDecoder {
            reader: input,
            run: Vec::with_capacity(128),
            index: 0,
            done: false
        }
    }

    fn next_run(&mut self) -> std::io::Result<()> {
        self.run.clear();
        self.index = 0;
        while self.run.is_empty() && !self.done {
            let Some(length) = self.reader.next_byte()? else {
                self.done = true;
                break;
            };
            match length {
                128 => self.done = true,
                0..=127 => {
                    let count = (&mut self.reader)
                        .take(length as u64 + 1)
                        .read_to_end(&mut self.run)?;
                    if count <= length as usize {
                        warn!("RunLength data ended prematurely");
                        self.done = true;
                    }
                },
                _ => match self.reader.next_byte()? {
                    Some(c) => self.run.resize(257 - length as usize, c),
                    None => {
                        warn!("RunLength data ended prematurely");
                        self.done = true;
                    }
                }
            }
        }
        Ok(())
    }
}

impl<R: BufRead> BufRead for RunLengthDecoder<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        if self.index >= self.run.len() {
            self.next_run()?;
        }
        Ok(&self.run[self.index..])
    }

    fn consume(&mut self, amt: usize) {
        self.index += amt;
    }
}

impl<R: BufRead> Read for RunLengthDecoder<R> {
    fn read(&mut self, out_buf: &mut [u8]) -> std::io::Result<usize> {
        let in_buf = self.fill_buf()?;
        let len = std::cmp::min(in_buf.len(), out_buf.len());
        out_buf[..len].copy_from_slice(&in_buf[..len]);
        self.consume(len);
        Ok(len)
    }
}
