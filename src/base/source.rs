use std::io::{Read, Seek, SeekFrom};

/// A re-readable source of bytes.
///
/// Reading is done through [`Read`], which returns `Ok(0)` at the end of input and an `Err` on a
/// fault, never a silent empty read. A source carries a cursor: callers must [`reset()`] it
/// before reading from the start, and must not share one instance between concurrent readers.
///
/// Implemented for all `Read + Seek` types, most notably `std::io::Cursor<Vec<u8>>` and
/// `std::fs::File`.
///
/// [`reset()`]: ByteSource::reset
pub trait ByteSource: Read {
    /// Rewinds to the logical start of the data.
    fn reset(&mut self) -> std::io::Result<()>;

    /// The total number of bytes in the source. Leaves the cursor at the start.
    fn raw_len(&mut self) -> std::io::Result<u64>;
}

impl<T: Read + Seek> ByteSource for T {
    fn reset(&mut self) -> std::io::Result<()> {
        self.rewind()
    }

    fn raw_len(&mut self) -> std::io::Result<u64> {
        let len = self.seek(SeekFrom::End(0))?;
        self.rewind()?;
        Ok(len)
    }
}
