use thiserror::Error;

use super::name::Name;

/// The error type of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A fault of the underlying byte source.
    #[error("I/O error: {0}")]
    IO(#[from] std::io::Error),
    /// Malformed input which can't be recovered from.
    #[error("parse error: {0}")]
    Parse(&'static str),
    /// A `/Filter` name which has no decoder here.
    #[error("unsupported filter {0}")]
    UnsupportedFilter(Name),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::from(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, Error::IO(_)));
        assert_eq!(Error::Parse("malformed /Filter").to_string(), "parse error: malformed /Filter");
        assert_eq!(Error::UnsupportedFilter(Name::from(b"LZWDecode")).to_string(),
            "unsupported filter /LZWDecode");
    }
}
