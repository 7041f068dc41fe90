//! The object core of a PDF processing library: stream objects with layered decoding and the
//! parser of PostScript calculator (Type 4) functions.

pub mod base;
pub mod codecs;
pub mod parser;

mod utils;
