use std::io::{BufRead, Read};

use crate::base::*;

use super::bp::ByteProvider;

const ENDSTREAM: &[u8] = b"endstream";

/// Reads the data of a stream object. `reader` must be positioned right after the `stream`
/// keyword, `dict` is the stream dictionary preceding it.
///
/// `/Length` is trusted if exactly that many bytes are followed by `endstream`, possibly after
/// an end-of-line marker. Otherwise the data extend up to the first `endstream` found.
///
/// Deviations from the strict syntax are recorded in the returned object rather than failing:
/// a `stream` keyword not followed by CRLF or LF, no end-of-line marker before `endstream`, or
/// `/Length` not matching the data. A missing `endstream` makes the rest of the input the data.
pub fn read_stream_body<R: BufRead>(reader: &mut R, dict: Dict) -> Result<StreamObject, Error> {
    let spaces = reader.skip_while(|c| matches!(c, b' ' | b'\t' | b'\x0C' | b'\0'))?;
    let stream_crlf = match reader.next_if(|c| c == b'\n' || c == b'\r')? {
        Some(b'\r') => reader.next_if(|c| c == b'\n')?.is_some() && spaces == 0,
        Some(_) => spaces == 0,
        None => false
    };
    if !stream_crlf {
        log::warn!("stream keyword not followed by CRLF or LF");
    }

    let mut body = Vec::new();
    let declared = dict.int_value(b"Length").and_then(|len| u64::try_from(len).ok());
    match declared {
        Some(len) => {
            (&mut *reader).take(len).read_to_end(&mut body)?;
            if body.len() as u64 == len {
                let eol_len = read_eol(reader, &mut body)?;
                if read_keyword(reader, &mut body)? {
                    body.truncate(len as usize);
                    return Ok(build(dict, body, stream_crlf, eol_len > 0, len));
                }
            }
            log::warn!("Stream /Length {len} not followed by endstream");
        },
        None => log::warn!("Stream /Length missing or invalid")
    }

    // The data read so far may already contain the keyword if /Length was too large.
    let found = match body.windows(ENDSTREAM.len()).position(|w| w == ENDSTREAM) {
        Some(pos) => {
            body.truncate(pos + ENDSTREAM.len());
            true
        },
        None => scan_endstream(reader, &mut body)?
    };
    let eol_len = if !found {
        log::warn!("endstream keyword not found");
        0
    } else {
        body.truncate(body.len() - ENDSTREAM.len());
        match body.as_slice() {
            [.., b'\r', b'\n'] => 2,
            [.., b'\n' | b'\r'] => 1,
            _ => 0
        }
    };
    if found && eol_len == 0 {
        log::warn!("endstream keyword not preceded by EOL");
    }
    body.truncate(body.len() - eol_len);
    let real_size = body.len() as u64;
    Ok(build(dict, body, stream_crlf, eol_len > 0, real_size))
}

/// Consumes one end-of-line marker, appending it to `body`. Returns its length.
fn read_eol<R: BufRead>(reader: &mut R, body: &mut Vec<u8>) -> std::io::Result<usize> {
    match reader.next_if(|c| c == b'\n' || c == b'\r')? {
        Some(b'\r') => {
            body.push(b'\r');
            match reader.next_if(|c| c == b'\n')? {
                Some(c) => {
                    body.push(c);
                    Ok(2)
                },
                None => Ok(1)
            }
        },
        Some(c) => {
            body.push(c);
            Ok(1)
        },
        None => Ok(0)
    }
}

/// Consumes `endstream` as far as it matches, appending the consumed bytes to `body`.
fn read_keyword<R: BufRead>(reader: &mut R, body: &mut Vec<u8>) -> std::io::Result<bool> {
    for &k in ENDSTREAM {
        match reader.next_if(|c| c == k)? {
            Some(c) => body.push(c),
            None => return Ok(false)
        }
    }
    Ok(true)
}

/// Reads up to and including `endstream`. Returns whether it was found.
fn scan_endstream<R: BufRead>(reader: &mut R, body: &mut Vec<u8>) -> std::io::Result<bool> {
    while let Some(c) = reader.next_byte()? {
        body.push(c);
        if body.ends_with(ENDSTREAM) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn build(dict: Dict, body: Vec<u8>, stream_crlf: bool, endstream_crlf: bool, real_size: u64)
    -> StreamObject
{
    let mut stm = StreamObject::with_bytes(dict, body, DecodeState::Raw);
    stm.set_stream_keyword_crlf_compliant(stream_crlf);
    stm.set_endstream_keyword_crlf_compliant(endstream_crlf);
    stm.set_real_stream_size(real_size);
    stm
}
