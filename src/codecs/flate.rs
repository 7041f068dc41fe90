use std::io::{Read, BufRead, BufReader, ErrorKind};
use flate2::bufread::ZlibDecoder;
use crate::base::{Dict, Error};

pub fn decode<'a, R: BufRead + 'a>(input: R, params: &Dict) -> Result<Box<dyn BufRead + 'a>, Error> {
    match params.lookup(b"Predictor").num_value::<i64>().unwrap_or(1) {
        1 => Ok(Box::new(BufReader::new(ZlibDecoder::new(input)))),
        10..=15 => {
            let colors: usize = params.lookup(b"Colors").num_value().unwrap_or(1);
            let bpc: usize = params.lookup(b"BitsPerComponent").num_value().unwrap_or(8);
            let columns: usize = params.lookup(b"Columns").num_value().unwrap_or(1);
            if colors == 0 || columns == 0 || !matches!(bpc, 1 | 2 | 4 | 8 | 16) {
                return Err(Error::Parse("malformed /DecodeParms"));
            }
            let bits_per_pixel = colors.checked_mul(bpc)
                .ok_or(Error::Parse("malformed /DecodeParms"))?;
            let row_len = bits_per_pixel.checked_mul(columns)
                .ok_or(Error::Parse("malformed /DecodeParms"))?
                .div_ceil(8);
            Ok(Box::new(PNGDecode::new(
                ZlibDecoder::new(input),
                row_len,
                bits_per_pixel.div_ceil(8),
            )))
        },
        2 => Err(Error::Parse("TIFF predictor not supported")),
        _ => Err(Error::Parse("malformed /Predictor")),
    }
}

/// Reverses the PNG row filters. Each row is prefixed by its filter type byte.
struct PNGDecode<R: Read> {
    input: R,
    row_len: usize,
    bpp: usize,
    row: Vec<u8>,
    prev_row: Vec<u8>,
    index: usize
}

impl<R: Read> PNGDecode<R> {
    fn new(input: R, row_len: usize, bpp: usize) -> Self {
        PNGDecode {
            input,
            row_len,
            bpp,
            row: Vec::new(),
            prev_row: vec![0; row_len],
            index: 0
        }
    }

    fn read_row(&mut self) -> std::io::Result<&[u8]> {
        let mut enc = [0u8];
        let mut in_row = vec![0; self.row_len];
        let read = self.input.read_exact(&mut enc)
            .and_then(|_| self.input.read_exact(&mut in_row));
        if let Err(err) = read {
            match err.kind() {
                // A truncated last row is dropped.
                ErrorKind::UnexpectedEof => {
                    self.row.clear();
                    self.index = 0;
                    return Ok(&[]);
                },
                _ => return Err(err)
            }
        }
        if !self.row.is_empty() {
            std::mem::swap(&mut self.row, &mut self.prev_row);
        }
        let bpp = self.bpp;
        let prev = &self.prev_row;
        let row = &mut self.row;
        row.clear();
        for (i, &val) in in_row.iter().enumerate() {
            let left = if i >= bpp { row[i - bpp] } else { 0 };
            let up = prev[i];
            let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
            let out = match enc[0] {
                0 => val,
                1 => val.wrapping_add(left),
                2 => val.wrapping_add(up),
                3 => val.wrapping_add(((left as u16 + up as u16) / 2) as u8),
                4 => val.wrapping_add(paeth(left, up, up_left)),
                other => return Err(std::io::Error::new(ErrorKind::InvalidData,
                    format!("unknown PNG predictor {other}")))
            };
            row.push(out);
        }
        self.index = 0;
        Ok(&self.row)
    }
}

fn paeth(left: u8, up: u8, up_left: u8) -> u8 {
    let p = left as i16 + up as i16 - up_left as i16;
    let pa = (p - left as i16).abs();
    let pb = (p - up as i16).abs();
    let pc = (p - up_left as i16).abs();
    if pa <= pb && pa <= pc {
        left
    } else if pb <= pc {
        up
    } else {
        up_left
    }
}

impl<R: Read> BufRead for PNGDecode<R> {
    fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
        if self.index < self.row.len() {
            Ok(&self.row[self.index..])
        } else {
            self.read_row()
        }
    }

    fn consume(&mut self, amt: usize) {
        self.index += amt;
    }
}

impl<R: Read> Read for PNGDecode<R> {
    fn read(&mut self, out_buf: &mut [u8]) -> std::io::Result<usize> {
        let in_buf = self.fill_buf()?;
        let len = std::cmp::min(in_buf.len(), out_buf.len());
        out_buf[..len].copy_from_slice(&in_buf[..len]);
        self.consume(len);
        Ok(len)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use crate::base::{Name, Number, Object};

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn png_params(columns: i64) -> Dict {
        Dict::from(vec![
            (Name::from(b"Predictor"), Object::Number(Number::Int(12))),
            (Name::from(b"Columns"), Object::Number(Number::Int(columns))),
        ])
    }

    fn decode_all(data: &[u8], params: &Dict) -> std::io::Result<Vec<u8>> {
        let mut ret = Vec::new();
        decode(data, params).unwrap().read_to_end(&mut ret)?;
        Ok(ret)
    }

    #[test]
    fn test_plain() {
        let data = compress(b"Hello, world!");
        assert_eq!(decode_all(&data, &Dict::default()).unwrap(), b"Hello, world!");
        assert!(decode_all(b"not zlib", &Dict::default()).is_err());
    }

    #[test]
    fn test_png() {
        let rows = [
            0, 1, 2, 3,
            1, 1, 1, 1,
            2, 1, 1, 1,
            3, 2, 2, 2,
            4, 0, 0, 0,
        ];
        let data = compress(&rows);
        assert_eq!(decode_all(&data, &png_params(3)).unwrap(), [
            1, 2, 3,
            1, 2, 3,
            2, 3, 4,
            3, 5, 6,
            3, 5, 6,
        ]);
        // truncated last row
        let data = compress(&rows[..6]);
        assert_eq!(decode_all(&data, &png_params(3)).unwrap(), [1, 2, 3]);
        // unknown row filter
        let data = compress(&[5, 0, 0, 0]);
        assert!(decode_all(&data, &png_params(3)).is_err());
    }

    #[test]
    fn test_params() {
        let tiff = Dict::from(vec![(Name::from(b"Predictor"), Object::Number(Number::Int(2)))]);
        assert!(decode(&b""[..], &tiff).is_err());
        let mut bad = png_params(0);
        assert!(decode(&b""[..], &bad).is_err());
        bad.set_int(b"Columns", 4);
        bad.set_int(b"BitsPerComponent", 3);
        assert!(decode(&b""[..], &bad).is_err());
    }
}
