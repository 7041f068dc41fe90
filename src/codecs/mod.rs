//! The filter chain: decoders for the `/Filter` names of a stream dictionary.

mod flate;
mod asciihex;
mod ascii85;
mod runlength;

use std::io::BufRead;

use crate::base::*;

/// Supported PDF filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// `/FlateDecode`
    Flate,
    /// `/ASCIIHexDecode`
    AsciiHex,
    /// `/ASCII85Decode`
    Ascii85,
    /// `/RunLengthDecode`
    RunLength,
}

impl TryFrom<&Name> for Filter {
    type Error = Error;

    fn try_from(name: &Name) -> Result<Filter, Error> {
        match name.as_slice() {
            b"FlateDecode" | b"Fl" => Ok(Filter::Flate),
            b"ASCIIHexDecode" | b"AHx" => Ok(Filter::AsciiHex),
            b"ASCII85Decode" | b"A85" => Ok(Filter::Ascii85),
            b"RunLengthDecode" | b"RL" => Ok(Filter::RunLength),
            _ => Err(Error::UnsupportedFilter(name.clone()))
        }
    }
}

impl Filter {
    /// Wraps a `BufRead` in an adapter decoding the data. `params` is the filter's entry in
    /// `/DecodeParms` (empty if there is none).
    pub fn decode<'a, R: BufRead + 'a>(self, input: R, params: &Dict) -> Result<Box<dyn BufRead + 'a>, Error> {
        Ok(match self {
            Filter::Flate => flate::decode(input, params)?,
            Filter::AsciiHex => Box::new(asciihex::decode(input)),
            Filter::Ascii85 => Box::new(ascii85::decode(input)),
            Filter::RunLength => Box::new(runlength::decode(input)),
        })
    }
}

/// The list of filter names found in the `/Filter` entry of a stream dictionary.
///
/// Names are kept even if there is no decoder for them, so the list can be written back
/// unchanged. Only [`Filters::decode()`] fails on them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters(Vec<Name>);

impl Filters {
    /// Projects a `/Filter` value: a single name, or an array of names. Anything else counts as
    /// no filters; array items that are not names are skipped.
    pub fn from_object(obj: &Object) -> Filters {
        match obj.direct() {
            Object::Name(name) => Filters(vec![name.clone()]),
            Object::Array(arr) => Filters(arr.iter()
                .filter_map(|obj| obj.direct().as_name())
                .cloned()
                .collect()),
            _ => Filters::default()
        }
    }

    /// The value for `/Filter`: `null` for no filters, a name for one, an array otherwise.
    pub fn to_object(&self) -> Object {
        match &self.0[..] {
            [] => Object::Null,
            [name] => Object::Name(name.clone()),
            names => Object::Array(names.iter().cloned().map(Object::Name).collect())
        }
    }

    pub fn names(&self) -> &[Name] {
        &self.0
    }

    pub fn push(&mut self, name: Name) {
        self.0.push(name);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wraps a `BufRead` in the chain of decoders for these filters, in order. `params` is the
    /// value of `/DecodeParms`: a dictionary (for the first filter), or an array of dictionaries
    /// or nulls aligned with the filters.
    ///
    /// Nothing is read from `input` here. Errors in the data itself surface when reading the
    /// result.
    pub fn decode<'a, R: BufRead + 'a>(&self, input: R, params: &Object) -> Result<Box<dyn BufRead + 'a>, Error> {
        let filters = self.0.iter()
            .map(Filter::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let empty = Dict::default();
        let mut reader: Box<dyn BufRead + 'a> = Box::new(input);
        for (index, filter) in filters.into_iter().enumerate() {
            let params = params_at(params, index).unwrap_or(&empty);
            reader = filter.decode(reader, params)?;
        }
        Ok(reader)
    }
}

impl From<Vec<Name>> for Filters {
    fn from(names: Vec<Name>) -> Filters {
        Filters(names)
    }
}

fn params_at(params: &Object, index: usize) -> Option<&Dict> {
    match params.direct() {
        Object::Dict(dict) if index == 0 => Some(dict),
        Object::Array(arr) => arr.get(index)?.direct().as_dict(),
        _ => None
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn decode_all(filters: &Filters, input: &[u8], params: &Object) -> Result<Vec<u8>, Error> {
        let mut ret = Vec::new();
        filters.decode(Cursor::new(input), params)?.read_to_end(&mut ret)?;
        Ok(ret)
    }

    #[test]
    fn test_from_object() {
        assert!(Filters::from_object(&Object::Null).is_empty());
        assert_eq!(Filters::from_object(&Object::new_name(b"FlateDecode")).names(), [Name::from(b"FlateDecode")]);
        let arr = Object::Array(vec![
            Object::new_name(b"ASCII85Decode"),
            Object::Number(Number::Int(3)),
            Object::new_name(b"LZWDecode"),
        ]);
        let filters = Filters::from_object(&arr);
        assert_eq!(filters.len(), 2);
        assert_eq!(filters.to_object(), Object::Array(vec![
            Object::new_name(b"ASCII85Decode"),
            Object::new_name(b"LZWDecode"),
        ]));
        assert_eq!(Filters::from(vec![Name::from(b"RL")]).to_object(), Object::new_name(b"RL"));
        assert_eq!(Filters::default().to_object(), Object::Null);
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(Filter::try_from(&Name::from(b"AHx")).unwrap(), Filter::AsciiHex);
        assert_eq!(Filter::try_from(&Name::from(b"ASCII85Decode")).unwrap(), Filter::Ascii85);
        assert!(matches!(Filter::try_from(&Name::from(b"DCTDecode")), Err(Error::UnsupportedFilter(name)) if name == b"DCTDecode"));
    }

    #[test]
    fn test_chain() {
        let mut filters = Filters::default();
        assert_eq!(decode_all(&filters, b"as is", &Object::Null).unwrap(), b"as is");
        filters.push(Name::from(b"ASCIIHexDecode"));
        filters.push(Name::from(b"RunLengthDecode"));
        // RunLength of "aaab": [254 'a' 0 'b' 128], hex-encoded
        assert_eq!(decode_all(&filters, b"FE 61 00 62 80>", &Object::Null).unwrap(), b"aaab");
        filters.push(Name::from(b"CCITTFaxDecode"));
        assert!(matches!(decode_all(&filters, b"", &Object::Null), Err(Error::UnsupportedFilter(_))));
    }

    #[test]
    fn test_params_at() {
        let dict = Dict::from(vec![(Name::from(b"Predictor"), Object::Number(Number::Int(12)))]);
        assert_eq!(params_at(&Object::Dict(dict.clone()), 0), Some(&dict));
        assert_eq!(params_at(&Object::Dict(dict.clone()), 1), None);
        let arr = Object::Array(vec![Object::Null, Object::Dict(dict.clone())]);
        assert_eq!(params_at(&arr, 0), None);
        assert_eq!(params_at(&arr, 1), Some(&dict));
        assert_eq!(params_at(&arr, 2), None);
    }
}
