use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::io::{BufRead, BufReader, Cursor, Read};

use crate::codecs::Filters;

use super::*;

pub(crate) const LENGTH: &[u8] = b"Length";
pub(crate) const FILTER: &[u8] = b"Filter";
pub(crate) const DECODE_PARMS: &[u8] = b"DecodeParms";

/// Size of the blocks in which stream contents are compared.
const CMP_CHUNK: usize = 1024;

/// Which processing stages have already been applied to the bytes held by a [`StreamObject`],
/// or which are requested from [`StreamObject::data()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeState {
    /// Data as found in the file.
    #[default]
    Raw,
    /// Filters applied.
    Decoded,
    /// Decryption applied.
    Decrypted,
    /// Both decryption and filters applied.
    DecryptedAndDecoded
}

/// A PDF stream: a dictionary paired with a byte source holding its data.
///
/// Apart from the data, the object records facts observed when the stream was read from a file,
/// which need not agree with the dictionary: whether the `stream` and `endstream` keywords were
/// delimited by the proper end-of-line markers, and the real size of the data.
pub struct StreamObject {
    dict: Dict,
    source: RefCell<Box<dyn ByteSource>>,
    state: DecodeState,
    stream_crlf: bool,
    endstream_crlf: bool,
    real_size: u64,
}

impl StreamObject {
    fn init(dict: Dict, source: Box<dyn ByteSource>, state: DecodeState) -> Self {
        StreamObject {
            dict,
            source: RefCell::new(source),
            state,
            stream_crlf: true,
            endstream_crlf: true,
            real_size: 0,
        }
    }

    /// An empty stream with an empty dictionary (except for `/Length 0`).
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// A stream of raw data with a fresh dictionary. `/Length` is set to the length of the data.
    pub fn from_source(source: impl ByteSource + 'static) -> Self {
        let mut stm = Self::init(Dict::new(), Box::new(source), DecodeState::Raw);
        let len = match stm.source.get_mut().raw_len() {
            Ok(len) => i64::try_from(len).unwrap_or(i64::MAX),
            Err(err) => {
                log::debug!("Can't determine stream length: {err}");
                0
            }
        };
        stm.set_indirect_length(len);
        stm
    }

    /// Same as [`Self::from_source()`] for in-memory data.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::from_source(Cursor::new(bytes.into()))
    }

    /// A stream with the given dictionary and no data.
    pub fn from_dict(dict: Dict) -> Self {
        Self::init(dict, Box::new(Cursor::new(Vec::new())), DecodeState::Raw)
    }

    /// A stream with the given dictionary and data. `state` tells which processing has already
    /// been applied to the data. The dictionary is taken as is, in particular its `/Length` is
    /// not checked against the data.
    pub fn with_source(dict: Dict, source: impl ByteSource + 'static, state: DecodeState) -> Self {
        Self::init(dict, Box::new(source), state)
    }

    /// Same as [`Self::with_source()`] for in-memory data.
    pub fn with_bytes(dict: Dict, bytes: impl Into<Vec<u8>>, state: DecodeState) -> Self {
        Self::with_source(dict, Cursor::new(bytes.into()), state)
    }

    pub fn dict(&self) -> &Dict {
        &self.dict
    }

    pub fn dict_mut(&mut self) -> &mut Dict {
        &mut self.dict
    }

    pub fn into_dict(self) -> Dict {
        self.dict
    }

    /// Provides the data of the stream at the requested level of processing.
    ///
    /// If `Raw` is requested, or if the data were already processed before being handed to this
    /// object, the stored source is returned, rewound to its start. Otherwise, the stored data is
    /// routed through the filters named in `/Filter` (using `/DecodeParms`), decoding lazily as
    /// the result is read.
    ///
    /// Returns an error if the source can't be rewound or the filters can't be set up.
    pub fn try_data(&mut self, level: DecodeState) -> Result<StreamData<'_>, Error> {
        if level == DecodeState::Raw || self.state != DecodeState::Raw {
            let source = self.source.get_mut();
            source.reset()?;
            return Ok(StreamData::Stored(source.as_mut()));
        }
        let filters = self.filters();
        let params = self.dict.lookup(DECODE_PARMS).direct().clone();
        let source = self.source.get_mut();
        source.reset()?;
        let decoded = filters.decode(BufReader::new(source.as_mut()), &params)?;
        Ok(StreamData::Decoded(decoded))
    }

    /// Like [`Self::try_data()`], but a failure is only logged and `None` returned. Callers
    /// should treat that as "no usable data" rather than a failure of the whole document.
    pub fn data(&mut self, level: DecodeState) -> Option<StreamData<'_>> {
        self.try_data(level)
            .map_err(|err| log::debug!("Can't get stream data: {err}"))
            .ok()
    }

    /// Replaces the data and records which processing has already been applied to them. Does
    /// not touch `/Length`.
    pub fn set_data(&mut self, source: impl ByteSource + 'static, state: DecodeState) {
        self.source = RefCell::new(Box::new(source));
        self.state = state;
    }

    /// Same as [`Self::set_data()`] for in-memory data.
    pub fn set_bytes(&mut self, bytes: impl Into<Vec<u8>>, state: DecodeState) {
        self.set_data(Cursor::new(bytes.into()), state);
    }

    pub fn decode_state(&self) -> DecodeState {
        self.state
    }

    pub fn set_decode_state(&mut self, state: DecodeState) {
        self.state = state;
    }

    /// The filters currently named in `/Filter`.
    pub fn filters(&self) -> Filters {
        Filters::from_object(self.dict.lookup(FILTER))
    }

    /// Writes `filters` to `/Filter`. An empty list removes the key.
    pub fn set_filters(&mut self, filters: &Filters) {
        match filters.to_object() {
            Object::Null => { self.dict.remove(FILTER); },
            obj => { self.dict.insert(Name::from(FILTER), obj); }
        }
    }

    /// The declared length, `None` if missing or not an integer. An indirect `/Length` is
    /// looked through if it has been resolved.
    pub fn length(&self) -> Option<i64> {
        self.dict.int_value(LENGTH)
    }

    /// The `/Length` entry as stored, possibly an indirect reference.
    pub fn length_object(&self) -> &Object {
        self.dict.lookup(LENGTH)
    }

    /// Sets `/Length` to a direct integer.
    pub fn set_length(&mut self, length: i64) {
        self.dict.set_int(LENGTH, length);
    }

    /// Sets `/Length` to `length`, keeping it indirect if it was an indirect reference before.
    pub fn set_indirect_length(&mut self, length: i64) {
        let value = Object::Number(Number::Int(length));
        let obj = match self.dict.lookup(LENGTH).as_objref() {
            Some(&objref) => Object::Indirect(Indirect::new(objref, value)),
            None => value
        };
        self.dict.insert(Name::from(LENGTH), obj);
    }

    /// Whether the `stream` keyword was followed by CRLF or LF.
    pub fn stream_keyword_crlf_compliant(&self) -> bool {
        self.stream_crlf
    }

    pub fn set_stream_keyword_crlf_compliant(&mut self, compliant: bool) {
        self.stream_crlf = compliant;
    }

    /// Whether the `endstream` keyword was preceded by an end-of-line marker.
    pub fn endstream_keyword_crlf_compliant(&self) -> bool {
        self.endstream_crlf
    }

    pub fn set_endstream_keyword_crlf_compliant(&mut self, compliant: bool) {
        self.endstream_crlf = compliant;
    }

    /// The number of bytes actually found between `stream` and `endstream`, excluding the
    /// end-of-line markers.
    pub fn real_stream_size(&self) -> u64 {
        self.real_size
    }

    pub fn set_real_stream_size(&mut self, size: u64) {
        self.real_size = size;
    }

    /// Compares the data of two streams byte by byte. Both sources are rewound first.
    ///
    /// The stored data are compared regardless of their [`DecodeState`]. A stream is always
    /// equal to itself; otherwise, neither source may be in use elsewhere.
    pub fn same_content(&self, other: &StreamObject) -> Result<bool, Error> {
        if std::ptr::eq(self, other) {
            return Ok(true);
        }
        let mut first = self.source.try_borrow_mut()
            .map_err(|_| Error::Parse("stream data in use"))?;
        let mut second = other.source.try_borrow_mut()
            .map_err(|_| Error::Parse("stream data in use"))?;
        Ok(equal_sources(first.as_mut(), second.as_mut())?)
    }
}

fn equal_sources(first: &mut dyn ByteSource, second: &mut dyn ByteSource) -> std::io::Result<bool> {
    first.reset()?;
    second.reset()?;
    let mut buf_one = [0u8; CMP_CHUNK];
    let mut buf_two = [0u8; CMP_CHUNK];
    loop {
        let len_one = read_chunk(first, &mut buf_one)?;
        let len_two = read_chunk(second, &mut buf_two)?;
        if len_one != len_two || buf_one[..len_one] != buf_two[..len_two] {
            return Ok(false);
        }
        if len_one == 0 {
            return Ok(true);
        }
    }
}

/// Fills `buf` unless the end of input comes first, so that sources returning short reads
/// compare by content.
fn read_chunk(source: &mut dyn ByteSource, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match source.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(len) => total += len,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err)
        }
    }
    Ok(total)
}

impl Default for StreamObject {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for StreamObject {
    /// Streams are equal if their dictionaries, states, observed delimiter facts and data are.
    /// A fault while reading the data makes them unequal.
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        if self.dict != other.dict
            || self.state != other.state
            || self.stream_crlf != other.stream_crlf
            || self.endstream_crlf != other.endstream_crlf
            || self.real_size != other.real_size {
            return false;
        }
        match self.same_content(other) {
            Ok(eq) => eq,
            Err(err) => {
                log::debug!("Error comparing stream data: {err}");
                false
            }
        }
    }
}

impl Debug for StreamObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamObject")
            .field("dict", &self.dict)
            .field("state", &self.state)
            .field("stream_crlf", &self.stream_crlf)
            .field("endstream_crlf", &self.endstream_crlf)
            .field("real_size", &self.real_size)
            .finish_non_exhaustive()
    }
}

impl Display for StreamObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [stream]", self.dict)
    }
}

/// The data of a [`StreamObject`] as returned by [`StreamObject::data()`].
pub enum StreamData<'a> {
    /// The stored source itself.
    Stored(&'a mut dyn ByteSource),
    /// A decoder reading from the stored source.
    Decoded(Box<dyn BufRead + 'a>),
}

impl StreamData<'_> {
    pub fn is_decoded(&self) -> bool {
        matches!(self, StreamData::Decoded(_))
    }

    /// Reads everything that's left.
    pub fn read_all(mut self) -> std::io::Result<Vec<u8>> {
        let mut ret = Vec::new();
        self.read_to_end(&mut ret)?;
        Ok(ret)
    }
}

impl Read for StreamData<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            StreamData::Stored(source) => source.read(buf),
            StreamData::Decoded(reader) => reader.read(buf)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    /// A source failing as soon as its cursor reaches `fail_at`.
    struct Faulty {
        inner: Cursor<Vec<u8>>,
        fail_at: u64,
    }

    impl Read for Faulty {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let pos = self.inner.position();
            if pos >= self.fail_at {
                return Err(std::io::Error::other("injected fault"));
            }
            let max = std::cmp::min(buf.len() as u64, self.fail_at - pos) as usize;
            self.inner.read(&mut buf[..max])
        }
    }

    impl Seek for Faulty {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn flate_dict() -> Dict {
        Dict::from(vec![(Name::from(b"Filter"), Object::new_name(b"FlateDecode"))])
    }

    #[test]
    fn test_raw_equals_decoded_without_filters() {
        let mut stm = StreamObject::from_bytes(b"BT /F1 12 Tf ET".to_vec());
        let raw = stm.data(DecodeState::Raw).unwrap().read_all().unwrap();
        let dec = stm.data(DecodeState::Decoded).unwrap().read_all().unwrap();
        assert_eq!(raw, b"BT /F1 12 Tf ET");
        assert_eq!(raw, dec);
    }

    #[test]
    fn test_flate() {
        let text = b"1 0 0 1 50 50 cm 0 0 m 100 100 l S".repeat(20);
        let data = compress(&text);
        let mut stm = StreamObject::with_bytes(flate_dict(), data.clone(), DecodeState::Raw);
        let dec = stm.data(DecodeState::Decoded).unwrap();
        assert!(dec.is_decoded());
        assert_eq!(dec.read_all().unwrap(), text);
        assert_eq!(stm.data(DecodeState::Raw).unwrap().read_all().unwrap(), data);
        // The source is rewound on every request.
        assert_eq!(stm.data(DecodeState::Decoded).unwrap().read_all().unwrap(), text);
    }

    #[test]
    fn test_no_double_decoding() {
        let mut stm = StreamObject::with_bytes(flate_dict(), b"plain".to_vec(), DecodeState::Decoded);
        let data = stm.data(DecodeState::Decoded).unwrap();
        assert!(!data.is_decoded());
        assert_eq!(data.read_all().unwrap(), b"plain");

        let mut stm = StreamObject::with_bytes(flate_dict(), b"plain".to_vec(), DecodeState::Decrypted);
        assert_eq!(stm.data(DecodeState::DecryptedAndDecoded).unwrap().read_all().unwrap(), b"plain");
    }

    #[test]
    fn test_unusable_filter() {
        let dict = Dict::from(vec![(Name::from(b"Filter"), Object::new_name(b"JBIG2Decode"))]);
        let mut stm = StreamObject::with_bytes(dict, b"data".to_vec(), DecodeState::Raw);
        assert!(stm.data(DecodeState::Decoded).is_none());
        assert!(matches!(stm.try_data(DecodeState::Decoded), Err(Error::UnsupportedFilter(_))));
        assert_eq!(stm.data(DecodeState::Raw).unwrap().read_all().unwrap(), b"data");

        let dict = Dict::from(vec![(Name::from(b"Filter"), Object::Number(Number::Int(1)))]);
        let mut stm = StreamObject::with_bytes(dict, b"data".to_vec(), DecodeState::Raw);
        assert!(stm.filters().is_empty());
        assert_eq!(stm.data(DecodeState::Decoded).unwrap().read_all().unwrap(), b"data");
    }

    #[test]
    fn test_length_sync() {
        let stm = StreamObject::from_bytes(b"0123456789".to_vec());
        assert_eq!(stm.length(), Some(10));
        assert_eq!(stm.length_object(), &Object::Number(Number::Int(10)));
        assert_eq!(StreamObject::new().length(), Some(0));

        let dict = Dict::from(vec![(Name::from(b"Length"), Object::Number(Number::Int(99)))]);
        let mut stm = StreamObject::with_bytes(dict, b"short".to_vec(), DecodeState::Raw);
        assert_eq!(stm.length(), Some(99));
        stm.set_bytes(b"other".to_vec(), DecodeState::Raw);
        assert_eq!(stm.length(), Some(99));
        stm.set_length(5);
        assert_eq!(stm.length(), Some(5));

        assert_eq!(StreamObject::from_dict(Dict::new()).length(), None);
    }

    #[test]
    fn test_indirect_length() {
        let objref = ObjRef { num: 8, gen: 0 };
        let dict = Dict::from(vec![(Name::from(b"Length"), Object::Ref(objref))]);
        let mut stm = StreamObject::from_dict(dict);
        assert_eq!(stm.length(), None);
        stm.set_indirect_length(42);
        assert_eq!(stm.length(), Some(42));
        assert_eq!(stm.length_object(), &Object::Indirect(Indirect::new(objref,
            Object::Number(Number::Int(42)))));
        assert_eq!(stm.length_object().direct(), &Object::Number(Number::Int(42)));

        stm.set_indirect_length(43);
        assert_eq!(stm.length(), Some(43));
        assert_eq!(stm.length_object().as_objref(), Some(&objref));

        let mut stm = StreamObject::new();
        stm.set_indirect_length(7);
        assert_eq!(stm.length(), Some(7));
        assert!(!stm.length_object().is_indirect());
    }

    #[test]
    fn test_filters() {
        let mut stm = StreamObject::new();
        assert!(stm.filters().is_empty());
        let filters = Filters::from_object(&Object::Array(vec![
            Object::new_name(b"ASCIIHexDecode"),
            Object::new_name(b"FlateDecode"),
        ]));
        stm.set_filters(&filters);
        assert_eq!(stm.filters(), filters);
        assert_eq!(format!("{stm}"), "<< /Length 0 /Filter [ /ASCIIHexDecode /FlateDecode ] >> [stream]");
        stm.set_filters(&Filters::default());
        assert!(!stm.dict().contains_key(b"Filter"));
    }

    #[test]
    fn test_set_data() {
        let mut stm = StreamObject::from_bytes(b"raw".to_vec());
        stm.dict_mut().insert(Name::from(b"Filter"), Object::new_name(b"FlateDecode"));
        stm.set_bytes(b"decoded".to_vec(), DecodeState::Decoded);
        assert_eq!(stm.decode_state(), DecodeState::Decoded);
        assert_eq!(stm.data(DecodeState::Decoded).unwrap().read_all().unwrap(), b"decoded");
        stm.set_decode_state(DecodeState::Raw);
        // Now the stored bytes are taken for Flate data, which they are not.
        let res = stm.data(DecodeState::Decoded).unwrap().read_all();
        assert!(res.is_err());
    }

    #[test]
    fn test_flags() {
        let mut stm = StreamObject::new();
        assert!(stm.stream_keyword_crlf_compliant());
        assert!(stm.endstream_keyword_crlf_compliant());
        assert_eq!(stm.real_stream_size(), 0);
        stm.set_stream_keyword_crlf_compliant(false);
        stm.set_endstream_keyword_crlf_compliant(false);
        stm.set_real_stream_size(17);
        assert!(!stm.stream_keyword_crlf_compliant());
        assert!(!stm.endstream_keyword_crlf_compliant());
        assert_eq!(stm.real_stream_size(), 17);
    }

    #[test]
    fn test_equality() {
        let content = b"x".repeat(3000);
        let one = StreamObject::from_bytes(content.clone());
        let two = StreamObject::from_bytes(content.clone());
        assert_eq!(one, two);
        assert_eq!(one, one);

        let mut changed = content.clone();
        changed[2500] = b'y';
        let three = StreamObject::from_bytes(changed);
        assert_ne!(one, three);

        let four = StreamObject::with_bytes(one.dict().clone(), content[..2999].to_vec(), DecodeState::Raw);
        assert_ne!(one, four);

        let five = StreamObject::with_bytes(one.dict().clone(), content.clone(), DecodeState::Decoded);
        assert_ne!(one, five);

        let mut six = StreamObject::from_bytes(content.clone());
        six.set_real_stream_size(3000);
        assert_ne!(one, six);

        let seven = StreamObject::from_bytes(b"x".repeat(2999));
        assert_ne!(one, seven);
    }

    #[test]
    fn test_equality_fault() {
        let content = b"x".repeat(3000);
        let one = StreamObject::from_bytes(content.clone());
        let faulty = StreamObject::from_source(Faulty { inner: Cursor::new(content.clone()), fail_at: 2000 });
        assert_eq!(one.dict(), faulty.dict());
        assert!(one.same_content(&faulty).is_err());
        assert_ne!(one, faulty);
        assert_ne!(faulty, one);

        let healthy = StreamObject::from_source(Faulty { inner: Cursor::new(content), fail_at: 5000 });
        assert_eq!(one, healthy);
    }

    #[test]
    fn test_data_fault() {
        let mut stm = StreamObject::from_source(Faulty { inner: Cursor::new(b"abc".to_vec()), fail_at: 1 });
        let mut data = stm.data(DecodeState::Raw).unwrap();
        let mut buf = [0u8; 3];
        assert_eq!(data.read(&mut buf).unwrap(), 1);
        assert!(data.read(&mut buf).is_err());
    }
}
