use std::fmt::{Display, Formatter};

use super::name::Name;
use super::dict::Dict;
use super::number::Number;
use super::string::format_string;
use super::types::*;

/// The base type of all direct PDF objects.
///
/// Streams are not represented here: they are always indirect, and their data is owned by a
/// [`StreamObject`](super::StreamObject).
#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    /// Bool (`true` or `false`)
    Bool(bool),
    /// Numbers (integer or real)
    Number(Number),
    /// Strings.
    ///
    /// No distinction is made whether this was literal or hex-encoded in the source.
    String(Vec<u8>),
    /// Name (like `/Length`)
    Name(Name),
    /// Array (`[1 2 3]`)
    Array(Vec<Object>),
    /// Dictionary (`<< /Root 1 0 R >>`)
    Dict(Dict),
    /// Indirect object reference (`3 0 R`)
    Ref(ObjRef),
    /// Indirect object reference together with the direct value it stands for.
    Indirect(Indirect),
    /// Null object (`null`). Also used as a fall-back where the specification says.
    Null
}

impl Object {
    /// A utility method to create [`Object::String`] from a byte slice.
    pub fn new_string(s: &[u8]) -> Object {
        Object::String(s.to_owned())
    }

    /// A utility method to create [`Object::Name`] from a byte slice. Don't pass the initial
    /// `'/'` unless the name is actually supposed to start with `#2F`.
    pub fn new_name(s: &[u8]) -> Object {
        Object::Name(Name::from(s))
    }

    /// For [`Object::Indirect`], the value it wraps (recursively), otherwise `self`.
    pub fn direct(&self) -> &Object {
        match self {
            Object::Indirect(ind) => ind.value.direct(),
            _ => self
        }
    }

    pub fn is_indirect(&self) -> bool {
        matches!(self, Object::Ref(_) | Object::Indirect(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            &Object::Bool(val) => Some(val),
            _ => None
        }
    }

    pub fn as_number(&self) -> Option<Number> {
        match self {
            &Object::Number(num) => Some(num),
            _ => None
        }
    }

    pub fn as_string(&self) -> Option<&Vec<u8>> {
        match self {
            Object::String(val) => Some(val),
            _ => None
        }
    }

    pub fn as_name(&self) -> Option<&Name> {
        match self {
            Object::Name(val) => Some(val),
            _ => None
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Object>> {
        match self {
            Object::Array(val) => Some(val),
            _ => None
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Object::Dict(val) => Some(val),
            _ => None
        }
    }

    /// The reference of both [`Object::Ref`] and [`Object::Indirect`].
    pub fn as_objref(&self) -> Option<&ObjRef> {
        match self {
            Object::Ref(val) => Some(val),
            Object::Indirect(Indirect { objref, .. }) => Some(objref),
            _ => None
        }
    }

    pub fn into_name(self) -> Option<Name> {
        match self {
            Object::Name(val) => Some(val),
            _ => None
        }
    }

    pub fn into_array(self) -> Option<Vec<Object>> {
        match self {
            Object::Array(val) => Some(val),
            _ => None
        }
    }

    pub fn into_dict(self) -> Option<Dict> {
        match self {
            Object::Dict(val) => Some(val),
            _ => None
        }
    }

    /// For `Object::Number(Number::Int(number))`, extracts the `number` and casts it into the
    /// required type. Returns `None` both for other types of objects and for value too large for the
    /// type `T`. Resolved indirect values are looked through.
    pub fn num_value<T: TryFrom<i64>>(&self) -> Option<T> {
        match self.direct() {
            &Object::Number(Number::Int(num)) => num.try_into().ok(),
            _ => None
        }
    }
}

impl From<Number> for Object {
    fn from(num: Number) -> Object {
        Object::Number(num)
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Bool(true) => f.write_str("true"),
            Object::Bool(false) => f.write_str("false"),
            Object::Number(num) => write!(f, "{num}"),
            Object::String(s) => format_string(f, s),
            Object::Name(name) => write!(f, "{}", name),
            Object::Array(arr) => {
                f.write_str("[ ")?;
                for obj in arr {
                    write!(f, "{obj} ")?;
                }
                f.write_str("]")
            },
            Object::Dict(dict) => write!(f, "{}", dict),
            Object::Ref(objref) | Object::Indirect(Indirect { objref, .. }) => write!(f, "{objref} R"),
            Object::Null => f.write_str("null")
        }
    }
}

/// An indirect object reference.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct ObjRef {
    pub num: ObjNum,
    pub gen: ObjGen
}

impl Display for ObjRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.num, self.gen)
    }
}

/// An indirect reference which has been resolved, or created locally for a value which should
/// stay indirect when written out.
#[derive(PartialEq, Debug, Clone)]
pub struct Indirect {
    pub objref: ObjRef,
    pub value: Box<Object>
}

impl Indirect {
    pub fn new(objref: ObjRef, value: Object) -> Self {
        Indirect { objref, value: Box::new(value) }
    }
}
