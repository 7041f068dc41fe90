use std::fmt::{Display, Formatter};

use super::name::Name;
use super::number::Number;
use super::object::Object;

/// Dictionary objects (like `<< /Length 42 >>`).
///
/// Entries keep their insertion order. Replacing the value of an existing key keeps its position.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Dict(Vec<(Name, Object)>);

impl Dict {
    pub fn new() -> Dict {
        Dict::default()
    }

    /// Looks up for a value for a given [`Name`] key. If not present, returns a static reference
    /// to [`Object::Null`].
    pub fn lookup(&self, key: &[u8]) -> &Object {
        self.0.iter()
            .find(|(name, _obj)| name == key)
            .map(|(_name, obj)| obj)
            .unwrap_or(&Object::Null)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.0.iter().any(|(name, _obj)| name == key)
    }

    /// Sets the value for `key`, returning the previous value if there was one.
    pub fn insert(&mut self, key: Name, value: Object) -> Option<Object> {
        match self.0.iter_mut().find(|(name, _obj)| *name == key) {
            Some((_name, obj)) => Some(std::mem::replace(obj, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Object> {
        let pos = self.0.iter().position(|(name, _obj)| name == key)?;
        Some(self.0.remove(pos).1)
    }

    /// The integer value of `key`, looking through resolved indirect references. `None` for
    /// missing keys and values of other types.
    pub fn int_value(&self, key: &[u8]) -> Option<i64> {
        match self.lookup(key).direct() {
            &Object::Number(Number::Int(val)) => Some(val),
            _ => None
        }
    }

    pub fn set_int(&mut self, key: &[u8], value: i64) {
        self.insert(Name::from(key), Object::Number(Number::Int(value)));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (Name, Object)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<(Name, Object)> {
        self.0
    }
}

impl From<Vec<(Name, Object)>> for Dict {
    fn from(vec: Vec<(Name, Object)>) -> Dict {
        Dict(vec)
    }
}

impl IntoIterator for Dict {
    type Item = (Name, Object);
    type IntoIter = <Vec<(Name, Object)> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dict {
    type Item = &'a (Name, Object);
    type IntoIter = std::slice::Iter<'a, (Name, Object)>;

    fn into_iter(self: &'a Dict) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Dict {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("<< ")?;
        for (key, val) in &self.0 {
            write!(f, "{key} {val} ")?;
        }
        f.write_str(">>")
    }
}
