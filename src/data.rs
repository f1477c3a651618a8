//! Values bound to a view for one render pass.

use std::collections::{HashMap, hash_map};

use kstring::KString;


pub const TRUE: &str = "True";
pub const FALSE: &str = "False";

pub fn bool_str(b: bool) -> &'static str {
    if b { TRUE } else { FALSE }
}


/// String map with lower-cased keys. Blocks are shown iff their value
/// is exactly "True".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewData {
    data: HashMap<KString, String>,
}

fn key(k: &str) -> KString {
    if k.bytes().any(|b| b.is_ascii_uppercase()) || !k.is_ascii() {
        KString::from_string(k.to_lowercase())
    } else {
        KString::from_ref(k)
    }
}

impl ViewData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, k: &str, value: impl Into<String>) {
        self.data.insert(key(k), value.into());
    }

    pub fn get(&self, k: &str) -> Option<&str> {
        self.data.get(&key(k)).map(|s| s.as_str())
    }

    /// Lookup of an already lower-cased key (element names are).
    pub(crate) fn get_lowercase(&self, k: &str) -> Option<&str> {
        self.data.get(k).map(|s| s.as_str())
    }

    pub fn set_bool(&mut self, k: &str, value: bool) {
        self.set(k, bool_str(value));
    }

    /// True iff the value is "True"; false also if missing.
    pub fn get_bool(&self, k: &str) -> bool {
        self.get(k) == Some(TRUE)
    }

    pub fn contains_key(&self, k: &str) -> bool {
        self.data.contains_key(&key(k))
    }

    pub fn remove(&mut self, k: &str) -> Option<String> {
        self.data.remove(&key(k))
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy all entries of `other` into self, overwriting.
    pub fn extend_from(&mut self, other: &ViewData) {
        for (k, v) in &other.data {
            self.data.insert(k.clone(), v.clone());
        }
    }
}

impl<'k, V: Into<String>> FromIterator<(&'k str, V)> for ViewData {
    fn from_iter<T: IntoIterator<Item = (&'k str, V)>>(iter: T) -> Self {
        let mut d = ViewData::new();
        for (k, v) in iter {
            d.set(k, v);
        }
        d
    }
}

impl<'d> IntoIterator for &'d ViewData {
    type Item = (&'d KString, &'d String);
    type IntoIter = hash_map::Iter<'d, KString, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
