//! The parsed form of a template: a flat list of elements, each a tag
//! marker followed by the literal text up to the next tag.

use std::collections::HashMap;

use kstring::KString;

use crate::error::ViewWarning;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lower-cased tag name; empty for pure literal text; "/foo" for
    /// the closing tag of block "foo".
    pub name: KString,
    /// Literal text following the tag.
    pub html: String,
    /// Inline properties (`{{button title:"Save"}}`), None if there
    /// were none or they were malformed.
    pub vars: Option<HashMap<String, String>>,
    /// The inline property text as written, trimmed; used to
    /// reproduce the tag.
    pub var: Option<String>,
    /// Index of the matching closing element, if this opens a block.
    pub block_end: Option<usize>,
}

impl Element {
    pub fn literal(html: impl Into<String>) -> Self {
        Element {
            name: KString::from_static(""),
            html: html.into(),
            vars: None,
            var: None,
            block_end: None,
        }
    }

    pub fn is_block(&self) -> bool {
        self.block_end.is_some()
    }

    pub fn is_closing(&self) -> bool {
        self.name.starts_with('/')
    }

    /// Write the tag the way it would appear in template source (empty
    /// for literals).
    pub fn write_tag(&self, out: &mut String) {
        if !self.name.is_empty() {
            out.push_str("{{");
            out.push_str(&self.name);
            if let Some(var) = &self.var {
                if !var.is_empty() {
                    out.push(' ');
                    out.push_str(var);
                }
            }
            out.push_str("}}");
        }
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.as_ref()?.get(key).map(|s| s.as_str())
    }
}


/// Tag name -> indices of the elements carrying it (closing tags are
/// not included).
pub type Fields = HashMap<KString, Vec<usize>>;


/// A template included from another file; all its variable names got
/// `prefix` prepended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub name: KString,
    pub path: String,
    pub prefix: String,
}


/// Immutable result of parsing one `(file, section)`; shared between
/// all views and threads rendering it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub elements: Vec<Element>,
    pub fields: Fields,
    pub partials: Vec<Partial>,
    pub warnings: Vec<ViewWarning>,
}

impl Template {
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn field_indices(&self, name: &str) -> &[usize] {
        match self.fields.get(&*name.to_lowercase()) {
            Some(v) => v.as_slice(),
            None => &[]
        }
    }

    /// Index of the first element named `name` (lower-cased).
    pub fn find(&self, name: &str) -> Option<usize> {
        self.field_indices(name).first().copied()
    }
}
