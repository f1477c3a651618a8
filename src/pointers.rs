//! Pointer paths: let templates include partials by a logical prefix
//! ("ui/...") instead of their actual location
//! ("vendor/theme/ui/...").

use std::sync::Arc;

use crate::{path::strip_leading_slash, util::split_assignment, error::ViewError,
            miniarcswap::MiniArcSwap};


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    /// Without leading slash
    pub alias: String,
    /// Without leading slash
    pub real: String,
}

impl Pointer {
    pub fn new(alias: &str, real: &str) -> Self {
        Pointer {
            alias: strip_leading_slash(alias).into(),
            real: strip_leading_slash(real).into(),
        }
    }

    /// Parse `alias=real`.
    pub fn parse(s: &str) -> Result<Self, ViewError> {
        let (alias, real) = split_assignment("pointer", s)?;
        Ok(Pointer::new(alias, real.trim()))
    }
}


/// Ordered pointer table; the first alias that is a prefix of the
/// path wins. Readers get the current table as an `Arc` and are never
/// blocked by a replacement.
#[derive(Debug, Default)]
pub struct PartialPointers {
    table: MiniArcSwap<Vec<Pointer>>,
}

impl PartialPointers {
    pub fn new(pointers: Vec<Pointer>) -> Self {
        PartialPointers { table: MiniArcSwap::new(Arc::new(pointers)) }
    }

    pub fn get(&self) -> Arc<Vec<Pointer>> {
        self.table.get()
    }

    pub fn set(&self, pointers: Vec<Pointer>) {
        self.table.set(Arc::new(pointers));
    }

    pub fn push(&self, pointer: Pointer) {
        self.table.update(|table| {
            let mut v = table.clone();
            v.push(pointer);
            v
        });
    }

    /// Canonical form of a partial path as written in a template:
    /// one leading slash, aliases replaced.
    pub fn resolve(&self, raw: &str) -> String {
        let path = strip_leading_slash(raw);
        let table = self.get();
        let resolved = match table.iter().find(|p| path.starts_with(&*p.alias)) {
            Some(p) => format!("{}{}", p.real, &path[p.alias.len()..]),
            None => path.to_string(),
        };
        format!("/{resolved}")
    }
}
