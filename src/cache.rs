//! Parsed templates shared across views and threads, keyed by
//! `(file, section)`.

use std::{collections::HashMap, sync::{Arc, Mutex}};

use kstring::KString;
use lazy_static::lazy_static;

use crate::{element::Template, util::hashmap_try_insert};


lazy_static! {
    static ref GLOBAL: Arc<TemplateCache> = Arc::new(TemplateCache::new());
}

fn cache_key(file: &str, section: &str) -> KString {
    KString::from_string(format!("{file}/{section}"))
}

/// Entries are never updated in place: the first parse inserted for a
/// key wins, later inserts for the same key get the existing one back.
/// The lock is only held for map access, never while parsing or doing
/// I/O.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: Mutex<HashMap<KString, Arc<Template>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process wide cache.
    pub fn global() -> Arc<TemplateCache> {
        GLOBAL.clone()
    }

    pub fn get(&self, file: &str, section: &str) -> Option<Arc<Template>> {
        self.entries.lock().expect("never poisoned")
            .get(&cache_key(file, section))
            .cloned()
    }

    /// Insert unless present; returns the entry that is in the cache
    /// afterwards.
    pub fn insert(&self, file: &str, section: &str, template: Arc<Template>)
                  -> Arc<Template>
    {
        let mut entries = self.entries.lock().expect("never poisoned");
        let winner = match hashmap_try_insert(&mut *entries, cache_key(file, section), template) {
            Ok(inserted) => inserted.clone(),
            Err(existing) => existing.get().clone(),
        };
        winner
    }

    pub fn remove(&self, file: &str, section: &str) -> Option<Arc<Template>> {
        self.entries.lock().expect("never poisoned")
            .remove(&cache_key(file, section))
    }

    pub fn clear(&self) {
        self.entries.lock().expect("never poisoned").clear()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("never poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
