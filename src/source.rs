//! Where template text comes from. The engine only ever reads.

use std::{collections::HashMap, path::{Path, PathBuf}, fs::read_to_string, sync::Mutex};

use anyhow::{Result, anyhow, Context};

use crate::path::{map_path, logical_path};


pub trait TemplateSource: Send + Sync {
    fn file_exists(&self, path: &str) -> bool;

    /// Only called after `file_exists` said yes; may still fail.
    fn read_file(&self, path: &str) -> Result<String>;
}


/// Templates below a root directory in the local file system.
#[derive(Debug, Clone)]
pub struct DiskSource {
    root: PathBuf,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskSource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn map_path(&self, path: &str) -> PathBuf {
        map_path(&self.root, path)
    }
}

impl TemplateSource for DiskSource {
    fn file_exists(&self, path: &str) -> bool {
        self.map_path(path).is_file()
    }

    fn read_file(&self, path: &str) -> Result<String> {
        let fullpath = self.map_path(path);
        read_to_string(&fullpath).with_context(
            || anyhow!("opening template for reading: {:?}", fullpath))
    }
}


/// Templates held in memory, keyed by logical path (leading slash
/// optional).
#[derive(Debug, Default)]
pub struct MemorySource {
    files: Mutex<HashMap<String, String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files<'a>(
        files: impl IntoIterator<Item = (&'a str, &'a str)>
    ) -> Self {
        let s = Self::new();
        for (path, text) in files {
            s.insert(path, text);
        }
        s
    }

    /// Add or replace a file. Already cached parses of it are not
    /// affected; clear the cache for that.
    pub fn insert(&self, path: &str, text: impl Into<String>) {
        self.files.lock().expect("never poisoned")
            .insert(logical_path(path), text.into());
    }

    pub fn remove(&self, path: &str) -> Option<String> {
        self.files.lock().expect("never poisoned")
            .remove(&logical_path(path))
    }
}

impl TemplateSource for MemorySource {
    fn file_exists(&self, path: &str) -> bool {
        self.files.lock().expect("never poisoned")
            .contains_key(&logical_path(path))
    }

    fn read_file(&self, path: &str) -> Result<String> {
        self.files.lock().expect("never poisoned")
            .get(&logical_path(path))
            .cloned()
            .ok_or_else(|| anyhow!("no template at {path:?}"))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_memory_source() -> Result<()> {
        let s = MemorySource::with_files([("/a.html", "A"), ("b/c.html", "C")]);
        assert!(s.file_exists("a.html"));
        assert!(s.file_exists("/b/c.html"));
        assert!(!s.file_exists("/nope.html"));
        assert_eq!(s.read_file("/a.html")?, "A");
        s.insert("a.html", "A2");
        assert_eq!(s.read_file("/a.html")?, "A2");
        assert_eq!(s.remove("/a.html"), Some("A2".into()));
        assert!(s.read_file("/a.html").is_err());
        Ok(())
    }

    #[test]
    fn t_disk_source() -> Result<()> {
        let dir = std::env::temp_dir().join(
            format!("aview-source-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("partials"))?;
        std::fs::write(dir.join("partials/x.html"), "<b>{{x}}</b>")?;
        let s = DiskSource::new(&dir);
        assert!(s.file_exists("/partials/x.html"));
        assert!(s.file_exists("partials\\x.html"));
        assert!(!s.file_exists("/partials"));
        assert!(!s.file_exists("/partials/y.html"));
        assert_eq!(s.read_file("/partials/x.html")?, "<b>{{x}}</b>");
        let e = s.read_file("/partials/y.html").unwrap_err();
        assert!(e.to_string().starts_with("opening template for reading"));
        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
