//! Named pattern persistence.
//!
//! Names are the primary key: saving a taken name fails, updating or
//! deleting an absent one fails. Stores keep insertion order so recognition
//! results list the library the way it was recorded.
//!
//! Two implementations:
//! - `MemoryPatternStore`: process-local, used by tests and embedders
//! - `JsonPatternStore`: a single pretty-printed JSON document on disk,
//!   rewritten after every mutation

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{GestureError, Result};
use crate::types::{NamedPattern, Pattern};

/// Storage seam for named patterns.
pub trait PatternStore {
    /// Insert a new named pattern.
    fn save(&mut self, pattern: NamedPattern) -> Result<()>;

    /// Every stored pattern, in insertion order.
    fn all(&self) -> Result<Vec<NamedPattern>>;

    fn get(&self, name: &str) -> Result<Option<NamedPattern>>;

    /// Replace the segments stored under an existing name.
    fn update(&mut self, name: &str, pattern: Pattern) -> Result<()>;

    fn delete(&mut self, name: &str) -> Result<()>;

    fn names(&self) -> Result<Vec<String>> {
        Ok(self.all()?.into_iter().map(|p| p.name).collect())
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GestureError::InvalidName);
    }
    Ok(())
}

/// Shared bookkeeping for both stores.
#[derive(Debug, Clone, Default)]
struct Entries {
    patterns: Vec<NamedPattern>,
}

impl Entries {
    fn position(&self, name: &str) -> Option<usize> {
        self.patterns.iter().position(|p| p.name == name)
    }

    fn insert(&mut self, pattern: NamedPattern) -> Result<()> {
        check_name(&pattern.name)?;
        if self.position(&pattern.name).is_some() {
            return Err(GestureError::DuplicateName(pattern.name));
        }
        self.patterns.push(pattern);
        Ok(())
    }

    fn replace(&mut self, name: &str, pattern: Pattern) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| GestureError::PatternNotFound(name.to_string()))?;
        self.patterns[index].pattern = pattern;
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        let index = self
            .position(name)
            .ok_or_else(|| GestureError::PatternNotFound(name.to_string()))?;
        self.patterns.remove(index);
        Ok(())
    }

    fn find(&self, name: &str) -> Option<NamedPattern> {
        self.position(name).map(|i| self.patterns[i].clone())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPatternStore {
    entries: Entries,
}

impl MemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.patterns.is_empty()
    }
}

impl PatternStore for MemoryPatternStore {
    fn save(&mut self, pattern: NamedPattern) -> Result<()> {
        self.entries.insert(pattern)
    }

    fn all(&self) -> Result<Vec<NamedPattern>> {
        Ok(self.entries.patterns.clone())
    }

    fn get(&self, name: &str) -> Result<Option<NamedPattern>> {
        Ok(self.entries.find(name))
    }

    fn update(&mut self, name: &str, pattern: Pattern) -> Result<()> {
        self.entries.replace(name, pattern)
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.entries.remove(name)
    }
}

/// File-backed store holding the whole library as one JSON array.
#[derive(Debug)]
pub struct JsonPatternStore {
    path: PathBuf,
    entries: Entries,
}

impl JsonPatternStore {
    /// Open the library at `path`, starting empty when the file is absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let patterns = if path.exists() {
            let text = fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<NamedPattern>>(&text)?
            }
        } else {
            Vec::new()
        };

        let mut entries = Entries::default();
        for pattern in patterns {
            entries.insert(pattern)?;
        }
        info!(path = %path.display(), count = entries.patterns.len(), "opened pattern library");

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries.patterns)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), count = self.entries.patterns.len(), "wrote pattern library");
        Ok(())
    }
}

impl PatternStore for JsonPatternStore {
    fn save(&mut self, pattern: NamedPattern) -> Result<()> {
        self.entries.insert(pattern)?;
        self.flush()
    }

    fn all(&self) -> Result<Vec<NamedPattern>> {
        Ok(self.entries.patterns.clone())
    }

    fn get(&self, name: &str) -> Result<Option<NamedPattern>> {
        Ok(self.entries.find(name))
    }

    fn update(&mut self, name: &str, pattern: Pattern) -> Result<()> {
        self.entries.replace(name, pattern)?;
        self.flush()
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.entries.remove(name)?;
        self.flush()
    }
}
