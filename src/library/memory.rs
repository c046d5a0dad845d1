//! In-process library.

use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;

use crate::error::{Result, StagecraftError};
use crate::export::ExportPackage;

use super::{AssetLibrary, LibraryEntry};

/// Keeps entries in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    entries: Mutex<Vec<LibraryEntry>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<MutexGuard<'_, Vec<LibraryEntry>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("library lock poisoned").into())
    }
}

impl AssetLibrary for MemoryLibrary {
    fn save(&self, package: &ExportPackage) -> Result<LibraryEntry> {
        let entry = LibraryEntry::new(package.clone())?;
        let mut entries = self.entries()?;
        entries.retain(|e| e.id != entry.id);
        entries.push(entry.clone());
        Ok(entry)
    }

    fn list(&self) -> Result<Vec<LibraryEntry>> {
        let mut entries = self.entries()?.clone();
        entries.reverse();
        Ok(entries)
    }

    fn load(&self, id: &str) -> Result<LibraryEntry> {
        self.entries()?
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| StagecraftError::LibraryEntryNotFound { id: id.to_string() })
    }

    fn remove(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        Ok(entries.len() != before)
    }
}
