//! Saved content packages.
//!
//! Finalizing a session hands its [`ExportPackage`] to an [`AssetLibrary`].
//! Entries are content-addressed: saving the same package twice yields the
//! same id.

mod file;
mod memory;

pub use file::JsonFileLibrary;
pub use memory::MemoryLibrary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::export::{serialize, ExportFormat, ExportPackage};

/// A package as stored in a library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: String,
    pub saved_at: DateTime<Utc>,
    pub package: ExportPackage,
}

impl LibraryEntry {
    /// Wrap a package, deriving its id from the structured export.
    pub fn new(package: ExportPackage) -> Result<Self> {
        Ok(Self {
            id: entry_id(&package)?,
            saved_at: Utc::now(),
            package,
        })
    }
}

/// `pkg_` followed by the first 12 hex characters of the package's SHA-256.
pub fn entry_id(package: &ExportPackage) -> Result<String> {
    let structured = serialize(package, ExportFormat::Json)?;
    let hash = Sha256::digest(structured.as_bytes());
    Ok(format!("pkg_{}", hex::encode(&hash[..6])))
}

/// Where finalized packages are kept.
pub trait AssetLibrary {
    /// Store a package, replacing any entry with the same id.
    fn save(&self, package: &ExportPackage) -> Result<LibraryEntry>;

    /// All entries, most recently saved first.
    fn list(&self) -> Result<Vec<LibraryEntry>>;

    /// Fetch one entry; unknown ids are [`crate::StagecraftError::LibraryEntryNotFound`].
    fn load(&self, id: &str) -> Result<LibraryEntry>;

    /// Delete an entry; `false` when there was nothing to delete.
    fn remove(&self, id: &str) -> Result<bool>;
}
