//! Versioned content for the asset-owning pipeline steps.
//!
//! Each asset keeps an append-only list of [`Version`]s and an index that
//! marks which one is live. Committing appends and moves the index to the new
//! tail; restoring only moves the index, so nothing committed is ever lost
//! short of an explicit invalidation.

mod asset;
mod store;
mod version;

pub use asset::Asset;
pub use store::AssetStore;
pub use version::{Version, VersionId, VersionSource};
