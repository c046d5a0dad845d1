//! In-session asset storage.

use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::diff::{diff_lines, DiffLine};
use crate::error::{Result, StagecraftError};
use crate::pipeline::PipelineStep;

use super::{Asset, Version, VersionId, VersionSource};

/// Holds one [`Asset`] per asset-owning step.
///
/// Mutation goes through `&mut self`, so appending a version and moving the
/// live pointer can never be observed half-done.
#[derive(Debug, Clone)]
pub struct AssetStore {
    assets: BTreeMap<PipelineStep, Asset>,
    /// Next id to hand out. Never reset, so ids stay unique for the session.
    next_id: u64,
}

impl AssetStore {
    /// Create a store with an empty asset for every asset step.
    pub fn new() -> Self {
        Self {
            assets: PipelineStep::asset_steps()
                .map(|step| (step, Asset::new(step)))
                .collect(),
            next_id: 1,
        }
    }

    /// Get the asset for a step, if the step owns one.
    pub fn asset(&self, step: PipelineStep) -> Option<&Asset> {
        self.assets.get(&step)
    }

    fn asset_mut(&mut self, step: PipelineStep) -> Result<&mut Asset> {
        self.assets
            .get_mut(&step)
            .ok_or(StagecraftError::NotAnAssetStep { step })
    }

    /// Append a new version and make it current.
    ///
    /// Blank content is rejected with [`StagecraftError::InvalidContent`]
    /// and leaves the asset untouched.
    pub fn commit(
        &mut self,
        step: PipelineStep,
        content: impl Into<String>,
        source: VersionSource,
    ) -> Result<VersionId> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(StagecraftError::InvalidContent { step });
        }

        let id = VersionId::new(self.next_id);
        let asset = self.asset_mut(step)?;
        let timestamp = next_timestamp(asset);
        asset.push(Version {
            id,
            content,
            source,
            timestamp,
        });
        self.next_id += 1;

        info!(%step, version = %id, %source, "Committed version");
        Ok(id)
    }

    /// The live content for a step, `None` when empty.
    pub fn current(&self, step: PipelineStep) -> Option<&str> {
        self.asset(step).and_then(|a| a.current_content())
    }

    /// The live version for a step.
    pub fn current_version(&self, step: PipelineStep) -> Option<&Version> {
        self.asset(step).and_then(|a| a.current_version())
    }

    /// Whether the step holds live content.
    pub fn has_content(&self, step: PipelineStep) -> bool {
        self.current(step).is_some()
    }

    /// All versions for a step, oldest first.
    pub fn history(&self, step: PipelineStep) -> &[Version] {
        self.asset(step).map(|a| a.versions()).unwrap_or(&[])
    }

    /// Make an existing version current without appending anything.
    pub fn restore(&mut self, step: PipelineStep, version: VersionId) -> Result<()> {
        let asset = self.asset_mut(step)?;
        if !asset.point_at(version) {
            return Err(StagecraftError::VersionNotFound { step, version });
        }
        info!(%step, %version, "Restored version");
        Ok(())
    }

    /// Drop a step's content and history entirely.
    pub fn discard(&mut self, step: PipelineStep) {
        if let Some(asset) = self.assets.get_mut(&step) {
            debug!(%step, versions = asset.versions().len(), "Discarding asset");
            asset.reset();
        }
    }

    /// Discard every asset.
    pub fn clear(&mut self) {
        for asset in self.assets.values_mut() {
            asset.reset();
        }
    }

    /// Diff two versions of the same asset, `from` as the old side.
    pub fn diff_versions(
        &self,
        step: PipelineStep,
        from: VersionId,
        to: VersionId,
    ) -> Result<Vec<DiffLine>> {
        let old = self.version(step, from)?;
        let new = self.version(step, to)?;
        Ok(diff_lines(&old.content, &new.content))
    }

    /// Diff a historical version against the live content.
    pub fn diff_with_current(&self, step: PipelineStep, version: VersionId) -> Result<Vec<DiffLine>> {
        let old = self.version(step, version)?;
        let current = self.current(step).unwrap_or_default();
        Ok(diff_lines(&old.content, current))
    }

    fn version(&self, step: PipelineStep, id: VersionId) -> Result<&Version> {
        let asset = self
            .asset(step)
            .ok_or(StagecraftError::NotAnAssetStep { step })?;
        asset
            .find(id)
            .ok_or(StagecraftError::VersionNotFound { step, version: id })
    }

    /// Live content of every populated asset, in step order.
    pub fn snapshot(&self) -> Vec<(PipelineStep, String)> {
        self.assets
            .iter()
            .filter_map(|(step, asset)| {
                asset
                    .current_content()
                    .map(|content| (*step, content.to_string()))
            })
            .collect()
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock time, nudged forward if it would not exceed the asset's last version.
fn next_timestamp(asset: &Asset) -> DateTime<Utc> {
    let now = Utc::now();
    match asset.versions().last() {
        Some(last) if now <= last.timestamp => last.timestamp + Duration::microseconds(1),
        _ => now,
    }
}
