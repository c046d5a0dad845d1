//! A single step's content and history.

use crate::pipeline::PipelineStep;

use super::{Version, VersionId};

/// Current and historical content owned by one pipeline step.
#[derive(Debug, Clone)]
pub struct Asset {
    step: PipelineStep,
    versions: Vec<Version>,
    /// Index into `versions` of the live version; `None` before first commit.
    current: Option<usize>,
}

impl Asset {
    pub(crate) fn new(step: PipelineStep) -> Self {
        Self {
            step,
            versions: Vec::new(),
            current: None,
        }
    }

    pub fn step(&self) -> PipelineStep {
        self.step
    }

    /// The live content, or `None` while the asset is empty.
    pub fn current_content(&self) -> Option<&str> {
        self.current_version().map(|v| v.content.as_str())
    }

    pub fn current_version(&self) -> Option<&Version> {
        self.current.and_then(|i| self.versions.get(i))
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn find(&self, id: VersionId) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Append and make live in one step.
    pub(crate) fn push(&mut self, version: Version) {
        self.versions.push(version);
        self.current = Some(self.versions.len() - 1);
    }

    /// Move the live pointer; returns false if the id is unknown.
    pub(crate) fn point_at(&mut self, id: VersionId) -> bool {
        match self.versions.iter().position(|v| v.id == id) {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }

    /// Back to the never-generated state.
    pub(crate) fn reset(&mut self) {
        self.versions.clear();
        self.current = None;
    }
}
