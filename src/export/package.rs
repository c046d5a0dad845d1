//! The assembled output of a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineStep, Selection};

/// Header information shared by every format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    pub channel: String,
    pub platforms: Vec<String>,
    pub action: String,
    pub generated_at: DateTime<Utc>,
}

/// One produced asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSection {
    pub step: PipelineStep,
    pub title: String,
    pub content: String,
}

impl ExportSection {
    pub fn new(step: PipelineStep, content: impl Into<String>) -> Self {
        Self {
            step,
            title: step.title().to_string(),
            content: content.into(),
        }
    }
}

/// Metadata plus one section per produced asset, in step order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPackage {
    pub metadata: PackageMetadata,
    pub sections: Vec<ExportSection>,
}

impl ExportPackage {
    /// Build a package; sections are put into step order.
    pub fn new(metadata: PackageMetadata, mut sections: Vec<ExportSection>) -> Self {
        sections.sort_by_key(|s| s.step);
        Self { metadata, sections }
    }

    /// Build a package from a selection and an asset snapshot.
    pub fn from_parts(
        selection: &Selection,
        assets: Vec<(PipelineStep, String)>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let metadata = PackageMetadata {
            channel: selection.channel_label().to_string(),
            platforms: selection.platforms.clone(),
            action: selection.action_label().to_string(),
            generated_at,
        };
        let sections = assets
            .into_iter()
            .map(|(step, content)| ExportSection::new(step, content))
            .collect();
        Self::new(metadata, sections)
    }

    /// Content of one step's section.
    pub fn content(&self, step: PipelineStep) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.step == step)
            .map(|s| s.content.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
