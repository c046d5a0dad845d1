//! The fixed, ordered sequence of pipeline steps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One position in the wizard.
///
/// Declaration order is step order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStep {
    Channel,
    Platforms,
    Action,
    Generate,
    Brief,
    PlatformCopy,
    Review,
}

/// What a step does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Pure selection, owns no asset.
    Selection,
    /// Owns exactly one generated asset.
    Asset,
    /// Read-only aggregation of every produced asset.
    Review,
}

impl PipelineStep {
    /// Every step, in order.
    pub const ALL: [PipelineStep; 7] = [
        PipelineStep::Channel,
        PipelineStep::Platforms,
        PipelineStep::Action,
        PipelineStep::Generate,
        PipelineStep::Brief,
        PipelineStep::PlatformCopy,
        PipelineStep::Review,
    ];

    /// The step a new session starts on.
    pub fn first() -> Self {
        Self::Channel
    }

    pub fn kind(self) -> StepKind {
        match self {
            Self::Channel | Self::Platforms | Self::Action => StepKind::Selection,
            Self::Generate | Self::Brief | Self::PlatformCopy => StepKind::Asset,
            Self::Review => StepKind::Review,
        }
    }

    pub fn is_asset(self) -> bool {
        self.kind() == StepKind::Asset
    }

    /// Steps that own an asset, in order.
    pub fn asset_steps() -> impl Iterator<Item = PipelineStep> {
        Self::ALL.into_iter().filter(|s| s.is_asset())
    }

    /// Stable machine key (also the serde name).
    pub fn key(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::Platforms => "platforms",
            Self::Action => "action",
            Self::Generate => "generate",
            Self::Brief => "brief",
            Self::PlatformCopy => "platform-copy",
            Self::Review => "review",
        }
    }

    /// Human-readable heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::Channel => "Channel",
            Self::Platforms => "Platforms",
            Self::Action => "Action",
            Self::Generate => "Generated Content",
            Self::Brief => "Brief",
            Self::PlatformCopy => "Platform Copy",
            Self::Review => "Review",
        }
    }

    /// Zero-based index into [`PipelineStep::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// One-based position, as shown to users ("Step 4 of 7").
    pub fn position(self) -> usize {
        self.index() + 1
    }

    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }

    /// Look up a step by its key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PipelineStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(&s.to_lowercase()).ok_or_else(|| format!("unknown step: {}", s))
    }
}
