//! Choices made on the selection steps.

use serde::{Deserialize, Serialize};

use super::PipelineStep;

/// Channel, platform and action picked on steps 1-3.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub channel: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub action: Option<String>,
}

impl Selection {
    /// Whether the selection owned by `step` has been made.
    ///
    /// Steps that own no selection are always satisfied.
    pub fn is_filled(&self, step: PipelineStep) -> bool {
        match step {
            PipelineStep::Channel => self.channel.is_some(),
            PipelineStep::Platforms => !self.platforms.is_empty(),
            PipelineStep::Action => self.action.is_some(),
            _ => true,
        }
    }

    pub fn channel_label(&self) -> &str {
        self.channel.as_deref().unwrap_or("")
    }

    pub fn action_label(&self) -> &str {
        self.action.as_deref().unwrap_or("")
    }

    pub fn platforms_label(&self) -> String {
        self.platforms.join(", ")
    }
}
