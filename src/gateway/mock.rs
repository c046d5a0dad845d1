//! Deterministic offline generator.

use anyhow::{bail, Result};

use crate::pipeline::PipelineStep;

use super::{Generated, GenerationGateway, GenerationRequest};

/// Rotating openers so a regeneration visibly differs from the last draft.
const OPENERS: &[&str] = &[
    "Big news",
    "Here's something new",
    "We've been busy",
    "You asked, we listened",
];

/// Generates templated copy from the selection and upstream assets.
///
/// Output depends only on the request, so the same request always yields the
/// same text.
#[derive(Debug, Clone, Default)]
pub struct MockGateway;

impl MockGateway {
    pub fn new() -> Self {
        Self
    }

    fn opener(revision: u32) -> &'static str {
        let index = (revision.max(1) as usize - 1) % OPENERS.len();
        OPENERS[index]
    }

    fn raw_content(request: &GenerationRequest) -> String {
        let s = &request.selection;
        format!(
            "{opener}: a {action} for our {channel} audience.\n\
             \n\
             What's new: a clear, upbeat message built around \"{action}\".\n\
             Where it runs: {platforms}.\n\
             Call to action: learn more today.",
            opener = Self::opener(request.revision),
            action = s.action_label(),
            channel = s.channel_label(),
            platforms = s.platforms_label(),
        )
    }

    fn brief(request: &GenerationRequest) -> Result<String> {
        let Some(source) = request.upstream_content(PipelineStep::Generate) else {
            bail!("brief requires generated content");
        };
        let headline = source.lines().next().unwrap_or_default();
        Ok(format!(
            "Objective: {action}\n\
             Channel: {channel}\n\
             Audience: followers on {platforms}\n\
             Headline: {headline}\n\
             Tone: friendly, confident",
            action = request.selection.action_label(),
            channel = request.selection.channel_label(),
            platforms = request.selection.platforms_label(),
        ))
    }

    fn platform_copy(request: &GenerationRequest) -> Result<String> {
        let Some(brief) = request.upstream_content(PipelineStep::Brief) else {
            bail!("platform copy requires a brief");
        };
        let headline = brief
            .lines()
            .find_map(|l| l.strip_prefix("Headline: "))
            .unwrap_or_default();

        let sections: Vec<String> = request
            .selection
            .platforms
            .iter()
            .map(|platform| format!("[{}]\n{} #{}", platform, headline, platform))
            .collect();
        Ok(sections.join("\n\n"))
    }
}

impl GenerationGateway for MockGateway {
    fn generate(&self, request: &GenerationRequest) -> Result<Generated> {
        let content = match request.step {
            PipelineStep::Generate => Self::raw_content(request),
            PipelineStep::Brief => Self::brief(request)?,
            PipelineStep::PlatformCopy => Self::platform_copy(request)?,
            other => bail!("step '{}' has nothing to generate", other),
        };
        let tokens_used = content.split_whitespace().count() as u32;
        Ok(Generated {
            content,
            tokens_used: Some(tokens_used),
        })
    }
}
