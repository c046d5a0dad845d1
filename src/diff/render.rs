//! Diff summaries and text rendering.

use super::{DiffKind, DiffLine};

/// Line counts for a diff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub same: usize,
    pub added: usize,
    pub removed: usize,
}

impl DiffStats {
    /// Tally a diff result.
    pub fn from_lines(lines: &[DiffLine]) -> Self {
        lines.iter().fold(Self::default(), |mut stats, line| {
            match line.kind {
                DiffKind::Same => stats.same += 1,
                DiffKind::Added => stats.added += 1,
                DiffKind::Removed => stats.removed += 1,
            }
            stats
        })
    }

    /// Whether anything was added or removed.
    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }

    /// Short summary such as `+2 -1`.
    pub fn summary(&self) -> String {
        format!("+{} -{}", self.added, self.removed)
    }
}

/// Render a diff with `+ `, `- ` and two-space prefixes, one line each.
pub fn render_unified(lines: &[DiffLine]) -> String {
    lines
        .iter()
        .map(|line| {
            let prefix = match line.kind {
                DiffKind::Same => "  ",
                DiffKind::Added => "+ ",
                DiffKind::Removed => "- ",
            };
            format!("{}{}", prefix, line.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
