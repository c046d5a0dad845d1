//! Markdown export.

use chrono::SecondsFormat;
use std::io::Write;

use super::{ExportPackage, PackageFormatter};

/// `# Content Package` with a metadata list and one `##` section per asset.
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageFormatter for MarkdownFormatter {
    fn format<W: Write>(&self, package: &ExportPackage, writer: &mut W) -> std::io::Result<()> {
        let meta = &package.metadata;
        writeln!(writer, "# Content Package")?;
        writeln!(writer)?;
        writeln!(writer, "- **Channel:** {}", meta.channel)?;
        writeln!(writer, "- **Platforms:** {}", meta.platforms.join(", "))?;
        writeln!(writer, "- **Action:** {}", meta.action)?;
        writeln!(
            writer,
            "- **Generated:** {}",
            meta.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;

        for section in &package.sections {
            writeln!(writer)?;
            writeln!(writer, "---")?;
            writeln!(writer)?;
            writeln!(writer, "## {}", section.title)?;
            writeln!(writer)?;
            writeln!(writer, "{}", section.content)?;
        }
        Ok(())
    }
}
