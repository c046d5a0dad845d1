//! Plain text export.

use chrono::SecondsFormat;
use std::io::Write;

use super::{ExportPackage, PackageFormatter};

const RULE: &str = "----------------------------------------";

/// Underlined headings, no markup.
pub struct PlaintextFormatter;

impl PlaintextFormatter {
    pub fn new() -> Self {
        Self
    }

    fn underline<W: Write>(writer: &mut W, text: &str, ch: char) -> std::io::Result<()> {
        writeln!(writer, "{}", text)?;
        writeln!(writer, "{}", ch.to_string().repeat(text.chars().count()))
    }
}

impl Default for PlaintextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageFormatter for PlaintextFormatter {
    fn format<W: Write>(&self, package: &ExportPackage, writer: &mut W) -> std::io::Result<()> {
        let meta = &package.metadata;
        Self::underline(writer, "CONTENT PACKAGE", '=')?;
        writeln!(writer)?;
        writeln!(writer, "Channel: {}", meta.channel)?;
        writeln!(writer, "Platforms: {}", meta.platforms.join(", "))?;
        writeln!(writer, "Action: {}", meta.action)?;
        writeln!(
            writer,
            "Generated: {}",
            meta.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;

        for section in &package.sections {
            writeln!(writer)?;
            writeln!(writer, "{}", RULE)?;
            Self::underline(writer, &section.title.to_uppercase(), '-')?;
            writeln!(writer)?;
            writeln!(writer, "{}", section.content)?;
        }
        Ok(())
    }
}
