//! Turning a finished session into a document.
//!
//! An [`ExportPackage`] is assembled on the review step and rendered by one
//! of the [`PackageFormatter`] implementations:
//!
//! - [`MarkdownFormatter`] - headed sections for pasting into docs
//! - [`PlaintextFormatter`] - underlined sections for plain editors
//! - [`JsonFormatter`] - structured, lossless, readable back with
//!   [`parse_structured`]

pub mod json;
pub mod markdown;
pub mod package;
pub mod plaintext;

pub use json::{parse_structured, JsonFormatter};
pub use markdown::MarkdownFormatter;
pub use package::{ExportPackage, ExportSection, PackageMetadata};
pub use plaintext::PlaintextFormatter;

use anyhow::Context;
use regex::Regex;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::info;

use crate::error::{Result, StagecraftError};

/// Runs of characters that are not allowed in a file name slug.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("SLUG_REGEX must compile"));

/// Document format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Plaintext,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [
        ExportFormat::Markdown,
        ExportFormat::Plaintext,
        ExportFormat::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Plaintext => "plaintext",
            ExportFormat::Json => "json",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Plaintext => "txt",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportFormat {
    type Err = StagecraftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "plaintext" | "text" | "txt" => Ok(ExportFormat::Plaintext),
            "json" => Ok(ExportFormat::Json),
            _ => Err(StagecraftError::UnknownFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// Renders a package to a writer.
pub trait PackageFormatter {
    fn format<W: Write>(&self, package: &ExportPackage, writer: &mut W) -> std::io::Result<()>;
}

/// Render a package in the given format.
pub fn serialize(package: &ExportPackage, format: ExportFormat) -> Result<String> {
    let mut buffer = Vec::new();
    match format {
        ExportFormat::Markdown => MarkdownFormatter::new().format(package, &mut buffer)?,
        ExportFormat::Plaintext => PlaintextFormatter::new().format(package, &mut buffer)?,
        ExportFormat::Json => JsonFormatter::new().format(package, &mut buffer)?,
    }
    let text = String::from_utf8(buffer).context("Formatter produced invalid UTF-8")?;
    Ok(text)
}

/// File name for an export, e.g. `social-announce-20260301.md`.
pub fn suggested_file_name(package: &ExportPackage, format: ExportFormat) -> String {
    let meta = &package.metadata;
    let raw = format!(
        "{} {} {}",
        meta.channel,
        meta.action,
        meta.generated_at.format("%Y%m%d")
    )
    .to_lowercase();
    let slug = SLUG_REGEX.replace_all(&raw, "-");
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "content-package" } else { slug };
    format!("{}.{}", slug, format.extension())
}

/// Render a package and write it to `path`, creating parent directories.
pub fn write_to(path: &Path, package: &ExportPackage, format: ExportFormat) -> Result<()> {
    let text = serialize(package, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), %format, "Exported package");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineStep, Selection};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn package() -> ExportPackage {
        let selection = Selection {
            channel: Some("Social Media".into()),
            platforms: vec!["twitter".into()],
            action: Some("announce".into()),
        };
        ExportPackage::from_parts(
            &selection,
            vec![(PipelineStep::Generate, "Hello world".into())],
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
        )
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Plaintext);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
    }

    #[test]
    fn unknown_format_is_an_error() {
        let err = "docx".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, StagecraftError::UnknownFormat { name } if name == "docx"));
    }

    #[test]
    fn extensions() {
        assert_eq!(ExportFormat::Markdown.extension(), "md");
        assert_eq!(ExportFormat::Plaintext.extension(), "txt");
        assert_eq!(ExportFormat::Json.extension(), "json");
    }

    #[test]
    fn file_name_is_slugged() {
        assert_eq!(
            suggested_file_name(&package(), ExportFormat::Markdown),
            "social-media-announce-20260301.md"
        );
    }

    #[test]
    fn file_name_falls_back_when_selection_is_empty() {
        let package = ExportPackage::from_parts(
            &Selection::default(),
            Vec::new(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        );
        assert_eq!(
            suggested_file_name(&package, ExportFormat::Json),
            "20260301.json"
        );
    }

    #[test]
    fn serialize_is_deterministic() {
        for format in ExportFormat::ALL {
            assert_eq!(
                serialize(&package(), format).unwrap(),
                serialize(&package(), format).unwrap()
            );
        }
    }

    #[test]
    fn write_to_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/nested/package.txt");
        write_to(&path, &package(), ExportFormat::Plaintext).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("CONTENT PACKAGE"));
    }
}
