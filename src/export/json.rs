//! Structured JSON export.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::Result;
use crate::pipeline::PipelineStep;

use super::{ExportPackage, ExportSection, PackageFormatter, PackageMetadata};

/// Formats a package as `{ "metadata": ..., "assets": { "<step>": "<content>" } }`.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    metadata: &'a PackageMetadata,
    assets: BTreeMap<PipelineStep, &'a str>,
}

#[derive(Deserialize)]
struct JsonInput {
    metadata: PackageMetadata,
    #[serde(default)]
    assets: BTreeMap<PipelineStep, String>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageFormatter for JsonFormatter {
    fn format<W: Write>(&self, package: &ExportPackage, writer: &mut W) -> std::io::Result<()> {
        let output = JsonOutput {
            metadata: &package.metadata,
            assets: package
                .sections
                .iter()
                .map(|s| (s.step, s.content.as_str()))
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Read a package back from its JSON export.
pub fn parse_structured(json: &str) -> Result<ExportPackage> {
    let input: JsonInput = serde_json::from_str(json)?;
    let sections = input
        .assets
        .into_iter()
        .map(|(step, content)| ExportSection::new(step, content))
        .collect();
    Ok(ExportPackage::new(input.metadata, sections))
}
