//! Library command implementation.
//!
//! Provides `stagecraft library list`, `show` and `remove` over the saved
//! packages of finished sessions.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Subcommand};

use crate::error::{Result, StagecraftError};
use crate::export::{serialize, ExportFormat};
use crate::library::{AssetLibrary, JsonFileLibrary};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::run::load_checked_config;

/// Arguments for the library command.
#[derive(Debug, Clone, Args)]
pub struct LibraryArgs {
    #[command(subcommand)]
    pub command: LibrarySubcommand,
}

/// Library subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum LibrarySubcommand {
    /// List saved packages, newest first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print a saved package.
    Show {
        /// Package id, as shown by `list`.
        id: String,
        /// Output format: markdown, plaintext, json.
        #[arg(long, default_value = "markdown")]
        format: String,
    },
    /// Delete a saved package.
    Remove {
        /// Package id, as shown by `list`.
        id: String,
    },
}

/// The library command implementation.
pub struct LibraryCommand {
    project_root: PathBuf,
    config_override: Option<PathBuf>,
    args: LibraryArgs,
}

impl LibraryCommand {
    /// Create a new library command.
    pub fn new(project_root: &Path, config_override: Option<&Path>, args: LibraryArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_override: config_override.map(Path::to_path_buf),
            args,
        }
    }
}

impl Command for LibraryCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) =
            load_checked_config(&self.project_root, self.config_override.as_deref(), ui)
        else {
            return Ok(CommandResult::failure(2));
        };
        let library = JsonFileLibrary::new(self.project_root.join(&config.library.path));

        let exit_code = match &self.args.command {
            LibrarySubcommand::List { json } => list_entries(&library, *json, ui)?,
            LibrarySubcommand::Show { id, format } => show_entry(&library, id, format, ui)?,
            LibrarySubcommand::Remove { id } => remove_entry(&library, id, ui)?,
        };

        Ok(if exit_code == 0 {
            CommandResult::success()
        } else {
            CommandResult::failure(exit_code)
        })
    }
}

fn list_entries(library: &dyn AssetLibrary, json: bool, ui: &mut dyn UserInterface) -> Result<i32> {
    let entries = library.list()?;

    if json {
        ui.message(&serde_json::to_string_pretty(&entries)?);
        return Ok(0);
    }

    if entries.is_empty() {
        ui.message("Library is empty");
        return Ok(0);
    }

    ui.message(&format!("{} saved packages:\n", entries.len()));
    for entry in entries {
        let meta = &entry.package.metadata;
        ui.message(&format!(
            "  {}  {}  {} / {} ({})",
            entry.id,
            entry.saved_at.format("%Y-%m-%d %H:%M"),
            meta.channel,
            meta.action,
            meta.platforms.join(", ")
        ));
    }
    Ok(0)
}

fn show_entry(
    library: &dyn AssetLibrary,
    id: &str,
    format: &str,
    ui: &mut dyn UserInterface,
) -> Result<i32> {
    let format = match ExportFormat::from_str(format) {
        Ok(format) => format,
        Err(e) => {
            ui.error(&e.to_string());
            return Ok(2);
        }
    };

    match library.load(id) {
        Ok(entry) => {
            ui.message(&serialize(&entry.package, format)?);
            Ok(0)
        }
        Err(e @ StagecraftError::LibraryEntryNotFound { .. }) => {
            ui.error(&e.to_string());
            Ok(1)
        }
        Err(e) => Err(e),
    }
}

fn remove_entry(library: &dyn AssetLibrary, id: &str, ui: &mut dyn UserInterface) -> Result<i32> {
    if library.remove(id)? {
        ui.success(&format!("Removed {}", id));
        Ok(0)
    } else {
        ui.error(&format!("No saved package with id '{}'", id));
        Ok(1)
    }
}
