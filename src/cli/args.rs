//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::commands::library::LibraryArgs;

/// Stagecraft - Staged content generation with versioned assets.
#[derive(Debug, Parser)]
#[command(name = "stagecraft")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .stagecraft/config.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Walk the content pipeline (default if no command specified)
    Run(RunArgs),

    /// Compare two text files line by line (up to 2000 lines each)
    Diff(DiffArgs),

    /// Browse and manage saved content packages
    Library(LibraryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Channel to use instead of prompting
    #[arg(long)]
    pub channel: Option<String>,

    /// Target platforms (repeatable or comma-separated)
    #[arg(long = "platform", value_delimiter = ',')]
    pub platforms: Vec<String>,

    /// Action to use instead of prompting
    #[arg(long)]
    pub action: Option<String>,

    /// Export format: markdown, plaintext, json
    #[arg(long)]
    pub format: Option<String>,

    /// Write the export here instead of the configured directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Confirm regenerations that discard downstream content
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `diff` command.
#[derive(Debug, Clone, clap::Args)]
pub struct DiffArgs {
    /// Original text file
    pub old: PathBuf,

    /// Revised text file
    pub new: PathBuf,

    /// Only print the added/removed counts
    #[arg(long)]
    pub stats: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::library::LibrarySubcommand;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["stagecraft"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_accepts_comma_separated_platforms() {
        let cli = Cli::try_parse_from([
            "stagecraft",
            "run",
            "--platform",
            "twitter,linkedin",
            "--platform",
            "instagram",
        ])
        .unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.platforms, vec!["twitter", "linkedin", "instagram"]);
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "stagecraft",
            "run",
            "--channel",
            "email",
            "--action",
            "promote",
            "--format",
            "json",
            "--non-interactive",
            "--yes",
        ])
        .unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.channel.as_deref(), Some("email"));
        assert_eq!(args.action.as_deref(), Some("promote"));
        assert_eq!(args.format.as_deref(), Some("json"));
        assert!(args.non_interactive);
        assert!(args.yes);
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from(["stagecraft", "diff", "a.txt", "b.txt", "--quiet"]).unwrap();
        assert!(cli.quiet);
        let Some(Commands::Diff(args)) = cli.command else {
            panic!("expected diff");
        };
        assert_eq!(args.old, PathBuf::from("a.txt"));
        assert!(!args.stats);
    }

    #[test]
    fn library_show_parses_id_and_format() {
        let cli =
            Cli::try_parse_from(["stagecraft", "library", "show", "pkg_abc", "--format", "txt"])
                .unwrap();
        let Some(Commands::Library(args)) = cli.command else {
            panic!("expected library");
        };
        match args.command {
            LibrarySubcommand::Show { id, format } => {
                assert_eq!(id, "pkg_abc");
                assert_eq!(format, "txt");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn diff_requires_two_paths() {
        assert!(Cli::try_parse_from(["stagecraft", "diff", "only-one.txt"]).is_err());
    }
}
