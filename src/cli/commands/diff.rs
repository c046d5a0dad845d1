//! Diff command implementation.
//!
//! `stagecraft diff OLD NEW` runs the line diff used for version comparison
//! on two arbitrary files.

use std::fs;
use std::path::Path;

use crate::cli::args::DiffArgs;
use crate::diff::{diff_lines, DiffStats};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Largest file, in lines, the command will diff. The LCS table grows with
/// the product of both line counts.
pub const MAX_DIFF_LINES: usize = 2_000;

/// The diff command implementation.
pub struct DiffCommand {
    args: DiffArgs,
}

impl DiffCommand {
    /// Create a new diff command.
    pub fn new(args: DiffArgs) -> Self {
        Self { args }
    }
}

fn read(path: &Path, ui: &mut dyn UserInterface) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) if text.lines().count() > MAX_DIFF_LINES => {
            ui.error(&format!(
                "{} has more than {} lines; too large to diff",
                path.display(),
                MAX_DIFF_LINES
            ));
            None
        }
        Ok(text) => Some(text),
        Err(e) => {
            ui.error(&format!("Cannot read {}: {}", path.display(), e));
            None
        }
    }
}

impl Command for DiffCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (Some(old), Some(new)) = (read(&self.args.old, ui), read(&self.args.new, ui)) else {
            return Ok(CommandResult::failure(1));
        };

        let lines = diff_lines(&old, &new);
        let stats = DiffStats::from_lines(&lines);

        if !self.args.stats {
            ui.show_diff(&lines);
        }
        ui.message(&stats.summary());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffKind;
    use crate::ui::MockUI;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn files(old: &str, new: &str) -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("old.txt");
        let b = temp.path().join("new.txt");
        fs::write(&a, old).unwrap();
        fs::write(&b, new).unwrap();
        (temp, a, b)
    }

    #[test]
    fn shows_diff_and_summary() {
        let (_temp, old, new) = files("Hello world\nBye", "Hi there\nBye");
        let mut ui = MockUI::new();

        let result = DiffCommand::new(DiffArgs {
            old,
            new,
            stats: false,
        })
        .execute(&mut ui)
        .unwrap();

        assert!(result.success);
        let kinds: Vec<_> = ui.diffs()[0].iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![DiffKind::Removed, DiffKind::Added, DiffKind::Same]);
        assert!(ui.has_message("+1 -1"));
    }

    #[test]
    fn stats_only_skips_diff() {
        let (_temp, old, new) = files("a", "a\nb");
        let mut ui = MockUI::new();

        DiffCommand::new(DiffArgs {
            old,
            new,
            stats: true,
        })
        .execute(&mut ui)
        .unwrap();

        assert!(ui.diffs().is_empty());
        assert!(ui.has_message("+1 -0"));
    }

    #[test]
    fn missing_file_fails() {
        let (temp, old, _) = files("a", "b");
        let mut ui = MockUI::new();

        let result = DiffCommand::new(DiffArgs {
            old,
            new: temp.path().join("absent.txt"),
            stats: false,
        })
        .execute(&mut ui)
        .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("absent.txt"));
    }

    #[test]
    fn oversized_file_is_refused() {
        let long = "line\n".repeat(MAX_DIFF_LINES + 1);
        let (_temp, old, new) = files("a", &long);
        let mut ui = MockUI::new();

        let result = DiffCommand::new(DiffArgs {
            old,
            new,
            stats: false,
        })
        .execute(&mut ui)
        .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("too large to diff"));
        assert!(ui.diffs().is_empty());
    }
}
