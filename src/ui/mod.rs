//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for scripted and headless runs
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use stagecraft::ui::{create_ui, OutputMode};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Content Package");
//! ui.success("Saved");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, StagecraftTheme};

use crate::diff::DiffLine;
use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show progress (e.g., "Step 3 of 7").
    fn show_progress(&mut self, current: usize, total: usize);

    /// Show an asset's content under a title.
    fn show_content(&mut self, title: &str, content: &str);

    /// Show a line diff.
    fn show_diff(&mut self, lines: &[DiffLine]);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for scripted answers).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
}

impl Prompt {
    pub fn new(key: &str, question: impl Into<String>, prompt_type: PromptType) -> Self {
        Self {
            key: key.to_string(),
            question: question.into(),
            prompt_type,
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Single-line text input.
    Input,
    /// Multi-line text edited in `$EDITOR`; the default is the starting text.
    Editor,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
    /// Select multiple from a list of options.
    MultiSelect { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

impl PromptOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label is its value.
    pub fn plain(value: &str) -> Self {
        Self::new(value, value)
    }
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input, editor or select.
    String(String),
    /// Multiple string results from multi-select.
    Strings(Vec<String>),
}

impl PromptResult {
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Strings(v) => v.join(","),
        }
    }

    /// Booleans as-is; strings read as yes/no.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::String(s) => parse_yes_no(s),
            Self::Strings(_) => None,
        }
    }

    pub fn into_strings(self) -> Vec<String> {
        match self {
            Self::Strings(v) => v,
            Self::String(s) => s
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            Self::Bool(b) => vec![b.to_string()],
        }
    }
}

/// `true`/`yes`/`y` and `false`/`no`/`n`, case-insensitive.
pub fn parse_yes_no(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" => Some(true),
        "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_result_as_string() {
        assert_eq!(PromptResult::Bool(true).as_string(), "true");
        assert_eq!(PromptResult::String("hello".into()).as_string(), "hello");
        assert_eq!(
            PromptResult::Strings(vec!["a".into(), "b".into()]).as_string(),
            "a,b"
        );
    }

    #[test]
    fn prompt_result_as_bool_reads_strings() {
        assert_eq!(PromptResult::Bool(false).as_bool(), Some(false));
        assert_eq!(PromptResult::String("Yes".into()).as_bool(), Some(true));
        assert_eq!(PromptResult::String("n".into()).as_bool(), Some(false));
        assert_eq!(PromptResult::String("maybe".into()).as_bool(), None);
        assert_eq!(PromptResult::Strings(vec![]).as_bool(), None);
    }

    #[test]
    fn into_strings_splits_comma_lists() {
        assert_eq!(
            PromptResult::String("twitter, linkedin,".into()).into_strings(),
            vec!["twitter", "linkedin"]
        );
        assert_eq!(
            PromptResult::Strings(vec!["x".into()]).into_strings(),
            vec!["x"]
        );
    }

    #[test]
    fn prompt_builder_sets_default() {
        let prompt = Prompt::new("channel", "Pick a channel", PromptType::Input).with_default("blog");
        assert_eq!(prompt.key, "channel");
        assert_eq!(prompt.default.as_deref(), Some("blog"));
    }

    #[test]
    fn plain_option_uses_value_as_label() {
        let option = PromptOption::plain("email");
        assert_eq!(option.label, "email");
        assert_eq!(option.value, "email");
    }
}
