//! Non-interactive UI for scripted and headless runs.

use std::collections::HashMap;

use crate::diff::{render_unified, DiffLine};
use crate::error::{Result, StagecraftError};

use super::{parse_yes_no, OutputMode, Prompt, PromptResult, PromptType, SpinnerHandle, UserInterface};

/// Prefix for environment variables that answer prompts by key.
pub const PROMPT_ENV_PREFIX: &str = "STAGECRAFT_PROMPT_";

/// Answers prompts from `STAGECRAFT_PROMPT_<KEY>` variables or the prompt's
/// default, and fails when neither exists.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();
        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    fn answer(prompt: &Prompt, raw: &str) -> Result<PromptResult> {
        match prompt.prompt_type {
            PromptType::Confirm => parse_yes_no(raw).map(PromptResult::Bool).ok_or_else(|| {
                StagecraftError::ConfigValidationError {
                    message: format!("'{}' is not a yes/no answer for '{}'", raw, prompt.key),
                }
            }),
            PromptType::MultiSelect { .. } => Ok(PromptResult::Strings(
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            )),
            _ => Ok(PromptResult::String(raw.to_string())),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("⚠ {}", msg);
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = format!("{}{}", PROMPT_ENV_PREFIX, prompt.key.to_uppercase());
        if let Some(value) = self.env_overrides.get(&env_key) {
            return Self::answer(prompt, value);
        }

        if let Some(default) = &prompt.default {
            return Self::answer(prompt, default);
        }

        Err(StagecraftError::ConfigValidationError {
            message: format!(
                "Cannot prompt for '{}' in non-interactive mode (no default value)",
                prompt.key
            ),
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            println!("  {}", message);
        }
        Box::new(NoopSpinner {
            show: self.mode.shows_status(),
        })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.mode.shows_status() {
            println!("[{}/{}]", current, total);
        }
    }

    fn show_content(&mut self, title: &str, content: &str) {
        if self.mode.shows_content() {
            println!("--- {} ---", title);
            println!("{}", content);
        }
    }

    fn show_diff(&mut self, lines: &[DiffLine]) {
        println!("{}", render_unified(lines));
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prints the final status line only.
struct NoopSpinner {
    show: bool,
}

impl SpinnerHandle for NoopSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.show {
            println!("✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }
}
