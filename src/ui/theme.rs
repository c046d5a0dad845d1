//! Visual theme and styling.

use console::Style;

use crate::diff::{DiffKind, DiffLine};

/// Terminal styles.
#[derive(Debug, Clone)]
pub struct StagecraftTheme {
    /// Success messages (green).
    pub success: Style,
    /// Warning messages (orange).
    pub warning: Style,
    /// Error messages (red bold).
    pub error: Style,
    /// Dim/secondary text.
    pub dim: Style,
    /// Bold text.
    pub highlight: Style,
    /// Headers (cyan bold).
    pub header: Style,
    /// Box-drawing borders (dim).
    pub border: Style,
    /// Added diff lines (green).
    pub added: Style,
    /// Removed diff lines (red).
    pub removed: Style,
}

impl Default for StagecraftTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl StagecraftTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            border: Style::new().dim(),
            added: Style::new().green(),
            removed: Style::new().red(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            border: Style::new(),
            added: Style::new(),
            removed: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("◆"),
            self.highlight.apply_to(title)
        )
    }

    /// One diff line with its `+`/`-` marker, colored by kind.
    pub fn format_diff_line(&self, line: &DiffLine) -> String {
        match line.kind {
            DiffKind::Same => format!("  {}", self.dim.apply_to(&line.text)),
            DiffKind::Added => format!("{}", self.added.apply_to(format!("+ {}", line.text))),
            DiffKind::Removed => format!("{}", self.removed.apply_to(format!("- {}", line.text))),
        }
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    console::Term::stdout().is_term()
}
