//! Line-level text diffing.
//!
//! Compares two text blobs line by line using a longest-common-subsequence
//! table. Inputs here are short-form marketing copy, so the quadratic table
//! is fine and no chunking is attempted.
//!
//! # Example
//!
//! ```
//! use stagecraft::diff::{diff_lines, DiffKind};
//!
//! let diff = diff_lines("a\nb\nc", "a\nx\nc");
//! let kinds: Vec<_> = diff.iter().map(|l| l.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![DiffKind::Same, DiffKind::Removed, DiffKind::Added, DiffKind::Same]
//! );
//! ```

mod lcs;
mod render;

pub use lcs::{diff_lines, DiffKind, DiffLine};
pub use render::{render_unified, DiffStats};
