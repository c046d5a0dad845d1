//! LCS table construction and backtracking.

use serde::{Deserialize, Serialize};

/// How a line relates to the two compared texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present in both texts.
    Same,
    /// Present only in the new text.
    Added,
    /// Present only in the old text.
    Removed,
}

/// One line of a diff result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub text: String,
}

impl DiffLine {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Compute the line diff between `old` and `new`.
///
/// Every line of `old` appears exactly once as [`DiffKind::Same`] or
/// [`DiffKind::Removed`], every line of `new` exactly once as
/// [`DiffKind::Same`] or [`DiffKind::Added`]. When the table offers two
/// equally long alignments the backtrack takes the added line first, which
/// puts removals ahead of additions in forward order.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let a: Vec<&str> = old.lines().collect();
    let b: Vec<&str> = new.lines().collect();
    let (n, m) = (a.len(), b.len());

    // dp[i][j] = LCS length of a[..i] and b[..j]
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            out.push(DiffLine::new(DiffKind::Same, a[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] >= dp[i - 1][j]) {
            out.push(DiffLine::new(DiffKind::Added, b[j - 1]));
            j -= 1;
        } else {
            out.push(DiffLine::new(DiffKind::Removed, a[i - 1]));
            i -= 1;
        }
    }

    out.reverse();
    out
}
