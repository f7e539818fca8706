//! Detection of docstrings left stale by code changes.
//!
//! A diff is reduced to the set of changed lines in the new file, each line
//! is attributed to its innermost symbol, and a documented symbol whose
//! code changed while its docstring did not is reported:
//! - Signature or decorator lines changed: `stale-signature` (required)
//! - Only body lines changed: `stale-body` (recommended)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::Command;

use regex::Regex;
use thiserror::Error;

use crate::analysis::{map_lines_to_symbols, LineRange, ParsedFile, Symbol};

use super::{Category, Finding};

lazy_static::lazy_static! {
    static ref HUNK_HEADER: Regex =
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").unwrap();
}

/// Errors from invoking git.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("not inside a git repository: {}", .0.display())]
    NotARepository(PathBuf),
    #[error("git diff failed: {0}")]
    Failed(String),
}

/// Lines of the new file touched by a unified diff.
///
/// Added lines count at their new line number. A deletion counts at the new
/// line it sits after (at least 1), so removing code from a body still
/// lands inside that body.
pub fn parse_diff_hunks(diff: &str) -> BTreeSet<usize> {
    let mut changed = BTreeSet::new();
    let mut new_line = 0usize;
    let mut old_left = 0usize;
    let mut new_left = 0usize;

    for line in diff.lines() {
        if old_left == 0 && new_left == 0 {
            // Between hunks: only a hunk header matters.
            if let Some(caps) = HUNK_HEADER.captures(line) {
                let count = |i: usize| caps.get(i).map_or(Ok(1), |m| m.as_str().parse::<usize>());
                let (Ok(old_count), Ok(start), Ok(new_count)) = (
                    count(2),
                    caps[3].parse::<usize>(),
                    count(4),
                ) else {
                    continue;
                };
                new_line = start;
                old_left = old_count;
                new_left = new_count;
            }
            continue;
        }

        match line.as_bytes().first() {
            Some(b'+') => {
                changed.insert(new_line.max(1));
                new_line += 1;
                new_left = new_left.saturating_sub(1);
            }
            Some(b'-') => {
                changed.insert(new_line.max(1));
                old_left = old_left.saturating_sub(1);
            }
            Some(b'\\') => {}
            _ => {
                new_line += 1;
                old_left = old_left.saturating_sub(1);
                new_left = new_left.saturating_sub(1);
            }
        }
    }
    changed
}

/// Report documented symbols whose code changed but whose docstring did not.
///
/// One finding per symbol, at its definition line, in extraction order.
/// The module symbol and undocumented symbols are never reported.
pub fn check_freshness(diff: &str, parsed: &ParsedFile, file_path: &str) -> Vec<Finding> {
    let changed = parse_diff_hunks(diff);
    if changed.is_empty() {
        return Vec::new();
    }

    let map = map_lines_to_symbols(&parsed.tree, &parsed.source);
    let mut touched: Vec<Vec<usize>> = vec![Vec::new(); map.symbols().len()];
    for &line in &changed {
        if let Some(owner) = map.symbol_index(line) {
            touched[owner].push(line);
        }
    }

    map.symbols()
        .iter()
        .zip(touched)
        .filter(|(symbol, lines)| !symbol.is_module() && symbol.docstring.is_some() && !lines.is_empty())
        .filter_map(|(symbol, lines)| stale_finding(symbol, &lines, file_path))
        .collect()
}

fn stale_finding(symbol: &Symbol, lines: &[usize], file_path: &str) -> Option<Finding> {
    let hit = |range: Option<LineRange>| {
        range.is_some_and(|r| lines.iter().any(|&line| r.contains(line)))
    };

    if hit(symbol.docstring_range) {
        return None;
    }
    let subject = format!("{} '{}'", symbol.kind.title(), symbol.name);
    let (rule, message, category) = if hit(symbol.signature_range) || hit(symbol.decorator_range()) {
        (
            "stale-signature",
            format!("{} signature changed but its docstring was not updated", subject),
            Category::Required,
        )
    } else if hit(Some(symbol.body_range)) {
        (
            "stale-body",
            format!("{} body changed but its docstring was not updated", subject),
            Category::Recommended,
        )
    } else {
        return None;
    };

    Some(Finding::new(file_path, symbol.line, &symbol.name, rule, message, category))
}

/// Run `git diff` for one file, against the index when `staged`.
pub fn git_diff(path: &Path, staged: bool) -> Result<String, GitError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file = path.file_name().unwrap_or(path.as_os_str());

    let mut command = Command::new("git");
    command.arg("-C").arg(dir).args(["diff", "--no-color", "--unified=0"]);
    if staged {
        command.arg("--cached");
    }
    command.arg("--").arg(file);

    let output = command.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepository(dir.to_path_buf()));
        }
        return Err(GitError::Failed(stderr));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::parse_python;

    const SOURCE: &str = r#"import os


@cached
def load(path,
         mode="r"):
    """Load a file.

    Args:
        path: Where.
    """
    with open(path, mode) as f:
        return f.read()


def undocumented():
    return 1
"#;

    fn freshness(diff: &str) -> Vec<Finding> {
        let parsed = parse_python(Path::new("m.py"), SOURCE).unwrap();
        check_freshness(diff, &parsed, "m.py")
    }

    #[test]
    fn test_parse_additions_and_context() {
        let diff = "diff --git a/m.py b/m.py\nindex 1..2 100644\n--- a/m.py\n+++ b/m.py\n@@ -3,2 +3,3 @@ def f():\n context\n+added\n-removed\n+replaced\n";
        assert_eq!(parse_diff_hunks(diff), BTreeSet::from([4, 5]));
    }

    #[test]
    fn test_parse_pure_deletion() {
        let diff = "@@ -7,2 +6,0 @@\n-gone\n-gone too\n@@ -1 +0,0 @@\n-first\n";
        assert_eq!(parse_diff_hunks(diff), BTreeSet::from([1, 6]));
    }

    #[test]
    fn test_parse_added_lines_looking_like_headers() {
        let diff = "@@ -0,0 +1,2 @@\n+++counter\n+--x\n\\ No newline at end of file\n";
        assert_eq!(parse_diff_hunks(diff), BTreeSet::from([1, 2]));
    }

    #[test]
    fn test_parse_empty_diff() {
        assert!(parse_diff_hunks("").is_empty());
    }

    #[test]
    fn test_body_change() {
        let findings = freshness("@@ -13 +13 @@\n-        return f.read(1)\n+        return f.read()\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule(), "stale-body");
        assert_eq!(findings[0].line(), 5);
        assert_eq!(findings[0].symbol(), "load");
    }

    #[test]
    fn test_signature_change_wins_over_body() {
        let findings = freshness("@@ -6 +6 @@\n-         mode=\"rb\"):\n+         mode=\"r\"):\n@@ -12 +12 @@\n-x\n+y\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule(), "stale-signature");
        assert_eq!(findings[0].category(), Category::Required);
    }

    #[test]
    fn test_decorator_change_is_signature() {
        let findings = freshness("@@ -4 +4 @@\n-@lru_cache\n+@cached\n");
        assert_eq!(findings[0].rule(), "stale-signature");
    }

    #[test]
    fn test_docstring_update_clears_finding() {
        let diff = "@@ -6 +6 @@\n-x\n+y\n@@ -10 +10 @@\n-        p: Where.\n+        path: Where.\n";
        assert!(freshness(diff).is_empty());
    }

    #[test]
    fn test_module_and_undocumented_changes_ignored() {
        assert!(freshness("@@ -1 +1 @@\n-import sys\n+import os\n").is_empty());
        assert!(freshness("@@ -17 +17 @@\n-    return 2\n+    return 1\n").is_empty());
    }

    #[test]
    fn test_git_diff_outside_repository() {
        let temp = tempfile::TempDir::new().unwrap();
        let file = temp.path().join("m.py");
        std::fs::write(&file, "x = 1\n").unwrap();
        assert!(git_diff(&file, false).is_err());
    }
}
