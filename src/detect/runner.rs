//! Detection runner that orchestrates all checks over a set of files.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::analysis::parse_python;
use crate::config::EnrichmentConfig;

use super::{check_enrichment, check_freshness, git_diff, Check, DetectionResult, GitError};

/// Source of the diff text used by the freshness check.
pub trait DiffSource: Sync {
    fn diff(&self, path: &Path) -> Result<String, GitError>;
}

/// Diffs from the working tree (or the index when `staged`).
pub struct GitDiff {
    pub staged: bool,
}

impl DiffSource for GitDiff {
    fn diff(&self, path: &Path) -> Result<String, GitError> {
        git_diff(path, self.staged)
    }
}

/// Executes the selected checks against a set of files.
pub struct Runner<'a> {
    checks: Vec<Check>,
    enrichment: &'a EnrichmentConfig,
    diffs: Option<&'a dyn DiffSource>,
}

impl<'a> Runner<'a> {
    /// Create a runner for `checks`.
    pub fn new(checks: &[Check], enrichment: &'a EnrichmentConfig) -> Self {
        Self {
            checks: checks.to_vec(),
            enrichment,
            diffs: None,
        }
    }

    /// Set where freshness diffs come from. Without one the freshness check
    /// is skipped.
    pub fn with_diffs(mut self, diffs: &'a dyn DiffSource) -> Self {
        self.diffs = Some(diffs);
        self
    }

    /// Run every selected check on every file, in parallel across files.
    ///
    /// Files that cannot be read or parsed are skipped and counted; they
    /// never abort the batch. Findings are sorted by `(file, line)`.
    pub fn run(&self, files: &[PathBuf]) -> DetectionResult {
        let mut result = files
            .par_iter()
            .map(|path| self.run_file(path))
            .reduce(DetectionResult::new, |mut acc, other| {
                acc.merge(other);
                acc
            });
        result.sort();
        result
    }

    fn run_file(&self, path: &Path) -> DetectionResult {
        let mut result = DetectionResult::new();
        let shown = path.to_string_lossy().to_string();

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                warn!(file = %shown, error = %e, "skipping unreadable file");
                result.skipped += 1;
                return result;
            }
        };
        let parsed = match parse_python(path, &source) {
            Ok(parsed) if !parsed.has_errors() => parsed,
            Ok(_) => {
                warn!(file = %shown, "skipping file with syntax errors");
                result.skipped += 1;
                return result;
            }
            Err(e) => {
                warn!(file = %shown, error = %e, "skipping unparseable file");
                result.skipped += 1;
                return result;
            }
        };
        result.scanned += 1;

        if self.checks.contains(&Check::Enrichment) {
            let findings = check_enrichment(&parsed.source, &parsed.tree, self.enrichment, &shown);
            debug!(file = %shown, count = findings.len(), "enrichment findings");
            result.add(Check::Enrichment, findings);
        }

        if self.checks.contains(&Check::Freshness) {
            if let Some(diffs) = self.diffs {
                match diffs.diff(path) {
                    Ok(diff) => {
                        let findings = check_freshness(&diff, &parsed, &shown);
                        debug!(file = %shown, count = findings.len(), "freshness findings");
                        result.add(Check::Freshness, findings);
                    }
                    Err(e) => warn!(file = %shown, error = %e, "skipping freshness check"),
                }
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Serves the same diff for every file.
    struct FixedDiff(&'static str);

    impl DiffSource for FixedDiff {
        fn diff(&self, _path: &Path) -> Result<String, GitError> {
            Ok(self.0.to_string())
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_runner_sorts_and_counts() {
        let temp = TempDir::new().unwrap();
        let b = write(&temp, "b.py", "def f():\n    \"\"\"Doc.\"\"\"\n    raise ValueError()\n");
        let a = write(
            &temp,
            "a.py",
            "def g():\n    \"\"\"Doc.\"\"\"\n    yield 1\n\n\ndef h():\n    \"\"\"Doc.\"\"\"\n    raise KeyError()\n",
        );
        let broken = write(&temp, "broken.py", "def broken(:\n    pass\n");

        let config = EnrichmentConfig::default();
        let runner = Runner::new(&[Check::Enrichment], &config);
        let result = runner.run(&[b, a, broken]);

        assert_eq!(result.scanned, 2);
        assert_eq!(result.skipped, 1);
        let order: Vec<(String, usize)> = result
            .findings
            .iter()
            .map(|f| (Path::new(f.file()).file_name().unwrap().to_string_lossy().to_string(), f.line()))
            .collect();
        assert_eq!(
            order,
            vec![("a.py".to_string(), 1), ("a.py".to_string(), 6), ("b.py".to_string(), 1)]
        );
    }

    #[test]
    fn test_runner_missing_file_is_skipped() {
        let config = EnrichmentConfig::default();
        let runner = Runner::new(&[Check::Enrichment], &config);
        let result = runner.run(&[PathBuf::from("/nonexistent/x.py")]);
        assert_eq!(result.skipped, 1);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn test_runner_freshness_with_diff_source() {
        let temp = TempDir::new().unwrap();
        let file = write(&temp, "m.py", "def f():\n    \"\"\"Doc.\"\"\"\n    return 1\n");
        let config = EnrichmentConfig::default();
        let diffs = FixedDiff("@@ -3 +3 @@\n-    return 2\n+    return 1\n");

        let runner = Runner::new(&[Check::Freshness], &config).with_diffs(&diffs);
        let result = runner.run(&[file.clone()]);
        assert_eq!(result.count(Check::Freshness), 1);
        assert_eq!(result.findings[0].rule(), "stale-body");

        let without = Runner::new(&[Check::Freshness], &config).run(&[file]);
        assert!(without.findings.is_empty());
        assert_eq!(without.scanned, 1);
    }
}
