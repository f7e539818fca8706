//! Core types for detection results.

use serde::{Deserialize, Serialize};

/// Severity categories for findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Required,
    Recommended,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Required => "required",
            Category::Recommended => "recommended",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Category::Required),
            "recommended" => Ok(Category::Recommended),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

/// The independent checks a run can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Check {
    Enrichment,
    Freshness,
}

impl Check {
    pub const ALL: [Check; 2] = [Check::Enrichment, Check::Freshness];

    pub fn as_str(&self) -> &'static str {
        match self {
            Check::Enrichment => "enrichment",
            Check::Freshness => "freshness",
        }
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Check {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrichment" => Ok(Check::Enrichment),
            "freshness" => Ok(Check::Freshness),
            _ => Err(format!("unknown check: {}", s)),
        }
    }
}

/// A single detected documentation issue.
///
/// The six fields are fixed; every producer and every formatter relies on
/// this exact shape. Construct through [`Finding::new`], which rejects
/// empty strings and line 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Finding {
    file: String,
    line: usize,
    symbol: String,
    rule: String,
    message: String,
    category: Category,
}

impl Finding {
    /// Create a finding.
    ///
    /// # Panics
    ///
    /// Panics if any string field is empty or `line` is 0. Both indicate a
    /// broken rule, not bad input.
    pub fn new(
        file: impl Into<String>,
        line: usize,
        symbol: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
        category: Category,
    ) -> Self {
        let finding = Self {
            file: file.into(),
            line,
            symbol: symbol.into(),
            rule: rule.into(),
            message: message.into(),
            category,
        };
        assert!(!finding.file.is_empty(), "finding file must be non-empty");
        assert!(finding.line >= 1, "finding line must be >= 1, got {}", finding.line);
        assert!(!finding.symbol.is_empty(), "finding symbol must be non-empty");
        assert!(!finding.rule.is_empty(), "finding rule must be non-empty");
        assert!(!finding.message.is_empty(), "finding message must be non-empty");
        finding
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> Category {
        self.category
    }
}

/// Results of running detection over a set of files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DetectionResult {
    pub findings: Vec<Finding>,
    /// Which check produced each finding, parallel to `findings`.
    #[serde(skip)]
    pub sources: Vec<Check>,
    /// Number of files analyzed.
    pub scanned: usize,
    /// Number of files skipped (unreadable or unparseable).
    pub skipped: usize,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add findings produced by `check`.
    pub fn add(&mut self, check: Check, findings: Vec<Finding>) {
        self.sources.extend(std::iter::repeat(check).take(findings.len()));
        self.findings.extend(findings);
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: DetectionResult) {
        self.findings.extend(other.findings);
        self.sources.extend(other.sources);
        self.scanned += other.scanned;
        self.skipped += other.skipped;
    }

    /// Sort findings by `(file, line)` for presentation. Stable, so rule
    /// order within a line is kept.
    pub fn sort(&mut self) {
        let mut paired: Vec<(Finding, Check)> = self
            .findings
            .drain(..)
            .zip(self.sources.drain(..))
            .collect();
        paired.sort_by(|(a, _), (b, _)| (a.file(), a.line()).cmp(&(b.file(), b.line())));
        for (finding, check) in paired {
            self.findings.push(finding);
            self.sources.push(check);
        }
    }

    /// Number of findings produced by `check`.
    pub fn count(&self, check: Check) -> usize {
        self.sources.iter().filter(|&&c| c == check).count()
    }

    /// Number of findings in `category`.
    pub fn category_count(&self, category: Category) -> usize {
        self.findings
            .iter()
            .filter(|f| f.category() == category)
            .count()
    }

    /// Whether any check listed in `fail_on` produced findings.
    pub fn failed(&self, fail_on: &[Check]) -> bool {
        fail_on.iter().any(|&check| self.count(check) > 0)
    }
}
