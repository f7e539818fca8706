//! Detection of documentation issues.
//!
//! - `enrichment`: docstrings missing sections the code calls for
//! - `freshness`: docstrings left behind by code changes

mod enrichment;
mod freshness;
mod runner;
mod types;

pub use enrichment::{
    check_enrichment, is_package_init, prefer_fenced_code_blocks, require_attributes, require_cross_references,
    require_examples, require_other_parameters, require_raises, require_receives, require_typed_attributes,
    require_warns, require_yields, Detector, RuleContext, RULES,
};
pub use freshness::{check_freshness, git_diff, parse_diff_hunks, GitError};
pub use runner::{DiffSource, GitDiff, Runner};
pub use types::{Category, Check, DetectionResult, Finding};
