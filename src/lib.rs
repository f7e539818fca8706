//! Docvet - docstring quality checks for Python.
//!
//! Docvet reads Google-style docstrings and reports structural gaps: a
//! function that raises but has no `Raises:` section, a dataclass without
//! `Attributes:`, a generator without `Yields:`, and docstrings that were
//! not touched when the code beneath them changed.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for AST-based analysis:
//!
//! - `analysis`: Symbol extraction, line mapping, section parsing, class predicates
//! - `detect`: Enrichment rules, freshness check, and the file runner
//! - `config`: YAML configuration schema and validation
//! - `report`: Output formatting (terminal, markdown, JSON, diagnostics)
//! - `cli`: Argument parsing, file discovery, exit codes
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use docvet::{analysis::parse_python, check_enrichment, EnrichmentConfig};
//!
//! let source = "def f():\n    \"\"\"Doc.\"\"\"\n    raise ValueError(\"x\")\n";
//! let parsed = parse_python(Path::new("f.py"), source).unwrap();
//! let findings = check_enrichment(&parsed.source, &parsed.tree, &EnrichmentConfig::default(), "f.py");
//! assert_eq!(findings[0].rule(), "missing-raises");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod report;

pub use analysis::{get_documented_symbols, map_lines_to_symbols, parse_sections, Symbol, SymbolKind};
pub use config::{DocvetConfig, EnrichmentConfig};
pub use detect::{check_enrichment, check_freshness, Category, DetectionResult, Finding, Runner};
