//! Google-style docstring section headers.
//!
//! A header is a line holding only `Name:` (any indentation, trailing
//! whitespace allowed). `Raises: ValueError` on one line is not a header.
//! Matching is purely line based, so a header inside a fenced code block
//! still counts; that errs toward reporting fewer missing sections.

use std::collections::HashSet;
use std::fmt;

use phf::phf_map;
use regex::Regex;

/// The recognized section headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Args,
    Returns,
    Raises,
    Yields,
    Receives,
    Warns,
    OtherParameters,
    Attributes,
    Examples,
    SeeAlso,
}

static SECTION_HEADERS: phf::Map<&'static str, Section> = phf_map! {
    "Args" => Section::Args,
    "Returns" => Section::Returns,
    "Raises" => Section::Raises,
    "Yields" => Section::Yields,
    "Receives" => Section::Receives,
    "Warns" => Section::Warns,
    "Other Parameters" => Section::OtherParameters,
    "Attributes" => Section::Attributes,
    "Examples" => Section::Examples,
    "See Also" => Section::SeeAlso,
};

lazy_static::lazy_static! {
    static ref HEADER_LINE: Regex = Regex::new(r"^\s*([A-Za-z][A-Za-z ]*):\s*$").unwrap();
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Args,
        Section::Returns,
        Section::Raises,
        Section::Yields,
        Section::Receives,
        Section::Warns,
        Section::OtherParameters,
        Section::Attributes,
        Section::Examples,
        Section::SeeAlso,
    ];

    /// Header text as written in a docstring, without the colon.
    pub fn header(&self) -> &'static str {
        match self {
            Section::Args => "Args",
            Section::Returns => "Returns",
            Section::Raises => "Raises",
            Section::Yields => "Yields",
            Section::Receives => "Receives",
            Section::Warns => "Warns",
            Section::OtherParameters => "Other Parameters",
            Section::Attributes => "Attributes",
            Section::Examples => "Examples",
            Section::SeeAlso => "See Also",
        }
    }

    pub fn from_header(name: &str) -> Option<Self> {
        SECTION_HEADERS.get(name).copied()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// The section a line introduces, if it is a header line.
fn header_of(line: &str) -> Option<Section> {
    let caps = HEADER_LINE.captures(line)?;
    Section::from_header(caps.get(1)?.as_str())
}

/// Collect the recognized section headers present in a docstring.
pub fn parse_sections(docstring: &str) -> HashSet<Section> {
    docstring.lines().filter_map(header_of).collect()
}

/// Text under `section`, up to the next recognized header or the end of the
/// docstring. `None` when the header is absent.
pub fn extract_section_content(docstring: &str, section: Section) -> Option<String> {
    let mut lines = docstring.lines();
    lines.by_ref().find(|line| header_of(line) == Some(section))?;

    let content: Vec<&str> = lines.take_while(|line| header_of(line).is_none()).collect();
    Some(content.join("\n"))
}
