//! Requirements file parsing and merging
//!
//! Parses pip-style requirements files into a table from package name to a
//! single version constraint:
//! - blank lines and `#` comment lines are skipped, trailing comments stripped
//! - environment markers after `;` are evaluated for a linux host and may
//!   exclude a line entirely
//! - from a multi-constraint list (`sphinx>=1.1.2,!=1.3b1,<1.3`) the lowest
//!   non-exclusion version wins
//! - when several files are merged, a later file's entry for a name fully
//!   replaces an earlier one

use crate::domain::{CompareOp, Requirement, UpstreamVersion};
use crate::error::ManifestError;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z0-9][A-Za-z0-9._-]*)(?:\[[^\]]*\])?\s*(?P<spec>.*)$").unwrap()
});

static CONSTRAINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<op>==|>=|<=|!=|~=|>|<)\s*(?P<version>[^\s,;]+)$").unwrap());

static MARKER_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?P<key>[A-Za-z_][A-Za-z0-9_.]*)\s*(?P<op>==|!=|>=|<=|<|>)\s*['"](?P<value>[^'"]*)['"]\s*$"#)
        .unwrap()
});

/// Mapping from package name to its effective version constraint
#[derive(Debug, Clone, Default)]
pub struct RequirementTable {
    entries: BTreeMap<String, Requirement>,
}

impl RequirementTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and merge the given requirements files in argument order
    ///
    /// Later files win per package name; the replaced entry is discarded
    /// entirely, not combined.
    pub fn merge(paths: &[PathBuf]) -> Result<Self, ManifestError> {
        let mut table = Self::new();
        for path in paths {
            let content =
                std::fs::read_to_string(path).map_err(|e| ManifestError::RequirementsRead {
                    path: path.clone(),
                    source: e,
                })?;
            table.merge_content(path, &content)?;
        }
        Ok(table)
    }

    /// Look up the constraint for a package name
    pub fn lookup(&self, name: &str) -> Option<&Requirement> {
        self.entries.get(name)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge the lines of one requirements file into the table
    fn merge_content(&mut self, path: &Path, content: &str) -> Result<(), ManifestError> {
        for (idx, raw_line) in content.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            // strip a trailing comment
            let line = line.split('#').next().unwrap_or("").trim_end();
            if line.is_empty() {
                continue;
            }

            let (spec_part, marker) = match line.split_once(';') {
                Some((spec, marker)) => (spec.trim_end(), Some(marker.trim())),
                None => (line, None),
            };
            if let Some(marker) = marker {
                if !marker_allows(marker) {
                    continue;
                }
            }

            let caps = NAME_RE.captures(spec_part).ok_or_else(|| {
                ManifestError::invalid_requirement_line(
                    path,
                    line_no,
                    raw_line.trim(),
                    "does not match the requirement grammar",
                )
            })?;
            let name = caps["name"].to_string();
            let spec = caps["spec"].trim();
            if spec.is_empty() {
                // a bare name carries no version constraint
                continue;
            }

            let mut constraints = Vec::new();
            for part in spec.split(',') {
                let part = part.trim();
                let caps = CONSTRAINT_RE.captures(part).ok_or_else(|| {
                    ManifestError::invalid_requirement_line(
                        path,
                        line_no,
                        raw_line.trim(),
                        format!("unrecognized constraint '{}'", part),
                    )
                })?;
                // operator text always matches the CompareOp set
                let op: CompareOp = caps["op"].parse().unwrap();
                constraints.push(Requirement::new(op, &caps["version"]));
            }

            if let Some(lowest) = lowest_constraint(&constraints) {
                self.entries.insert(name, lowest.clone());
            }
        }
        Ok(())
    }
}

/// Pick the lowest-versioned constraint, ignoring exclusions
///
/// An exclusion (`!=`) never provides a usable lower bound; all-exclusion
/// constraint lists contribute no entry.
fn lowest_constraint(constraints: &[Requirement]) -> Option<&Requirement> {
    constraints
        .iter()
        .filter(|c| c.op != CompareOp::NotEqual)
        .min_by(|a, b| compare_version_strings(&a.version, &b.version))
}

/// Order two constraint version strings
///
/// Both are compared structurally when they parse as upstream versions
/// (wildcard tails stripped first), lexically otherwise.
fn compare_version_strings(a: &str, b: &str) -> Ordering {
    let parse = |s: &str| UpstreamVersion::parse(s.trim_end_matches(".*"));
    match (parse(a), parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        _ => a.cmp(b),
    }
}

/// Evaluate an environment marker against a fixed linux host environment
///
/// Only platform-identifying keys are interpreted; anything else (python
/// version bounds, implementation names, unparsable clauses) is treated as
/// satisfied, so the requirement is kept rather than silently dropped.
fn marker_allows(marker: &str) -> bool {
    marker.split(" or ").any(|group| {
        group
            .split(" and ")
            .all(|clause| marker_clause_allows(clause))
    })
}

fn marker_clause_allows(clause: &str) -> bool {
    let Some(caps) = MARKER_CLAUSE_RE.captures(clause) else {
        return true;
    };
    let value = &caps["value"];
    let actual = match &caps["key"] {
        "sys_platform" => "linux",
        "platform_system" => "Linux",
        "os_name" => "posix",
        _ => return true,
    };
    match &caps["op"] {
        "==" => actual == value || (actual == "linux" && value == "linux2"),
        "!=" => actual != value,
        _ => true,
    }
}
