//! Version constraint types for dependency requirements
//!
//! Handles constraint operators as they appear in requirements files:
//! `==`, `>=`, `<=`, `>`, `<`, `!=` and the compatible-release `~=`.

use std::fmt;
use std::str::FromStr;

/// A comparison operator in a version constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Exact match (`==`)
    Equal,
    /// Greater than or equal (`>=`)
    GreaterOrEqual,
    /// Less than or equal (`<=`)
    LessOrEqual,
    /// Greater than (`>`)
    Greater,
    /// Less than (`<`)
    Less,
    /// Exclusion (`!=`)
    NotEqual,
    /// Compatible release (`~=`)
    Compatible,
}

impl CompareOp {
    /// Returns the operator as written in requirements files
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Equal => "==",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::LessOrEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::Less => "<",
            CompareOp::NotEqual => "!=",
            CompareOp::Compatible => "~=",
        }
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(CompareOp::Equal),
            ">=" => Ok(CompareOp::GreaterOrEqual),
            "<=" => Ok(CompareOp::LessOrEqual),
            ">" => Ok(CompareOp::Greater),
            "<" => Ok(CompareOp::Less),
            "!=" => Ok(CompareOp::NotEqual),
            "~=" => Ok(CompareOp::Compatible),
            other => Err(format!("unrecognized comparison operator '{}'", other)),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single version constraint: operator plus version string
///
/// The version part is kept verbatim; it only needs to round-trip into the
/// rendered spec, not to be interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// The comparison operator
    pub op: CompareOp,
    /// The version the operator compares against
    pub version: String,
}

impl Requirement {
    /// Creates a new requirement
    pub fn new(op: CompareOp, version: impl Into<String>) -> Self {
        Self {
            op,
            version: version.into(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.version)
    }
}
