//! Spec style type and host-based style resolution
//!
//! A style names a distribution family's packaging conventions: how
//! `Version`/`Release` are encoded, which license spellings are expected
//! and how package names are derived. The active style is resolved once
//! per invocation, from an explicit override or from the host's os-release
//! identification, and is immutable afterwards.

use crate::error::StyleError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Files inspected for host identification, in order
const OS_RELEASE_PATHS: &[&str] = &["/etc/os-release", "/usr/lib/os-release"];

/// Distribution IDs treated as the suse family
const SUSE_IDS: &[&str] = &["suse", "opensuse", "opensuse-leap", "opensuse-tumbleweed", "sles"];

/// Distribution IDs treated as the fedora family
const FEDORA_IDS: &[&str] = &["fedora", "rhel", "centos", "rocky", "almalinux"];

/// Supported spec styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// SUSE family conventions (tilde pre-release markers in `Version`)
    Suse,
    /// Fedora family conventions (pre-release markers in `Release`)
    Fedora,
}

impl Style {
    /// Returns the style name as used on the command line and in templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Suse => "suse",
            Style::Fedora => "fedora",
        }
    }

    /// Returns all supported styles
    pub fn all() -> &'static [Style] {
        &[Style::Suse, Style::Fedora]
    }

    /// Resolve the active style
    ///
    /// An explicit override wins. Otherwise the os-release files are
    /// inspected in order and the first recognized distribution family is
    /// used. Without a match this fails: the styles differ in what is even
    /// legal in `Version`, so there is no safe default.
    pub fn resolve(overridden: Option<Style>) -> Result<Style, StyleError> {
        if let Some(style) = overridden {
            return Ok(style);
        }
        for path in OS_RELEASE_PATHS {
            if let Ok(content) = std::fs::read_to_string(Path::new(path)) {
                if let Some(style) = Style::from_os_release(&content) {
                    return Ok(style);
                }
            }
        }
        Err(StyleError::Undetected)
    }

    /// Match os-release content against the known distribution families
    ///
    /// Looks at the `ID` and `ID_LIKE` fields; `ID_LIKE` may carry several
    /// space-separated identifiers.
    pub fn from_os_release(content: &str) -> Option<Style> {
        for line in content.lines() {
            let line = line.trim();
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if key != "ID" && key != "ID_LIKE" {
                continue;
            }
            let value = value.trim_matches('"').trim_matches('\'');
            for id in value.split_whitespace() {
                let id = id.to_ascii_lowercase();
                if SUSE_IDS.contains(&id.as_str()) {
                    return Some(Style::Suse);
                }
                if FEDORA_IDS.contains(&id.as_str()) {
                    return Some(Style::Fedora);
                }
            }
        }
        None
    }
}

impl FromStr for Style {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "suse" => Ok(Style::Suse),
            "fedora" => Ok(Style::Fedora),
            other => Err(StyleError::Unknown {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
