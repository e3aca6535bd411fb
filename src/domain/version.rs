//! Upstream version parsing
//!
//! Handles the upstream (Python-ecosystem) version grammar:
//! - Release: `1.2.3`, `2024.1`, optionally prefixed with `v`
//! - Pre-release: `1.2.3a1`, `1.2.3b2`, `1.2.3rc1` (tag letters case-insensitive)
//! - Dev snapshot: `1.2.3.dev4`, also combined as `1.2.3rc1.dev4`
//! - Post release: `1.2.3.post2`
//! - Local label: `1.2.3+local.1` (accepted, never emitted)

use crate::error::VersionError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^v?(?P<release>\d+(?:\.\d+)*)(?:(?P<pre_kind>a|b|rc)(?P<pre_num>\d+)?)?(?P<segments>(?:\.(?:dev|post)\d+)*)(?:\+(?P<local>[a-z0-9]+(?:[._-][a-z0-9]+)*))?$",
    )
    .unwrap()
});

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(dev|post)(\d+)$").unwrap());

/// The pre-release tag of an upstream version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreKind {
    /// Alpha pre-release (`a`)
    Alpha,
    /// Beta pre-release (`b`)
    Beta,
    /// Release candidate (`rc`)
    Candidate,
}

impl PreKind {
    /// Returns the mnemonic tag name used in tilde-style RPM versions
    pub fn tag_name(&self) -> &'static str {
        match self {
            PreKind::Alpha => "alpha",
            PreKind::Beta => "beta",
            PreKind::Candidate => "rc",
        }
    }

    /// Returns the short upstream spelling of the tag
    pub fn short_tag(&self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::Candidate => "rc",
        }
    }
}

/// Parsed representation of an upstream version string
///
/// Immutable once parsed. Ordering follows the upstream ecosystem's rules:
/// dev snapshots sort below pre-releases, pre-releases below the final
/// release, post releases above it. The local label does not participate
/// in ordering.
#[derive(Debug, Clone, Eq)]
pub struct UpstreamVersion {
    /// Dot-separated release segments, e.g. `[1, 2, 3]`
    pub release: Vec<u64>,
    /// Pre-release tag and number, if any (`a`/`b`/`rc`; a missing number is 0)
    pub pre: Option<(PreKind, u64)>,
    /// Dev snapshot number, if any
    pub dev: Option<u64>,
    /// Post release number, if any
    pub post: Option<u64>,
    /// Local version label, if any
    pub local: Option<String>,
}

impl UpstreamVersion {
    /// Parse an upstream version string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| VersionError::malformed(trimmed))?;

        let release = caps["release"]
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| VersionError::malformed(trimmed))?;

        let pre = match caps.name("pre_kind") {
            Some(kind) => {
                let kind = match kind.as_str().to_ascii_lowercase().as_str() {
                    "a" => PreKind::Alpha,
                    "b" => PreKind::Beta,
                    _ => PreKind::Candidate,
                };
                let num = match caps.name("pre_num") {
                    Some(num) => num
                        .as_str()
                        .parse::<u64>()
                        .map_err(|_| VersionError::malformed(trimmed))?,
                    None => 0,
                };
                Some((kind, num))
            }
            None => None,
        };

        // Dev and post segments may appear in either order, each at most once.
        let mut dev = None;
        let mut post = None;
        for segment in caps["segments"].split('.').filter(|s| !s.is_empty()) {
            let seg_caps = SEGMENT_RE
                .captures(segment)
                .ok_or_else(|| VersionError::malformed(trimmed))?;
            let num = seg_caps[2]
                .parse::<u64>()
                .map_err(|_| VersionError::malformed(trimmed))?;
            let slot = if seg_caps[1].eq_ignore_ascii_case("dev") {
                &mut dev
            } else {
                &mut post
            };
            if slot.is_some() {
                return Err(VersionError::malformed(trimmed));
            }
            *slot = Some(num);
        }

        let local = caps.name("local").map(|m| m.as_str().to_string());

        Ok(Self {
            release,
            pre,
            dev,
            post,
            local,
        })
    }

    /// The release segments joined with dots, e.g. `1.2.3`
    pub fn release_string(&self) -> String {
        self.release
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// True if this version precedes its corresponding final release
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// Compare release segments, treating missing trailing segments as zero
    fn cmp_release(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => (),
                other => return other,
            }
        }
        Ordering::Equal
    }

    // Sort keys for the suffix markers. A version with no pre-release tag
    // sorts above every tagged one, except that a bare dev snapshot sorts
    // below even an alpha of the same release.
    fn pre_key(&self) -> (u8, u64) {
        match self.pre {
            Some((kind, num)) => {
                let rank = match kind {
                    PreKind::Alpha => 1,
                    PreKind::Beta => 2,
                    PreKind::Candidate => 3,
                };
                (rank, num)
            }
            None if self.post.is_none() && self.dev.is_some() => (0, 0),
            None => (4, 0),
        }
    }

    fn post_key(&self) -> (u8, u64) {
        match self.post {
            Some(num) => (1, num),
            None => (0, 0),
        }
    }

    fn dev_key(&self) -> (u8, u64) {
        match self.dev {
            Some(num) => (0, num),
            None => (1, 0),
        }
    }
}

impl PartialEq for UpstreamVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for UpstreamVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UpstreamVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_release(other)
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post_key().cmp(&other.post_key()))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
    }
}

impl fmt::Display for UpstreamVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.release_string())?;
        if let Some((kind, num)) = self.pre {
            write!(f, "{}{}", kind.short_tag(), num)?;
        }
        if let Some(num) = self.post {
            write!(f, ".post{}", num)?;
        }
        if let Some(num) = self.dev {
            write!(f, ".dev{}", num)?;
        }
        if let Some(ref local) = self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}
