//! Upstream version to RPM Version/Release translation
//!
//! Encodes a parsed upstream version as an RPM `Version`/`Release` pair,
//! branching on the target spec style:
//! - suse: pre-release markers go into `Version` behind a `~` separator,
//!   which the RPM comparison algorithm sorts below the bare version;
//!   `Release` stays `0` (the build service manages the real value)
//! - fedora: `Version` carries only the release segments; pre-release
//!   markers move into `Release` as `0.<seed><tag>%{?dist}` so that the
//!   final `<seed>%{?dist}` build of the same version sorts above them

use crate::domain::style::Style;
use crate::domain::version::UpstreamVersion;
use crate::error::VersionError;

/// An RPM `Version`/`Release` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmVersionRelease {
    /// Value for the `Version:` tag
    pub version: String,
    /// Value for the `Release:` tag
    pub release: String,
}

/// Fedora truncates overlong upstream releases to this many segments
const FEDORA_MAX_SEGMENTS: usize = 3;

/// Translate an upstream version into an RPM Version/Release pair
///
/// Pure function of its three arguments. `release_seed` is the generic
/// packaging counter and is only consulted for the fedora style, where its
/// absence is an error.
pub fn translate(
    version: &UpstreamVersion,
    style: Style,
    release_seed: Option<&str>,
) -> Result<RpmVersionRelease, VersionError> {
    Ok(RpmVersionRelease {
        version: rpm_version(version, style),
        release: rpm_release(version, style, release_seed)?,
    })
}

/// Build the `Version` string for a style
pub fn rpm_version(version: &UpstreamVersion, style: Style) -> String {
    match style {
        Style::Suse => suse_version(version),
        Style::Fedora => fedora_version(version),
    }
}

/// Build the `Release` string for a style
///
/// suse specs leave the release at `0`; the build service fills in the
/// real value. Only the fedora form needs the release seed.
pub fn rpm_release(
    version: &UpstreamVersion,
    style: Style,
    release_seed: Option<&str>,
) -> Result<String, VersionError> {
    match style {
        Style::Suse => Ok("0".to_string()),
        Style::Fedora => fedora_release(version, release_seed),
    }
}

/// Build the suse `Version` string
///
/// The local label is dropped; pre-release and dev markers are appended
/// behind `~` with their mnemonic names, a post marker without it.
fn suse_version(version: &UpstreamVersion) -> String {
    let mut out = version.release_string();
    if let Some((kind, num)) = version.pre {
        out.push('~');
        out.push_str(kind.tag_name());
        out.push_str(&num.to_string());
        if let Some(dev) = version.dev {
            out.push_str(&format!(".dev{}", dev));
        }
    } else if let Some(dev) = version.dev {
        out.push_str(&format!("~dev{}", dev));
    }
    if let Some(post) = version.post {
        out.push_str(&format!(".post{}", post));
    }
    out
}

/// Build the fedora `Version` string
///
/// Only the release segments survive, truncated to three when the upstream
/// uses four or more.
fn fedora_version(version: &UpstreamVersion) -> String {
    if version.release.len() > FEDORA_MAX_SEGMENTS {
        version.release[..FEDORA_MAX_SEGMENTS]
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".")
    } else {
        version.release_string()
    }
}

/// Build the fedora `Release` string
///
/// Final releases use `<seed>%{?dist}`. Pre-releases and dev snapshots use
/// the `0.`-prefixed form, which the RPM comparison algorithm sorts below
/// any final release of the same version because its leading segment is 0.
fn fedora_release(
    version: &UpstreamVersion,
    release_seed: Option<&str>,
) -> Result<String, VersionError> {
    let seed = release_seed
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VersionError::MissingReleaseSeed {
            version: version.to_string(),
        })?;

    let mut out = if version.is_prerelease() {
        let mut suffix = String::new();
        if let Some((kind, num)) = version.pre {
            suffix.push_str(kind.short_tag());
            suffix.push_str(&num.to_string());
        }
        if let Some(dev) = version.dev {
            suffix.push_str(&format!(".dev{}", dev));
        }
        format!("0.{}{}", seed, suffix)
    } else {
        seed.to_string()
    };

    if let Some(post) = version.post {
        out.push_str(&format!(".post{}", post));
    }
    out.push_str("%{?dist}");
    Ok(out)
}
