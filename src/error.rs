//! Application error types using thiserror
//!
//! Error hierarchy:
//! - VersionError: Upstream version parsing and translation failures
//! - StyleError: Spec style resolution failures
//! - ManifestError: Epoch file and requirements file parsing failures
//! - RenderError: Template rendering and context failures
//! - FetchError: Source archive download failures

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Upstream version related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Spec style resolution errors
    #[error(transparent)]
    Style(#[from] StyleError),

    /// Epoch file and requirements file errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Template rendering errors
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Source download errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// IO related errors
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Errors related to upstream version handling
#[derive(Error, Debug)]
pub enum VersionError {
    /// The input does not match the accepted upstream version grammar
    #[error("malformed upstream version '{input}'")]
    Malformed { input: String },

    /// A fedora release string needs a release seed, but none was supplied
    #[error("no release seed available to build the Release for version '{version}'")]
    MissingReleaseSeed { version: String },
}

/// Errors related to spec style resolution
#[derive(Error, Debug)]
pub enum StyleError {
    /// The given style name is not in the known set
    #[error("unknown spec style '{value}': expected 'suse' or 'fedora'")]
    Unknown { value: String },

    /// No host signal matched a known distribution family
    #[error("could not detect a spec style for this host; use --spec-style")]
    Undetected,
}

/// Errors related to epoch and requirements input files
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Failed to read the epoch file
    #[error("failed to read epoch file {path}: {source}")]
    EpochRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The epoch file is not a valid mapping of package name to integer
    #[error("invalid epoch file {path}: {message}")]
    InvalidEpochFile { path: PathBuf, message: String },

    /// Failed to read a requirements file
    #[error("failed to read requirements file {path}: {source}")]
    RequirementsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A requirements file line does not match the requirement grammar
    #[error("invalid requirement in {path} line {line}: '{content}': {message}")]
    InvalidRequirementLine {
        path: PathBuf,
        line: usize,
        content: String,
        message: String,
    },
}

/// Errors raised while rendering a template
#[derive(Error, Debug)]
pub enum RenderError {
    /// A template variable needed by a context function was never set
    #[error("variable '{variable}' not set in the template but needed for '{needed_by}'")]
    MissingContextState { variable: String, needed_by: String },

    /// Archive-based version autodetection found no usable archive
    #[error("cannot autodetect 'upstream_version' from archives: {searched}")]
    VersionNotDetected { searched: String },

    /// Failed to extract or inspect a source archive
    #[error("failed to inspect archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Template engine error
    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Errors related to source archive downloads
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL has no usable file name component
    #[error("cannot derive a file name from url '{url}'")]
    InvalidUrl { url: String },

    /// Network request failed
    #[error("failed to fetch '{url}': {message}")]
    Http { url: String, message: String },

    /// Failed to write the downloaded file
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to template and output IO
#[derive(Error, Debug)]
pub enum IoError {
    /// Failed to read the input template
    #[error("failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the rendered spec
    #[error("failed to write output {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VersionError {
    /// Creates a new Malformed error
    pub fn malformed(input: impl Into<String>) -> Self {
        VersionError::Malformed {
            input: input.into(),
        }
    }
}

impl ManifestError {
    /// Creates a new InvalidEpochFile error
    pub fn invalid_epoch_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::InvalidEpochFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidRequirementLine error
    pub fn invalid_requirement_line(
        path: impl Into<PathBuf>,
        line: usize,
        content: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ManifestError::InvalidRequirementLine {
            path: path.into(),
            line,
            content: content.into(),
            message: message.into(),
        }
    }
}

impl RenderError {
    /// Creates a new MissingContextState error
    pub fn missing_context_state(
        variable: impl Into<String>,
        needed_by: impl Into<String>,
    ) -> Self {
        RenderError::MissingContextState {
            variable: variable.into(),
            needed_by: needed_by.into(),
        }
    }
}
