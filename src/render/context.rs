//! Per-render shared state
//!
//! One `RenderContext` is built per template render and shared read-only
//! into every registered template function. Mutable per-render values
//! (`pypi_name`, `upstream_version`, `rpm_release`) deliberately do not
//! live here: they are plain template variables set with `{% set %}` and
//! read back through the engine's state, so independent renders can never
//! observe each other.

use crate::domain::Style;
use crate::manifest::{EpochTable, RequirementTable};
use std::path::PathBuf;

/// Read-only inputs for one template render
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// The active spec style
    pub style: Style,
    /// Per-package epoch table
    pub epochs: EpochTable,
    /// Merged per-package version constraints
    pub requirements: RequirementTable,
    /// Directory that receives fetched sources; `None` skips downloads
    pub output_dir: Option<PathBuf>,
    /// Directory of the input template, searched for archives
    pub template_dir: PathBuf,
    /// Suppress progress output
    pub quiet: bool,
}

impl RenderContext {
    /// Creates a context with empty tables and no output directory
    pub fn new(style: Style, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            style,
            epochs: EpochTable::new(),
            requirements: RequirementTable::new(),
            output_dir: None,
            template_dir: template_dir.into(),
            quiet: true,
        }
    }

    /// Sets the epoch table
    pub fn with_epochs(mut self, epochs: EpochTable) -> Self {
        self.epochs = epochs;
        self
    }

    /// Sets the requirements table
    pub fn with_requirements(mut self, requirements: RequirementTable) -> Self {
        self.requirements = requirements;
        self
    }

    /// Sets the output directory for fetched sources
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// Controls progress output
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}
