//! CLI argument parsing module for specgen

use crate::domain::Style;
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Render an RPM .spec file from a .spec.j2 template
#[derive(Parser, Debug, Clone)]
#[command(
    name = "specgen",
    version,
    about = "Render distribution-specific RPM spec files from a single template"
)]
pub struct CliArgs {
    /// Spec template to render (.spec.j2)
    pub template: PathBuf,

    /// Spec style to use instead of host autodetection (suse, fedora)
    #[arg(long)]
    pub spec_style: Option<Style>,

    /// Requirements file used for package version constraints
    /// (can be specified multiple times; later files win per package)
    #[arg(long, action = ArgAction::Append)]
    pub requirements: Vec<PathBuf>,

    /// YAML file mapping package names to epochs
    #[arg(long)]
    pub epochs: Option<PathBuf>,

    /// Output filename instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Directory that receives fetched sources
    ///
    /// Derived from the output file's parent; writing to stdout means no
    /// output directory, which in turn skips source downloads.
    pub fn output_dir(&self) -> Option<PathBuf> {
        self.output
            .as_deref()
            .and_then(Path::parent)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    /// Directory of the input template
    pub fn template_dir(&self) -> PathBuf {
        self.template
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
