//! Input file handling for epoch and requirements tables
//!
//! This module provides functionality to:
//! - Load the per-package epoch table from an optional YAML file
//! - Parse and merge pip-style requirements files (last file wins per name)
//!
//! Both tables are read-only after loading; a render never mutates them.

mod epochs;
mod requirements;

pub use epochs::EpochTable;
pub use requirements::RequirementTable;
