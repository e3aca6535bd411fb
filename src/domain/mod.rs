//! Core domain models
//!
//! This module contains the fundamental types used throughout the
//! application:
//! - Spec style identification and host-based resolution
//! - Upstream version parsing and ordering
//! - RPM Version/Release translation
//! - Version constraint types for requirements

mod requirement;
mod rpm;
mod style;
mod version;

pub use requirement::{CompareOp, Requirement};
pub use rpm::{rpm_release, rpm_version, translate, RpmVersionRelease};
pub use style::Style;
pub use version::{PreKind, UpstreamVersion};
