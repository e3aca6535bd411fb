//! Upstream name to distro package name mapping
//!
//! Implements the default naming rule of the packaging ecosystems: the
//! upstream (pypi) name gains a `python-` prefix unless it already carries
//! one. Fedora additionally flattens dots in the name body to dashes
//! (`oslo.config` becomes `python-oslo-config`). Names that need no special
//! casing pass through this rule unchanged, so an unknown name is never an
//! error.

use crate::domain::Style;

/// Names that keep their upstream spelling without a `python-` prefix
const UNPREFIXED: &[&str] = &["devel", "python", "python-devel"];

/// Translate an upstream package name into the style's package name
pub fn translate_name(style: Style, name: &str) -> String {
    if UNPREFIXED.contains(&name) {
        return name.to_string();
    }
    let base = if name.starts_with("python-") {
        name.to_string()
    } else {
        format!("python-{}", name)
    };
    match style {
        Style::Suse => base,
        Style::Fedora => base.replace('.', "-"),
    }
}
