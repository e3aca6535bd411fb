//! License identifier translation
//!
//! SUSE specs use SPDX identifiers directly. Fedora specs historically use
//! their own short names, so known SPDX identifiers are rewritten from a
//! static table; unknown identifiers pass through unchanged.

use crate::domain::Style;

/// SPDX identifier to Fedora license spelling
const SPDX_TO_FEDORA: &[(&str, &str)] = &[
    ("Apache-1.1", "ASL 1.1"),
    ("Apache-2.0", "ASL 2.0"),
    ("BSD-3-Clause", "BSD"),
    ("GPL-1.0+", "GPL+"),
    ("GPL-2.0", "GPLv2"),
    ("GPL-2.0+", "GPLv2+"),
    ("GPL-3.0", "GPLv3"),
    ("GPL-3.0+", "GPLv3+"),
    ("LGPL-2.1", "LGPLv2.1"),
    ("LGPL-2.1+", "LGPLv2+"),
    ("LGPL-2.0", "LGPLv2 with exceptions"),
    ("LGPL-2.0+", "LGPLv2+ with exceptions"),
    ("LGPL-3.0", "LGPLv3"),
    ("LGPL-3.0+", "LGPLv3+"),
    ("MIT", "MIT with advertising"),
    ("MPL-1.0", "MPLv1.0"),
    ("MPL-1.1", "MPLv1.1"),
    ("MPL-2.0", "MPLv2.0"),
    ("OFL-1.1", "OFL"),
    ("Python-2.0", "Python"),
];

/// Look up the Fedora spelling for an SPDX identifier
fn fedora_spelling(spdx: &str) -> Option<&'static str> {
    SPDX_TO_FEDORA
        .iter()
        .find(|(key, _)| *key == spdx)
        .map(|(_, value)| *value)
}

/// Translate a license identifier for the given style
///
/// The passthrough default for unknown identifiers is applied here, by the
/// caller of the table lookup, so that "no match" stays observable.
pub fn translate_license(style: Style, spdx: &str) -> String {
    match style {
        Style::Suse => spdx.to_string(),
        Style::Fedora => fedora_spelling(spdx)
            .map(str::to_string)
            .unwrap_or_else(|| spdx.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suse_passes_spdx_through() {
        assert_eq!(translate_license(Style::Suse, "Apache-2.0"), "Apache-2.0");
        assert_eq!(translate_license(Style::Suse, "MIT"), "MIT");
    }

    #[test]
    fn test_fedora_translates_known_identifiers() {
        assert_eq!(translate_license(Style::Fedora, "Apache-2.0"), "ASL 2.0");
        assert_eq!(translate_license(Style::Fedora, "BSD-3-Clause"), "BSD");
        assert_eq!(translate_license(Style::Fedora, "GPL-2.0+"), "GPLv2+");
        assert_eq!(
            translate_license(Style::Fedora, "MIT"),
            "MIT with advertising"
        );
    }

    #[test]
    fn test_fedora_unknown_identifier_passes_through() {
        assert_eq!(
            translate_license(Style::Fedora, "Zlib-acknowledgement"),
            "Zlib-acknowledgement"
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        // lowercased identifiers are not recognized and pass through
        assert_eq!(translate_license(Style::Fedora, "apache-2.0"), "apache-2.0");
    }
}
