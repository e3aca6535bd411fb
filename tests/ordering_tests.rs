//! RPM ordering property tests
//!
//! These tests verify the translated encodings against the RPM version
//! comparison algorithm itself (via the rpm crate), not against an
//! assumption about it:
//! - suse: pre-release versions sort below the final version inside `Version`
//! - fedora: pre-release `Release` strings sort below the final release of
//!   the same upstream version
//! - upstream ordering is preserved by the suse encoding for chains of
//!   versions of the same kind

use rpm_version::rpm_evr_compare;
use specgen::domain::{translate, Style, UpstreamVersion};
use std::cmp::Ordering;

fn suse_version(input: &str) -> String {
    let version = UpstreamVersion::parse(input).unwrap();
    translate(&version, Style::Suse, None).unwrap().version
}

fn fedora_pair(input: &str, seed: &str) -> (String, String) {
    let version = UpstreamVersion::parse(input).unwrap();
    let out = translate(&version, Style::Fedora, Some(seed)).unwrap();
    (out.version, out.release)
}

/// The dist macro placeholder plays no role in ordering comparisons
fn without_dist(release: &str) -> String {
    release.replace("%{?dist}", "")
}

/// Assert that every pair in the chain keeps its upstream order after the
/// suse encoding, under the RPM comparison algorithm
fn assert_suse_chain_ordered(chain: &[&str]) {
    for (i, a) in chain.iter().enumerate() {
        for b in &chain[i + 1..] {
            let va = UpstreamVersion::parse(a).unwrap();
            let vb = UpstreamVersion::parse(b).unwrap();
            assert_eq!(
                va.cmp(&vb),
                Ordering::Less,
                "upstream chain must be ascending: {} vs {}",
                a,
                b
            );
            let ra = suse_version(a);
            let rb = suse_version(b);
            assert_eq!(
                rpm_evr_compare(&ra, &rb),
                Ordering::Less,
                "rpm must order {} ('{}') below {} ('{}')",
                a,
                ra,
                b,
                rb
            );
        }
    }
}

#[test]
fn test_suse_pre_release_chain() {
    assert_suse_chain_ordered(&[
        "1.0a1", "1.0a2", "1.0b1", "1.0rc1", "1.0rc2", "1.0", "1.0.post1", "1.1",
    ]);
}

#[test]
fn test_suse_dev_chain() {
    assert_suse_chain_ordered(&["1.0.dev1", "1.0.dev2", "1.0", "1.0.1"]);
}

#[test]
fn test_suse_across_releases() {
    assert_suse_chain_ordered(&["0.9.9", "1.0rc1", "1.0", "1.0.1rc1", "1.0.1", "2.0a1", "2.0"]);
}

#[test]
fn test_suse_pre_release_sorts_below_final() {
    for input in ["1.2.3a1", "1.2.3b2", "1.2.3rc1", "1.2.3.dev4"] {
        let pre = suse_version(input);
        assert!(pre.contains('~'));
        assert_eq!(
            rpm_evr_compare(&pre, "1.2.3"),
            Ordering::Less,
            "'{}' must sort below the final 1.2.3",
            pre
        );
    }
}

#[test]
fn test_suse_post_release_sorts_above_final() {
    let post = suse_version("1.2.3.post2");
    assert_eq!(rpm_evr_compare(&post, "1.2.3"), Ordering::Greater);
}

#[test]
fn test_fedora_pre_release_sorts_below_final_release() {
    // the Version is identical for pre-release and final, so the Release
    // strings must carry the ordering
    let (pre_version, pre_release) = fedora_pair("1.2.3rc1", "1");
    let (final_version, final_release) = fedora_pair("1.2.3", "1");
    assert_eq!(pre_version, final_version);
    assert_eq!(
        rpm_evr_compare(&without_dist(&pre_release), &without_dist(&final_release)),
        Ordering::Less,
        "'{}' must sort below '{}'",
        pre_release,
        final_release
    );
}

#[test]
fn test_fedora_dev_sorts_below_pre_release() {
    let (_, dev_release) = fedora_pair("1.2.3.dev4", "1");
    let (_, rc_release) = fedora_pair("1.2.3rc1", "1");
    assert_eq!(
        rpm_evr_compare(&without_dist(&dev_release), &without_dist(&rc_release)),
        Ordering::Less
    );
}

#[test]
fn test_fedora_pre_release_kinds_ordered() {
    let (_, alpha) = fedora_pair("1.2.3a1", "1");
    let (_, beta) = fedora_pair("1.2.3b1", "1");
    let (_, rc) = fedora_pair("1.2.3rc1", "1");
    assert_eq!(
        rpm_evr_compare(&without_dist(&alpha), &without_dist(&beta)),
        Ordering::Less
    );
    assert_eq!(
        rpm_evr_compare(&without_dist(&beta), &without_dist(&rc)),
        Ordering::Less
    );
}

#[test]
fn test_fedora_seed_bump_sorts_higher() {
    let (_, first) = fedora_pair("1.2.3rc1", "1");
    let (_, second) = fedora_pair("1.2.3rc1", "2");
    assert_eq!(
        rpm_evr_compare(&without_dist(&first), &without_dist(&second)),
        Ordering::Less
    );

    let (_, first) = fedora_pair("1.2.3", "1");
    let (_, second) = fedora_pair("1.2.3", "2");
    assert_eq!(
        rpm_evr_compare(&without_dist(&first), &without_dist(&second)),
        Ordering::Less
    );
}

#[test]
fn test_fedora_post_release_sorts_above_final() {
    let (_, post) = fedora_pair("1.2.3.post2", "1");
    let (_, final_release) = fedora_pair("1.2.3", "1");
    assert_eq!(
        rpm_evr_compare(&without_dist(&post), &without_dist(&final_release)),
        Ordering::Greater
    );
}

#[test]
fn test_fedora_version_ordering_across_releases() {
    let (a, _) = fedora_pair("1.2.3", "1");
    let (b, _) = fedora_pair("1.2.4", "1");
    assert_eq!(rpm_evr_compare(&a, &b), Ordering::Less);

    let (a, _) = fedora_pair("1.9.0", "1");
    let (b, _) = fedora_pair("1.10.0", "1");
    assert_eq!(rpm_evr_compare(&a, &b), Ordering::Less);
}

#[test]
fn test_fedora_version_never_contains_tilde() {
    for input in [
        "1.0", "1.0a1", "1.0b2", "1.0rc3", "1.0.dev1", "1.0rc1.dev2", "1.0.post4", "1.2.3.4rc1",
    ] {
        let (version, release) = fedora_pair(input, "1");
        assert!(!version.contains('~'), "fedora Version '{}' has '~'", version);
        assert!(!release.contains('~'), "fedora Release '{}' has '~'", release);
    }
}

#[test]
fn test_translate_purity() {
    let version = UpstreamVersion::parse("1.2.3rc1.dev2").unwrap();
    for style in [Style::Suse, Style::Fedora] {
        let a = translate(&version, style, Some("7")).unwrap();
        let b = translate(&version, style, Some("7")).unwrap();
        assert_eq!(a, b);
    }
}
