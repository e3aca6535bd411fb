//! Template functions and filters
//!
//! Registers the spec-authoring vocabulary on the template environment:
//! - `py2name` / `py2pkg`: distro package names, optionally with a version
//!   constraint, epoch prefix and requirements fallback
//! - `epoch`, `license`: table lookups with safe defaults
//! - `upstream_version`, `py2rpmversion`, `py2rpmrelease`: the version
//!   translation entry points
//! - `fetch_source`, `url_pypi`, `basename`: source handling helpers
//!
//! Functions that take no arguments read the template variables
//! `pypi_name`, `upstream_version` and `rpm_release` through the engine
//! state; templates set them with `{% set %}` before use.

use crate::archive;
use crate::domain::{rpm_release, rpm_version, CompareOp, Requirement, Style, UpstreamVersion};
use crate::error::RenderError;
use crate::fetch::Fetcher;
use crate::render::context::RenderContext;
use crate::render::license::translate_license;
use crate::render::names::translate_name;
use minijinja::value::Value;
use minijinja::{Environment, Error, ErrorKind, State};
use std::path::Path;
use std::sync::Arc;

/// Template variable carrying the upstream (pypi) component name
pub const VAR_PYPI_NAME: &str = "pypi_name";

/// Template variable carrying the upstream version string
pub const VAR_UPSTREAM_VERSION: &str = "upstream_version";

/// Template variable carrying the generic release counter
pub const VAR_RPM_RELEASE: &str = "rpm_release";

/// Base URL for sdist downloads
const PYPI_SOURCE_URL: &str = "https://files.pythonhosted.org/packages/source";

fn invalid_op(message: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidOperation, message.into())
}

/// Read a required template variable, failing with the operation's name
fn lookup_string(state: &State, variable: &str, needed_by: &str) -> Result<String, Error> {
    state
        .lookup(variable)
        .filter(|value| !value.is_undefined() && !value.is_none())
        .map(|value| value.to_string())
        .ok_or_else(|| {
            invalid_op(RenderError::missing_context_state(variable, needed_by).to_string())
        })
}

/// Interpret a template value as an (operator, version) pair
fn requirement_from_value(value: &Value) -> Result<Requirement, Error> {
    let items: Vec<Value> = value
        .try_iter()
        .map_err(|_| invalid_op("version constraint must be an (operator, version) pair"))?
        .collect();
    if items.len() != 2 {
        return Err(invalid_op(
            "version constraint must be an (operator, version) pair",
        ));
    }
    let op = items[0]
        .as_str()
        .ok_or_else(|| invalid_op("constraint operator must be a string"))?;
    let op: CompareOp = op.parse().map_err(|e: String| invalid_op(e))?;
    let version = items[1]
        .as_str()
        .ok_or_else(|| invalid_op("constraint version must be a string"))?;
    Ok(Requirement::new(op, version))
}

/// Render `<pkgname> <op> [epoch:]<version>` or the bare package name
fn format_package(
    ctx: &RenderContext,
    name: &str,
    requirement: Option<&Requirement>,
) -> String {
    let pkg = translate_name(ctx.style, name);
    match requirement {
        Some(req) => {
            let epoch = if ctx.epochs.contains(name) {
                format!("{}:", ctx.epochs.lookup(name))
            } else {
                String::new()
            };
            format!("{} {} {}{}", pkg, req.op, epoch, req.version)
        }
        None => pkg,
    }
}

/// Register all template functions and filters on the environment
pub fn register(env: &mut Environment<'static>, ctx: Arc<RenderContext>) {
    {
        let ctx = Arc::clone(&ctx);
        env.add_function(
            "py2name",
            move |state: &State, name: Option<String>| -> Result<String, Error> {
                let name = match name {
                    Some(name) => name,
                    None => lookup_string(state, VAR_PYPI_NAME, "py2name")?,
                };
                Ok(translate_name(ctx.style, &name))
            },
        );
    }

    {
        let ctx = Arc::clone(&ctx);
        env.add_function(
            "py2pkg",
            move |state: &State,
                  name: Option<String>,
                  version: Option<Value>|
                  -> Result<String, Error> {
                let name = match name {
                    Some(name) => name,
                    None => lookup_string(state, VAR_PYPI_NAME, "py2pkg")?,
                };
                let requirement = match version {
                    Some(value) if !value.is_undefined() && !value.is_none() => {
                        Some(requirement_from_value(&value)?)
                    }
                    _ => ctx.requirements.lookup(&name).cloned(),
                };
                Ok(format_package(&ctx, &name, requirement.as_ref()))
            },
        );
    }

    {
        let ctx = Arc::clone(&ctx);
        env.add_function("epoch", move |name: String| -> u64 {
            ctx.epochs.lookup(&name)
        });
    }
    {
        let ctx = Arc::clone(&ctx);
        env.add_filter("epoch", move |name: String| -> u64 {
            ctx.epochs.lookup(&name)
        });
    }

    {
        let ctx = Arc::clone(&ctx);
        env.add_function("license", move |value: String| -> String {
            translate_license(ctx.style, &value)
        });
    }
    {
        let ctx = Arc::clone(&ctx);
        env.add_filter("license", move |value: String| -> String {
            translate_license(ctx.style, &value)
        });
    }

    {
        let ctx = Arc::clone(&ctx);
        env.add_function(
            "upstream_version",
            move |state: &State, version: Option<String>| -> Result<String, Error> {
                if let Some(version) = version {
                    return Ok(version);
                }
                detect_upstream_version(state, &ctx)
            },
        );
    }

    {
        let ctx = Arc::clone(&ctx);
        env.add_function(
            "py2rpmversion",
            move |state: &State| -> Result<String, Error> {
                let raw = lookup_string(state, VAR_UPSTREAM_VERSION, "py2rpmversion")?;
                let version =
                    UpstreamVersion::parse(&raw).map_err(|e| invalid_op(e.to_string()))?;
                Ok(rpm_version(&version, ctx.style))
            },
        );
    }

    {
        let ctx = Arc::clone(&ctx);
        env.add_function(
            "py2rpmrelease",
            move |state: &State| -> Result<String, Error> {
                match ctx.style {
                    Style::Suse => Ok("0".to_string()),
                    Style::Fedora => {
                        let raw = lookup_string(state, VAR_UPSTREAM_VERSION, "py2rpmrelease")?;
                        let seed = lookup_string(state, VAR_RPM_RELEASE, "py2rpmrelease")?;
                        let version = UpstreamVersion::parse(&raw)
                            .map_err(|e| invalid_op(e.to_string()))?;
                        rpm_release(&version, Style::Fedora, Some(&seed))
                            .map_err(|e| invalid_op(e.to_string()))
                    }
                }
            },
        );
    }

    {
        let ctx = Arc::clone(&ctx);
        env.add_function("fetch_source", move |url: String| -> Result<String, Error> {
            if let Some(dir) = ctx.output_dir.as_deref() {
                let fetcher =
                    Fetcher::new(!ctx.quiet).map_err(|e| invalid_op(e.to_string()))?;
                fetcher
                    .download(&url, dir)
                    .map_err(|e| invalid_op(e.to_string()))?;
            }
            Ok(url)
        });
    }

    env.add_function("url_pypi", |state: &State| -> Result<String, Error> {
        let name = lookup_string(state, VAR_PYPI_NAME, "url_pypi")?;
        let version = lookup_string(state, VAR_UPSTREAM_VERSION, "url_pypi")?;
        let initial = name
            .chars()
            .next()
            .ok_or_else(|| invalid_op("pypi_name must not be empty"))?;
        Ok(format!(
            "{}/{}/{}/{}-{}.tar.gz",
            PYPI_SOURCE_URL, initial, name, name, version
        ))
    });

    env.add_filter("basename", |value: String| -> String {
        value.rsplit('/').next().unwrap_or_default().to_string()
    });
}

/// Autodetect the upstream version from archives near the render
///
/// Searches the output directory, the template directory and the working
/// directory for archives of the current component, newest first.
fn detect_upstream_version(state: &State, ctx: &RenderContext) -> Result<String, Error> {
    let name = lookup_string(state, VAR_PYPI_NAME, "upstream_version")?;
    let directories = [
        ctx.output_dir.as_deref(),
        Some(ctx.template_dir.as_path()),
        Some(Path::new(".")),
    ];
    let archives = archive::find_archives(&directories, &name);
    for candidate in &archives {
        match archive::version_from_archive(candidate) {
            Ok(Some(version)) => return Ok(version),
            Ok(None) => continue,
            Err(e) => return Err(invalid_op(e.to_string())),
        }
    }
    let searched = if archives.is_empty() {
        "no matching archives found".to_string()
    } else {
        archives
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    Err(invalid_op(
        RenderError::VersionNotDetected { searched }.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{EpochTable, RequirementTable};
    use minijinja::context;
    use std::path::PathBuf;

    fn env_with(ctx: RenderContext) -> Environment<'static> {
        let mut env = Environment::new();
        register(&mut env, Arc::new(ctx));
        env
    }

    fn suse_ctx() -> RenderContext {
        RenderContext::new(Style::Suse, ".")
    }

    fn fedora_ctx() -> RenderContext {
        RenderContext::new(Style::Fedora, ".")
    }

    fn epochs(entries: &str) -> EpochTable {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epochs.yaml");
        std::fs::write(&path, entries).unwrap();
        EpochTable::load(Some(&path)).unwrap()
    }

    fn requirements(content: &str) -> RequirementTable {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, content).unwrap();
        RequirementTable::merge(&[path]).unwrap()
    }

    fn render(env: &Environment<'static>, template: &str) -> String {
        env.render_str(template, context! {}).unwrap()
    }

    #[test]
    fn test_license_suse_passthrough() {
        let env = env_with(suse_ctx());
        assert_eq!(render(&env, "{{ license('Apache-2.0') }}"), "Apache-2.0");
    }

    #[test]
    fn test_license_fedora_translated() {
        let env = env_with(fedora_ctx());
        assert_eq!(render(&env, "{{ license('Apache-2.0') }}"), "ASL 2.0");
    }

    #[test]
    fn test_license_filter() {
        let env = env_with(fedora_ctx());
        assert_eq!(render(&env, "{{ 'MPL-2.0' | license }}"), "MPLv2.0");
    }

    #[test]
    fn test_py2pkg_plain() {
        let env = env_with(suse_ctx());
        assert_eq!(render(&env, "{{ py2pkg('requests') }}"), "python-requests");
    }

    #[test]
    fn test_py2pkg_fedora_name() {
        let env = env_with(fedora_ctx());
        assert_eq!(
            render(&env, "{{ py2pkg('oslo.config') }}"),
            "python-oslo-config"
        );
    }

    #[test]
    fn test_py2pkg_with_version() {
        let env = env_with(suse_ctx());
        assert_eq!(
            render(&env, "{{ py2pkg('requests', ['>=', '2.8.1']) }}"),
            "python-requests >= 2.8.1"
        );
    }

    #[test]
    fn test_py2pkg_with_version_and_epoch() {
        let env = env_with(suse_ctx().with_epochs(epochs("requests: 4\n")));
        assert_eq!(
            render(&env, "{{ py2pkg('requests', ['>=', '2.8.1']) }}"),
            "python-requests >= 4:2.8.1"
        );
    }

    #[test]
    fn test_py2pkg_epoch_without_version_omitted() {
        let env = env_with(suse_ctx().with_epochs(epochs("requests: 4\n")));
        assert_eq!(render(&env, "{{ py2pkg('requests') }}"), "python-requests");
    }

    #[test]
    fn test_py2pkg_requirements_fallback() {
        let ctx = suse_ctx().with_requirements(requirements("requests>=1.2.3\n"));
        let env = env_with(ctx);
        assert_eq!(
            render(&env, "{{ py2pkg('requests') }}"),
            "python-requests >= 1.2.3"
        );
    }

    #[test]
    fn test_py2pkg_explicit_version_beats_requirements() {
        let ctx = suse_ctx()
            .with_epochs(epochs("requests: 4\n"))
            .with_requirements(requirements("requests>=1.2.3\n"));
        let env = env_with(ctx);
        assert_eq!(
            render(&env, "{{ py2pkg('requests', ['>=', '2.8.1']) }}"),
            "python-requests >= 4:2.8.1"
        );
    }

    #[test]
    fn test_py2pkg_requirements_with_epoch() {
        let ctx = suse_ctx()
            .with_epochs(epochs("oslo.config: 4\n"))
            .with_requirements(requirements("oslo.config>=1.2.3\n"));
        let env = env_with(ctx);
        assert_eq!(
            render(&env, "{{ py2pkg('oslo.config') }}"),
            "python-oslo.config >= 4:1.2.3"
        );
    }

    #[test]
    fn test_py2pkg_name_from_context_variable() {
        let env = env_with(suse_ctx());
        assert_eq!(
            render(&env, "{% set pypi_name = 'requests' %}{{ py2pkg() }}"),
            "python-requests"
        );
    }

    #[test]
    fn test_py2pkg_bad_constraint_pair() {
        let env = env_with(suse_ctx());
        assert!(env
            .render_str("{{ py2pkg('requests', ['>=']) }}", context! {})
            .is_err());
        assert!(env
            .render_str("{{ py2pkg('requests', ['=>', '1.0']) }}", context! {})
            .is_err());
    }

    #[test]
    fn test_py2name_explicit() {
        let env = env_with(suse_ctx());
        assert_eq!(render(&env, "{{ py2name('requests') }}"), "python-requests");
    }

    #[test]
    fn test_py2name_from_context_variable() {
        let env = env_with(fedora_ctx());
        assert_eq!(
            render(&env, "{% set pypi_name = 'oslo.config' %}{{ py2name() }}"),
            "python-oslo-config"
        );
    }

    #[test]
    fn test_py2name_without_name_or_variable() {
        let env = env_with(suse_ctx());
        let err = env.render_str("{{ py2name() }}", context! {}).unwrap_err();
        assert!(err.to_string().contains("pypi_name"));
    }

    #[test]
    fn test_epoch_function_default() {
        let env = env_with(suse_ctx());
        assert_eq!(render(&env, "Epoch: {{ epoch('requests') }}"), "Epoch: 0");
    }

    #[test]
    fn test_epoch_function_with_entry() {
        let env = env_with(suse_ctx().with_epochs(epochs("requests: 1\n")));
        assert_eq!(render(&env, "Epoch: {{ epoch('requests') }}"), "Epoch: 1");
    }

    #[test]
    fn test_epoch_filter() {
        let env = env_with(suse_ctx().with_epochs(epochs("requests: 2\n")));
        assert_eq!(render(&env, "{{ 'requests' | epoch }}"), "2");
    }

    #[test]
    fn test_upstream_version_explicit() {
        let env = env_with(suse_ctx());
        assert_eq!(
            render(&env, "{{ upstream_version('1.2.3') }}"),
            "1.2.3"
        );
    }

    #[test]
    fn test_upstream_version_autodetect_needs_name() {
        let env = env_with(suse_ctx());
        let err = env
            .render_str("{{ upstream_version() }}", context! {})
            .unwrap_err();
        assert!(err.to_string().contains("pypi_name"));
    }

    #[test]
    fn test_py2rpmversion_suse() {
        let env = env_with(suse_ctx());
        assert_eq!(
            render(
                &env,
                "{% set upstream_version = '1.2.3.0rc1' %}{{ py2rpmversion() }}"
            ),
            "1.2.3.0~rc1"
        );
    }

    #[test]
    fn test_py2rpmversion_fedora() {
        let env = env_with(fedora_ctx());
        assert_eq!(
            render(
                &env,
                "{% set upstream_version = '1.2.3.0rc1' %}{{ py2rpmversion() }}"
            ),
            "1.2.3"
        );
    }

    #[test]
    fn test_py2rpmversion_missing_variable() {
        let env = env_with(suse_ctx());
        let err = env
            .render_str("{{ py2rpmversion() }}", context! {})
            .unwrap_err();
        assert!(err.to_string().contains("upstream_version"));
        assert!(err.to_string().contains("py2rpmversion"));
    }

    #[test]
    fn test_py2rpmversion_malformed_version() {
        let env = env_with(suse_ctx());
        let err = env
            .render_str(
                "{% set upstream_version = 'bogus' %}{{ py2rpmversion() }}",
                context! {},
            )
            .unwrap_err();
        assert!(err.to_string().contains("malformed upstream version"));
    }

    #[test]
    fn test_py2rpmrelease_suse() {
        let env = env_with(suse_ctx());
        assert_eq!(render(&env, "{{ py2rpmrelease() }}"), "0");
    }

    #[test]
    fn test_py2rpmrelease_fedora_final() {
        let env = env_with(fedora_ctx());
        assert_eq!(
            render(
                &env,
                "{% set upstream_version = '1.2.3' %}{% set rpm_release = '1' %}{{ py2rpmrelease() }}"
            ),
            "1%{?dist}"
        );
    }

    #[test]
    fn test_py2rpmrelease_fedora_pre_release() {
        let env = env_with(fedora_ctx());
        assert_eq!(
            render(
                &env,
                "{% set upstream_version = '1.2.3.0rc1' %}{% set rpm_release = '1' %}{{ py2rpmrelease() }}"
            ),
            "0.1rc1%{?dist}"
        );
    }

    #[test]
    fn test_py2rpmrelease_fedora_missing_seed() {
        let env = env_with(fedora_ctx());
        let err = env
            .render_str(
                "{% set upstream_version = '1.2.3' %}{{ py2rpmrelease() }}",
                context! {},
            )
            .unwrap_err();
        assert!(err.to_string().contains("rpm_release"));
    }

    #[test]
    fn test_fetch_source_echoes_url_without_output_dir() {
        let env = env_with(suse_ctx());
        assert_eq!(
            render(
                &env,
                "{{ fetch_source('https://example.com/demo-1.0.tar.gz') }}"
            ),
            "https://example.com/demo-1.0.tar.gz"
        );
    }

    #[test]
    fn test_url_pypi() {
        let env = env_with(suse_ctx());
        assert_eq!(
            render(
                &env,
                "{% set pypi_name = 'oslo.config' %}{% set upstream_version = '4.3.0' %}{{ url_pypi() }}"
            ),
            "https://files.pythonhosted.org/packages/source/o/oslo.config/oslo.config-4.3.0.tar.gz"
        );
    }

    #[test]
    fn test_basename_filter() {
        let env = env_with(suse_ctx());
        assert_eq!(
            render(&env, "{{ 'https://example.com/a/b/demo-1.0.tar.gz' | basename }}"),
            "demo-1.0.tar.gz"
        );
        assert_eq!(render(&env, "{{ 'plain.txt' | basename }}"), "plain.txt");
    }

    #[test]
    fn test_spec_style_variable_available() {
        let env = env_with(suse_ctx());
        let out = env
            .render_str(
                "{% if spec_style == 'suse' %}suse-branch{% endif %}",
                context! { spec_style => "suse" },
            )
            .unwrap();
        assert_eq!(out, "suse-branch");
    }
}
