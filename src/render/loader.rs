//! Template resolution for per-style child documents
//!
//! The engine sees two kinds of template names: `".spec"` resolves to the
//! user-supplied template file, and a style name resolves to a child
//! document that extends it. A child shipped in a `dist-templates/`
//! directory next to the input template wins; for known styles without one
//! a built-in child that simply extends the base is used, so every style
//! renders out of the box while per-distro override blocks remain possible.

use crate::domain::Style;
use minijinja::{Environment, ErrorKind};
use std::path::Path;

/// Name under which the user template is registered
pub const BASE_TEMPLATE_NAME: &str = ".spec";

/// File suffix of child templates in the dist-templates directory
const CHILD_TEMPLATE_SUFFIX: &str = ".spec.j2";

/// Directory (next to the input template) holding child templates
const DIST_TEMPLATES_DIR: &str = "dist-templates";

/// Fallback child for styles without a dist template
const BUILTIN_CHILD: &str = "{% extends \".spec\" %}";

/// Install the template loader for the given input template
pub fn install_loader(env: &mut Environment<'static>, template_path: &Path) {
    let base = template_path.to_path_buf();
    let dist_dir = template_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DIST_TEMPLATES_DIR);

    env.set_loader(move |name| {
        if name == BASE_TEMPLATE_NAME {
            return match std::fs::read_to_string(&base) {
                Ok(content) => Ok(Some(content)),
                Err(e) => Err(minijinja::Error::new(
                    ErrorKind::TemplateNotFound,
                    format!("cannot read template {}: {}", base.display(), e),
                )),
            };
        }

        let child = dist_dir.join(format!("{}{}", name, CHILD_TEMPLATE_SUFFIX));
        match std::fs::read_to_string(&child) {
            Ok(content) => Ok(Some(content)),
            Err(_) if Style::all().iter().any(|s| s.as_str() == name) => {
                Ok(Some(BUILTIN_CHILD.to_string()))
            }
            Err(_) => Ok(None),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env_for(template: &Path) -> Environment<'static> {
        let mut env = Environment::new();
        install_loader(&mut env, template);
        env
    }

    fn write_template(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_base_template_resolves_to_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(&dir, "demo.spec.j2", "hello");
        let env = env_for(&template);
        let out = env
            .get_template(BASE_TEMPLATE_NAME)
            .unwrap()
            .render(minijinja::context! {})
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn test_known_style_falls_back_to_builtin_child() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(&dir, "demo.spec.j2", "base content");
        let env = env_for(&template);
        let out = env
            .get_template("suse")
            .unwrap()
            .render(minijinja::context! {})
            .unwrap();
        assert_eq!(out, "base content");
    }

    #[test]
    fn test_dist_template_overrides_block() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(
            &dir,
            "demo.spec.j2",
            "Line before block\n{% block footest %}{% endblock %}\nLine after block\n",
        );
        let dt_dir = dir.path().join("dist-templates");
        fs::create_dir(&dt_dir).unwrap();
        fs::write(
            dt_dir.join("loldistro.spec.j2"),
            "{% extends \".spec\" %}{% block footest %}foo block\n{% endblock %}",
        )
        .unwrap();

        let env = env_for(&template);
        let out = env
            .get_template("loldistro")
            .unwrap()
            .render(minijinja::context! {})
            .unwrap();
        assert_eq!(out, "Line before block\nfoo block\n\nLine after block");
    }

    #[test]
    fn test_unknown_template_name_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(&dir, "demo.spec.j2", "base");
        let env = env_for(&template);
        assert!(env.get_template("loldistro").is_err());
    }

    #[test]
    fn test_missing_base_template_is_error() {
        let env = env_for(Path::new("/no/such/template.spec.j2"));
        assert!(env.get_template(BASE_TEMPLATE_NAME).is_err());
    }
}
