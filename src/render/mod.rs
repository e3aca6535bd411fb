//! Spec rendering
//!
//! This module wires the domain pieces into the template engine:
//! - A per-render context object shared into every template function
//! - The template function/filter vocabulary
//! - Style child-document resolution
//! - License and package-name translation tables

mod context;
mod functions;
mod license;
mod loader;
mod names;

pub use context::RenderContext;
pub use functions::register;
pub use license::translate_license;
pub use loader::{install_loader, BASE_TEMPLATE_NAME};
pub use names::translate_name;

use crate::error::{AppError, RenderError};
use minijinja::Environment;
use std::path::Path;
use std::sync::Arc;

/// Render the template for the context's style and return the spec text
pub fn generate_spec(ctx: Arc<RenderContext>, template_path: &Path) -> Result<String, AppError> {
    let mut env = Environment::new();
    install_loader(&mut env, template_path);
    register(&mut env, Arc::clone(&ctx));

    let template = env
        .get_template(ctx.style.as_str())
        .map_err(RenderError::from)?;
    let rendered = template
        .render(minijinja::context! { spec_style => ctx.style.as_str() })
        .map_err(RenderError::from)?;
    Ok(rendered)
}
