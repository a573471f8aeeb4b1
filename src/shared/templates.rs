//! Server-side HTML templates using Jinja2 syntax.
//!
//! Templates live under `templates/` and are embedded at compile time, so the
//! binary does not depend on the working directory. Names ending in `.html` are
//! auto-escaped.

use minijinja::Environment;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATES: &[(&str, &str)] = &[
    (
        "map/province_tooltip.html",
        include_str!("../../templates/map/province_tooltip.html"),
    ),
    (
        "map/missing_tooltip.html",
        include_str!("../../templates/map/missing_tooltip.html"),
    ),
];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template with any serializable context.
///
/// # Example
/// ```ignore
/// let html = render_template("map/missing_tooltip.html", minijinja::context! { name => "中国" })?;
/// ```
pub fn render_template<C: Serialize>(template_name: &str, ctx: C) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_unknown_template() {
        let err = render_template("map/nope.html", context! {}).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_html_templates_escape_input() {
        let html = render_template(
            "map/missing_tooltip.html",
            context! { name => "<b>中国" },
        )
        .unwrap();
        assert_eq!(html, "&lt;b&gt;中国<br/>暂无数据");
    }
}
