//! Message templates for user-facing notifications (Jinja2 syntax).
//!
//! Templates are compiled once into a process-wide environment and rendered
//! with `minijinja::context!` values.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

pub const REPORT_STATUS_TITLE: &str = "notifications/report_status_title";
pub const REPORT_STATUS_MESSAGE: &str = "notifications/report_status_message";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (REPORT_STATUS_TITLE, "Report {{ status_label | lower }}"),
    (
        REPORT_STATUS_MESSAGE,
        "Your leak report \"{{ title }}\" at {{ address }} is now {{ status_label | lower }}.\
{% if status == \"resolved\" %} Thank you for helping us save water!{% endif %}",
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for &(name, source) in BUILTIN_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a builtin template with the given context.
pub fn render_template(name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(name)
        .map_err(|_| TemplateError::NotFound(name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_render_status_message() {
        let message = render_template(
            REPORT_STATUS_MESSAGE,
            context! {
                title => "Burst main",
                address => "Jl. Merdeka 1",
                status => "in-progress",
                status_label => "In progress",
            },
        )
        .unwrap();

        assert_eq!(
            message,
            "Your leak report \"Burst main\" at Jl. Merdeka 1 is now in progress."
        );
    }

    #[test]
    fn test_resolved_message_thanks_reporter() {
        let message = render_template(
            REPORT_STATUS_MESSAGE,
            context! {
                title => "Dripping hydrant",
                address => "Main St",
                status => "resolved",
                status_label => "Resolved",
            },
        )
        .unwrap();

        assert!(message.ends_with("Thank you for helping us save water!"));
    }

    #[test]
    fn test_unknown_template() {
        let err = render_template("missing", context! {}).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }
}
