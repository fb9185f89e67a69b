//! Slack reporter block renderer.

use crate::reporter::ReporterError;
use handlebars::{no_escape, Handlebars};
use serde_json::json;

/// Job line that the reporter block replaces.
pub const AGENT_MARKER: &str = "- agent: kubernetes";

/// Job states reported to Slack.
pub const REPORTED_JOB_STATES: [&str; 3] = ["success", "failure", "error"];

/// Prow message template; Prow expands it, not this renderer.
pub const SLACK_REPORT_TEMPLATE: &str = concat!(
    r#"{{if eq .Status.State "success"}} :rainbow: Job *{{.Spec.Job}}* ended with *{{.Status.State}}*. "#,
    r#"<{{.Status.URL}}|View logs> :rainbow: {{else}} :volcano: Job *{{.Spec.Job}}* ended with "#,
    r#"*{{.Status.State}}*. <{{.Status.URL}}|View logs> :volcano: {{end}}"#,
);

const REPORTER_TEMPLATE: &str = "- agent: kubernetes
  reporter_config:
    slack:
      channel: '{{channel}}'
      job_states_to_report:{{#each job_states}}
      - {{this}}{{/each}}
      report_template: '{{report_template}}'";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (output is YAML)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders the reporter block injected into periodic jobs.
pub struct ReporterRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for ReporterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReporterRenderer {
    /// Creates a new reporter renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the block replacing [`AGENT_MARKER`] for `channel`.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render(&self, channel: &str) -> Result<String, ReporterError> {
        let data = json!({
            "channel": channel,
            "job_states": REPORTED_JOB_STATES,
            "report_template": SLACK_REPORT_TEMPLATE,
        });
        Ok(self.handlebars.render_template(REPORTER_TEMPLATE, &data)?)
    }
}
