//! Self-refreshing HTML status page.

use axum::{Router, extract::State, response::Html, routing::get};

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::traffic::MetricSnapshot;

/// Registers the dashboard route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

async fn dashboard(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.traffic.snapshot();
    let cpu_load = state.cpu.sample();
    Html(render_dashboard(&state.config.dashboard, &snapshot, cpu_load))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the status page for one snapshot.
///
/// Traffic is shown in MiB with two decimals; a missing CPU reading is shown
/// as `N/A`.
pub fn render_dashboard(
    config: &DashboardConfig,
    snapshot: &MetricSnapshot,
    cpu_load: Option<f32>,
) -> String {
    let cpu = match cpu_load {
        Some(load) => format!("{:.1}%", load),
        None => "N/A".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <meta http-equiv="refresh" content="{refresh}">
</head>
<body>
    <h1>{heading}</h1>
    <p><b>Total Requests:</b> {total}</p>
    <p><b>Requests per Second:</b> {per_second}</p>
    <p><b>Requests per Minute:</b> {per_minute}</p>
    <p><b>Total Traffic:</b> {megabytes:.2} MB</p>
    <p><b>CPU Load:</b> {cpu}</p>
</body>
</html>
"#,
        title = escape_html(&config.title),
        refresh = config.refresh_seconds,
        heading = escape_html(&config.heading),
        total = snapshot.total_requests,
        per_second = snapshot.requests_this_second,
        per_minute = snapshot.requests_this_minute,
        megabytes = snapshot.total_megabytes(),
        cpu = cpu,
    )
}
