use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// DashboardConfig controls the rendered status page.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct DashboardConfig {
    /// Text of the page `<title>`.
    #[serde(default = "default_title")]
    pub title: String,
    /// Text of the page heading.
    #[serde(default = "default_heading")]
    pub heading: String,
    /// Seconds between automatic page reloads in the browser.
    #[serde(default = "default_refresh_seconds")]
    pub refresh_seconds: u32,
}

fn default_title() -> String {
    "Attack Wall Dashboard".to_string()
}

fn default_heading() -> String {
    "Attack Wall Metrics".to_string()
}

fn default_refresh_seconds() -> u32 {
    1
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            title: default_title(),
            heading: default_heading(),
            refresh_seconds: default_refresh_seconds(),
        }
    }
}
