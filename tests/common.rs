use std::sync::Arc;

use attackwall::config::{Config, ConfigV1, load_config_from};
use attackwall::startup::build_state;
use attackwall::routes::create_router;
use attackwall::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request};
use figment::{
    Figment,
    providers::{Format, Serialized, Yaml},
};

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
bind_address: 127.0.0.1:0
logging:
  level: "debug"
  format: "json"
dashboard:
  title: "Attack Wall Test"
  refresh_seconds: 2
cpu:
  enabled: false
limits:
  max_body_bytes: 64
"#;

pub fn load_test_config() -> ConfigV1 {
    load_config_from(
        Figment::new()
            .merge(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
            .merge(Yaml::string(TEST_CONFIG)),
    )
    .expect("Failed to parse test config YAML")
}

pub fn build_app() -> (Router, AppState) {
    let state = build_state(Arc::new(load_test_config())).expect("state should build");
    (create_router(state.clone()), state)
}

pub fn request(path: &str, method: Method, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(body.into())
        .expect("failed to build request")
}
