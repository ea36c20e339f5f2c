use std::net::SocketAddr;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use super::cpu::CpuConfig;
use super::dashboard::DashboardConfig;
use super::logging::LoggingConfig;
use crate::error::{Error, Result};

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "ATTACKWALL_CONFIG";
/// Prefix of environment variables overriding config keys.
/// Nested keys are separated by `__`, e.g. `ATTACKWALL_DASHBOARD__TITLE`.
pub const ENV_PREFIX: &str = "ATTACKWALL_";

const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub cpu: CpuConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

impl Default for ConfigV1 {
    fn default() -> Self {
        ConfigV1 {
            bind_address: default_bind_address(),
            logging: LoggingConfig::default(),
            dashboard: DashboardConfig::default(),
            cpu: CpuConfig::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl ConfigV1 {
    /// Checks the values serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.dashboard.refresh_seconds == 0 {
            return Err(Error::InvalidConfig(
                "dashboard.refresh_seconds must be at least 1".to_string(),
            ));
        }
        if self.limits.max_body_bytes == 0 {
            return Err(Error::InvalidConfig(
                "limits.max_body_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The parsed `bind_address`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address.parse().map_err(|e| {
            Error::InvalidConfig(format!(
                "bind_address '{}' is not a valid socket address: {}",
                self.bind_address, e
            ))
        })
    }
}

/// Request limits applied by the recording middleware.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LimitsConfig {
    /// Largest request body, in bytes, that is read and counted.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Builds the layered configuration: defaults, then the YAML file, then
/// `ATTACKWALL_*` environment variables.
pub fn figment() -> Figment {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    Figment::new()
        .merge(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
        .merge(Yaml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Extracts and validates a config from any figment.
pub fn load_config_from(figment: Figment) -> Result<ConfigV1> {
    let config = match figment.extract::<Config>()? {
        Config::ConfigV1(c) => c,
    };
    // handle configuration migration between versions here when necessary
    config.validate()?;
    Ok(config)
}

/// Loads the config from `./config.yaml` (or `$ATTACKWALL_CONFIG`) and the environment.
pub fn load_config() -> Result<ConfigV1> {
    load_config_from(figment())
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<()> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_yaml(yaml: &str) -> Result<ConfigV1> {
        load_config_from(
            Figment::new()
                .merge(Serialized::defaults(Config::ConfigV1(ConfigV1::default())))
                .merge(Yaml::string(yaml)),
        )
    }

    /// With nothing but the version tag every default applies.
    #[test]
    fn test_defaults() {
        let config = from_yaml("version: \"1.0.0\"").unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.dashboard.title, "Attack Wall Dashboard");
        assert_eq!(config.dashboard.heading, "Attack Wall Metrics");
        assert_eq!(config.dashboard.refresh_seconds, 1);
        assert!(config.cpu.enabled);
        assert_eq!(config.limits.max_body_bytes, 10 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "console");
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let config = from_yaml(
            r#"
version: "1.0.0"
bind_address: "127.0.0.1:9000"
logging:
  level: "debug"
  format: "json"
dashboard:
  title: "Edge"
  refresh_seconds: 5
cpu:
  enabled: false
limits:
  max_body_bytes: 1024
"#,
        )
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.dashboard.title, "Edge");
        assert_eq!(config.dashboard.heading, "Attack Wall Metrics");
        assert_eq!(config.dashboard.refresh_seconds, 5);
        assert!(!config.cpu.enabled);
        assert_eq!(config.limits.max_body_bytes, 1024);
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let result = from_yaml("version: \"2.0.0\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_refresh_is_rejected() {
        let result = from_yaml(
            r#"
version: "1.0.0"
dashboard:
  refresh_seconds: 0
"#,
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_body_limit_is_rejected() {
        let result = from_yaml(
            r#"
version: "1.0.0"
limits:
  max_body_bytes: 0
"#,
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_bad_bind_address_is_rejected() {
        let result = from_yaml(
            r#"
version: "1.0.0"
bind_address: "not-an-address"
"#,
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    /// Environment variables take precedence over the YAML file.
    #[test]
    fn test_env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
version: "1.0.0"
dashboard:
  title: "From file"
  refresh_seconds: 3
"#,
            )?;
            jail.set_env("ATTACKWALL_DASHBOARD__TITLE", "From env");
            jail.set_env("ATTACKWALL_CPU__ENABLED", "false");

            let config = load_config().expect("config should load");
            assert_eq!(config.dashboard.title, "From env");
            assert_eq!(config.dashboard.refresh_seconds, 3);
            assert!(!config.cpu.enabled);
            Ok(())
        });
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = serde_json::to_string(&schema_for!(Config)).unwrap();
        assert!(schema.contains("bind_address"));
        assert!(schema.contains("max_body_bytes"));
    }
}
