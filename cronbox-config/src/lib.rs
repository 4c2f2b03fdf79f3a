//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are attached, with `CRONBOX__`
//! prefixed environment variables applied last (`CRONBOX__LOGGING__FORMAT=json`).
//! After merging, every string value has `${VAR}` placeholders expanded
//! against the process environment. Unknown variables are left verbatim so
//! that [`DeliveryConfig::missing_fields`] can report them.
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde_json::Value;
use std::path::Path;

mod schema;

pub use schema::{
    ChannelConfig, CronboxConfig, DEFAULT_ALLOWED_HOSTS, DEFAULT_EXCLUDED_FRAGMENTS,
    DEFAULT_EXCLUDED_PREFIXES, DEFAULT_SOURCES, DEFAULT_USER_AGENT, DeliveryConfig, JobDetails,
    JobSpec, LoggingSettings, RecipesConfig,
};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct CronboxConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for CronboxConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CronboxConfigLoader {
    /// Start with no files and `CRONBOX__` env overrides.
    ///
    /// ```
    /// use cronbox_config::CronboxConfigLoader;
    ///
    /// let config = CronboxConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.jobs.len(), 1);
    /// assert_eq!(config.jobs[0].id, "weekly-recipes");
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(
            Environment::with_prefix("CRONBOX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, so env-only deployments still load.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use cronbox_config::{CronboxConfigLoader, JobDetails};
    ///
    /// let cfg = CronboxConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// jobs:
    ///   - id: "soups"
    ///     kind: "recipes"
    ///     config:
    ///       count: 3
    ///       sources: ["https://www.noracooks.com/category/soups/"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// match &cfg.jobs[0].details {
    ///     JobDetails::Recipes { config } => {
    ///         assert_eq!(config.count, 3);
    ///         assert_eq!(config.allowed_hosts.len(), 2);
    ///     }
    /// }
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use cronbox_config::{CronboxConfigLoader, JobDetails};
    ///
    /// unsafe { std::env::set_var("DOCTEST_RECIPIENT", "cook@example.com"); }
    ///
    /// let config = CronboxConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// jobs:
    ///   - id: "weekly"
    ///     kind: "recipes"
    ///     config:
    ///       delivery:
    ///         recipient: "${DOCTEST_RECIPIENT}"
    ///         sender: "bot@example.com"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// let JobDetails::Recipes { config } = &config.jobs[0].details;
    /// assert_eq!(config.delivery.recipient, "cook@example.com");
    /// assert!(config.delivery.missing_fields().is_empty());
    ///
    /// unsafe { std::env::remove_var("DOCTEST_RECIPIENT"); }
    /// ```
    pub fn load(self) -> Result<CronboxConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: CronboxConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("MAIL_TO", Some("cook@example.com"), || {
            let mut v = json!("to:${MAIL_TO}");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("to:cook@example.com"));
        });
    }

    #[test]
    fn expands_nested_sources() {
        temp_env::with_vars([("SITE", Some("noracooks.com"))], || {
            let mut v = json!({
                "sources": ["https://www.$SITE/category/meal-type/dinner/"],
                "allowed_hosts": ["${SITE}"],
                "count": 5
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "sources": ["https://www.noracooks.com/category/meal-type/dinner/"],
                    "allowed_hosts": ["noracooks.com"],
                    "count": 5
                })
            );
        });
    }

    #[test]
    fn follows_chained_references() {
        temp_env::with_vars(
            [
                ("DOMAIN", Some("example.com")),
                ("MAILBOX", Some("bot@${DOMAIN}")),
            ],
            || {
                let mut v = json!("${MAILBOX}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("bot@example.com"));
            },
        );
    }

    #[test]
    fn cyclic_references_terminate() {
        temp_env::with_vars([("PING", Some("${PONG}")), ("PONG", Some("${PING}"))], || {
            let mut v = json!("<${PING}>");
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with('<') && s.ends_with('>'));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("${CRONBOX_SURELY_UNSET_VAR}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("${CRONBOX_SURELY_UNSET_VAR}"));
    }
}
