use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::TransformOptions;
use crate::transform::environment::DEFAULT_EXPORTED_USING;
use crate::transform::summary::SummaryScope;

/// Top-level project configuration loaded from `.oapm.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OapmConfig {
    /// Project name; used in every output file name.
    pub name: Option<String>,
    /// Path or http(s) URL of the API description.
    pub input: Option<String>,
    /// Directory under which `data-in/` and `data-out/` are created.
    pub output: String,
    pub naming: NamingConfig,
    pub environment: EnvironmentConfig,
    pub summary: SummaryConfig,
}

impl Default for OapmConfig {
    fn default() -> Self {
        Self {
            name: None,
            input: None,
            output: ".".to_string(),
            naming: NamingConfig::default(),
            environment: EnvironmentConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl OapmConfig {
    /// Engine options for one run.
    pub fn transform_options(&self, project_name: &str, source_url: Option<&str>) -> TransformOptions {
        TransformOptions {
            project_name: project_name.to_string(),
            naming_strategy: self.naming.strategy,
            source_url: source_url.map(str::to_string),
            host_override: self.environment.host.clone(),
            exported_using: self.environment.exported_using.clone(),
            exported_at: None,
            summary_scope: if self.summary.all_methods {
                SummaryScope::AllMethods
            } else {
                SummaryScope::FirstMethod
            },
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
}

/// How operation names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// `summary` (Swagger 2) or `operationId` (OpenAPI 3), falling back to
    /// a route-derived name when the field is absent.
    #[default]
    UseOperationId,
    UseRouteBased,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Replaces the derived `host` variable.
    pub host: Option<String>,
    pub exported_using: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            host: None,
            exported_using: DEFAULT_EXPORTED_USING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Emit a row for every method instead of only the first per path.
    pub all_methods: bool,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".oapm.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OapmConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: OapmConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# oapm configuration
# name: my-api                  # project name (prompted for when missing)
# input: https://petstore.swagger.io/v2/swagger.json
output: .                       # data-in/ and data-out/ are created here

naming:
  strategy: use_operation_id    # use_operation_id | use_route_based

environment:
  # host: api.example.com       # overrides the derived host variable
  exported_using: Postman/10.24.24

summary:
  all_methods: false            # true = one CSV row per method, not just the first
"#
}
