use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::parse::parameter::ParameterLocation;
use crate::parse::spec::{RawOperation, SpecDocument};
use crate::parse::version::SpecVersion;
use crate::postman::{Environment, EnvironmentVariable};

/// Exporter tag written into `_postman_exported_using` by default.
pub const DEFAULT_EXPORTED_USING: &str = "Postman/10.24.24";

/// Placeholder value and type given to every parameter variable.
pub const PARAMETER_PLACEHOLDER: &str = "string";

/// Timestamp layout of `_postman_exported_at`.
pub const EXPORTED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// The three seed variables every environment starts with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionVariables {
    pub protocol: String,
    pub host: String,
    pub base_url: String,
}

impl ConnectionVariables {
    /// Derive connection variables from the document.
    ///
    /// Swagger 2 reads `schemes[0]`, `host` and `basePath`. OpenAPI 3 uses
    /// `https`, the host of the URL the document was fetched from, and
    /// `servers[0].url`. `host_override` replaces the derived host either way.
    pub fn from_document(
        doc: &SpecDocument,
        source_url: Option<&str>,
        host_override: Option<&str>,
    ) -> Self {
        let (protocol, host, base_url) = match doc.version {
            SpecVersion::Swagger2 => {
                let protocol = doc.schemes.first().cloned().unwrap_or_else(|| {
                    warn!("document has no `schemes`, defaulting protocol to https");
                    "https".to_string()
                });
                let host = doc.host.clone().unwrap_or_else(|| {
                    warn!("document has no `host`");
                    String::new()
                });
                let base_url = doc.base_path.clone().unwrap_or_default();
                (protocol, host, base_url)
            }
            SpecVersion::OpenApi3 | SpecVersion::Unsupported => {
                let host = source_url.and_then(extract_domain).unwrap_or_else(|| {
                    if host_override.is_none() {
                        warn!("no source URL to take the host from; `host` is left empty");
                    }
                    String::new()
                });
                let base_url = doc
                    .servers
                    .first()
                    .map(|s| s.url.clone())
                    .unwrap_or_else(|| {
                        warn!("document has no `servers`, `base_url` is left empty");
                        String::new()
                    });
                ("https".to_string(), host, base_url)
            }
        };

        Self {
            protocol,
            host: host_override.map(str::to_string).unwrap_or(host),
            base_url,
        }
    }
}

/// Host (and port, when present) of a URL, without scheme or path.
pub fn extract_domain(source: &str) -> Option<String> {
    let parsed = url::Url::parse(source).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Accumulates environment variables with unique keys, in insertion order.
#[derive(Debug, Default)]
pub struct EnvironmentBuilder {
    values: Vec<EnvironmentVariable>,
    keys: HashSet<String>,
}

impl EnvironmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `protocol`, `host`, `base_url`, in that order.
    pub fn seeded(connection: &ConnectionVariables) -> Self {
        let mut builder = Self::new();
        builder.add("protocol", &connection.protocol, "string");
        builder.add("host", &connection.host, "string");
        builder.add("base_url", &connection.base_url, "string");
        builder
    }

    /// Append a variable unless its key is already present. Returns whether
    /// it was added.
    pub fn add(&mut self, key: &str, value: &str, kind: &str) -> bool {
        if !self.keys.insert(key.to_string()) {
            return false;
        }
        self.values.push(EnvironmentVariable {
            key: key.to_string(),
            value: value.to_string(),
            kind: kind.to_string(),
            enabled: true,
        });
        true
    }

    /// Register a path or query parameter name with the fixed placeholder.
    pub fn register_parameter(&mut self, name: &str) -> bool {
        let added = self.add(name, PARAMETER_PLACEHOLDER, PARAMETER_PLACEHOLDER);
        if added {
            debug!("registered environment variable `{name}`");
        }
        added
    }

    /// Register every named path and query parameter of an operation, in
    /// declaration order. Unnamed ones are skipped; the request builder
    /// reports them.
    pub fn register_operation(&mut self, operation: &RawOperation) {
        for param in &operation.parameters {
            if !matches!(
                param.location(),
                Some(ParameterLocation::Path | ParameterLocation::Query)
            ) {
                continue;
            }
            if let Some(name) = param.name.as_deref() {
                self.register_parameter(name);
            }
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the builder into the exported environment document.
    pub fn finalize(
        self,
        project_name: &str,
        exported_at: DateTime<Utc>,
        exported_using: &str,
    ) -> Environment {
        Environment {
            name: format!("{project_name}_environment"),
            values: self.values,
            variable_scope: "environment".to_string(),
            exported_at: exported_at.format(EXPORTED_AT_FORMAT).to_string(),
            exported_using: exported_using.to_string(),
        }
    }
}
