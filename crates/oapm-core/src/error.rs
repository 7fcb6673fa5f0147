use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported spec version: {0} (expected swagger 2.0 or openapi 3.0.1/3.0.2)")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no $ref or inline properties for {0}")]
    RefNotFound(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),

    #[error("$ref search exceeded depth {limit} at {pointer}")]
    DepthExceeded { pointer: String, limit: usize },
}

/// A single parameter that cannot be turned into a request variable.
#[derive(Debug, Error)]
#[error("malformed operation {method} {path}: {reason}")]
pub struct MalformedOperation {
    pub path: String,
    pub method: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("resolve error in {operation}: {source}")]
    Resolve {
        operation: String,
        #[source]
        source: ResolveError,
    },

    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("transform failed: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("rendered output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
