use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::parameter::RawParameter;
use super::version::{SpecVersion, declared_version};
use crate::error::ParseError;

/// Info object describing the API. Every field is optional here; the
/// collection falls back to empty strings. Unquoted YAML scalars such as
/// `version: 1.0` are read as their text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "scalar_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<String>,
}

fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// An OpenAPI 3 server entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// HTTP methods that may appear as path-item keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Map a path-item key to a method. Non-method keys (`parameters`,
    /// `summary`, `servers`, `$ref`, `x-*`) yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    /// Lowercase form, as written in the document.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Uppercase form, as sent on the wire.
    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// An operation, reduced to the fields the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawOperation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<RawParameter>,

    /// Kept untyped: the body schema is found by searching it for `$ref`.
    #[serde(rename = "requestBody")]
    pub request_body: Option<Value>,
}

impl RawOperation {
    /// The display name for this operation under the given version.
    pub fn display_name(&self, version: SpecVersion) -> Option<&str> {
        match version {
            SpecVersion::Swagger2 => self.summary.as_deref(),
            SpecVersion::OpenApi3 | SpecVersion::Unsupported => self.operation_id.as_deref(),
        }
    }
}

/// One (method, operation) pair under a path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathOperation {
    pub method: HttpMethod,
    pub operation: RawOperation,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    info: Info,
    host: Option<String>,
    #[serde(rename = "basePath")]
    base_path: Option<String>,
    #[serde(default)]
    schemes: Vec<String>,
    #[serde(default)]
    servers: Vec<Server>,
    #[serde(default)]
    paths: IndexMap<String, IndexMap<String, Value>>,
}

/// A parsed API description of a supported version.
///
/// Holds the raw tree (for `$ref` lookups) next to a typed view of the
/// fields the engine iterates. Immutable once built.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    pub version: SpecVersion,
    pub info: Info,
    /// Swagger 2 `host`.
    pub host: Option<String>,
    /// Swagger 2 `basePath`.
    pub base_path: Option<String>,
    /// Swagger 2 `schemes`.
    pub schemes: Vec<String>,
    /// OpenAPI 3 `servers`.
    pub servers: Vec<Server>,
    /// Operations per path, in document order.
    pub paths: IndexMap<String, Vec<PathOperation>>,
    raw: Value,
}

impl SpecDocument {
    /// Classify and index a raw document. Fails on unsupported versions.
    pub fn from_value(raw: Value) -> Result<Self, ParseError> {
        let version = SpecVersion::classify(&raw);
        if version == SpecVersion::Unsupported {
            return Err(ParseError::UnsupportedVersion(declared_version(&raw)));
        }
        let doc: RawDocument = serde_json::from_value(raw.clone())?;

        let mut paths = IndexMap::with_capacity(doc.paths.len());
        for (path, item) in doc.paths {
            let mut operations = Vec::new();
            for (key, value) in item {
                let Some(method) = HttpMethod::from_key(&key) else {
                    continue;
                };
                let operation: RawOperation = serde_json::from_value(value)?;
                operations.push(PathOperation { method, operation });
            }
            paths.insert(path, operations);
        }

        Ok(Self {
            version,
            info: doc.info,
            host: doc.host,
            base_path: doc.base_path,
            schemes: doc.schemes,
            servers: doc.servers,
            paths,
            raw,
        })
    }

    /// The untouched document tree.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Every (path, operation) pair in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &PathOperation)> {
        self.paths
            .iter()
            .flat_map(|(path, ops)| ops.iter().map(move |op| (path.as_str(), op)))
    }

    pub fn operation_count(&self) -> usize {
        self.paths.values().map(Vec::len).sum()
    }
}
