use serde::Serialize;
use serde_json::Value;

/// The only accepted `swagger` field value.
pub const SWAGGER_2_VERSION: &str = "2.0";

/// Accepted `openapi` field values.
pub const OPENAPI_3_VERSIONS: &[&str] = &["3.0.1", "3.0.2"];

/// Which flavour of API description a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpecVersion {
    #[serde(rename = "swagger_2")]
    Swagger2,
    #[serde(rename = "openapi_3")]
    OpenApi3,
    #[serde(rename = "unsupported")]
    Unsupported,
}

impl SpecVersion {
    /// Classify a top-level document. `swagger` is checked before `openapi`.
    /// Only string markers count.
    pub fn classify(root: &Value) -> Self {
        if root.get("swagger").and_then(Value::as_str) == Some(SWAGGER_2_VERSION) {
            return SpecVersion::Swagger2;
        }
        match root.get("openapi").and_then(Value::as_str) {
            Some(v) if OPENAPI_3_VERSIONS.contains(&v) => SpecVersion::OpenApi3,
            _ => SpecVersion::Unsupported,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpecVersion::Swagger2 => "2.0",
            SpecVersion::OpenApi3 => "3.0.x",
            SpecVersion::Unsupported => "unsupported",
        }
    }
}

/// Describe whatever version marker a document carries, for error messages.
pub fn declared_version(root: &Value) -> String {
    if let Some(v) = field_as_version(root, "openapi") {
        return format!("openapi {v}");
    }
    if let Some(v) = field_as_version(root, "swagger") {
        return format!("swagger {v}");
    }
    "no swagger/openapi field".to_string()
}

/// Rewrite numeric `swagger`/`openapi` markers as their text. YAML reads an
/// unquoted `swagger: 2.0` as a float; JSON documents are never passed here.
pub fn normalize_yaml_markers(root: &mut Value) {
    let Some(map) = root.as_object_mut() else {
        return;
    };
    for field in ["swagger", "openapi"] {
        let text = match map.get(field) {
            Some(Value::Number(n)) => n.to_string(),
            _ => continue,
        };
        map.insert(field.to_string(), Value::String(text));
    }
}

fn field_as_version(root: &Value, field: &str) -> Option<String> {
    match root.get(field)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
