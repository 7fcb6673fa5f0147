use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentinel used in the summary when an operation has no body parameter.
pub const NO_BODY: &str = "none";

/// Parameter location, as far as the engine cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterLocation {
    Path,
    Query,
    Body,
    /// `header`, `cookie`, `formData` and anything else: counted, never bucketed.
    Other(String),
}

impl ParameterLocation {
    pub fn parse(location: &str) -> Self {
        match location {
            "path" => ParameterLocation::Path,
            "query" => ParameterLocation::Query,
            "body" => ParameterLocation::Body,
            other => ParameterLocation::Other(other.to_string()),
        }
    }
}

/// A parameter as declared. Both `in` and `name` are optional so that
/// malformed entries (or unresolved `$ref` parameters) survive parsing and
/// can be skipped individually.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl RawParameter {
    pub fn location(&self) -> Option<ParameterLocation> {
        self.location.as_deref().map(ParameterLocation::parse)
    }
}

/// An operation's parameters split into body / path / query buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedParameters {
    /// Name of the last body parameter seen.
    pub body: Option<String>,
    pub path: Vec<String>,
    pub query: Vec<String>,
    /// Parameters carrying an `in` field; those without one are not counted.
    pub total: usize,
    /// Path/query/body parameters that had no `name` and were left out.
    pub unnamed: usize,
}

impl ClassifiedParameters {
    pub fn body_or_none(&self) -> &str {
        self.body.as_deref().unwrap_or(NO_BODY)
    }

    pub fn path_count(&self) -> usize {
        self.path.len()
    }

    pub fn query_count(&self) -> usize {
        self.query.len()
    }
}

/// Split a parameter list into buckets. Parameters without `in` are ignored.
pub fn classify_parameters(params: &[RawParameter]) -> ClassifiedParameters {
    let mut out = ClassifiedParameters::default();

    for param in params {
        let Some(location) = param.location() else {
            continue;
        };
        out.total += 1;

        let bucket = match location {
            ParameterLocation::Path => Some(&mut out.path),
            ParameterLocation::Query => Some(&mut out.query),
            ParameterLocation::Body => None,
            ParameterLocation::Other(_) => continue,
        };

        let Some(name) = param.name.clone() else {
            out.unnamed += 1;
            continue;
        };

        match bucket {
            Some(list) => list.push(name),
            None => out.body = Some(name),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(location: Option<&str>, name: Option<&str>) -> RawParameter {
        RawParameter {
            location: location.map(String::from),
            name: name.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_buckets_keep_order() {
        let params = vec![
            param(Some("query"), Some("limit")),
            param(Some("path"), Some("owner")),
            param(Some("query"), Some("offset")),
            param(Some("path"), Some("id")),
        ];
        let c = classify_parameters(&params);
        assert_eq!(c.path, vec!["owner", "id"]);
        assert_eq!(c.query, vec!["limit", "offset"]);
        assert_eq!(c.body_or_none(), NO_BODY);
        assert_eq!(c.total, 4);
        assert_eq!(c.path_count(), 2);
        assert_eq!(c.query_count(), 2);
    }

    #[test]
    fn test_last_body_wins() {
        let params = vec![
            param(Some("body"), Some("first")),
            param(Some("body"), Some("second")),
        ];
        let c = classify_parameters(&params);
        assert_eq!(c.body.as_deref(), Some("second"));
        assert_eq!(c.total, 2);
    }

    #[test]
    fn test_missing_in_is_ignored() {
        let params = vec![
            param(None, Some("ghost")),
            RawParameter::default(),
            param(Some("path"), Some("id")),
        ];
        let c = classify_parameters(&params);
        assert_eq!(c.total, 1);
        assert_eq!(c.path, vec!["id"]);
    }

    #[test]
    fn test_header_counted_not_bucketed() {
        let params = vec![
            param(Some("header"), Some("X-Trace")),
            param(Some("formData"), Some("file")),
        ];
        let c = classify_parameters(&params);
        assert_eq!(c.total, 2);
        assert!(c.path.is_empty());
        assert!(c.query.is_empty());
        assert!(c.body.is_none());
    }

    #[test]
    fn test_unnamed_parameters_skipped() {
        let params = vec![param(Some("query"), None), param(Some("query"), Some("q"))];
        let c = classify_parameters(&params);
        assert_eq!(c.query, vec!["q"]);
        assert_eq!(c.unnamed, 1);
        assert_eq!(c.total, 2);
    }

    #[test]
    fn test_deserialize_ref_parameter() {
        let p: RawParameter =
            serde_json::from_str(r##"{ "$ref": "#/parameters/limit" }"##).unwrap();
        assert!(p.location().is_none());
        assert!(p.name.is_none());
    }
}
