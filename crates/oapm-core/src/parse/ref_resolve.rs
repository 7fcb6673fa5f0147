use serde_json::{Map, Value};

use super::version::SpecVersion;
use crate::error::ResolveError;

/// Deepest nesting the `$ref` search descends into before giving up.
pub const MAX_REF_SEARCH_DEPTH: usize = 64;

/// Find the first `$ref` in a subtree.
///
/// Entries are visited in document order; a nested object or array is
/// searched completely before the next sibling entry is looked at, so a
/// `$ref` key only wins over a nested one if it comes first. Returns
/// `Ok(None)` when the subtree has no `$ref` at all.
pub fn locate_ref(tree: &Value) -> Result<Option<&str>, ResolveError> {
    locate_ref_at(tree, 0, "#")
}

fn locate_ref_at<'a>(
    node: &'a Value,
    depth: usize,
    trail: &str,
) -> Result<Option<&'a str>, ResolveError> {
    if depth > MAX_REF_SEARCH_DEPTH {
        return Err(ResolveError::DepthExceeded {
            pointer: trail.to_string(),
            limit: MAX_REF_SEARCH_DEPTH,
        });
    }

    match node {
        Value::Object(map) => {
            for (key, value) in map {
                if value.is_object() || value.is_array() {
                    let child = format!("{trail}/{key}");
                    if let Some(found) = locate_ref_at(value, depth + 1, &child)? {
                        return Ok(Some(found));
                    }
                } else if key == "$ref" {
                    return match value.as_str() {
                        Some(pointer) => Ok(Some(pointer)),
                        None => Err(ResolveError::InvalidRefFormat(format!(
                            "{trail}/$ref is not a string"
                        ))),
                    };
                }
            }
            Ok(None)
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let child = format!("{trail}/{i}");
                if let Some(found) = locate_ref_at(item, depth + 1, &child)? {
                    return Ok(Some(found));
                }
            }
            Ok(None)
        }
        _ => Ok(None),
    }
}

/// A `$ref` pointer split into the parts the resolver uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPointer {
    /// First segment after the root, e.g. `components` or `definitions`.
    pub section: String,
    /// Last segment, the schema name.
    pub name: String,
}

impl RefPointer {
    /// Parse `#/<section>/.../<name>`. Anything before `#` is discarded;
    /// JSON-pointer escapes (`~1`, `~0`) are decoded.
    pub fn parse(raw: &str) -> Result<Self, ResolveError> {
        let invalid = || ResolveError::InvalidRefFormat(raw.to_string());

        let (_, fragment) = raw.split_once('#').ok_or_else(invalid)?;
        let fragment = fragment.strip_prefix('/').ok_or_else(invalid)?;
        let segments: Vec<&str> = fragment.split('/').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return Err(invalid());
        }

        Ok(Self {
            section: unescape(segments[0]),
            name: unescape(segments[segments.len() - 1]),
        })
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Resolves `$ref` pointers against the document they came from.
///
/// Only the referenced schema's own `properties` map is returned; nested
/// references inside it are left as they are, so cyclic schemas cannot
/// send the resolver into a loop.
pub struct RefResolver<'a> {
    root: &'a Value,
    version: SpecVersion,
}

impl<'a> RefResolver<'a> {
    pub fn new(root: &'a Value, version: SpecVersion) -> Self {
        Self { root, version }
    }

    /// Look up the `properties` map of the schema a pointer names.
    ///
    /// OpenAPI 3: `root[section].schemas[name].properties`.
    /// Swagger 2: `root[section][name].properties`.
    pub fn resolve_properties(&self, pointer: &str) -> Result<&'a Map<String, Value>, ResolveError> {
        let parsed = RefPointer::parse(pointer)?;
        let not_found = || ResolveError::RefTargetNotFound(pointer.to_string());

        let section = self.root.get(&parsed.section).ok_or_else(not_found)?;
        let container = match self.version {
            SpecVersion::OpenApi3 => section.get("schemas").ok_or_else(not_found)?,
            SpecVersion::Swagger2 | SpecVersion::Unsupported => section,
        };

        container
            .get(&parsed.name)
            .and_then(|schema| schema.get("properties"))
            .and_then(Value::as_object)
            .ok_or_else(not_found)
    }

    /// Locate the first `$ref` in `tree` and resolve it.
    pub fn resolve_first(
        &self,
        tree: &Value,
    ) -> Result<Option<&'a Map<String, Value>>, ResolveError> {
        match locate_ref(tree)? {
            Some(pointer) => self.resolve_properties(pointer).map(Some),
            None => Ok(None),
        }
    }
}
