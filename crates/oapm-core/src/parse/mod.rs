pub mod parameter;
pub mod ref_resolve;
pub mod spec;
pub mod version;

use serde_json::Value;

use crate::error::ParseError;
use spec::SpecDocument;

/// Parse an API description from YAML.
pub fn from_yaml(input: &str) -> Result<SpecDocument, ParseError> {
    let mut raw: Value = serde_yaml_ng::from_str(input)?;
    version::normalize_yaml_markers(&mut raw);
    SpecDocument::from_value(raw)
}

/// Parse an API description from JSON.
pub fn from_json(input: &str) -> Result<SpecDocument, ParseError> {
    let raw: Value = serde_json::from_str(input)?;
    SpecDocument::from_value(raw)
}

/// Parse by sniffing the content: a leading `{` means JSON, anything else
/// is read as YAML.
pub fn from_str_auto(input: &str) -> Result<SpecDocument, ParseError> {
    if input.trim_start().starts_with('{') {
        from_json(input)
    } else {
        from_yaml(input)
    }
}
