use log::{debug, warn};
use serde_json::{Map, Value};

use super::name_normalizer::{route_to_name, to_colon_path};
use crate::config::NamingStrategy;
use crate::error::{MalformedOperation, ResolveError, TransformError};
use crate::parse::parameter::{ParameterLocation, RawParameter};
use crate::parse::ref_resolve::RefResolver;
use crate::parse::spec::{PathOperation, RawOperation, SpecDocument};
use crate::parse::version::SpecVersion;
use crate::postman::{
    Header, PathVariable, QueryParam, RawBody, Request, RequestItem, RequestUrl,
};

/// Every request URL is rooted at the three connection variables.
pub const BASE_URL_TEMPLATE: &str = "{{protocol}}://{{host}}{{base_url}}";

/// A request item together with the tags that decide where it is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub tags: Vec<String>,
    pub item: RequestItem,
}

/// Resolve the display name of an operation.
pub fn operation_name(
    version: SpecVersion,
    strategy: NamingStrategy,
    path: &str,
    op: &PathOperation,
) -> String {
    let route_name = || route_to_name(op.method.as_str(), path);
    match strategy {
        NamingStrategy::UseOperationId => op
            .operation
            .display_name(version)
            .map(str::to_string)
            .unwrap_or_else(route_name),
        NamingStrategy::UseRouteBased => route_name(),
    }
}

/// Builds one self-contained request record per (path, method).
pub struct RequestRecordBuilder<'a> {
    version: SpecVersion,
    resolver: RefResolver<'a>,
    naming: NamingStrategy,
}

impl<'a> RequestRecordBuilder<'a> {
    pub fn new(doc: &'a SpecDocument, naming: NamingStrategy) -> Self {
        Self {
            version: doc.version,
            resolver: RefResolver::new(doc.raw(), doc.version),
            naming,
        }
    }

    /// Build the record. Fails only when a required request body has no
    /// schema that resolves to a `properties` map.
    pub fn build(&self, path: &str, op: &PathOperation) -> Result<RequestRecord, TransformError> {
        let name = operation_name(self.version, self.naming, path, op);
        let operation = &op.operation;

        let body_properties = self.body_properties(operation).map_err(|source| {
            TransformError::Resolve {
                operation: format!("{} {}", op.method.as_upper(), path),
                source,
            }
        })?;
        let body = match body_properties {
            Some(props) => Some(RawBody::json(serde_json::to_string_pretty(props)?)),
            None => None,
        };

        let mut variables = Vec::new();
        let mut query = Vec::new();
        for param in &operation.parameters {
            let Some(location) = param.location() else {
                continue;
            };
            if !matches!(location, ParameterLocation::Path | ParameterLocation::Query) {
                continue;
            }
            let Some(param_name) = param.name.as_deref() else {
                warn!(
                    "{}",
                    MalformedOperation {
                        path: path.to_string(),
                        method: op.method.as_str().to_string(),
                        reason: format!("{location:?} parameter without a name was skipped"),
                    }
                );
                continue;
            };

            let value = format!("{{{{{param_name}}}}}");
            if location == ParameterLocation::Path {
                variables.push(PathVariable {
                    key: param_name.to_string(),
                    value,
                });
            } else {
                query.push(QueryParam {
                    key: param_name.to_string(),
                    value,
                    disabled: true,
                });
            }
        }

        let colon_path = to_colon_path(path);
        let url = RequestUrl {
            raw: format!("{BASE_URL_TEMPLATE}{colon_path}"),
            host: BASE_URL_TEMPLATE.split('.').map(str::to_string).collect(),
            path: colon_path.split('/').skip(1).map(str::to_string).collect(),
            variable: variables,
            query,
        };

        debug!(
            "built request `{name}` ({} {path}, body: {})",
            op.method.as_upper(),
            body.is_some()
        );

        Ok(RequestRecord {
            tags: operation.tags.clone(),
            item: RequestItem {
                name,
                request: Request {
                    method: op.method.as_str().to_string(),
                    description: operation.description.clone().unwrap_or_default(),
                    header: vec![Header {
                        key: "accept".to_string(),
                        value: "*/*".to_string(),
                    }],
                    body,
                    url,
                },
                response: Vec::new(),
            },
        })
    }

    /// Properties of the required request body, if the operation has one.
    ///
    /// OpenAPI 3 reads a required `requestBody`; Swagger 2 reads required
    /// `in: body` parameters, the last one winning. A required body must
    /// carry a `$ref` or an inline `properties` map.
    fn body_properties<'o>(
        &self,
        operation: &'o RawOperation,
    ) -> Result<Option<&'o Map<String, Value>>, ResolveError>
    where
        'a: 'o,
    {
        let mut properties: Option<&'o Map<String, Value>> = None;

        if self.version == SpecVersion::OpenApi3 {
            let required_body = operation
                .request_body
                .as_ref()
                .filter(|body| body.get("required").and_then(Value::as_bool) == Some(true));
            if let Some(body) = required_body {
                let no_schema = || ResolveError::RefNotFound("requestBody".to_string());
                let content = body.get("content").ok_or_else(no_schema)?;
                properties = Some(match self.resolver.resolve_first(content)? {
                    Some(props) => props,
                    None => inline_content_properties(content).ok_or_else(no_schema)?,
                });
            }
        }

        if self.version == SpecVersion::Swagger2 {
            for param in &operation.parameters {
                if param.location() != Some(ParameterLocation::Body) || !param.required {
                    continue;
                }
                properties = Some(self.parameter_body_properties(param)?);
            }
        }

        Ok(properties)
    }

    fn parameter_body_properties<'p>(
        &self,
        param: &'p RawParameter,
    ) -> Result<&'p Map<String, Value>, ResolveError>
    where
        'a: 'p,
    {
        let no_schema = || {
            ResolveError::RefNotFound(format!(
                "body parameter `{}`",
                param.name.as_deref().unwrap_or("<unnamed>")
            ))
        };
        let schema = param.schema.as_ref().ok_or_else(no_schema)?;
        match self.resolver.resolve_first(schema)? {
            Some(props) => Ok(props),
            None => schema
                .get("properties")
                .and_then(Value::as_object)
                .ok_or_else(no_schema),
        }
    }
}

/// `properties` of the first inline schema under a `content` map.
fn inline_content_properties(content: &Value) -> Option<&Map<String, Value>> {
    content
        .as_object()?
        .values()
        .find_map(|media| media.get("schema")?.get("properties")?.as_object())
}
