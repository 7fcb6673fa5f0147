pub mod collection;
pub mod environment;
pub mod name_normalizer;
pub mod request;
pub mod summary;

use chrono::{DateTime, Utc};
use log::info;

use crate::config::NamingStrategy;
use crate::error::TransformError;
use crate::parse::spec::SpecDocument;
use crate::parse::version::SpecVersion;
use crate::postman::{Collection, Environment};
use collection::{CollectionAssembler, collection_info};
use environment::{ConnectionVariables, DEFAULT_EXPORTED_USING, EnvironmentBuilder};
use request::RequestRecordBuilder;
use summary::{SummaryScope, SummaryTable, build_summary};

/// Options for one transformation run.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub project_name: String,
    pub naming_strategy: NamingStrategy,
    /// Where the document was fetched from; OpenAPI 3 takes `host` from it.
    pub source_url: Option<String>,
    pub host_override: Option<String>,
    pub exported_using: String,
    /// Defaults to the current time.
    pub exported_at: Option<DateTime<Utc>>,
    pub summary_scope: SummaryScope,
}

impl TransformOptions {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            naming_strategy: NamingStrategy::default(),
            source_url: None,
            host_override: None,
            exported_using: DEFAULT_EXPORTED_USING.to_string(),
            exported_at: None,
            summary_scope: SummaryScope::default(),
        }
    }
}

/// Everything derived from one document.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub version: SpecVersion,
    pub summary: SummaryTable,
    pub environment: Environment,
    pub collection: Collection,
}

/// Transform a parsed document with default options.
pub fn transform(doc: &SpecDocument, project_name: &str) -> Result<Artifacts, TransformError> {
    transform_with_options(doc, &TransformOptions::new(project_name))
}

/// Transform with explicit options.
pub fn transform_with_options(
    doc: &SpecDocument,
    options: &TransformOptions,
) -> Result<Artifacts, TransformError> {
    let summary = summarize(doc, options);
    let environment = build_environment(doc, options);
    let collection = build_collection(doc, options)?;
    Ok(Artifacts {
        version: doc.version,
        summary,
        environment,
        collection,
    })
}

/// The tabular summary alone. Never fails.
pub fn summarize(doc: &SpecDocument, options: &TransformOptions) -> SummaryTable {
    let table = build_summary(doc, options.naming_strategy, options.summary_scope);
    info!("summarized {} path(s) into {} row(s)", doc.paths.len(), table.rows.len());
    table
}

/// The environment alone: the connection variables followed by every path
/// and query parameter name, first-seen order. Never fails.
pub fn build_environment(doc: &SpecDocument, options: &TransformOptions) -> Environment {
    let connection = ConnectionVariables::from_document(
        doc,
        options.source_url.as_deref(),
        options.host_override.as_deref(),
    );
    let mut env = EnvironmentBuilder::seeded(&connection);
    for (_, op) in doc.operations() {
        env.register_operation(&op.operation);
    }

    let environment = env.finalize(
        &options.project_name,
        options.exported_at.unwrap_or_else(Utc::now),
        &options.exported_using,
    );
    info!(
        "built environment `{}` with {} variable(s)",
        environment.name,
        environment.values.len()
    );
    environment
}

/// The collection, built in one pass over every (path, method) pair in
/// document order. Fails on the first request body that cannot be resolved.
pub fn build_collection(
    doc: &SpecDocument,
    options: &TransformOptions,
) -> Result<Collection, TransformError> {
    if doc.version == SpecVersion::Unsupported {
        return Err(TransformError::Other(
            "cannot build a collection from an unsupported document".to_string(),
        ));
    }

    let builder = RequestRecordBuilder::new(doc, options.naming_strategy);
    let mut assembler = CollectionAssembler::new();
    for (path, op) in doc.operations() {
        assembler.push(builder.build(path, op)?);
    }

    let collection = assembler.finalize(collection_info(&options.project_name, &doc.info));
    info!(
        "built collection `{}` with {} request(s)",
        options.project_name,
        collection.requests().count()
    );
    Ok(collection)
}
