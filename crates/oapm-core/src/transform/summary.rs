use log::warn;
use serde::Serialize;

use super::request::operation_name;
use crate::config::NamingStrategy;
use crate::error::{MalformedOperation, RenderError};
use crate::parse::parameter::classify_parameters;
use crate::parse::spec::{PathOperation, SpecDocument};

/// Column headers of the summary table.
pub const SUMMARY_HEADER: [&str; 9] = [
    "URL",
    "Name",
    "Method",
    "Parameters",
    "Body",
    "Path parameters",
    "Paths",
    "Query parameters",
    "Querys",
];

/// Which operations get a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummaryScope {
    /// Only the first declared method of each path.
    #[default]
    FirstMethod,
    /// Every (path, method) pair.
    AllMethods,
}

/// One row of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub url: String,
    pub name: String,
    pub method: String,
    pub parameter_count: usize,
    pub body: String,
    pub path_parameters: Vec<String>,
    pub path_count: usize,
    pub query_parameters: Vec<String>,
    pub query_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Render as CSV with a header line. List cells are JSON arrays.
    pub fn to_csv(&self) -> Result<String, RenderError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(SUMMARY_HEADER)?;
        for row in &self.rows {
            writer.write_record([
                row.url.clone(),
                row.name.clone(),
                row.method.clone(),
                row.parameter_count.to_string(),
                row.body.clone(),
                serde_json::to_string(&row.path_parameters)?,
                row.path_count.to_string(),
                serde_json::to_string(&row.query_parameters)?,
                row.query_count.to_string(),
            ])?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Build the flat per-operation summary.
pub fn build_summary(
    doc: &SpecDocument,
    naming: NamingStrategy,
    scope: SummaryScope,
) -> SummaryTable {
    let mut rows = Vec::new();
    for (path, operations) in &doc.paths {
        let selected: &[PathOperation] = match scope {
            SummaryScope::FirstMethod => operations.get(..1).unwrap_or_default(),
            SummaryScope::AllMethods => operations,
        };
        for op in selected {
            rows.push(summary_row(doc, naming, path, op));
        }
    }
    SummaryTable { rows }
}

fn summary_row(
    doc: &SpecDocument,
    naming: NamingStrategy,
    path: &str,
    op: &PathOperation,
) -> SummaryRow {
    let classified = classify_parameters(&op.operation.parameters);
    if classified.unnamed > 0 {
        warn!(
            "{}",
            MalformedOperation {
                path: path.to_string(),
                method: op.method.as_str().to_string(),
                reason: format!("{} parameter(s) without a name", classified.unnamed),
            }
        );
    }

    SummaryRow {
        url: path.to_string(),
        name: operation_name(doc.version, naming, path, op),
        method: op.method.as_str().to_string(),
        parameter_count: classified.total,
        body: classified.body_or_none().to_string(),
        path_count: classified.path_count(),
        query_count: classified.query_count(),
        path_parameters: classified.path,
        query_parameters: classified.query,
    }
}
