use serde::{Deserialize, Serialize};

/// Schema URL identifying Postman Collection v2.1.0 documents.
pub const POSTMAN_SCHEMA_URL: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// A Postman v2.1.0 collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub info: CollectionInfo,
    pub item: Vec<CollectionItem>,
}

impl Collection {
    /// All request items, folders flattened, in output order.
    pub fn requests(&self) -> impl Iterator<Item = &RequestItem> {
        self.item.iter().flat_map(|item| match item {
            CollectionItem::Request(req) => std::slice::from_ref(req).iter(),
            CollectionItem::Folder(folder) => folder.item.iter(),
        })
    }

    pub fn folders(&self) -> impl Iterator<Item = &TagFolder> {
        self.item.iter().filter_map(|item| match item {
            CollectionItem::Folder(folder) => Some(folder),
            CollectionItem::Request(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    pub schema: String,
    pub description: String,
    pub version: String,
}

/// A root-level entry: either a request or a tag folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionItem {
    Request(RequestItem),
    Folder(TagFolder),
}

/// Requests sharing a single tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagFolder {
    pub name: String,
    pub item: Vec<RequestItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub request: Request,
    #[serde(default)]
    pub response: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub description: String,
    pub header: Vec<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RawBody>,
    pub url: RequestUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// A `raw` mode body carrying JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBody {
    pub mode: String,
    pub raw: String,
    pub options: BodyOptions,
}

impl RawBody {
    pub fn json(raw: String) -> Self {
        Self {
            mode: "raw".to_string(),
            raw,
            options: BodyOptions {
                raw: RawOptions {
                    language: "json".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyOptions {
    pub raw: RawOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOptions {
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUrl {
    pub raw: String,
    pub host: Vec<String>,
    pub path: Vec<String>,
    pub variable: Vec<PathVariable>,
    pub query: Vec<QueryParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathVariable {
    pub key: String,
    pub value: String,
}

/// Query parameters are emitted disabled; the user opts in per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    pub key: String,
    pub value: String,
    pub disabled: bool,
}
