use indexmap::IndexMap;
use log::debug;

use super::request::RequestRecord;
use crate::parse::spec::Info;
use crate::postman::{
    Collection, CollectionInfo, CollectionItem, POSTMAN_SCHEMA_URL, RequestItem, TagFolder,
};

/// Groups request records into a two-level tree.
///
/// A record with exactly one tag goes into that tag's folder; anything else
/// stays at the root. Folders follow all root-level requests, in the order
/// their tag was first seen.
#[derive(Debug, Default)]
pub struct CollectionAssembler {
    root: Vec<CollectionItem>,
    folders: IndexMap<String, Vec<RequestItem>>,
}

impl CollectionAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RequestRecord) {
        match record.tags.as_slice() {
            [tag] => {
                debug!("placing `{}` in folder `{tag}`", record.item.name);
                self.folders
                    .entry(tag.clone())
                    .or_default()
                    .push(record.item);
            }
            _ => {
                debug!("placing `{}` at the collection root", record.item.name);
                self.root.push(CollectionItem::Request(record.item));
            }
        }
    }

    pub fn finalize(self, info: CollectionInfo) -> Collection {
        let mut item = self.root;
        item.extend(
            self.folders
                .into_iter()
                .map(|(name, item)| CollectionItem::Folder(TagFolder { name, item })),
        );
        Collection { info, item }
    }
}

/// Collection metadata: the description carries the API version after it.
pub fn collection_info(project_name: &str, info: &Info) -> CollectionInfo {
    let version = info.version.clone().unwrap_or_default();
    let description = info.description.as_deref().unwrap_or_default();
    CollectionInfo {
        name: project_name.to_string(),
        schema: POSTMAN_SCHEMA_URL.to_string(),
        description: format!("{description} Version:{version}"),
        version,
    }
}
