use serde::{Deserialize, Serialize};

/// A Postman environment export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub values: Vec<EnvironmentVariable>,
    #[serde(rename = "_postman_variable_scope")]
    pub variable_scope: String,
    #[serde(rename = "_postman_exported_at")]
    pub exported_at: String,
    #[serde(rename = "_postman_exported_using")]
    pub exported_using: String,
}

impl Environment {
    pub fn get(&self, key: &str) -> Option<&EnvironmentVariable> {
        self.values.iter().find(|v| v.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.key.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub key: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub enabled: bool,
}
