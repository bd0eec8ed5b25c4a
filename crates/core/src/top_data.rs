use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The "top data" text snippet shown above the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopData {
    #[serde(rename = "_id")]
    pub id: String,
    pub textdata: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Editable fields of a top data snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopDataInput {
    pub title: String,
    pub description: String,
    pub textdata: String,
    pub order: i64,
    pub is_active: bool,
}

impl Default for TopDataInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            textdata: String::new(),
            order: 1,
            is_active: true,
        }
    }
}

/// Update body: the editable fields plus the `_id` of the snippet.
#[derive(Debug, Clone, Serialize)]
pub struct TopDataUpdate<'a> {
    #[serde(flatten)]
    pub input: &'a TopDataInput,
    #[serde(rename = "_id")]
    pub id: &'a str,
}
