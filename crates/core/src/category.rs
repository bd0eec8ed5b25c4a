use serde::{Deserialize, Serialize};

use crate::form::form_bool;

/// A top-level category as listed on `/categories/main`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_id: String,
    pub name: String,
}

/// Request body for creating a main category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// A subcategory nested under a main category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub telegram_url: String,
    #[serde(default)]
    pub is_premium: bool,
}

/// Full view of one category, including its subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub is_main_category: bool,
    #[serde(default)]
    pub parent_category_id: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

/// Text fields of the multipart form that creates a subcategory.
///
/// The image, if any, travels as a separate file part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubcategory {
    pub name: String,
    pub title: String,
    pub telegram_url: String,
    pub is_premium: bool,
    pub parent_category_id: String,
}

impl NewSubcategory {
    /// Multipart text fields in the order the backend documents them.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("title", self.title.clone()),
            ("telegramUrl", self.telegram_url.clone()),
            ("isPremium", form_bool(self.is_premium)),
            ("parentCategoryId", self.parent_category_id.clone()),
        ]
    }
}
