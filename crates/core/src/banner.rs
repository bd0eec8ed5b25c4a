use serde::{Deserialize, Serialize};

use crate::form::form_bool;

/// A stored image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub path: String,
    pub url: String,
}

/// Content of the home screen: the hero thumbnail plus premium banners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeData {
    #[serde(default)]
    pub thumbnail_url: Option<Thumbnail>,
    #[serde(default)]
    pub premium_banner_urls: Vec<Thumbnail>,
    #[serde(default)]
    pub searchable_url: String,
}

/// Text fields of the home thumbnail upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewThumbnail {
    /// Link opened when the thumbnail is clicked.
    pub url: String,
    pub searchable_url: String,
    pub is_active: bool,
}

impl NewThumbnail {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("url", self.url.clone()),
            ("searchableUrl", self.searchable_url.clone()),
            ("isActive", form_bool(self.is_active)),
        ]
    }
}

/// A promotional banner shown to premium users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumBanner {
    pub banner_id: String,
    pub image_url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub link_url: String,
}

/// Text fields of the premium banner upload. Unset fields are omitted.
///
/// The banner page sends `linkUrl`; the home screen sends the same link
/// as `url`. New banners are active unless `is_active` says otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPremiumBanner {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link_url: Option<String>,
    pub url: Option<String>,
    pub is_active: bool,
}

impl Default for NewPremiumBanner {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            link_url: None,
            url: None,
            is_active: true,
        }
    }
}

impl NewPremiumBanner {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let optional = [
            ("title", &self.title),
            ("description", &self.description),
            ("linkUrl", &self.link_url),
            ("url", &self.url),
        ];
        let mut fields: Vec<(&'static str, String)> = optional
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v.clone())))
            .collect();
        fields.push(("isActive", form_bool(self.is_active)));
        fields
    }
}
