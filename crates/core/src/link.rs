use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The external Telegram link advertised by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramLink {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTelegramLink {
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_link() {
        let json = r#"{"id":"l1","url":"https://t.me/x","createdAt":"2024-01-02T03:04:05Z"}"#;
        let link: TelegramLink = serde_json::from_str(json).unwrap();
        assert_eq!(link.url, "https://t.me/x");
        assert!(link.created_at.is_some());
        assert!(link.updated_at.is_none());
    }
}
