use vitrine_core::{NewTelegramLink, TelegramLink};

use crate::{Error, RequestOptions, VitrineClient, segment, to_json};

impl VitrineClient {
    /// Fetch the configured Telegram link, if any.
    pub async fn telegram_link(&self) -> Result<Option<TelegramLink>, Error> {
        self.call_optional("/telegram-links/get", RequestOptions::get())
            .await
    }

    pub async fn create_telegram_link(&self, url: &str) -> Result<Option<String>, Error> {
        let body = to_json(&NewTelegramLink {
            url: url.to_owned(),
        })?;
        self.call_ack("/telegram-links/create", RequestOptions::post().json(body))
            .await
    }

    pub async fn delete_telegram_link(&self, id: &str) -> Result<Option<String>, Error> {
        let path = format!("/telegram-links/delete/{}", segment(id));
        self.call_ack(&path, RequestOptions::delete()).await
    }
}
