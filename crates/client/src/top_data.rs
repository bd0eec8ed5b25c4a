use vitrine_core::{TopData, TopDataInput, TopDataUpdate};

use crate::{Error, RequestOptions, VitrineClient, segment, to_json};

impl VitrineClient {
    /// Fetch the current top data snippet. `None` when none is configured.
    pub async fn top_data(&self) -> Result<Option<TopData>, Error> {
        self.call_optional("/admin/get-top-data", RequestOptions::get())
            .await
    }

    pub async fn create_top_data(&self, input: &TopDataInput) -> Result<Option<String>, Error> {
        self.call_ack(
            "/admin/create-top-data",
            RequestOptions::post().json(to_json(input)?),
        )
        .await
    }

    /// Overwrite the snippet identified by `id`.
    pub async fn update_top_data(
        &self,
        id: &str,
        input: &TopDataInput,
    ) -> Result<Option<String>, Error> {
        let body = to_json(&TopDataUpdate { input, id })?;
        self.call_ack("/admin/top-data", RequestOptions::post().json(body))
            .await
    }

    pub async fn delete_top_data(&self, id: &str) -> Result<Option<String>, Error> {
        let path = format!("/admin/delete-top-data/{}", segment(id));
        self.call_ack(&path, RequestOptions::delete()).await
    }
}
