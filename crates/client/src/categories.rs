use vitrine_core::{Category, CategoryDetails, NewCategory, NewSubcategory};

use crate::{Error, RequestOptions, Upload, VitrineClient, multipart_form, segment, to_json};

impl VitrineClient {
    /// List the main categories.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> Result<(), vitrine_client::Error> {
    /// use vitrine_client::VitrineClient;
    ///
    /// let client = VitrineClient::new("https://api.example.com")?;
    /// for category in client.list_main_categories().await? {
    ///     println!("{}: {}", category.category_id, category.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_main_categories(&self) -> Result<Vec<Category>, Error> {
        self.call("/categories/main", RequestOptions::get()).await
    }

    /// Create a main category and return it as stored.
    pub async fn create_main_category(&self, category: &NewCategory) -> Result<Category, Error> {
        self.call(
            "/categories/main",
            RequestOptions::post().json(to_json(category)?),
        )
        .await
    }

    /// Fetch a category together with its subcategories.
    pub async fn category_details(&self, category_id: &str) -> Result<CategoryDetails, Error> {
        let path = format!("/categories/{}", segment(category_id));
        self.call(&path, RequestOptions::get()).await
    }

    /// Create a subcategory, optionally with a cover image.
    ///
    /// Sent as multipart: the text fields of `subcategory` plus an `image`
    /// file part.
    pub async fn create_subcategory(
        &self,
        subcategory: &NewSubcategory,
        image: Option<Upload>,
    ) -> Result<Option<String>, Error> {
        let files = image.map(|upload| ("image", upload)).into_iter().collect();
        let form = multipart_form(subcategory.form_fields(), files)?;
        self.call_ack("/categories/sub", RequestOptions::post().multipart(form))
            .await
    }
}
