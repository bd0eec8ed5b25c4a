use vitrine_core::{HomeData, NewPremiumBanner, NewThumbnail, PremiumBanner};

use crate::{Error, RequestOptions, Upload, VitrineClient, multipart_form};

impl VitrineClient {
    /// Fetch the home screen content.
    pub async fn home_data(&self) -> Result<HomeData, Error> {
        self.call("/home", RequestOptions::get()).await
    }

    /// Replace the home thumbnail. The image travels as the `thumbnail`
    /// file part.
    pub async fn upload_home_thumbnail(
        &self,
        thumbnail: &NewThumbnail,
        image: Upload,
    ) -> Result<Option<String>, Error> {
        let form = multipart_form(thumbnail.form_fields(), vec![("thumbnail", image)])?;
        self.call_ack("/home/thumbnail", RequestOptions::post().multipart(form))
            .await
    }

    /// List premium banners.
    pub async fn list_premium_banners(&self) -> Result<Vec<PremiumBanner>, Error> {
        self.call("/banners/premium", RequestOptions::get()).await
    }

    /// Upload a new premium banner. The image travels as the `image` file
    /// part.
    pub async fn create_premium_banner(
        &self,
        banner: &NewPremiumBanner,
        image: Upload,
    ) -> Result<Option<String>, Error> {
        let form = multipart_form(banner.form_fields(), vec![("image", image)])?;
        self.call_ack("/banners/premium", RequestOptions::post().multipart(form))
            .await
    }
}
