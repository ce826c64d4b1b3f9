/// Image host client (unsigned uploads)
///
/// Photos are uploaded straight to the host with an unsigned preset; the
/// returned `secure_url` is what the album sheet stores. Thumbnails are
/// requested from the same host by URL transformation, see
/// `gallery::model::thumbnail_url`.
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use super::wire;
use crate::config::GalleryConfig;
use crate::error::GatewayError;

#[derive(Clone, Debug)]
pub struct ImageHost {
    client: reqwest::Client,
    upload_url: String,
    upload_preset: String,
}

impl ImageHost {
    pub fn new(config: &GalleryConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &GalleryConfig) -> Self {
        Self {
            client,
            upload_url: config.upload_url(),
            upload_preset: config.upload_preset.clone(),
        }
    }

    /// Upload one image; returns its public HTTPS URL
    pub async fn upload(&self, file_name: String, bytes: Vec<u8>) -> Result<String, GatewayError> {
        let size = bytes.len();
        debug!(file = %file_name, size, "uploading image");

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let url = wire::decode_upload(&response.text().await?)?;
        info!(url = %url, size, "image uploaded");
        Ok(url)
    }

    /// Fetch the bytes of an image (thumbnail or full size) for display
    pub async fn download(&self, url: String) -> Result<Vec<u8>, GatewayError> {
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
