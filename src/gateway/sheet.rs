/// Client for the spreadsheet script API
///
/// Reads are `GET <endpoint>?action=...`, writes are `POST <endpoint>` with
/// a JSON body. The endpoint is a black box: no timeouts and no retries are
/// applied here, a failed call is reported and the user retries by hand.
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use tracing::{debug, warn};

use super::wire;
use super::WriteAck;
use crate::error::GatewayError;
use crate::gallery::model::Photo;
use crate::recipes::model::{Recipe, RecipeDraft};

/// Content type used for recipe writes. Plain text keeps the request
/// "simple" for the script host, which rejects JSON preflights.
const PLAIN_TEXT: &str = "text/plain;charset=utf-8";
const JSON: &str = "application/json";

#[derive(Clone, Debug)]
pub struct SheetClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SheetClient {
    /// Create a client for one script deployment
    pub fn new(endpoint: &str) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Reuse an existing connection pool
    pub fn with_client(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim().to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `GET ?action=getRecipes`
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, GatewayError> {
        let body = self.get(&[("action", "getRecipes")]).await?;
        let recipes = wire::decode_recipes(&body)?;
        debug!(count = recipes.len(), "listed recipes");
        Ok(recipes)
    }

    /// `GET ?action=validatePassword&password=...`
    ///
    /// No session is issued; every privileged action checks again.
    pub async fn validate_password(&self, candidate: &str) -> Result<bool, GatewayError> {
        let body = self
            .get(&[("action", "validatePassword"), ("password", candidate)])
            .await?;
        let valid = wire::decode_password_check(&body)?;
        debug!(valid, "password checked");
        Ok(valid)
    }

    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<WriteAck, GatewayError> {
        debug!(name = %draft.name, "creating recipe");
        self.post(wire::create_recipe_body(draft)?, PLAIN_TEXT).await
    }

    /// Full replace of the recipe with `id`
    pub async fn update_recipe(&self, id: &str, draft: &RecipeDraft) -> Result<WriteAck, GatewayError> {
        debug!(id, name = %draft.name, "updating recipe");
        self.post(wire::update_recipe_body(id, draft)?, PLAIN_TEXT).await
    }

    pub async fn delete_recipe(&self, id: &str) -> Result<WriteAck, GatewayError> {
        debug!(id, "deleting recipe");
        self.post(wire::delete_recipe_body(id)?, PLAIN_TEXT).await
    }

    /// `GET ?action=get`, in server order (oldest first)
    pub async fn list_photos(&self) -> Result<Vec<Photo>, GatewayError> {
        let body = self.get(&[("action", "get")]).await?;
        let photos = wire::decode_photos(&body)?;
        debug!(count = photos.len(), "listed photos");
        Ok(photos)
    }

    /// Append an uploaded photo URL to the album sheet
    pub async fn add_photo(&self, url: &str) -> Result<WriteAck, GatewayError> {
        debug!(url, "recording photo");
        self.post(wire::add_photo_body(url)?, JSON).await
    }

    /// Build a read URL with properly encoded query parameters
    pub fn read_url(&self, params: &[(&str, &str)]) -> Result<Url, GatewayError> {
        Url::parse_with_params(&self.endpoint, params)
            .map_err(|e| GatewayError::Protocol(format!("invalid endpoint {}: {}", self.endpoint, e)))
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<String, GatewayError> {
        let url = self.read_url(params)?;
        let action = params.first().map(|(_, v)| *v).unwrap_or_default();
        debug!(action, "GET script endpoint");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }

    async fn post(&self, body: String, content_type: &str) -> Result<WriteAck, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }

        let ack = match response.text().await {
            Ok(text) => wire::decode_write_ack(&text)?,
            Err(err) => {
                warn!(error = %err, "write response unreadable");
                WriteAck::Unconfirmed
            }
        };

        if ack == WriteAck::Unconfirmed {
            warn!("write sent but not confirmed; relying on the next listing");
        }

        Ok(ack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_url_encodes_password() {
        let client = SheetClient::new(" https://script.example.com/macros/s/abc/exec ");
        let url = client
            .read_url(&[("action", "validatePassword"), ("password", "pan & sal?")])
            .unwrap();

        assert_eq!(client.endpoint(), "https://script.example.com/macros/s/abc/exec");
        assert_eq!(
            url.as_str(),
            "https://script.example.com/macros/s/abc/exec?action=validatePassword&password=pan+%26+sal%3F"
        );
    }

    #[test]
    fn test_invalid_endpoint_is_protocol_error() {
        let client = SheetClient::new("not a url");
        let err = client.read_url(&[("action", "get")]).unwrap_err();
        assert!(matches!(err, GatewayError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 9 on localhost (discard) is closed on test machines
        let client = SheetClient::new("http://127.0.0.1:9/exec");
        let err = client.list_recipes().await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }
}
