//! HTTP implementation of `GroceryApi` on top of `reqwest` (browser fetch on wasm32).

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, GroceryApi};
use crate::config::AppConfig;
use crate::models::{CreateGroceryBody, GroceryItem, GroceryUpdate, NewGroceryItem};

/// Unreserved URL characters stay as-is in item ids
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

#[derive(Debug, Clone)]
pub struct HttpGroceryApi {
    client: Client,
    endpoint: String,
}

impl HttpGroceryApi {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            endpoint: config.groceries_url(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// `{endpoint}/{id}` with the id percent-encoded
    pub fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.endpoint, utf8_percent_encode(id, ID_ENCODE_SET))
    }

    async fn send(method: &'static str, url: &str, request: RequestBuilder) -> ApiResult<reqwest::Response> {
        tracing::debug!(method, url, "request");
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(method, url, e))?;
        response
            .error_for_status()
            .map_err(|e| ApiError::from_reqwest(method, url, e))
    }

    async fn send_json<T: DeserializeOwned>(method: &'static str, url: &str, request: RequestBuilder) -> ApiResult<T> {
        let response = Self::send(method, url, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode { method, url: url.to_string(), message: e.to_string() })
    }
}

#[async_trait(?Send)]
impl GroceryApi for HttpGroceryApi {
    async fn get_all(&self) -> ApiResult<Vec<GroceryItem>> {
        Self::send_json("GET", &self.endpoint, self.client.get(&self.endpoint)).await
    }

    async fn add(&self, item: &NewGroceryItem) -> ApiResult<GroceryItem> {
        let body = CreateGroceryBody::from(item);
        Self::send_json("POST", &self.endpoint, self.client.post(&self.endpoint).json(&body)).await
    }

    async fn update(&self, id: &str, update: &GroceryUpdate) -> ApiResult<GroceryItem> {
        let url = self.item_url(id);
        Self::send_json("PATCH", &url, self.client.patch(&url).json(update)).await
    }

    async fn delete(&self, id: &str) -> ApiResult<()> {
        let url = self.item_url(id);
        Self::send("DELETE", &url, self.client.delete(&url)).await?;
        Ok(())
    }
}
