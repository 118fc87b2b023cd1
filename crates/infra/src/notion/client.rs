//! Thin Notion API client: bearer auth, the pinned API version header and
//! error-body decoding. One method per HTTP verb the adapters need.

use reqwest::Method;
use scholarsync_domain::constants::NOTION_VERSION;
use scholarsync_domain::{NotionConfig, Result};
use serde_json::Value;

use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

const SERVICE: &str = "notion";

#[derive(Clone)]
pub struct NotionClient {
    http: HttpClient,
    base_url: String,
    token: String,
}

impl NotionClient {
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let http = HttpClient::builder().build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    pub async fn get_json(&self, path: &str) -> Result<Value> {
        self.execute(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.execute(Method::POST, path, Some(body)).await
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.execute(Method::PATCH, path, Some(body)).await
    }

    /// Query one page of a database.
    pub async fn query_database(&self, database_id: &str, body: &Value) -> Result<Value> {
        self.post_json(&format!("databases/{database_id}/query"), body).await
    }

    async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(SERVICE, status, &text));
        }

        let decoded =
            response.json::<Value>().await.map_err(|err| InfraError::from(err).0)?;
        Ok(decoded)
    }
}
