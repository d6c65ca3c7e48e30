pub mod auth;
pub mod categories;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, CategoryPage, CategoryPayload};

pub use auth::{AuthClient, LoginCredentials};
pub use categories::CategoryClient;

/// Backend operations the list and form controllers depend on.
#[async_trait]
pub trait CategoryApi: Send + Sync {
    async fn list(&self, page_number: usize, page_size: usize) -> ClientResult<CategoryPage>;

    /// Creates when `payload.id` is `None`, updates otherwise.
    async fn create_or_update(&self, payload: &CategoryPayload) -> ClientResult<Category>;
}

/// Where each backend operation lives, relative to the proxy prefix.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub base_url: String,
    pub login_path: String,
    pub list_path: String,
    pub save_path: String,
}

impl Endpoints {
    pub fn from_config(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            login_path: api.login_path.clone(),
            list_path: api.list_path.clone(),
            save_path: api.save_path.clone(),
        }
    }

    /// Default paths under a different base, e.g. a test server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut endpoints = Self::from_config(&crate::config::config().api);
        endpoints.base_url = base_url.into();
        endpoints
    }

    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map a non-2xx response to a failure, preferring the backend's `message`.
pub(crate) fn failure_from_response(status: StatusCode, body: &str, fallback: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty());

    tracing::warn!(status = status.as_u16(), "Backend call failed: {}", message.as_deref().unwrap_or(fallback));

    if status == StatusCode::UNAUTHORIZED {
        return ClientError::authentication(
            message.unwrap_or_else(|| "Session expired or invalid; please log in again".to_string()),
        );
    }
    ClientError::request_failed(status.as_u16(), message.unwrap_or_else(|| fallback.to_string()))
}

/// Look a category up by id, walking server pages of `page_size` until it
/// turns up or the pages run out.
pub async fn find_category(api: &dyn CategoryApi, id: &str, page_size: usize) -> ClientResult<Option<Category>> {
    let mut page_number = 1;
    loop {
        let page = api.list(page_number, page_size).await?;
        let exhausted = page.records.is_empty() || page_number >= page.total_pages;
        if let Some(found) = page.records.into_iter().find(|c| c.id == id) {
            return Ok(Some(found));
        }
        if exhausted {
            tracing::debug!(id, pages = page_number, "Category not found");
            return Ok(None);
        }
        page_number += 1;
    }
}

pub(crate) fn http_client(timeout_secs: u64) -> ClientResult<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?)
}
