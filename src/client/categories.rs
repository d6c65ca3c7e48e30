use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::{failure_from_response, http_client, CategoryApi, Endpoints};
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, CategoryPage, CategoryPayload, ListEnvelope};
use crate::session::{require_session, SharedSession};

/// Multipart part name carrying the icon bytes.
pub const ICON_PART: &str = "imageFile";

/// Authenticated HTTP client for the category endpoints.
#[derive(Clone)]
pub struct CategoryClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    session: SharedSession,
}

impl CategoryClient {
    pub fn new(endpoints: Endpoints, session: SharedSession) -> ClientResult<Self> {
        let http = http_client(crate::config::config().api.request_timeout_secs)?;
        Ok(Self::with_http(http, endpoints, session))
    }

    pub fn with_http(http: reqwest::Client, endpoints: Endpoints, session: SharedSession) -> Self {
        Self {
            http,
            endpoints,
            session,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Save responses arrive either bare or wrapped in `{ "data": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SaveResponse {
    Wrapped { data: Category },
    Bare(Category),
}

impl SaveResponse {
    fn into_category(self) -> Category {
        match self {
            SaveResponse::Wrapped { data } => data,
            SaveResponse::Bare(category) => category,
        }
    }
}

/// Multipart body for a save. Without a new image a zero-length icon part
/// is sent, meaning "keep the current icon".
pub fn build_form(payload: &CategoryPayload) -> ClientResult<Form> {
    let mut form = Form::new()
        .text("name", payload.name.clone())
        .text("description", payload.description.clone());

    if let Some(color) = &payload.color {
        form = form.text("color", color.clone());
    }
    if let Some(status) = payload.status {
        form = form.text("status", status.as_u8().to_string());
    }
    if let Some(id) = &payload.id {
        form = form.text("id", id.clone());
    }

    let icon = match &payload.image {
        Some(image) => Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.media_type)?,
        None => Part::bytes(Vec::new())
            .file_name("")
            .mime_str("application/octet-stream")?,
    };
    Ok(form.part(ICON_PART, icon))
}

#[async_trait]
impl CategoryApi for CategoryClient {
    async fn list(&self, page_number: usize, page_size: usize) -> ClientResult<CategoryPage> {
        let token = require_session(self.session.as_ref())?;

        let mut url = self.endpoints.url(&self.endpoints.list_path)?;
        url.query_pairs_mut()
            .append_pair("pageNumber", &page_number.to_string())
            .append_pair("pageSize", &page_size.to_string());

        debug!(page_number, page_size, "GET {}", url.path());
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(failure_from_response(status, &body, "Failed to load categories"));
        }

        let envelope: ListEnvelope =
            serde_json::from_str(&body).map_err(|e| ClientError::decode(e.to_string()))?;
        debug!(
            records = envelope.data.records.len(),
            total = envelope.data.total_elements,
            "Loaded category page"
        );
        Ok(envelope.data)
    }

    async fn create_or_update(&self, payload: &CategoryPayload) -> ClientResult<Category> {
        let token = require_session(self.session.as_ref())?;
        let (verb, fallback) = if payload.is_update() {
            ("update", "Failed to update category")
        } else {
            ("create", "Failed to create category")
        };

        let url = self.endpoints.url(&self.endpoints.save_path)?;
        let form = build_form(payload)?;

        debug!(operation = verb, with_image = payload.image.is_some(), "POST {}", url.path());
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(failure_from_response(status, &body, fallback));
        }

        let saved: SaveResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::decode(e.to_string()))?;
        Ok(saved.into_category())
    }
}
