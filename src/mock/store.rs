use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::fixtures::sample_categories;
use crate::client::CategoryApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{Category, CategoryPage, CategoryPayload, CategoryStatus};
use crate::query::view::total_pages;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MockError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl MockError {
    pub fn status_code(&self) -> u16 {
        match self {
            MockError::Unauthorized(_) => 401,
            MockError::BadRequest(_) => 400,
            MockError::NotFound(_) => 404,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            MockError::Unauthorized(_) => "UNAUTHORIZED",
            MockError::BadRequest(_) => "BAD_REQUEST",
            MockError::NotFound(_) => "NOT_FOUND",
        }
    }
}

/// Icon part of a save: only metadata is kept, bytes are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconUpload {
    pub file_name: String,
    pub media_type: String,
    pub size: usize,
}

/// Decoded save request, independent of how it arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveInput {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub color: Option<String>,
    pub status: Option<CategoryStatus>,
    /// `None` or a zero-length upload both mean "no new icon".
    pub icon: Option<IconUpload>,
}

impl SaveInput {
    fn new_icon(&self) -> Option<&IconUpload> {
        self.icon.as_ref().filter(|icon| icon.size > 0)
    }
}

impl From<&CategoryPayload> for SaveInput {
    fn from(payload: &CategoryPayload) -> Self {
        Self {
            id: payload.id.clone(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            color: payload.color.clone(),
            status: payload.status,
            icon: payload.image.as_ref().map(|image| IconUpload {
                file_name: image.file_name.clone(),
                media_type: image.media_type.clone(),
                size: image.size(),
            }),
        }
    }
}

struct StoreState {
    categories: Vec<Category>,
    /// Single demo account, so only the latest login's token is live.
    token: Option<String>,
    username: String,
    password: String,
}

/// In-memory backend state shared by the mock server and [`MockCategoryApi`].
#[derive(Clone)]
pub struct MockStore {
    inner: Arc<RwLock<StoreState>>,
}

impl MockStore {
    pub fn new(categories: Vec<Category>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreState {
                categories,
                token: None,
                username: username.into(),
                password: password.into(),
            })),
        }
    }

    /// Fixture data with the configured demo credentials.
    pub fn with_fixtures() -> Self {
        let mock = &crate::config::config().mock;
        Self::new(sample_categories(), mock.username.clone(), mock.password.clone())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, MockError> {
        let mut state = self.inner.write().await;
        if state.username != username || state.password != password {
            return Err(MockError::Unauthorized("Invalid credentials".to_string()));
        }
        let token = Uuid::new_v4().simple().to_string();
        state.token = Some(token.clone());
        Ok(token)
    }

    pub async fn authorize(&self, token: Option<&str>) -> Result<(), MockError> {
        let state = self.inner.read().await;
        match token {
            Some(token) if state.token.as_deref() == Some(token) => Ok(()),
            Some(_) => Err(MockError::Unauthorized("Invalid or expired token".to_string())),
            None => Err(MockError::Unauthorized("Missing bearer token".to_string())),
        }
    }

    /// Invalidate the live token.
    pub async fn revoke_token(&self) {
        self.inner.write().await.token = None;
    }

    pub async fn page(&self, page_number: usize, page_size: usize) -> CategoryPage {
        let state = self.inner.read().await;
        let page_number = page_number.max(1);
        let page_size = page_size.max(1);
        let records = state
            .categories
            .iter()
            .skip((page_number - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();
        CategoryPage {
            page_size,
            page_number,
            total_elements: state.categories.len(),
            total_pages: total_pages(state.categories.len(), page_size),
            records,
        }
    }

    pub async fn get(&self, id: &str) -> Option<Category> {
        self.inner.read().await.categories.iter().find(|c| c.id == id).cloned()
    }

    pub async fn save(&self, input: SaveInput) -> Result<Category, MockError> {
        if input.name.trim().is_empty() || input.description.trim().is_empty() {
            return Err(MockError::BadRequest("Name and description are required".to_string()));
        }

        let mut state = self.inner.write().await;
        match &input.id {
            Some(id) => {
                let category = state
                    .categories
                    .iter_mut()
                    .find(|c| &c.id == id)
                    .ok_or_else(|| MockError::NotFound(format!("Category '{id}' not found")))?;
                category.name = input.name.trim().to_string();
                category.description = input.description.trim().to_string();
                if let Some(color) = &input.color {
                    category.color = color.clone();
                }
                if let Some(status) = input.status {
                    category.status = status;
                }
                if let Some(icon) = input.new_icon() {
                    category.icon = icon_url(icon);
                }
                Ok(category.clone())
            }
            None => {
                let icon = input
                    .new_icon()
                    .ok_or_else(|| MockError::BadRequest("Image is required".to_string()))?;
                let category = Category {
                    id: format!("cat-{}", Uuid::new_v4().simple()),
                    name: input.name.trim().to_string(),
                    description: input.description.trim().to_string(),
                    icon: icon_url(icon),
                    color: input.color.clone().unwrap_or_default(),
                    status: input.status.unwrap_or_default(),
                    created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                };
                state.categories.push(category.clone());
                Ok(category)
            }
        }
    }
}

fn icon_url(icon: &IconUpload) -> String {
    let extension = icon
        .file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_else(|| "img".to_string());
    format!("/icons/{}.{}", Uuid::new_v4().simple(), extension)
}

/// Local data source with the same page/save semantics as the backend.
#[derive(Clone)]
pub struct MockCategoryApi {
    store: MockStore,
}

impl MockCategoryApi {
    pub fn new(store: MockStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MockStore {
        &self.store
    }
}

#[async_trait]
impl CategoryApi for MockCategoryApi {
    async fn list(&self, page_number: usize, page_size: usize) -> ClientResult<CategoryPage> {
        Ok(self.store.page(page_number, page_size).await)
    }

    async fn create_or_update(&self, payload: &CategoryPayload) -> ClientResult<Category> {
        self.store
            .save(SaveInput::from(payload))
            .await
            .map_err(|err| ClientError::request_failed(err.status_code(), err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageUpload;

    fn store() -> MockStore {
        MockStore::new(sample_categories(), "admin@bakanes.dev", "bakanes123")
    }

    fn icon(size: usize) -> Option<IconUpload> {
        Some(IconUpload {
            file_name: "icon.PNG".to_string(),
            media_type: "image/png".to_string(),
            size,
        })
    }

    #[tokio::test]
    async fn pages_through_fixtures() {
        let store = store();
        let page = store.page(2, 4).await;
        assert_eq!(page.total_elements, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.records.first().unwrap().id, "cat-005");

        let last = store.page(3, 4).await;
        assert_eq!(last.records.len(), 2);
    }

    #[tokio::test]
    async fn tokens_are_checked() {
        let store = store();
        assert!(store.login("admin@bakanes.dev", "wrong").await.is_err());
        let token = store.login("admin@bakanes.dev", "bakanes123").await.unwrap();
        assert!(store.authorize(Some(&token)).await.is_ok());
        assert!(store.authorize(Some("nope")).await.is_err());
        assert!(store.authorize(None).await.is_err());

        store.revoke_token().await;
        assert!(store.authorize(Some(&token)).await.is_err());
    }

    #[tokio::test]
    async fn new_login_replaces_previous_token() {
        let store = store();
        let first = store.login("admin@bakanes.dev", "bakanes123").await.unwrap();
        let second = store.login("admin@bakanes.dev", "bakanes123").await.unwrap();

        assert_ne!(first, second);
        assert!(store.authorize(Some(&first)).await.is_err());
        assert!(store.authorize(Some(&second)).await.is_ok());
    }

    #[tokio::test]
    async fn create_requires_icon_and_defaults_active() {
        let store = store();
        let mut input = SaveInput {
            name: "Arte".to_string(),
            description: "Murales y talleres abiertos".to_string(),
            color: Some("#FFFFFF".to_string()),
            icon: icon(0),
            ..SaveInput::default()
        };
        assert_eq!(
            store.save(input.clone()).await.unwrap_err(),
            MockError::BadRequest("Image is required".to_string())
        );

        input.icon = icon(12);
        let created = store.save(input).await.unwrap();
        assert!(created.id.starts_with("cat-"));
        assert_eq!(created.status, CategoryStatus::Active);
        assert!(created.icon.ends_with(".png"));
        assert_eq!(store.page(1, 100).await.total_elements, 11);
    }

    #[tokio::test]
    async fn update_with_empty_icon_keeps_existing() {
        let store = store();
        let before = store.get("cat-003").await.unwrap();
        let updated = store
            .save(SaveInput {
                id: Some("cat-003".to_string()),
                name: "Salud Integral".to_string(),
                description: before.description.clone(),
                status: Some(CategoryStatus::Inactive),
                icon: icon(0),
                ..SaveInput::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.icon, before.icon);
        assert_eq!(updated.color, before.color);
        assert_eq!(updated.created_at, before.created_at);
        assert_eq!(updated.status, CategoryStatus::Inactive);
        assert_eq!(updated.name, "Salud Integral");
    }

    #[tokio::test]
    async fn mock_api_maps_missing_record_to_request_failed() {
        let api = MockCategoryApi::new(store());
        let payload = CategoryPayload {
            id: Some("cat-999".to_string()),
            name: "Nada".to_string(),
            description: "No existe este registro".to_string(),
            image: Some(ImageUpload::new("x.png", "image/png", vec![1])),
            ..CategoryPayload::default()
        };
        match api.create_or_update(&payload).await.unwrap_err() {
            ClientError::RequestFailed { status, .. } => assert_eq!(status, 404),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
