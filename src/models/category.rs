use std::path::Path;

use base64::Engine;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Active/inactive flag. Travels as the integers `1`/`0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CategoryStatus {
    #[default]
    Active,
    Inactive,
}

impl CategoryStatus {
    pub fn from_active(active: bool) -> Self {
        if active {
            CategoryStatus::Active
        } else {
            CategoryStatus::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, CategoryStatus::Active)
    }

    pub fn as_u8(self) -> u8 {
        match self {
            CategoryStatus::Active => 1,
            CategoryStatus::Inactive => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryStatus::Active => "active",
            CategoryStatus::Inactive => "inactive",
        }
    }
}

impl TryFrom<u8> for CategoryStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CategoryStatus::Active),
            0 => Ok(CategoryStatus::Inactive),
            other => Err(format!("invalid category status {other}, expected 0 or 1")),
        }
    }
}

impl From<CategoryStatus> for u8 {
    fn from(status: CategoryStatus) -> Self {
        status.as_u8()
    }
}

/// A category as the backend stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Remote URL of the current icon.
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    pub status: CategoryStatus,
    /// Backend-assigned, never touched by the client.
    pub created_at: String,
}

impl Category {
    /// Calendar date of `created_at`. Accepts RFC 3339 timestamps and anything
    /// starting with a `YYYY-MM-DD` date.
    pub fn created_date(&self) -> Option<NaiveDate> {
        let raw = self.created_at.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.date_naive());
        }
        raw.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }
}

/// One server page of categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub page_size: usize,
    pub page_number: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    #[serde(rename = "data")]
    pub records: Vec<Category>,
}

/// Wire shape of the list endpoint: `{ "data": { ...page } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope {
    pub data: CategoryPage,
}

/// An image staged for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "icon".to_string());
        Ok(Self::new(file_name, media_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Inline preview of the staged bytes.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Body of a create/update submission. `id` decides which one it is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryPayload {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub color: Option<String>,
    pub status: Option<CategoryStatus>,
    pub image: Option<ImageUpload>,
}

impl CategoryPayload {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": "cat-003",
            "name": "Salud",
            "description": "Acciones de promoción de la salud y bienestar comunitario",
            "icon": "https://cdn.example.com/salud.png",
            "color": "#EF4444",
            "status": 1,
            "createdAt": "2024-01-17T09:15:00Z"
        })
    }

    #[test]
    fn decodes_backend_category() {
        let category: Category = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(category.id, "cat-003");
        assert_eq!(category.status, CategoryStatus::Active);
        assert_eq!(category.created_date(), NaiveDate::from_ymd_opt(2024, 1, 17));
    }

    #[test]
    fn rejects_unknown_status() {
        let mut value = sample_json();
        value["status"] = serde_json::json!(7);
        assert!(serde_json::from_value::<Category>(value).is_err());
    }

    #[test]
    fn created_date_accepts_plain_dates_and_naive_timestamps() {
        let mut category: Category = serde_json::from_value(sample_json()).unwrap();
        category.created_at = "2024-02-01".to_string();
        assert_eq!(category.created_date(), NaiveDate::from_ymd_opt(2024, 2, 1));

        category.created_at = "2024-02-03T08:00:00.123".to_string();
        assert_eq!(category.created_date(), NaiveDate::from_ymd_opt(2024, 2, 3));

        category.created_at = "yesterday".to_string();
        assert_eq!(category.created_date(), None);
    }

    #[test]
    fn decodes_list_envelope() {
        let body = serde_json::json!({
            "data": {
                "pageSize": 10,
                "pageNumber": 1,
                "totalElements": 1,
                "totalPages": 1,
                "data": [sample_json()]
            }
        });
        let envelope: ListEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.data.records.len(), 1);
        assert_eq!(envelope.data.total_pages, 1);
    }

    #[test]
    fn data_url_embeds_media_type() {
        let image = ImageUpload::new("dot.png", "image/png", vec![1, 2, 3]);
        assert_eq!(image.data_url(), "data:image/png;base64,AQID");
        assert_eq!(image.size(), 3);
    }
}
