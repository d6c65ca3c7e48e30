// Mock backend speaking the same wire contract as the real one
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use super::store::{IconUpload, MockError, MockStore, SaveInput};
use crate::client::LoginCredentials;
use crate::config::AppConfig;
use crate::models::{Category, CategoryStatus, ListEnvelope};

/// Same-origin prefix the mock is mounted under.
pub const PROXY_PREFIX: &str = "/api/proxy";

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": true,
            "message": self.to_string(),
            "code": self.error_code()
        });
        (status, Json(body)).into_response()
    }
}

pub fn router(store: MockStore, config: &AppConfig) -> Router {
    let api = &config.api;
    let routes = Router::new()
        .route(&route_path(&api.login_path), post(login))
        .route(&route_path(&api.list_path), get(list))
        .route(&route_path(&api.save_path), post(save));

    Router::new()
        .route("/health", get(health))
        .nest(PROXY_PREFIX, routes)
        .with_state(store)
        .layer(DefaultBodyLimit::max(config.mock.max_request_size_bytes))
        .layer(TraceLayer::new_for_http())
}

fn route_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Bind and serve until the process exits.
pub async fn serve(store: MockStore, port: u16) -> anyhow::Result<()> {
    let app = router(store, crate::config::config());
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Mock backend listening on http://{}{}", bind_addr, PROXY_PREFIX);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn login(State(store): State<MockStore>, Json(body): Json<LoginCredentials>) -> Result<Json<serde_json::Value>, MockError> {
    let token = store.login(&body.username, &body.password).await?;
    Ok(Json(json!({ "token": token })))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    page_number: Option<usize>,
    page_size: Option<usize>,
}

async fn list(
    State(store): State<MockStore>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope>, MockError> {
    store.authorize(bearer_token(&headers)).await?;
    let page = store
        .page(params.page_number.unwrap_or(1), params.page_size.unwrap_or(10))
        .await;
    Ok(Json(ListEnvelope { data: page }))
}

async fn save(
    State(store): State<MockStore>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Category>, MockError> {
    store.authorize(bearer_token(&headers)).await?;

    let mut input = SaveInput::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| MockError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "imageFile" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let media_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| MockError::BadRequest(format!("Unreadable image: {e}")))?;
                input.icon = Some(IconUpload {
                    file_name,
                    media_type,
                    size: bytes.len(),
                });
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| MockError::BadRequest(format!("Unreadable field '{other}': {e}")))?;
                apply_text_field(&mut input, other, value)?;
            }
        }
    }

    Ok(Json(store.save(input).await?))
}

fn apply_text_field(input: &mut SaveInput, name: &str, value: String) -> Result<(), MockError> {
    match name {
        "id" => input.id = Some(value).filter(|v| !v.is_empty()),
        "name" => input.name = value,
        "description" => input.description = value,
        "color" => input.color = Some(value),
        "status" => {
            let raw: u8 = value
                .trim()
                .parse()
                .map_err(|_| MockError::BadRequest(format!("Invalid status '{value}'")))?;
            input.status = Some(CategoryStatus::try_from(raw).map_err(MockError::BadRequest)?);
        }
        other => tracing::debug!("Ignoring unknown form field '{}'", other),
    }
    Ok(())
}
