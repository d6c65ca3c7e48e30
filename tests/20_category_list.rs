mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::{http::StatusCode, routing::get, Json, Router};
use chrono::NaiveDate;
use serde_json::json;

use bakanes_admin::client::{find_category, CategoryApi, CategoryClient};
use bakanes_admin::query::{CategoryList, ListCondition, ListFilters, LoadState, StatusFilter};
use bakanes_admin::session::MemorySession;
use bakanes_admin::ClientError;

use common::{generated_categories, spawn_backend, spawn_backend_with, spawn_router};

const LIST_ROUTE: &str = "/api/proxy/actions/admin-list";

#[tokio::test]
async fn test_list_decodes_server_page() -> Result<()> {
    let backend = spawn_backend().await?;
    let (client, _session) = backend.logged_in_client().await?;

    let page = client.list(2, 4).await?;
    assert_eq!(page.page_number, 2);
    assert_eq!(page.page_size, 4);
    assert_eq!(page.total_elements, 10);
    assert_eq!(page.total_pages, 3);
    let ids: Vec<&str> = page.records.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["cat-005", "cat-006", "cat-007", "cat-008"]);
    assert!(!page.records[0].status.is_active());
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_not_an_auth_failure() -> Result<()> {
    let app = Router::new().route(
        LIST_ROUTE,
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Database unavailable" })),
            )
        }),
    );
    let server = spawn_router(app).await?;
    let client = CategoryClient::new(server.endpoints(), MemorySession::with_token("t").shared())?;

    let err = client.list(1, 10).await.unwrap_err();
    match &err {
        ClientError::RequestFailed { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
    assert!(!err.is_authentication());
    Ok(())
}

#[tokio::test]
async fn test_error_without_message_uses_fallback() -> Result<()> {
    let app = Router::new().route(LIST_ROUTE, get(|| async { StatusCode::BAD_GATEWAY }));
    let server = spawn_router(app).await?;
    let client = CategoryClient::new(server.endpoints(), MemorySession::with_token("t").shared())?;

    let err = client.list(1, 10).await.unwrap_err();
    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.to_string(), "Failed to load categories");
    Ok(())
}

#[tokio::test]
async fn test_malformed_envelope_is_decode_error() -> Result<()> {
    let app = Router::new().route(LIST_ROUTE, get(|| async { Json(json!({ "data": 5 })) }));
    let server = spawn_router(app).await?;
    let client = CategoryClient::new(server.endpoints(), MemorySession::with_token("t").shared())?;

    let err = client.list(1, 10).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "unexpected error: {err:?}");
    Ok(())
}

async fn loaded_list() -> Result<(common::MockBackend, CategoryList)> {
    let backend = spawn_backend().await?;
    let (client, _session) = backend.logged_in_client().await?;
    let api: Arc<dyn CategoryApi> = Arc::new(client);
    let mut list = CategoryList::new(api);
    list.refresh(1, 100).await?;
    Ok((backend, list))
}

#[tokio::test]
async fn test_controller_searches_and_filters_remote_records() -> Result<()> {
    let (_backend, mut list) = loaded_list().await?;
    assert_eq!(list.state(), &LoadState::Loaded);
    assert_eq!(list.records().len(), 10);

    list.set_search_term("SALUD");
    let names: Vec<&str> = list.filtered().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Salud"]);

    list.clear_search();
    list.apply_filters(ListFilters::new(StatusFilter::Inactive, None, None)?);
    let names: Vec<&str> = list.filtered().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Deporte", "Vivienda"]);

    list.set_search_term("salud");
    let view = list.view();
    assert_eq!(view.condition, ListCondition::NoResults);
    assert!(view.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_controller_date_range_is_inclusive() -> Result<()> {
    let (_backend, mut list) = loaded_list().await?;

    let from = NaiveDate::from_ymd_opt(2024, 1, 20);
    let to = NaiveDate::from_ymd_opt(2024, 1, 22);
    list.apply_filters(ListFilters::new(StatusFilter::All, from, to)?);

    let ids: Vec<&str> = list.filtered().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["cat-006", "cat-007", "cat-008"]);
    Ok(())
}

#[tokio::test]
async fn test_controller_paginates_locally() -> Result<()> {
    let (_backend, mut list) = loaded_list().await?;
    assert_eq!(list.page_size(), 10);
    assert_eq!(list.total_pages(), 1);

    list.set_page_size(20)?;
    assert!(list.set_page_size(15).is_err());
    assert_eq!(list.page_size(), 20);

    list.set_search_term("a");
    let view = list.view();
    assert_eq!(view.condition, ListCondition::Populated);
    assert_eq!(view.pagination.page_number, 1);
    assert!(!view.pagination.has_next());
    assert!(!list.go_to_next());
    Ok(())
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_records() -> Result<()> {
    let (backend, mut list) = loaded_list().await?;
    backend.store.revoke_token().await;

    let err = list.refresh(1, 100).await.unwrap_err();
    assert!(err.is_authentication());
    assert_eq!(list.records().len(), 10);

    let view = list.view();
    match view.condition {
        ListCondition::Failed { stale, .. } => assert!(stale),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(view.items.len(), 10);
    Ok(())
}

#[tokio::test]
async fn test_find_category_beyond_first_fetch_window() -> Result<()> {
    let backend = spawn_backend_with(generated_categories(150)).await?;
    let (client, _session) = backend.logged_in_client().await?;

    let found = find_category(&client, "gen-142", 100).await?;
    assert_eq!(found.map(|c| c.name).as_deref(), Some("Categoría 142"));

    assert!(find_category(&client, "gen-151", 100).await?.is_none());
    Ok(())
}
