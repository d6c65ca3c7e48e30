#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::Router;
use reqwest::StatusCode;

use bakanes_admin::client::{AuthClient, CategoryClient, Endpoints, LoginCredentials};
use bakanes_admin::mock::{sample_categories, server, MockStore};
use bakanes_admin::models::Category;
use bakanes_admin::session::{MemorySession, SharedSession};

pub const USERNAME: &str = "admin@bakanes.dev";
pub const PASSWORD: &str = "bakanes123";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::with_base_url(format!("{}{}", self.base_url, server::PROXY_PREFIX))
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Any answer means the listener is up
                if resp.status() != StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Serve `app` on a free port for the lifetime of the current test runtime.
pub async fn spawn_router(app: Router) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = TestServer {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

pub struct MockBackend {
    pub server: TestServer,
    pub store: MockStore,
}

/// Mock backend seeded with the sample categories.
pub async fn spawn_backend() -> Result<MockBackend> {
    spawn_backend_with(sample_categories()).await
}

pub async fn spawn_backend_with(categories: Vec<Category>) -> Result<MockBackend> {
    let store = MockStore::new(categories, USERNAME, PASSWORD);
    let app = server::router(store.clone(), bakanes_admin::config::config());
    let server = spawn_router(app).await?;
    Ok(MockBackend { server, store })
}

impl MockBackend {
    pub fn endpoints(&self) -> Endpoints {
        self.server.endpoints()
    }

    /// Log in with the demo account and return a client sharing that session.
    pub async fn logged_in_client(&self) -> Result<(CategoryClient, SharedSession)> {
        let session = MemorySession::new().shared();
        let auth = AuthClient::new(self.endpoints(), session.clone())?;
        auth.login(&LoginCredentials {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
        })
        .await?;
        let client = CategoryClient::new(self.endpoints(), session.clone())?;
        Ok((client, session))
    }
}

pub fn png(bytes: usize) -> bakanes_admin::models::ImageUpload {
    bakanes_admin::models::ImageUpload::new("icon.png", "image/png", vec![7u8; bytes])
}

/// `count` generated categories, ids `gen-001` onwards.
pub fn generated_categories(count: usize) -> Vec<Category> {
    let template = sample_categories().remove(0);
    (1..=count)
        .map(|n| Category {
            id: format!("gen-{n:03}"),
            name: format!("Categoría {n}"),
            ..template.clone()
        })
        .collect()
}
