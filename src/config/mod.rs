use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::validation::MAX_IMAGE_BYTES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub list: ListConfig,
    pub session: SessionConfig,
    pub mock: MockConfig,
    pub log_filter: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Same-origin prefix; the reverse proxy forwards everything under it to the backend.
    pub base_url: String,
    pub login_path: String,
    pub list_path: String,
    pub save_path: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_page_size: usize,
    pub page_sizes: Vec<usize>,
    /// Page size requested from the backend when searching/filtering client-side.
    pub fetch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub config_dir: Option<PathBuf>,
    pub token_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Request body cap for the mock; must fit a maximum-size icon plus the text fields.
    pub max_request_size_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("BAKANES_API_BASE_URL") {
            self.api.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = env::var("BAKANES_API_LOGIN_PATH") {
            self.api.login_path = v;
        }
        if let Ok(v) = env::var("BAKANES_API_LIST_PATH") {
            self.api.list_path = v;
        }
        if let Ok(v) = env::var("BAKANES_API_SAVE_PATH") {
            self.api.save_path = v;
        }
        if let Ok(v) = env::var("BAKANES_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // List overrides
        if let Ok(v) = env::var("BAKANES_LIST_PAGE_SIZE") {
            self.list.default_page_size = v.parse().unwrap_or(self.list.default_page_size);
        }
        if let Ok(v) = env::var("BAKANES_LIST_FETCH_SIZE") {
            self.list.fetch_size = v.parse().unwrap_or(self.list.fetch_size);
        }

        // Session overrides
        if let Ok(v) = env::var("BAKANES_CONFIG_DIR") {
            self.session.config_dir = Some(PathBuf::from(v));
        }

        // Mock overrides
        if let Ok(v) = env::var("BAKANES_MOCK_PORT") {
            self.mock.port = v.parse().unwrap_or(self.mock.port);
        }
        if let Ok(v) = env::var("BAKANES_MOCK_USERNAME") {
            self.mock.username = v;
        }
        if let Ok(v) = env::var("BAKANES_MOCK_PASSWORD") {
            self.mock.password = v;
        }
        if let Ok(v) = env::var("BAKANES_MOCK_MAX_REQUEST_SIZE_BYTES") {
            self.mock.max_request_size_bytes = v.parse().unwrap_or(self.mock.max_request_size_bytes);
        }

        if let Ok(v) = env::var("BAKANES_LOG").or_else(|_| env::var("RUST_LOG")) {
            self.log_filter = v;
        }

        self
    }

    fn base(environment: Environment, base_url: &str, log_filter: &str) -> Self {
        Self {
            environment,
            api: ApiConfig {
                base_url: base_url.to_string(),
                login_path: "Authentication/Login".to_string(),
                list_path: "actions/admin-list".to_string(),
                save_path: "actions/admin-add".to_string(),
                request_timeout_secs: 30,
            },
            list: ListConfig {
                default_page_size: 10,
                page_sizes: vec![10, 20, 50, 100],
                fetch_size: 100,
            },
            session: SessionConfig {
                config_dir: None,
                token_file: "session.json".to_string(),
            },
            mock: MockConfig {
                port: 4000,
                username: "admin@bakanes.dev".to_string(),
                password: "bakanes123".to_string(),
                max_request_size_bytes: MAX_IMAGE_BYTES + 1024 * 1024, // icon + 1MB of form fields
            },
            log_filter: log_filter.to_string(),
        }
    }

    fn development() -> Self {
        Self::base(
            Environment::Development,
            "http://localhost:4000/api/proxy",
            "bakanes_admin=debug,info",
        )
    }

    fn staging() -> Self {
        let mut config = Self::base(
            Environment::Staging,
            "https://staging.bakanes.dev/api/proxy",
            "bakanes_admin=info,warn",
        );
        config.api.request_timeout_secs = 15;
        config
    }

    fn production() -> Self {
        let mut config = Self::base(
            Environment::Production,
            "https://admin.bakanes.dev/api/proxy",
            "warn",
        );
        config.api.request_timeout_secs = 10;
        config
    }

    /// Directory holding the persisted session token.
    pub fn config_dir(&self) -> anyhow::Result<PathBuf> {
        if let Some(dir) = &self.session.config_dir {
            return Ok(dir.clone());
        }
        let home = env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        Ok(PathBuf::from(home).join(".config").join("bakanes"))
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
