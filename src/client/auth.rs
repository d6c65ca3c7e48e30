use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{failure_from_response, http_client, Endpoints};
use crate::error::{ClientError, ClientResult};
use crate::session::SharedSession;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// `{ "token": "..." }`; anything else is a decode failure.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: Option<String>,
}

/// Login/logout against the authentication endpoint. Writes to the same
/// session the category client reads from.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    session: SharedSession,
}

impl AuthClient {
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

    /// Exchange credentials for a bearer token and store it.
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<String> {
        let url = self.endpoints.url(&self.endpoints.login_path)?;
        debug!(username = %credentials.username, "POST {}", url.path());

        let response = self.http.post(url).json(credentials).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(failure_from_response(status, &body, "Authentication failed"));
        }

        let token = serde_json::from_str::<AuthResponse>(&body)
            .map_err(|e| ClientError::decode(e.to_string()))?
            .token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::decode("No authentication token received"))?;

        self.session.set_token(token.clone())?;
        info!(username = %credentials.username, "Logged in");
        Ok(token)
    }

    pub fn logout(&self) -> ClientResult<()> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}
