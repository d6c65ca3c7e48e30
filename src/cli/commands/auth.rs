use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success, output_validation_errors};
use crate::cli::OutputFormat;
use crate::client::{AuthClient, Endpoints, LoginCredentials};
use crate::session::FileSession;
use crate::validation::validate_login;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and store the session token")]
    Login {
        #[arg(help = "Username (email)")]
        username: String,
        #[arg(long, env = "BAKANES_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the stored session token")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => login(username, password, &output_format).await,
        AuthCommands::Logout => {
            let session = FileSession::from_config()?;
            let auth = AuthClient::new(
                Endpoints::from_config(&crate::config::config().api),
                session.shared(),
            )?;
            auth.logout()?;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => status(&output_format),
    }
}

async fn login(username: String, password: String, output_format: &OutputFormat) -> anyhow::Result<()> {
    let errors = validate_login(&username, &password);
    if errors.has_errors() {
        output_validation_errors(output_format, &errors)?;
        anyhow::bail!("Invalid login form");
    }

    let session = FileSession::from_config()?;
    session.remember_user(username.clone());
    let auth = AuthClient::new(
        Endpoints::from_config(&crate::config::config().api),
        session.clone().shared(),
    )?;

    let credentials = LoginCredentials { username, password };
    match auth.login(&credentials).await {
        Ok(_) => output_success(
            output_format,
            &format!("Logged in as {}", credentials.username),
            Some(json!({ "username": credentials.username, "session_file": session.path().display().to_string() })),
        ),
        Err(err) => {
            if matches!(output_format, OutputFormat::Json) {
                output_error(output_format, &err.to_string(), Some(err.error_code()))?;
            }
            Err(anyhow::Error::new(err).context("Login failed"))
        }
    }
}

fn status(output_format: &OutputFormat) -> anyhow::Result<()> {
    let session = FileSession::from_config()?;
    match session.load()? {
        Some(record) => {
            let who = record.username.clone().unwrap_or_else(|| "unknown user".to_string());
            output_success(
                output_format,
                &format!("Logged in as {} since {}", who, record.logged_in_at.to_rfc3339()),
                Some(json!({
                    "authenticated": true,
                    "username": record.username,
                    "logged_in_at": record.logged_in_at,
                })),
            )
        }
        None => output_success(output_format, "Not logged in", Some(json!({ "authenticated": false }))),
    }
}
