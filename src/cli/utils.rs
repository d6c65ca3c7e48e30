use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::session::FileSession;
use crate::validation::{FieldName, ValidationErrors};

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print field-level validation errors
pub fn output_validation_errors<F: FieldName>(
    output_format: &OutputFormat,
    errors: &ValidationErrors<F>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "error": "Please fix the highlighted fields",
                    "error_code": "VALIDATION_ERROR",
                    "field_errors": errors
                }))?
            );
        }
        OutputFormat::Text => {
            eprintln!("Please fix the highlighted fields:");
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field.as_str(), message);
            }
        }
    }
    Ok(())
}

/// Session file, refusing to continue when nobody is logged in.
pub fn require_login() -> anyhow::Result<FileSession> {
    let session = FileSession::from_config()?;
    if session.load()?.is_none() {
        anyhow::bail!("Not logged in; run `bakanes auth login <username>` first");
    }
    Ok(session)
}

/// Report a backend failure and turn it into the command's error.
pub fn client_failure(output_format: &OutputFormat, err: ClientError) -> anyhow::Error {
    if matches!(output_format, OutputFormat::Json) {
        if let Err(print_err) = output_error(output_format, &err.to_string(), Some(err.error_code())) {
            return print_err;
        }
    }
    if err.is_authentication() {
        anyhow::anyhow!("{}; run `bakanes auth login <username>`", err)
    } else {
        anyhow::Error::new(err)
    }
}
