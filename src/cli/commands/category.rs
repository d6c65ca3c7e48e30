use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{client_failure, output_error, output_success, output_validation_errors, require_login};
use crate::cli::OutputFormat;
use crate::client::{self, CategoryApi, CategoryClient, Endpoints};
use crate::form::{CategoryForm, SubmitOutcome};
use crate::mock::{MockCategoryApi, MockStore};
use crate::models::{Category, ImageUpload};
use crate::query::{parse_date_bound, CategoryList, ListCondition, ListFilters, ListView, StatusFilter};

#[derive(Subcommand)]
pub enum CategoryCommands {
    #[command(about = "List categories with search, filters and pagination")]
    List {
        #[arg(long, default_value_t = 1, help = "Page to show (1-based)")]
        page: usize,
        #[arg(long, help = "Rows per page: 10, 20, 50 or 100")]
        page_size: Option<usize>,
        #[arg(long, help = "Case-insensitive match on name or description")]
        search: Option<String>,
        #[arg(long, default_value = "all", help = "all, active or inactive")]
        status: StatusFilter,
        #[arg(long, help = "Created on or after (YYYY-MM-DD)")]
        from: Option<String>,
        #[arg(long, help = "Created on or before (YYYY-MM-DD)")]
        to: Option<String>,
        #[arg(long, help = "Use the built-in sample data instead of the backend")]
        mock: bool,
    },

    #[command(about = "Create a category")]
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long, help = "HEX color, e.g. #FF5733")]
        color: String,
        #[arg(long, help = "Icon image (JPG, PNG, GIF or WebP, max 5MB)")]
        icon: PathBuf,
    },

    #[command(about = "Edit an existing category")]
    Update {
        #[arg(help = "Category ID")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, help = "HEX color, e.g. #FF5733")]
        color: Option<String>,
        #[arg(long, help = "Replacement icon image; the current icon is kept when omitted")]
        icon: Option<PathBuf>,
        #[arg(long, conflicts_with = "inactive", help = "Mark as active")]
        active: bool,
        #[arg(long, help = "Mark as inactive")]
        inactive: bool,
    },
}

pub async fn handle(cmd: CategoryCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        CategoryCommands::List {
            page,
            page_size,
            search,
            status,
            from,
            to,
            mock,
        } => {
            let api: Arc<dyn CategoryApi> = if mock {
                Arc::new(MockCategoryApi::new(MockStore::with_fixtures()))
            } else {
                backend()?
            };
            let filters = ListFilters::new(
                status,
                parse_date_bound(from.as_deref())?,
                parse_date_bound(to.as_deref())?,
            )?;

            let mut list = CategoryList::new(api);
            if let Some(size) = page_size {
                list.set_page_size(size)?;
            }
            load(&mut list, &output_format).await?;
            list.set_search_term(search.unwrap_or_default());
            list.apply_filters(filters);
            list.set_page(page);

            render_list(&list.view(), &output_format)
        }
        CategoryCommands::Create {
            name,
            description,
            color,
            icon,
        } => {
            let api = backend()?;
            let mut form = CategoryForm::create();
            form.set_name(name);
            form.set_description(description);
            form.set_color(color);
            form.blur_color();
            stage_icon(&mut form, &icon, &output_format).await?;

            submit(form, api, &output_format).await
        }
        CategoryCommands::Update {
            id,
            name,
            description,
            color,
            icon,
            active,
            inactive,
        } => {
            let api = backend()?;
            let existing = find_category(&api, &id, &output_format).await?;

            let mut form = CategoryForm::edit(existing);
            if let Some(name) = name {
                form.set_name(name);
            }
            if let Some(description) = description {
                form.set_description(description);
            }
            if let Some(color) = color {
                form.set_color(color);
                form.blur_color();
            }
            if let Some(path) = icon {
                stage_icon(&mut form, &path, &output_format).await?;
            }
            if active || inactive {
                form.set_active(active);
            }

            submit(form, api, &output_format).await
        }
    }
}

fn backend() -> anyhow::Result<Arc<dyn CategoryApi>> {
    let session = require_login()?;
    let client = CategoryClient::new(Endpoints::from_config(&crate::config::config().api), session.shared())?;
    Ok(Arc::new(client))
}

/// Fetch enough records for client-side search and filtering.
async fn load(list: &mut CategoryList, output_format: &OutputFormat) -> anyhow::Result<()> {
    let fetch_size = crate::config::config().list.fetch_size;
    match list.refresh(1, fetch_size).await {
        Ok(()) => Ok(()),
        Err(err) => Err(client_failure(output_format, err)),
    }
}

async fn find_category(api: &Arc<dyn CategoryApi>, id: &str, output_format: &OutputFormat) -> anyhow::Result<Category> {
    let fetch_size = crate::config::config().list.fetch_size;
    match client::find_category(api.as_ref(), id, fetch_size).await {
        Ok(Some(category)) => Ok(category),
        Ok(None) => anyhow::bail!("Category '{}' not found", id),
        Err(err) => Err(client_failure(output_format, err)),
    }
}

async fn stage_icon(form: &mut CategoryForm, path: &Path, output_format: &OutputFormat) -> anyhow::Result<()> {
    let image = ImageUpload::from_path(path)
        .await
        .with_context(|| format!("failed to read icon {}", path.display()))?;
    if form.attach_image(image).is_err() {
        output_validation_errors(output_format, form.errors())?;
        anyhow::bail!("Icon {} rejected", path.display());
    }
    Ok(())
}

async fn submit(mut form: CategoryForm, api: Arc<dyn CategoryApi>, output_format: &OutputFormat) -> anyhow::Result<()> {
    match form.submit(api.as_ref()).await {
        SubmitOutcome::Invalid(errors) => {
            output_validation_errors(output_format, &errors)?;
            anyhow::bail!("Invalid category form")
        }
        SubmitOutcome::Failed(err) => Err(client_failure(output_format, err)),
        SubmitOutcome::Saved(saved) => {
            let message = form.confirmation_message().unwrap_or("Category saved");
            output_success(output_format, message, Some(json!({ "category": saved })))?;

            if form.acknowledge() {
                let mut list = CategoryList::new(api);
                match list.refresh(1, crate::config::config().list.fetch_size).await {
                    Ok(()) => tracing::debug!(total = list.records().len(), "List refreshed after save"),
                    Err(err) => output_error(output_format, &format!("Saved, but refresh failed: {err}"), Some(err.error_code()))?,
                }
            }
            Ok(())
        }
    }
}

fn render_list(view: &ListView, output_format: &OutputFormat) -> anyhow::Result<()> {
    if let OutputFormat::Json = output_format {
        println!("{}", serde_json::to_string_pretty(view)?);
        return Ok(());
    }

    match &view.condition {
        ListCondition::Loading => println!("Loading..."),
        ListCondition::Empty => {
            println!("No categories yet.");
            println!("Create the first one with `bakanes category create`.");
        }
        ListCondition::NoResults => {
            println!("No categories match the current search or filters.");
            println!("Drop --search, --status, --from or --to to see every category.");
        }
        ListCondition::Failed { message, stale } => {
            eprintln!("Error: {}", message);
            if *stale {
                print_rows(view);
            }
        }
        ListCondition::Populated => print_rows(view),
    }
    Ok(())
}

fn print_rows(view: &ListView) {
    println!("{:<14} {:<24} {:<9} {:<8} {}", "ID", "NAME", "STATUS", "COLOR", "CREATED");
    for category in &view.items {
        println!(
            "{:<14} {:<24} {:<9} {:<8} {}",
            category.id,
            truncate(&category.name, 24),
            category.status.label(),
            category.color,
            category
                .created_date()
                .map(|d| d.to_string())
                .unwrap_or_else(|| category.created_at.clone())
        );
    }
    let p = &view.pagination;
    println!(
        "Showing {}-{} of {} (page {}/{})",
        p.first_item(),
        p.last_item(),
        p.total_elements,
        p.page_number,
        p.total_pages.max(1)
    );
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Alimentación", 24), "Alimentación");
        assert_eq!(truncate("Educación", 5), "Educ…");
    }
}
