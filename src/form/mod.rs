//! Create/edit form state for a single category.
//!
//! `Idle -> Validating -> Submitting -> Succeeded | Failed -> Idle`. A failed
//! validation drops straight back to `Idle` with field errors populated and
//! never reaches the backend.

use tracing::{debug, warn};

use crate::client::CategoryApi;
use crate::error::ClientError;
use crate::models::{Category, CategoryPayload, CategoryStatus, ImageUpload};
use crate::validation::{
    format_color_hex, is_hex_color, validate_category_form, validate_color, validate_image, CategoryErrors,
    CategoryField, CategoryFormData,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded(Category),
    Failed(String),
}

/// Icon shown next to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    None,
    /// The stored icon of the record being edited.
    Remote(String),
    /// `data:` URL of a freshly staged upload.
    Inline(String),
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Invalid(CategoryErrors),
    Saved(Category),
    Failed(ClientError),
}

#[derive(Debug, Clone)]
pub struct CategoryForm {
    original: Option<Category>,
    name: String,
    description: String,
    color: String,
    image: Option<ImageUpload>,
    preview: Preview,
    active: bool,
    errors: CategoryErrors,
    phase: FormPhase,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self::create()
    }
}

impl CategoryForm {
    /// Blank form for a new category.
    pub fn create() -> Self {
        Self {
            original: None,
            name: String::new(),
            description: String::new(),
            color: String::new(),
            image: None,
            preview: Preview::None,
            active: true,
            errors: CategoryErrors::new(),
            phase: FormPhase::Idle,
        }
    }

    /// Form preloaded with an existing record.
    pub fn edit(category: Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            color: category.color.clone(),
            image: None,
            preview: remote_preview(&category),
            active: category.status.is_active(),
            errors: CategoryErrors::new(),
            phase: FormPhase::Idle,
            original: Some(category),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.original.is_some()
    }

    pub fn original(&self) -> Option<&Category> {
        self.original.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn errors(&self) -> &CategoryErrors {
        &self.errors
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    /// Transport failure from the last submit, if any.
    pub fn submit_error(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Update the color and re-check just that field when non-blank.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
        if !self.color.trim().is_empty() {
            self.errors.set(CategoryField::Color, validate_color(&self.color));
        }
    }

    /// Leaving the color input: normalize when the normalized value is a
    /// valid hex color, otherwise leave the text for the user to fix.
    pub fn blur_color(&mut self) {
        if self.color.trim().is_empty() {
            return;
        }
        let formatted = format_color_hex(&self.color);
        if is_hex_color(&formatted) {
            self.color = formatted;
            self.errors.remove(CategoryField::Color);
        }
    }

    /// Only meaningful when editing; new records are always created active.
    pub fn set_active(&mut self, active: bool) -> bool {
        if !self.is_edit_mode() {
            return false;
        }
        self.active = active;
        true
    }

    /// Stage an image after checking its type and size. A rejected file
    /// leaves any previously staged image in place.
    pub fn attach_image(&mut self, image: ImageUpload) -> Result<(), String> {
        if let Some(message) = validate_image(&image) {
            self.errors.insert(CategoryField::ImageFile, message.clone());
            return Err(message);
        }
        self.preview = Preview::Inline(image.data_url());
        self.image = Some(image);
        self.errors.remove(CategoryField::ImageFile);
        Ok(())
    }

    /// Drop the staged image; editing falls back to the stored icon.
    pub fn remove_image(&mut self) {
        self.image = None;
        self.preview = self.original.as_ref().map_or(Preview::None, remote_preview);
    }

    fn form_data(&self) -> CategoryFormData<'_> {
        CategoryFormData {
            name: &self.name,
            description: &self.description,
            color: &self.color,
            image_file: self.image.as_ref(),
        }
    }

    /// Run every rule without submitting.
    pub fn validate(&mut self) -> &CategoryErrors {
        self.errors = validate_category_form(&self.form_data(), self.is_edit_mode());
        &self.errors
    }

    fn payload(&self) -> CategoryPayload {
        let mut payload = CategoryPayload {
            id: None,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            color: Some(format_color_hex(&self.color)),
            status: Some(CategoryStatus::Active),
            image: self.image.clone(),
        };
        if let Some(original) = &self.original {
            payload.id = Some(original.id.clone());
            payload.status = Some(CategoryStatus::from_active(self.active));
        }
        payload
    }

    /// Validate and, when clean, send the save request.
    pub async fn submit(&mut self, api: &dyn CategoryApi) -> SubmitOutcome {
        self.phase = FormPhase::Validating;
        self.validate();
        if self.errors.has_errors() {
            debug!(errors = self.errors.len(), "Category form rejected");
            self.phase = FormPhase::Idle;
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        self.color = format_color_hex(&self.color);
        let payload = self.payload();
        self.phase = FormPhase::Submitting;
        debug!(update = payload.is_update(), "Submitting category form");

        match api.create_or_update(&payload).await {
            Ok(saved) => {
                self.phase = FormPhase::Succeeded(saved.clone());
                SubmitOutcome::Saved(saved)
            }
            Err(err) => {
                warn!("Category save failed: {}", err);
                self.phase = FormPhase::Failed(err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub fn confirmation_message(&self) -> Option<&'static str> {
        match self.phase {
            FormPhase::Succeeded(_) if self.is_edit_mode() => Some("Category updated successfully"),
            FormPhase::Succeeded(_) => Some("Category created successfully"),
            _ => None,
        }
    }

    /// Return to `Idle`. After a success the form is cleared and `true`
    /// tells the caller to refresh the list and close the form.
    pub fn acknowledge(&mut self) -> bool {
        match self.phase {
            FormPhase::Succeeded(_) => {
                self.reset();
                true
            }
            _ => {
                self.phase = FormPhase::Idle;
                false
            }
        }
    }

    /// Back to a blank create form.
    pub fn reset(&mut self) {
        *self = Self::create();
    }
}

fn remote_preview(category: &Category) -> Preview {
    if category.icon.is_empty() {
        Preview::None
    } else {
        Preview::Remote(category.icon.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientResult;
    use crate::models::CategoryPage;
    use crate::validation::MAX_IMAGE_BYTES;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingApi {
        saved: Mutex<Vec<CategoryPayload>>,
        fail_with: Mutex<Option<ClientError>>,
    }

    #[async_trait]
    impl CategoryApi for RecordingApi {
        async fn list(&self, _page_number: usize, _page_size: usize) -> ClientResult<CategoryPage> {
            Err(ClientError::request_failed(501, "not supported"))
        }

        async fn create_or_update(&self, payload: &CategoryPayload) -> ClientResult<Category> {
            if let Some(err) = self.fail_with.lock().unwrap().take() {
                return Err(err);
            }
            self.saved.lock().unwrap().push(payload.clone());
            Ok(Category {
                id: payload.id.clone().unwrap_or_else(|| "cat-new".to_string()),
                name: payload.name.clone(),
                description: payload.description.clone(),
                icon: "https://cdn.example.com/icon.png".to_string(),
                color: payload.color.clone().unwrap_or_default(),
                status: payload.status.unwrap_or_default(),
                created_at: "2024-03-01T00:00:00Z".to_string(),
            })
        }
    }

    fn png() -> ImageUpload {
        ImageUpload::new("icon.png", "image/png", vec![137, 80, 78, 71])
    }

    fn existing() -> Category {
        Category {
            id: "cat-003".to_string(),
            name: "Salud".to_string(),
            description: "Acciones de promoción de la salud".to_string(),
            icon: "https://cdn.example.com/salud.png".to_string(),
            color: "#EF4444".to_string(),
            status: CategoryStatus::Active,
            created_at: "2024-01-17T09:15:00Z".to_string(),
        }
    }

    fn filled_create_form() -> CategoryForm {
        let mut form = CategoryForm::create();
        form.set_name("  Deporte ");
        form.set_description("Actividades deportivas y recreativas");
        form.set_color("f59e0b");
        form.blur_color();
        form.attach_image(png()).unwrap();
        form
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let api = RecordingApi::default();
        let mut form = CategoryForm::create();
        form.set_name("ab");

        let outcome = form.submit(&api).await;
        match outcome {
            SubmitOutcome::Invalid(errors) => {
                assert!(errors.contains(CategoryField::Name));
                assert!(errors.contains(CategoryField::Description));
                assert!(errors.contains(CategoryField::Color));
                assert!(errors.contains(CategoryField::ImageFile));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(form.phase(), &FormPhase::Idle);
        assert!(api.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_sends_trimmed_normalized_active_payload() {
        let api = RecordingApi::default();
        let mut form = filled_create_form();
        assert_eq!(form.color(), "#F59E0B");

        let outcome = form.submit(&api).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(form.confirmation_message(), Some("Category created successfully"));

        let saved = api.saved.lock().unwrap();
        let payload = &saved[0];
        assert_eq!(payload.id, None);
        assert_eq!(payload.name, "Deporte");
        assert_eq!(payload.color.as_deref(), Some("#F59E0B"));
        assert_eq!(payload.status, Some(CategoryStatus::Active));
        assert!(payload.image.is_some());
    }

    #[tokio::test]
    async fn edit_without_new_image_keeps_id_and_status() {
        let api = RecordingApi::default();
        let mut form = CategoryForm::edit(existing());
        assert_eq!(form.preview(), &Preview::Remote("https://cdn.example.com/salud.png".to_string()));
        assert!(form.set_active(false));

        let outcome = form.submit(&api).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert_eq!(form.confirmation_message(), Some("Category updated successfully"));

        let saved = api.saved.lock().unwrap();
        assert_eq!(saved[0].id.as_deref(), Some("cat-003"));
        assert_eq!(saved[0].status, Some(CategoryStatus::Inactive));
        assert!(saved[0].image.is_none());
    }

    #[tokio::test]
    async fn transport_failure_keeps_form_editable() {
        let api = RecordingApi::default();
        *api.fail_with.lock().unwrap() = Some(ClientError::request_failed(409, "Name already exists"));
        let mut form = filled_create_form();

        let outcome = form.submit(&api).await;
        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(form.submit_error(), Some("Name already exists"));

        form.set_name("Deportes");
        assert!(!form.acknowledge());
        assert_eq!(form.phase(), &FormPhase::Idle);

        let outcome = form.submit(&api).await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));
        assert!(form.acknowledge());
        assert!(!form.is_edit_mode());
        assert_eq!(form.name(), "");
    }

    #[test]
    fn status_not_settable_when_creating() {
        let mut form = CategoryForm::create();
        assert!(!form.set_active(false));
        assert!(form.is_active());
    }

    #[test]
    fn attach_rejects_bad_files_and_keeps_previous() {
        let mut form = CategoryForm::create();
        form.attach_image(png()).unwrap();

        let big = ImageUpload::new("big.png", "image/png", vec![0u8; MAX_IMAGE_BYTES + 1]);
        assert!(form.attach_image(big).is_err());
        assert!(form.errors().contains(CategoryField::ImageFile));
        assert_eq!(form.image().map(|i| i.file_name.as_str()), Some("icon.png"));

        let pdf = ImageUpload::new("doc.pdf", "application/pdf", vec![1]);
        assert!(form.attach_image(pdf).is_err());

        form.attach_image(png()).unwrap();
        assert!(!form.errors().contains(CategoryField::ImageFile));
        assert!(matches!(form.preview(), Preview::Inline(url) if url.starts_with("data:image/png;base64,")));
    }

    #[test]
    fn removing_image_restores_original_preview_only_in_edit_mode() {
        let mut edit = CategoryForm::edit(existing());
        edit.attach_image(png()).unwrap();
        edit.remove_image();
        assert_eq!(edit.preview(), &Preview::Remote("https://cdn.example.com/salud.png".to_string()));

        let mut create = CategoryForm::create();
        create.attach_image(png()).unwrap();
        create.remove_image();
        assert_eq!(create.preview(), &Preview::None);
        assert!(create.image().is_none());
    }

    #[test]
    fn color_live_check_and_blur() {
        let mut form = CategoryForm::create();
        form.set_color("blue");
        assert!(form.errors().contains(CategoryField::Color));
        form.blur_color();
        assert_eq!(form.color(), "blue");

        form.set_color("ff5733");
        assert!(form.errors().contains(CategoryField::Color));
        form.blur_color();
        assert_eq!(form.color(), "#FF5733");
        assert!(!form.errors().contains(CategoryField::Color));
    }
}
