use once_cell::sync::Lazy;
use regex::Regex;

use super::{FieldName, ValidationErrors};
use crate::models::ImageUpload;

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 200;

/// 5 MiB
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("valid hex color pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryField {
    Name,
    Description,
    Color,
    ImageFile,
}

impl FieldName for CategoryField {
    fn as_str(&self) -> &'static str {
        match self {
            CategoryField::Name => "name",
            CategoryField::Description => "description",
            CategoryField::Color => "color",
            CategoryField::ImageFile => "imageFile",
        }
    }
}

pub type CategoryErrors = ValidationErrors<CategoryField>;

/// Candidate values of the category form.
#[derive(Debug, Clone, Copy)]
pub struct CategoryFormData<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub color: &'a str,
    pub image_file: Option<&'a ImageUpload>,
}

/// Run every rule and collect all failures. An image is mandatory only when
/// creating; a supplied image is checked in both modes.
pub fn validate_category_form(data: &CategoryFormData<'_>, is_edit_mode: bool) -> CategoryErrors {
    let mut errors = CategoryErrors::new();

    errors.set(
        CategoryField::Name,
        check_length(data.name, "Name", NAME_MIN, NAME_MAX),
    );
    errors.set(
        CategoryField::Description,
        check_length(data.description, "Description", DESCRIPTION_MIN, DESCRIPTION_MAX),
    );
    errors.set(CategoryField::Color, validate_color(data.color));

    match data.image_file {
        Some(image) => errors.set(CategoryField::ImageFile, validate_image(image)),
        None if !is_edit_mode => errors.insert(CategoryField::ImageFile, "Image is required"),
        None => {}
    }

    errors
}

fn check_length(value: &str, label: &str, min: usize, max: usize) -> Option<String> {
    let value = value.trim();
    let len = value.chars().count();
    if value.is_empty() {
        Some(format!("{label} is required"))
    } else if len < min {
        Some(format!("{label} must be at least {min} characters"))
    } else if len > max {
        Some(format!("{label} must not exceed {max} characters"))
    } else {
        None
    }
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR.is_match(value.trim())
}

pub fn validate_color(color: &str) -> Option<String> {
    if color.trim().is_empty() {
        Some("Color is required".to_string())
    } else if !is_hex_color(color) {
        Some("Color must be a HEX value (e.g. #FF5733)".to_string())
    } else {
        None
    }
}

/// Media type and size check for a staged image. The size message wins
/// when both fail.
pub fn validate_image(image: &ImageUpload) -> Option<String> {
    let mut error = None;
    if !ALLOWED_IMAGE_TYPES.contains(&image.media_type.as_str()) {
        error = Some("File must be an image (JPG, PNG, GIF or WebP)".to_string());
    }
    if image.size() > MAX_IMAGE_BYTES {
        error = Some("Image must not exceed 5MB".to_string());
    }
    error
}

/// Canonical stored form: trimmed, `#`-prefixed, upper-case.
pub fn format_color_hex(color: &str) -> String {
    let trimmed = color.trim();
    let prefixed = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };
    prefixed.to_uppercase()
}
