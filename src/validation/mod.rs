pub mod category;
pub mod login;

use std::collections::BTreeMap;

use serde::ser::{Serialize, Serializer};

pub use category::{
    format_color_hex, is_hex_color, validate_category_form, validate_color, validate_image,
    CategoryErrors, CategoryField, CategoryFormData, ALLOWED_IMAGE_TYPES, MAX_IMAGE_BYTES,
};
pub use login::{validate_login, LoginErrors, LoginField};

/// Wire/display name of a form field.
pub trait FieldName: Copy + Ord {
    fn as_str(&self) -> &'static str;
}

/// Field-scoped error messages. A field without an entry is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors<F: FieldName>(BTreeMap<F, String>);

impl<F: FieldName> Default for ValidationErrors<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: FieldName> ValidationErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: F) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: F) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Set or clear one field's entry.
    pub fn set(&mut self, field: F, message: Option<String>) {
        match message {
            Some(message) => self.insert(field, message),
            None => {
                self.remove(field);
            }
        }
    }
}

impl<F: FieldName> Serialize for ValidationErrors<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(field, message)| (field.as_str(), message)))
    }
}
