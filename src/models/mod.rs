pub mod category;

pub use category::{Category, CategoryPage, CategoryPayload, CategoryStatus, ImageUpload, ListEnvelope};
