pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod mock;
pub mod models;
pub mod query;
pub mod session;
pub mod validation;

pub use client::{AuthClient, CategoryApi, CategoryClient, Endpoints, LoginCredentials};
pub use error::{ClientError, ClientResult};
pub use form::{CategoryForm, FormPhase, SubmitOutcome};
pub use models::{Category, CategoryPage, CategoryPayload, CategoryStatus, ImageUpload};
pub use query::{CategoryList, ListCondition, ListFilters, ListView, StatusFilter};
pub use session::{FileSession, MemorySession, SessionStore, SharedSession};
