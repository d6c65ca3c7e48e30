pub mod fixtures;
pub mod server;
pub mod store;

pub use fixtures::sample_categories;
pub use store::{MockCategoryApi, MockError, MockStore, SaveInput};
