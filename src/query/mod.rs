pub mod controller;
pub mod error;
pub mod filter;
pub mod view;

pub use controller::{CategoryList, LoadState, ServerWindow};
pub use error::QueryError;
pub use filter::{matches_search, parse_date_bound, ListFilters, StatusFilter};
pub use view::{ListCondition, ListView, Pagination};
