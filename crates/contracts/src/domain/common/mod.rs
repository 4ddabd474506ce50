//! Common types shared by all workshop resources

pub mod page;
pub mod person;

pub use page::{ListResponse, PaginatedResponse};
pub use person::PersonRef;
