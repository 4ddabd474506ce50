pub mod aggregate;

pub use aggregate::{CreateProviderDto, Provider};
