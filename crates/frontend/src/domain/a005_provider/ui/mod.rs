pub mod provider_list;

pub use provider_list::ProviderList;
