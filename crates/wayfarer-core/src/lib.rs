pub mod catalog;
pub mod config;
pub mod error;
pub mod query;
pub mod resolver;
pub mod types;

pub use catalog::Catalogs;
pub use config::WayfarerConfig;
pub use error::{Result, WayfarerError};
pub use resolver::SuggestionResolver;
pub use types::*;
