pub mod config;
pub mod cookie;
pub mod cookie_store;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::SnapError;
pub use types::*;
