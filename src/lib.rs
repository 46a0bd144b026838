pub mod config;
pub mod file_storage;
pub mod observability;

pub use config::Config;
pub use file_storage::JsonFileStorage;
