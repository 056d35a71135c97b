pub mod analytics;
pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod models;
pub mod staging;

pub use config::Config;
pub use database::{get_db_connection, get_pool, DbPool};
pub use error::DataError;
pub use models::*;
pub use staging::StagingStore;
