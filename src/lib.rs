pub mod config;
pub mod core;
pub mod models;
pub mod monitor;
pub mod plugins;
pub mod scraper;
pub mod utils;

// Re-export commonly used types
pub use config::AppConfig;
pub use monitor::{RunReport, TariffMonitor};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
