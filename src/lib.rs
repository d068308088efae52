pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod model;
pub mod scrape;
pub mod tracing;

pub mod util {
    pub mod env;
}

pub use config::AppConfig;
pub use domain::Domain;
pub use model::{CategoryGroup, ItemRecord, TypeGroup};
