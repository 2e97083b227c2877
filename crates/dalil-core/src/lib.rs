pub mod actions;
pub mod app_config;
pub mod config;
pub mod entry;
pub mod geo;
pub mod index;
pub mod language;
pub mod normalize;
pub mod phone;

use thiserror::Error;

pub use actions::EntryActions;
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use entry::{Coordinates, RawEntry, ServiceEntry};
pub use geo::distance_km;
pub use index::{build, categories, query, rank, RankedEntry, SortMode};
pub use language::Language;
pub use normalize::normalize;
pub use phone::{dial_number, to_dialable, to_whatsapp, MIN_PHONE_DIGITS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
