mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{install_prefix, AssetsConfig, Config, LoggingConfig, RunnersConfig, ASSETS_ENV};
