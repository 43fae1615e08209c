pub mod env;
mod loader;

pub use env::{
    AppConfig, ClassifierConfig, ClassifierMode, ConfigError, LlmConfig, LlmProvider,
    LoggingConfig, QualityConfig,
};
pub use loader::load_config;
