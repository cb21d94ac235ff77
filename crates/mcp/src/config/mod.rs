//! Configuration management for the report facade.

mod io;
mod model;
mod validation;

pub use io::{CONFIG_PATH_ENV, default_config_path, load_config, load_config_from_path};
pub use model::{ConfigError, EngineConfig, HttpServerConfig, ReportsConfig};
pub use validation::{ValidationError, validate_config};
