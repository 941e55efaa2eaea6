pub mod settings;

pub use settings::{config_source, generate_default_config, Settings};
