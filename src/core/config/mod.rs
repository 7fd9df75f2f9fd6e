pub mod data;
pub mod io;
pub mod printing;
pub mod settings;

pub use data::{path_display, Config, ConfigKeyError, CONFIG_KEYS};
pub use io::ConfigError;
pub use settings::{Settings, SettingsOverrides};
