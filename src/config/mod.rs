mod cli;
mod file;

pub use cli::{Cli, Command};

use crate::device::DeviceProfile;

/// Merged configuration from CLI args and TOML file.
#[derive(Debug, Clone)]
pub struct Config {
    pub toggle: bool,
    pub pen_device: String,
    pub profile: &'static DeviceProfile,
}

impl Config {
    /// Load configuration by merging TOML file with CLI overrides.
    pub fn load(cli: &Cli) -> Self {
        let file_config = cli
            .config
            .as_ref()
            .and_then(|p| file::load_from_path(p))
            .or_else(file::load_from_default_paths)
            .unwrap_or_default();

        let profile = DeviceProfile::resolve(cli.model.or(file_config.model));
        Self::merge(cli, file_config, profile)
    }

    fn merge(cli: &Cli, file_config: file::FileConfig, profile: &'static DeviceProfile) -> Self {
        Self {
            toggle: cli.toggle || file_config.toggle,
            pen_device: cli
                .pen_device
                .clone()
                .unwrap_or_else(|| file_config.pen_device.unwrap_or(profile.pen_device.into())),
            profile,
        }
    }

    pub fn mode(&self) -> &'static str {
        if self.toggle {
            "toggle"
        } else {
            "momentary"
        }
    }
}
