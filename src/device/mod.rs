mod rm1;
mod rm2;
mod rmpp;

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use rm1::RM1;
pub use rm2::RM2;
pub use rmpp::RMPP;

const MODEL_PATH: &str = "/proc/device-tree/model";

/// Device-specific parameters for reading the pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub name: &'static str,

    // Raw input_event size on the device (bytes)
    pub input_event_size: usize,

    // Default pen device path
    pub pen_device: &'static str,
}

impl DeviceProfile {
    /// Profile used when the model can't be detected.
    pub fn fallback() -> &'static Self {
        &RM2
    }

    /// Detect the device from the device-tree model string.
    pub fn detect() -> Result<&'static Self, Box<dyn std::error::Error + Send + Sync>> {
        Self::detect_from(Path::new(MODEL_PATH))
    }

    fn detect_from(path: &Path) -> Result<&'static Self, Box<dyn std::error::Error + Send + Sync>> {
        let output = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        // The device tree string is NUL-terminated.
        let model = output.trim_end_matches('\0').trim();
        if model.is_empty() {
            return Err("Device model is empty".into());
        }

        log::debug!("Detected device model: {}", model);
        Self::from_model(model).ok_or_else(|| format!("Unsupported device model: '{}'", model).into())
    }

    fn from_model(model: &str) -> Option<&'static Self> {
        // Check for rMPP first (more specific)
        if model.contains("reMarkable Ferrari") {
            return Some(&RMPP);
        }
        if model.contains("reMarkable 2") {
            return Some(&RM2);
        }
        if model.contains("reMarkable 1") {
            return Some(&RM1);
        }
        None
    }

    /// Resolve the profile: explicit model if given, otherwise detection,
    /// otherwise the rM2 defaults.
    pub fn resolve(model: Option<Model>) -> &'static Self {
        if let Some(model) = model {
            let profile = model.profile();
            log::info!("Using {} profile ({})", model, profile.name);
            return profile;
        }
        match Self::detect() {
            Ok(profile) => {
                log::info!("Detected {}", profile.name);
                profile
            }
            Err(e) => {
                let fallback = Self::fallback();
                log::warn!("{}; assuming {}", e, fallback.name);
                fallback
            }
        }
    }
}

/// Model names accepted on the command line and in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    Rm1,
    Rm2,
    Rmpp,
}

impl Model {
    pub fn profile(self) -> &'static DeviceProfile {
        match self {
            Model::Rm1 => &RM1,
            Model::Rm2 => &RM2,
            Model::Rmpp => &RMPP,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Rm1 => write!(f, "rm1"),
            Model::Rm2 => write!(f, "rm2"),
            Model::Rmpp => write!(f, "rmpp"),
        }
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rm1" | "remarkable1" => Ok(Model::Rm1),
            "rm2" | "remarkable2" => Ok(Model::Rm2),
            "rmpp" | "paper-pro" | "paperpro" => Ok(Model::Rmpp),
            _ => Err(format!("Invalid model '{}'. Valid values: rm1, rm2, rmpp", s)),
        }
    }
}
