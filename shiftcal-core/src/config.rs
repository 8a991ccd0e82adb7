//! Global shiftcal configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{ShiftError, ShiftResult};
use crate::export::ExportScope;

static DEFAULT_DATA_DIR: &str = "~/.shiftcal";
static DEFAULT_TIMEZONE: &str = "UTC";

/// Keys accepted by [`ShiftcalConfig::set`].
pub const SETTINGS: [&str; 4] = ["data_dir", "overwrite_policy", "timezone", "export_all"];

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn is_default_timezone(tz: &String) -> bool {
    tz == DEFAULT_TIMEZONE
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// What to do when a shift is placed on a day that already has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwritePolicy {
    /// Ask before replacing
    #[default]
    Confirm,
    /// Replace silently
    Replace,
}

impl OverwritePolicy {
    fn is_default(&self) -> bool {
        *self == OverwritePolicy::default()
    }
}

impl FromStr for OverwritePolicy {
    type Err = ShiftError;

    fn from_str(s: &str) -> ShiftResult<Self> {
        match s {
            "confirm" => Ok(OverwritePolicy::Confirm),
            "replace" => Ok(OverwritePolicy::Replace),
            other => Err(ShiftError::Config(format!(
                "Unknown overwrite policy '{other}'. Expected \"confirm\" or \"replace\""
            ))),
        }
    }
}

/// Global configuration at ~/.config/shiftcal/config.toml
///
/// Any key can also be set through a `SHIFTCAL_<KEY>` environment variable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ShiftcalConfig {
    /// Where shift types and schedules are stored
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default, skip_serializing_if = "OverwritePolicy::is_default")]
    pub overwrite_policy: OverwritePolicy,

    /// IANA zone that entered shift times belong to
    #[serde(default = "default_timezone", skip_serializing_if = "is_default_timezone")]
    pub timezone: String,

    /// Start with the export scope set to all months
    #[serde(default, skip_serializing_if = "is_false")]
    pub export_all: bool,
}

impl Default for ShiftcalConfig {
    fn default() -> Self {
        ShiftcalConfig {
            data_dir: default_data_dir(),
            overwrite_policy: OverwritePolicy::default(),
            timezone: default_timezone(),
            export_all: false,
        }
    }
}

impl ShiftcalConfig {
    pub fn config_path() -> ShiftResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ShiftError::Config("Could not determine config directory".into()))?
            .join("shiftcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from its default location, creating a commented
    /// template there on first run.
    pub fn load() -> ShiftResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load `path` with `SHIFTCAL_*` environment overrides applied.
    pub fn load_from(path: &Path) -> ShiftResult<Self> {
        Self::read(path, true)
    }

    fn read(path: &Path, with_env: bool) -> ShiftResult<Self> {
        let mut builder = Config::builder().add_source(File::from(path).required(false));
        if with_env {
            builder = builder.add_source(Environment::with_prefix("SHIFTCAL"));
        }

        let config: ShiftcalConfig = builder
            .build()
            .map_err(|e| ShiftError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ShiftError::Config(e.to_string()))?;

        // Fail early on a bad zone rather than at export time
        config.tz()?;
        Ok(config)
    }

    /// Change one setting by its config file key.
    pub fn set(&mut self, key: &str, value: &str) -> ShiftResult<()> {
        match key {
            "data_dir" => self.data_dir = PathBuf::from(value),
            "overwrite_policy" => self.overwrite_policy = value.parse()?,
            "timezone" => {
                Tz::from_str(value)
                    .map_err(|_| ShiftError::Config(format!("Unknown timezone '{value}'")))?;
                self.timezone = value.to_string();
            }
            "export_all" => {
                self.export_all = value.parse().map_err(|_| {
                    ShiftError::Config(format!("export_all must be true or false, not '{value}'"))
                })?
            }
            other => {
                return Err(ShiftError::Config(format!(
                    "Unknown setting '{other}'. Expected one of: {}",
                    SETTINGS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Set one key in the config file at `path` and write it back.
    ///
    /// The file is read without environment overrides so that they are not
    /// persisted. Returns the config as written.
    pub fn set_in_file(path: &Path, key: &str, value: &str) -> ShiftResult<Self> {
        let mut config = Self::read(path, false)?;
        config.set(key, value)?;
        config.save_to(path)?;
        Ok(config)
    }

    /// `data_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn tz(&self) -> ShiftResult<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|_| ShiftError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    pub fn export_scope(&self) -> ExportScope {
        if self.export_all {
            ExportScope::AllMonths
        } else {
            ExportScope::CurrentMonth
        }
    }

    pub fn save_to(&self, path: &Path) -> ShiftResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ShiftError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| ShiftError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> ShiftResult<()> {
        let contents = format!(
            "\
# shiftcal configuration

# Where shift types and schedules are stored:
# data_dir = \"{}\"

# Placing a shift on a day that already has one: \"confirm\" or \"replace\"
# overwrite_policy = \"confirm\"

# Timezone of the shift times, used when exporting to iCal:
# timezone = \"{}\"

# Export every stored month instead of just the current one:
# export_all = false
",
            DEFAULT_DATA_DIR, DEFAULT_TIMEZONE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ShiftError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| ShiftError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
