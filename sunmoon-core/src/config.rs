use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf};

use crate::civil::CivilZone;
use crate::model::DefaultLocation;

/// Datasource settings stored on disk.
///
/// Example TOML:
/// ```toml
/// latitude = 45.0
/// longitude = 8.97
/// civil_zone = "local"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Default latitude for queries without an override.
    pub latitude: Option<f64>,

    /// Default longitude for queries without an override.
    pub longitude: Option<f64>,

    /// Zone for calendar days and the `noon`/`midnight` annotations.
    #[serde(default)]
    pub civil_zone: CivilZone,

    /// Log filter used when `RUST_LOG` is unset, e.g. "sunmoon=debug".
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Ok,
    Error,
}

/// Outcome of [`Settings::check_health`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub message: String,
}

impl HealthReport {
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

impl fmt::Display for HealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

const ENV_LATITUDE: &str = "SUNMOON_LATITUDE";
const ENV_LONGITUDE: &str = "SUNMOON_LONGITUDE";
const ENV_CIVIL_ZONE: &str = "SUNMOON_CIVIL_ZONE";
const ENV_LOG_LEVEL: &str = "SUNMOON_LOG_LEVEL";

impl Settings {
    pub fn default_location(&self) -> DefaultLocation {
        DefaultLocation {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn set_default_location(&mut self, latitude: f64, longitude: f64) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
    }

    /// Range check applied whenever settings are loaded.
    pub fn validate(&self) -> Result<()> {
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                bail!("Latitude not in range -90 to +90: {lat}");
            }
        }

        if let Some(lon) = self.longitude {
            if !(-360.0..=360.0).contains(&lon) {
                bail!("Longitude not in range -360 to +360: {lon}");
            }
        }

        Ok(())
    }

    /// Datasource health: a default location must exist and lie on the
    /// usual map (longitude -180 to +180).
    pub fn check_health(&self) -> HealthReport {
        let (Some(lat), Some(lon)) = (self.latitude, self.longitude) else {
            return HealthReport {
                status: HealthStatus::Error,
                message: "Error: No default location configured.\n\
                          Hint: run `sunmoon configure` first."
                    .to_string(),
            };
        };

        let mut errors = Vec::new();
        if !(-90.0..=90.0).contains(&lat) {
            errors.push("Latitude not in range -90 to +90.");
        }
        if !(-180.0..=180.0).contains(&lon) {
            errors.push("Longitude not in range -180 to +180.");
        }

        if errors.is_empty() {
            HealthReport {
                status: HealthStatus::Ok,
                message: "Datasource added successfully.".to_string(),
            }
        } else {
            HealthReport {
                status: HealthStatus::Error,
                message: format!("Error: {}", errors.join(" ")),
            }
        }
    }

    /// Load settings from the platform config file, apply environment
    /// overrides and validate. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut settings = Self::load_from(&path)?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read a settings file without overrides or validation.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to the platform config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save settings, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "sunmoon", "sunmoon")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override fields from `SUNMOON_*` variables looked up through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(lat) = lookup(ENV_LATITUDE) {
            self.latitude = Some(
                lat.trim()
                    .parse()
                    .with_context(|| format!("{ENV_LATITUDE} is not a number: {lat}"))?,
            );
        }

        if let Some(lon) = lookup(ENV_LONGITUDE) {
            self.longitude = Some(
                lon.trim()
                    .parse()
                    .with_context(|| format!("{ENV_LONGITUDE} is not a number: {lon}"))?,
            );
        }

        if let Some(zone) = lookup(ENV_CIVIL_ZONE) {
            self.civil_zone = CivilZone::try_from(zone.as_str())?;
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = Some(level);
        }

        Ok(())
    }
}
