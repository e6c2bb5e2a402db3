//! Persistent user preferences that drive period and projection defaults.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::HorizonError,
    filter::DateRangeSelector,
    period::{MonthStartDay, PeriodType},
    recurring::DEFAULT_MONTHS_AHEAD,
};

const CONFIG_DIR_NAME: &str = "budget_horizon";
const CONFIG_FILE_NAME: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub month_start_day: MonthStartDay,
    #[serde(default = "Config::default_months_ahead")]
    pub months_ahead: u32,
    #[serde(default)]
    pub default_period: PeriodType,
    #[serde(default)]
    pub default_date_range: DateRangeSelector,
    /// Lifetime of cached profile lookups, in seconds.
    #[serde(default = "Config::default_profile_cache_ttl_secs")]
    pub profile_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            month_start_day: MonthStartDay::default(),
            months_ahead: Self::default_months_ahead(),
            default_period: PeriodType::default(),
            default_date_range: DateRangeSelector::default(),
            profile_cache_ttl_secs: Self::default_profile_cache_ttl_secs(),
        }
    }
}

impl Config {
    pub fn default_months_ahead() -> u32 {
        DEFAULT_MONTHS_AHEAD
    }

    pub fn default_profile_cache_ttl_secs() -> u64 {
        300
    }

    /// Cache lifetime as a duration; oversized values saturate to
    /// [`Duration::MAX`].
    pub fn profile_cache_ttl(&self) -> Duration {
        i64::try_from(self.profile_cache_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

/// Loads and stores [`Config`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Manager rooted in the platform configuration directory.
    pub fn default_location() -> Self {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, HorizonError> {
        fs::create_dir_all(&base)?;
        Ok(Self::new(base.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored config; a missing file yields defaults.
    pub fn load(&self) -> Result<Config, HorizonError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&data)?;
        tracing::debug!(path = %self.path.display(), "loaded config");
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), HorizonError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::info!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), HorizonError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
