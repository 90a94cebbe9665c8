//! Application-level configuration loading, including default team names and timer length.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FAMILIADA_BACK_CONFIG_PATH";
/// Team name used for side A when the configuration does not provide one.
const DEFAULT_TEAM_A_NAME: &str = "Team A";
/// Team name used for side B when the configuration does not provide one.
const DEFAULT_TEAM_B_NAME: &str = "Team B";
/// Countdown length in seconds used when starting the final-mode timer.
const DEFAULT_TIMER_SECONDS: u32 = 15;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    team_a_name: String,
    team_b_name: String,
    timer_seconds: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        team_a = %app_config.team_a_name,
                        team_b = %app_config.team_b_name,
                        "loaded application config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Display name seeded for team A on a fresh board.
    pub fn default_team_a_name(&self) -> &str {
        &self.team_a_name
    }

    /// Display name seeded for team B on a fresh board.
    pub fn default_team_b_name(&self) -> &str {
        &self.team_b_name
    }

    /// Countdown length applied when the final-mode timer is started without an explicit value.
    pub fn default_timer_seconds(&self) -> u32 {
        self.timer_seconds
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            team_a_name: DEFAULT_TEAM_A_NAME.to_owned(),
            team_b_name: DEFAULT_TEAM_B_NAME.to_owned(),
            timer_seconds: DEFAULT_TIMER_SECONDS,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    team_a_name: Option<String>,
    team_b_name: Option<String>,
    timer_seconds: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            team_a_name: value.team_a_name.unwrap_or(defaults.team_a_name),
            team_b_name: value.team_b_name.unwrap_or(defaults.team_b_name),
            timer_seconds: value.timer_seconds.unwrap_or(defaults.timer_seconds),
        }
    }
}

/// Determine which configuration path should be read, honoring the override env variable.
fn resolve_config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}
