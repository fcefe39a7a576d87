//! Process configuration, read from the environment (and `.env` via `dotenvy` in the binary).

use poise::serenity_prelude::GuildId;
use std::{path::PathBuf, time::Duration};

const DEFAULT_SETTINGS_FILE: &str = "settings.json";
const DEFAULT_THROTTLE_MS: u64 = 400;
const DEFAULT_PROGRESS_EVERY: usize = 5;
const DEFAULT_BAR_LENGTH: usize = 20;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing DISCORD_TOKEN")]
    MissingToken,
    #[error("{key} must be a positive integer, got `{value}`")]
    InvalidNumber { key: &'static str, value: String },
}

/// Tuning for the deletion loop.
#[derive(Debug, Clone, Copy)]
pub struct PurgeConfig {
    /// Delay between two deletion attempts.
    pub throttle: Duration,
    /// Edit the progress message every this many attempts.
    pub progress_every: usize,
    /// Width of the rendered progress bar.
    pub bar_length: usize,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        PurgeConfig {
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            progress_every: DEFAULT_PROGRESS_EVERY,
            bar_length: DEFAULT_BAR_LENGTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// When set, commands are registered to this guild only.
    pub guild_id: Option<GuildId>,
    pub settings_path: PathBuf,
    pub purge: PurgeConfig,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let guild_id = parse_number(&lookup, "GUILD_ID")?
            .filter(|&id| id != 0)
            .map(GuildId::new);

        let settings_path = lookup("SETTINGS_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE), PathBuf::from);

        let mut purge = PurgeConfig::default();
        if let Some(ms) = parse_number(&lookup, "PURGE_THROTTLE_MS")? {
            purge.throttle = Duration::from_millis(ms);
        }
        if let Some(every) = parse_number(&lookup, "PURGE_PROGRESS_EVERY")? {
            if every == 0 {
                return Err(ConfigError::InvalidNumber {
                    key: "PURGE_PROGRESS_EVERY",
                    value: every.to_string(),
                });
            }
            purge.progress_every = usize::try_from(every).unwrap_or(usize::MAX);
        }

        Ok(BotConfig {
            token,
            guild_id,
            settings_path,
            purge,
        })
    }
}

fn parse_number(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(None);
    };

    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}
