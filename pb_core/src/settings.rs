use crate::Error;
use parking_lot::RwLock;
use poise::serenity_prelude::{ChannelId, GuildId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// On-disk shape: `{"guilds": {"<guild id>": {"log_channel_id": 123}}}`.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct SettingsFile {
    #[serde(default)]
    pub guilds: HashMap<String, GuildSettings>,
}

#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuildSettings {
    #[serde(default)]
    pub log_channel_id: Option<u64>,
}

pub struct Settings {
    /// None keeps everything in memory.
    path: Option<PathBuf>,
    inner: RwLock<SettingsFile>,
}

impl Settings {
    /// Reads the settings file, creating an empty one if it doesn't exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();

        let inner = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<SettingsFile>(&contents)
                .map_err(|e| format!("Cannot read settings file {}: {e}", path.display()))?,
            Err(error) => match error.kind() {
                std::io::ErrorKind::NotFound => {
                    let empty = SettingsFile::default();
                    write_file(&path, &empty)?;
                    empty
                }
                _ => return Err(format!("Cannot load file {}: {error}", path.display()).into()),
            },
        };

        Ok(Settings {
            path: Some(path),
            inner: RwLock::new(inner),
        })
    }

    #[must_use]
    pub fn ephemeral() -> Self {
        Settings {
            path: None,
            inner: RwLock::new(SettingsFile::default()),
        }
    }

    #[must_use]
    pub fn log_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.inner
            .read()
            .guilds
            .get(&guild_id.to_string())
            .and_then(|g| g.log_channel_id)
            .filter(|&id| id != 0)
            .map(ChannelId::new)
    }

    pub fn set_log_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), Error> {
        let snapshot = {
            let mut inner = self.inner.write();
            inner
                .guilds
                .entry(guild_id.to_string())
                .or_default()
                .log_channel_id = Some(channel_id.get());
            inner.clone()
        };

        self.persist(&snapshot)
    }

    fn persist(&self, contents: &SettingsFile) -> Result<(), Error> {
        match &self.path {
            Some(path) => write_file(path, contents),
            None => Ok(()),
        }
    }
}

/// Writes next to `path` and renames over it, so a failed write never leaves a
/// half-written settings file behind.
fn write_file(path: &Path, contents: &SettingsFile) -> Result<(), Error> {
    let tmp_path = path.with_extension("json.tmp");
    let mut file = std::fs::File::create(&tmp_path)?;
    serde_json::to_writer_pretty(&mut file, contents)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
