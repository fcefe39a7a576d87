use dashmap::DashMap;
use poise::serenity_prelude::GuildId;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Held for as long as a purge owns its guild.
pub type GuildGuard = OwnedMutexGuard<()>;

/// One lock per guild, created the first time the guild is seen and kept forever.
#[derive(Default)]
pub struct GuildLocks {
    locks: DashMap<GuildId, Arc<Mutex<()>>>,
}

impl GuildLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        self.locks.entry(guild_id).or_default().value().clone()
    }

    /// Waits until the guild's lock is free.
    pub async fn acquire(&self, guild_id: GuildId) -> GuildGuard {
        self.lock_for(guild_id).lock_owned().await
    }

    /// Returns None if someone else holds the guild.
    #[must_use]
    pub fn try_acquire(&self, guild_id: GuildId) -> Option<GuildGuard> {
        self.lock_for(guild_id).try_lock_owned().ok()
    }

    #[must_use]
    pub fn is_locked(&self, guild_id: GuildId) -> bool {
        self.locks
            .get(&guild_id)
            .is_some_and(|lock| lock.try_lock().is_err())
    }

    /// Number of guilds that ever had a lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
