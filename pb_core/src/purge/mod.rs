//! Finding and deleting everything one user wrote in a guild.
//!
//! [`PurgeService`] owns the job registry (one live purge per guild) and the guild
//! locks. Admission is decided synchronously in [`PurgeService::start_purge`]; the
//! work itself runs on a spawned task, see `task.rs`.

mod collector;
mod job;
mod locks;
mod progress;
mod task;

pub use collector::{TargetMessage, collect};
pub use job::{ChannelTally, JobState, PurgeJob};
pub use locks::{GuildGuard, GuildLocks};
pub use progress::{Progress, ProgressSnapshot};

use crate::config::PurgeConfig;
use crate::host::GuildHost;
use crate::settings::Settings;
use dashmap::{DashMap, mapref::entry::Entry};
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, UserId};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, info, info_span, warn};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PurgeError {
    #[error("a purge is already running in guild {guild_id}")]
    AlreadyRunning { guild_id: GuildId },
}

pub struct PurgeService {
    host: Arc<dyn GuildHost>,
    settings: Arc<Settings>,
    config: PurgeConfig,
    /// The live job of every guild that has one.
    jobs: DashMap<GuildId, Arc<PurgeJob>>,
    locks: GuildLocks,
    next_id: AtomicU64,
}

impl PurgeService {
    #[must_use]
    pub fn new(host: Arc<dyn GuildHost>, settings: Arc<Settings>, config: PurgeConfig) -> Self {
        PurgeService {
            host,
            settings,
            config,
            jobs: DashMap::new(),
            locks: GuildLocks::new(),
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PurgeConfig {
        &self.config
    }

    #[must_use]
    pub fn locks(&self) -> &GuildLocks {
        &self.locks
    }

    /// Admits a purge of `user_id` in `guild_id` and starts it in the background.
    ///
    /// Fails straight away if the guild already has a live purge; nothing is locked
    /// or scanned in that case.
    pub fn start_purge(
        self: &Arc<Self>,
        guild_id: GuildId,
        user_id: UserId,
        initiated_by: Option<String>,
    ) -> Result<Arc<PurgeJob>, PurgeError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let job = Arc::new(PurgeJob::new(id, guild_id, user_id, initiated_by));

        match self.jobs.entry(guild_id) {
            Entry::Occupied(slot) if !slot.get().state().is_terminal() => {
                info!(
                    %guild_id,
                    %user_id,
                    running = slot.get().id(),
                    "purge denied, one is already running"
                );
                return Err(PurgeError::AlreadyRunning { guild_id });
            }
            Entry::Occupied(mut slot) => {
                slot.insert(Arc::clone(&job));
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&job));
            }
        }

        info!(
            %guild_id,
            %user_id,
            job = id,
            initiated_by = job.initiator_label(),
            "purge admitted"
        );

        let span = info_span!("purge", %guild_id, %user_id, job = id);
        tokio::spawn(Arc::clone(self).run(Arc::clone(&job)).instrument(span));

        Ok(job)
    }

    /// The guild's purge, if one is still going.
    #[must_use]
    pub fn active_job(&self, guild_id: GuildId) -> Option<Arc<PurgeJob>> {
        self.jobs
            .get(&guild_id)
            .map(|job| job.value().clone())
            .filter(|job| !job.state().is_terminal())
    }

    /// Requests cancellation of the guild's purge. Returns false if there was none.
    pub fn cancel_job(&self, guild_id: GuildId) -> bool {
        let Some(job) = self.active_job(guild_id) else {
            return false;
        };

        info!(%guild_id, job = job.id(), "cancellation requested");
        job.cancel();
        true
    }

    /// Posts `content` to the guild's log channel, if it has one.
    ///
    /// Returns whether a message was sent.
    pub async fn notify(&self, guild_id: GuildId, content: &str) -> bool {
        let Some(channel) = self.settings.log_channel(guild_id) else {
            return false;
        };

        self.send_log(channel, content).await.is_some()
    }

    async fn send_log(&self, channel_id: ChannelId, content: &str) -> Option<MessageId> {
        match self.host.send_message(channel_id, content).await {
            Ok(id) => Some(id),
            Err(why) => {
                warn!(%channel_id, error = %why, "could not send to log channel");
                None
            }
        }
    }

    async fn edit_log(&self, channel_id: ChannelId, message_id: MessageId, content: &str) {
        if let Err(why) = self.host.edit_message(channel_id, message_id, content).await {
            warn!(%channel_id, %message_id, error = %why, "could not edit progress message");
        }
    }

    /// Removes `job` from the registry, unless a newer job already replaced it.
    fn deregister(&self, job: &PurgeJob) {
        self.jobs
            .remove_if(&job.guild_id(), |_, current| current.id() == job.id());
    }
}
