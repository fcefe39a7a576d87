#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use pb_core::Error;
use pb_core::config::PurgeConfig;
use pb_core::host::{ActiveThread, Archive, GuildHost, HistoryEntry, Source};
use pb_core::purge::{PurgeJob, PurgeService};
use pb_core::settings::Settings;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

pub const GUILD: GuildId = GuildId::new(1);
pub const TARGET: UserId = UserId::new(42);
pub const OTHER: UserId = UserId::new(7);
pub const LOG: ChannelId = ChannelId::new(999);

/// A guild held in memory. Records every call the purge makes against it.
#[derive(Default)]
pub struct MockHost {
    channels: Vec<Source>,
    active: Vec<ActiveThread>,
    archived: HashMap<(ChannelId, Archive), Vec<Source>>,
    histories: HashMap<ChannelId, Vec<HistoryEntry>>,
    unreadable: HashSet<ChannelId>,
    failing_deletes: HashSet<MessageId>,
    failing_archives: HashSet<(ChannelId, Archive)>,
    broken_channel_listing: bool,
    broken_active_listing: bool,
    broken_sends: bool,
    broken_edits: bool,
    cancel_after: Mutex<Option<(usize, Arc<PurgeJob>)>>,
    pub channel_listings: AtomicUsize,
    pub active_listings: AtomicUsize,
    pub deletes: Mutex<Vec<MessageId>>,
    pub sent: Mutex<Vec<String>>,
    pub edits: Mutex<Vec<String>>,
    next_message: AtomicU64,
}

fn entries(history: &[(u64, UserId)]) -> Vec<HistoryEntry> {
    history
        .iter()
        .map(|&(id, author)| HistoryEntry {
            id: MessageId::new(id),
            author,
        })
        .collect()
}

impl MockHost {
    pub fn new() -> Self {
        MockHost {
            next_message: AtomicU64::new(10_000),
            ..Default::default()
        }
    }

    pub fn channel(mut self, id: u64, name: &str, history: &[(u64, UserId)]) -> Self {
        let id = ChannelId::new(id);
        self.channels.push(Source::new(id, name));
        self.histories.insert(id, entries(history));
        self
    }

    pub fn active_thread(
        mut self,
        parent: u64,
        id: u64,
        name: &str,
        history: &[(u64, UserId)],
    ) -> Self {
        let id = ChannelId::new(id);
        self.active.push(ActiveThread {
            parent_id: ChannelId::new(parent),
            source: Source::new(id, name),
        });
        self.histories.insert(id, entries(history));
        self
    }

    pub fn archived_thread(
        mut self,
        parent: u64,
        archive: Archive,
        id: u64,
        name: &str,
        history: &[(u64, UserId)],
    ) -> Self {
        let id = ChannelId::new(id);
        self.archived
            .entry((ChannelId::new(parent), archive))
            .or_default()
            .push(Source::new(id, name));
        self.histories.insert(id, entries(history));
        self
    }

    pub fn unreadable(mut self, id: u64) -> Self {
        self.unreadable.insert(ChannelId::new(id));
        self
    }

    pub fn failing_delete(mut self, id: u64) -> Self {
        self.failing_deletes.insert(MessageId::new(id));
        self
    }

    /// Listing archived threads of `parent` fails.
    pub fn failing_archive(mut self, parent: u64, archive: Archive) -> Self {
        self.failing_archives.insert((ChannelId::new(parent), archive));
        self
    }

    pub fn broken_channel_listing(mut self) -> Self {
        self.broken_channel_listing = true;
        self
    }

    pub fn broken_active_listing(mut self) -> Self {
        self.broken_active_listing = true;
        self
    }

    /// Every send to the log channel fails.
    pub fn broken_sends(mut self) -> Self {
        self.broken_sends = true;
        self
    }

    /// Every progress edit fails.
    pub fn broken_edits(mut self) -> Self {
        self.broken_edits = true;
        self
    }

    /// Cancels `job` while the `n`th delete call is in flight.
    pub fn cancel_during_delete(&self, n: usize, job: Arc<PurgeJob>) {
        *self.cancel_after.lock() = Some((n, job));
    }

    pub fn deleted_ids(&self) -> Vec<u64> {
        self.deletes.lock().iter().map(|id| id.get()).collect()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn edits(&self) -> Vec<String> {
        self.edits.lock().clone()
    }
}

#[async_trait]
impl GuildHost for MockHost {
    async fn text_channels(&self, _guild_id: GuildId) -> Result<Vec<Source>, Error> {
        self.channel_listings.fetch_add(1, Ordering::SeqCst);
        if self.broken_channel_listing {
            return Err("Internal Server Error".into());
        }
        Ok(self.channels.clone())
    }

    async fn active_threads(&self, _guild_id: GuildId) -> Result<Vec<ActiveThread>, Error> {
        self.active_listings.fetch_add(1, Ordering::SeqCst);
        if self.broken_active_listing {
            return Err("Internal Server Error".into());
        }
        Ok(self.active.clone())
    }

    async fn archived_threads(
        &self,
        parent: ChannelId,
        archive: Archive,
    ) -> Result<Vec<Source>, Error> {
        if self.failing_archives.contains(&(parent, archive)) {
            return Err("Missing Access".into());
        }
        Ok(self
            .archived
            .get(&(parent, archive))
            .cloned()
            .unwrap_or_default())
    }

    async fn history(&self, channel_id: ChannelId) -> Result<Vec<HistoryEntry>, Error> {
        if self.unreadable.contains(&channel_id) {
            return Err("Missing Access".into());
        }
        Ok(self
            .histories
            .get(&channel_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn delete_message(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), Error> {
        let count = {
            let mut deletes = self.deletes.lock();
            deletes.push(message_id);
            deletes.len()
        };

        if let Some((n, job)) = self.cancel_after.lock().as_ref() {
            if *n == count {
                job.cancel();
            }
        }

        if self.failing_deletes.contains(&message_id) {
            return Err("Unknown Message".into());
        }
        Ok(())
    }

    async fn send_message(&self, _channel_id: ChannelId, content: &str) -> Result<MessageId, Error> {
        if self.broken_sends {
            return Err("Missing Permissions".into());
        }
        self.sent.lock().push(content.to_owned());
        Ok(MessageId::new(
            self.next_message.fetch_add(1, Ordering::SeqCst),
        ))
    }

    async fn edit_message(
        &self,
        _channel_id: ChannelId,
        _message_id: MessageId,
        content: &str,
    ) -> Result<(), Error> {
        if self.broken_edits {
            return Err("Unknown Message".into());
        }
        self.edits.lock().push(content.to_owned());
        Ok(())
    }
}

pub fn config() -> PurgeConfig {
    PurgeConfig {
        throttle: Duration::ZERO,
        progress_every: 5,
        bar_length: 10,
    }
}

/// A service over `host`, logging to [`LOG`] when `with_log` is set.
pub fn service(host: &Arc<MockHost>, with_log: bool) -> Arc<PurgeService> {
    service_with(host, with_log, config())
}

pub fn service_with(host: &Arc<MockHost>, with_log: bool, config: PurgeConfig) -> Arc<PurgeService> {
    let settings = Arc::new(Settings::ephemeral());
    if with_log {
        settings.set_log_channel(GUILD, LOG).unwrap();
    }

    let host: Arc<dyn GuildHost> = host.clone();
    Arc::new(PurgeService::new(host, settings, config))
}
