//! The slice of the chat platform the purge core talks to.
//!
//! [`crate::discord::DiscordHost`] is the real implementation; tests provide an
//! in-memory one.

use crate::Error;
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, UserId};

/// A channel or thread that holds messages, with the name used in tallies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: ChannelId,
    pub label: String,
}

impl Source {
    pub fn new(id: ChannelId, label: impl Into<String>) -> Self {
        Source {
            id,
            label: label.into(),
        }
    }
}

/// The parts of a history entry the collector looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: MessageId,
    pub author: UserId,
}

/// A thread that is currently open, with the channel it hangs off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveThread {
    pub parent_id: ChannelId,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archive {
    Public,
    Private,
}

impl Archive {
    /// Scan order used by the collector.
    pub const ALL: [Archive; 2] = [Archive::Public, Archive::Private];
}

#[async_trait]
pub trait GuildHost: Send + Sync {
    /// Text channels of the guild, in display order.
    async fn text_channels(&self, guild_id: GuildId) -> Result<Vec<Source>, Error>;

    /// Every open thread in the guild. Fetched once per collection.
    async fn active_threads(&self, guild_id: GuildId) -> Result<Vec<ActiveThread>, Error>;

    /// Archived threads under `parent`, newest archive first.
    async fn archived_threads(
        &self,
        parent: ChannelId,
        archive: Archive,
    ) -> Result<Vec<Source>, Error>;

    /// Full history of a channel or thread, oldest first.
    async fn history(&self, channel_id: ChannelId) -> Result<Vec<HistoryEntry>, Error>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), Error>;

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<MessageId, Error>;

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), Error>;
}
