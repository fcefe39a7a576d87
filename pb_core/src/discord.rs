use crate::Error;
use crate::host::{ActiveThread, Archive, GuildHost, HistoryEntry, Source};
use async_trait::async_trait;
use poise::serenity_prelude::{
    ChannelId, ChannelType, EditMessage, GetMessages, GuildChannel, GuildId, Http, MessageId,
};
use std::sync::Arc;

// Discord caps both message and thread pages at 100.
const PAGE_SIZE: u8 = 100;

/// [`GuildHost`] over serenity's REST client.
pub struct DiscordHost {
    http: Arc<Http>,
}

impl DiscordHost {
    #[must_use]
    pub fn new(http: Arc<Http>) -> Self {
        DiscordHost { http }
    }

    async fn archived_pages(
        &self,
        parent: ChannelId,
        archive: Archive,
    ) -> Result<Vec<GuildChannel>, Error> {
        let http: &Http = &self.http;
        let mut threads = Vec::new();
        let mut before = None;

        loop {
            let page = match archive {
                Archive::Public => {
                    parent
                        .get_archived_public_threads(http, before, Some(u64::from(PAGE_SIZE)))
                        .await?
                }
                Archive::Private => {
                    parent
                        .get_archived_private_threads(http, before, Some(u64::from(PAGE_SIZE)))
                        .await?
                }
            };

            #[allow(clippy::cast_sign_loss)]
            let next = page
                .threads
                .last()
                .and_then(|t| t.thread_metadata.as_ref())
                .and_then(|m| m.archive_timestamp)
                .map(|ts| ts.unix_timestamp() as u64);

            threads.extend(page.threads);

            match next {
                Some(next) if page.has_more => before = Some(next),
                _ => break,
            }
        }

        Ok(threads)
    }
}

#[async_trait]
impl GuildHost for DiscordHost {
    async fn text_channels(&self, guild_id: GuildId) -> Result<Vec<Source>, Error> {
        let mut channels = self.http.get_channels(guild_id).await?;
        channels.retain(|c| matches!(c.kind, ChannelType::Text | ChannelType::News));
        channels.sort_by_key(|c| (c.position, c.id));

        Ok(channels
            .into_iter()
            .map(|c| Source::new(c.id, c.name))
            .collect())
    }

    async fn active_threads(&self, guild_id: GuildId) -> Result<Vec<ActiveThread>, Error> {
        let threads = self.http.get_guild_active_threads(guild_id).await?.threads;

        Ok(threads
            .into_iter()
            .filter_map(|t| {
                Some(ActiveThread {
                    parent_id: t.parent_id?,
                    source: Source::new(t.id, t.name),
                })
            })
            .collect())
    }

    async fn archived_threads(
        &self,
        parent: ChannelId,
        archive: Archive,
    ) -> Result<Vec<Source>, Error> {
        Ok(self
            .archived_pages(parent, archive)
            .await?
            .into_iter()
            .map(|t| Source::new(t.id, t.name))
            .collect())
    }

    async fn history(&self, channel_id: ChannelId) -> Result<Vec<HistoryEntry>, Error> {
        let http: &Http = &self.http;
        let mut entries = Vec::new();
        // snowflakes are never 0, so this pages from the very first message.
        let mut after = MessageId::new(1);

        loop {
            let mut page = channel_id
                .messages(http, GetMessages::new().after(after).limit(PAGE_SIZE))
                .await?;
            page.sort_by_key(|m| m.id);

            let Some(last) = page.last() else { break };
            after = last.id;
            let full = page.len() == usize::from(PAGE_SIZE);

            entries.extend(page.iter().map(|m| HistoryEntry {
                id: m.id,
                author: m.author.id,
            }));

            if !full {
                break;
            }
        }

        Ok(entries)
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), Error> {
        let http: &Http = &self.http;
        channel_id.delete_message(http, message_id).await?;
        Ok(())
    }

    async fn send_message(&self, channel_id: ChannelId, content: &str) -> Result<MessageId, Error> {
        let http: &Http = &self.http;
        Ok(channel_id.say(http, content).await?.id)
    }

    async fn edit_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        content: &str,
    ) -> Result<(), Error> {
        let http: &Http = &self.http;
        channel_id
            .edit_message(http, message_id, EditMessage::new().content(content))
            .await?;
        Ok(())
    }
}
