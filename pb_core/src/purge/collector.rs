use crate::host::{Archive, GuildHost, Source};
use itertools::Itertools;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, UserId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A message queued for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// Name of the channel or thread, used for the per-channel tally.
    pub channel_label: String,
}

/// Finds every message `user_id` wrote in the guild.
///
/// Per channel: its own history, then active threads, archived public threads and
/// archived private threads, all oldest first. Anything that can't be read is
/// skipped, so one locked channel never stops the scan. Active threads are listed
/// once for the whole guild and grouped by parent.
pub async fn collect(
    host: &dyn GuildHost,
    guild_id: GuildId,
    user_id: UserId,
) -> Vec<TargetMessage> {
    let channels = match host.text_channels(guild_id).await {
        Ok(channels) => channels,
        Err(why) => {
            warn!(%guild_id, error = %why, "could not list channels");
            return Vec::new();
        }
    };

    let mut active: HashMap<ChannelId, Vec<Source>> = match host.active_threads(guild_id).await {
        Ok(threads) => threads
            .into_iter()
            .map(|t| (t.parent_id, t.source))
            .into_group_map(),
        Err(why) => {
            warn!(%guild_id, error = %why, "could not list active threads");
            HashMap::new()
        }
    };

    let mut found = Vec::new();
    for channel in &channels {
        scan(host, channel, user_id, &mut found).await;

        for thread in active.remove(&channel.id).unwrap_or_default() {
            scan(host, &thread, user_id, &mut found).await;
        }

        for archive in Archive::ALL {
            let threads = match host.archived_threads(channel.id, archive).await {
                Ok(threads) => threads,
                Err(why) => {
                    warn!(
                        channel_id = %channel.id,
                        ?archive,
                        error = %why,
                        "could not list archived threads"
                    );
                    continue;
                }
            };

            for thread in &threads {
                scan(host, thread, user_id, &mut found).await;
            }
        }
    }

    debug!(%guild_id, %user_id, count = found.len(), "collection finished");
    found
}

async fn scan(
    host: &dyn GuildHost,
    source: &Source,
    user_id: UserId,
    found: &mut Vec<TargetMessage>,
) {
    let history = match host.history(source.id).await {
        Ok(history) => history,
        Err(why) => {
            warn!(channel_id = %source.id, error = %why, "skipping unreadable channel");
            return;
        }
    };

    found.extend(
        history
            .into_iter()
            .filter(|entry| entry.author == user_id)
            .map(|entry| TargetMessage {
                id: entry.id,
                channel_id: source.id,
                channel_label: source.label.clone(),
            }),
    );
}
