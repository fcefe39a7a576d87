use crate::Data;
use aformat::aformat;
use pb_core::purge::PurgeError;
use serenity::all::{GuildId, User};
use tracing::info;

/// Purges whatever a departing member left behind, unless a purge is already busy.
pub async fn handle(data: &Data, guild_id: GuildId, user: &User) {
    match data.purges.start_purge(guild_id, user.id, None) {
        Ok(job) => {
            info!(
                %guild_id,
                user_id = %user.id,
                job = job.id(),
                "member left, auto purge started"
            );
        }
        Err(PurgeError::AlreadyRunning { .. }) => {
            info!(%guild_id, user_id = %user.id, "member left, auto purge skipped");
            let notice = aformat!(
                "⚠️ Auto purge skipped for <@{}> because a purge is already running.",
                user.id.get()
            );
            data.purges.notify(guild_id, notice.as_str()).await;
        }
    }
}
