use crate::{Command, Context, Error, say_ephemeral};
use aformat::aformat;
use pb_core::purge::PurgeError;
use serenity::all::User;

pub fn commands() -> [Command; 3] {
    [purge_user(), status(), cancel_purge()]
}

/// Purge all messages from a specific user
#[poise::command(
    rename = "purgeuser",
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn purge_user(
    ctx: Context<'_>,
    #[description = "The user whose messages will be purged"] user: User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let initiated_by = ctx.author().name.clone();
    match ctx
        .data()
        .purges
        .start_purge(guild_id, user.id, Some(initiated_by))
    {
        Ok(_) => {
            let reply = aformat!("🧹 Starting purge for <@{}>...", user.id.get());
            say_ephemeral(ctx, reply.as_str()).await
        }
        Err(PurgeError::AlreadyRunning { .. }) => {
            say_ephemeral(ctx, "⚠️ A purge is already running in this server.").await
        }
    }
}

/// Check if a purge is running
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let purges = &ctx.data().purges;
    let text = match purges.active_job(guild_id) {
        Some(job) => job.render_status(purges.config().bar_length),
        None => "✅ No purge running.".to_owned(),
    };

    say_ephemeral(ctx, text).await
}

/// Cancel the ongoing purge
#[poise::command(
    rename = "cancelpurge",
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES"
)]
pub async fn cancel_purge(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    if ctx.data().purges.cancel_job(guild_id) {
        say_ephemeral(ctx, "🛑 Purge cancelled.").await
    } else {
        say_ephemeral(ctx, "❌ No purge running.").await
    }
}
