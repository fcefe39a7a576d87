use crate::{Command, Context, Error, checks, say_ephemeral};
use serenity::all::{Colour, CreateEmbed, GuildChannel};
use tracing::info;

pub fn commands() -> [Command; 3] {
    [setup(), help(), register()]
}

/// Check permissions and select log channel
#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    required_permissions = "ADMINISTRATOR"
)]
pub async fn setup(
    ctx: Context<'_>,
    #[description = "Where purge progress is posted (defaults to the first channel I can post in)"]
    #[channel_types("Text")]
    channel: Option<GuildChannel>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    let me = guild_id
        .member(ctx.serenity_context(), ctx.framework().bot_id)
        .await?;

    // the cache guard can't be held across an await, so work everything out up front.
    let (missing, target) = {
        let Some(guild) = ctx.guild() else {
            return Err("This server isn't cached yet, please try again in a moment.".into());
        };

        #[allow(deprecated)]
        let missing = checks::missing_permissions(guild.member_permissions(&me));
        let target = match &channel {
            Some(channel) => checks::can_send_in(&guild, channel, &me).then_some(channel.id),
            None => checks::first_sendable_channel(&guild, &me),
        };
        (missing, target)
    };

    if !missing.is_empty() {
        return say_ephemeral(
            ctx,
            format!("⚠️ Missing permissions: {}", missing.join(", ")),
        )
        .await;
    }

    let Some(log_channel) = target else {
        let reply = if channel.is_some() {
            "❌ I can't send messages in that channel."
        } else {
            "❌ No suitable text channels for logging."
        };
        return say_ephemeral(ctx, reply).await;
    };

    ctx.data().settings.set_log_channel(guild_id, log_channel)?;
    info!(%guild_id, %log_channel, "log channel configured");

    say_ephemeral(
        ctx,
        format!("✅ Setup complete! Logs will be sent to <#{log_channel}>"),
    )
    .await
}

/// Show bot command documentation
#[poise::command(prefix_command, slash_command, required_permissions = "ADMINISTRATOR")]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let embed = CreateEmbed::new()
        .title("🧹 Purge Bot: Help & Commands")
        .description(format!("**Version:** {}", env!("CARGO_PKG_VERSION")))
        .colour(Colour::DARK_RED)
        .field(
            "/purgeuser user:<user>",
            "Deletes all messages from a user with live progress, ETA and a channel breakdown.",
            false,
        )
        .field("/status", "Shows live progress of an ongoing purge.", false)
        .field("/cancelpurge", "Cancels the ongoing purge safely.", false)
        .field(
            "/setup [channel]",
            "Checks my permissions and selects the log channel.",
            false,
        )
        .field(
            "Auto purge on leave",
            "Automatically purges when a member leaves the server.",
            false,
        );

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;

    Ok(())
}

/// Re-sync slash commands after an update (bot owners only)
#[poise::command(prefix_command, owners_only, hide_in_help)]
pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx).await?;
    info!(author = %ctx.author().id, "command registration requested");
    Ok(())
}
