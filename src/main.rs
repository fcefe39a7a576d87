use pb_core::config::BotConfig;
use pb_core::discord::DiscordHost;
use pb_core::settings::Settings;
use pb_core::structs::{Data, Error};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, warn};

mod logging;

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => panic!("Failed to start bot: {error:?}"),
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(command = %ctx.command().name, error = %error, "command failed");
            let _ = ctx.say("Something went wrong while running that command.").await;
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            let error_msg = error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "You cannot execute this command.".to_owned());
            let _ = ctx.say(error_msg).await;
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                warn!(error = %e, "error while handling error");
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    logging::init();

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(why) => {
            error!(error = %why, "invalid configuration");
            std::process::exit(1);
        }
    };

    let settings = Arc::new(
        Settings::load(&config.settings_path)
            .unwrap_or_else(|e| panic!("Cannot load settings!!: {e}")),
    );

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let options = poise::FrameworkOptions {
        commands: pb_commands::commands(),
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some("!".into()),
            ..Default::default()
        },
        on_error: |error| Box::pin(on_error(error)),
        event_handler: |ctx, event, framework, data| {
            Box::pin(pb_events::handler(ctx, event, framework, data))
        },
        ..Default::default()
    };

    let guild_id = config.guild_id;
    let purge_config = config.purge;
    let framework = poise::Framework::builder()
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                let commands = &framework.options().commands;
                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(ctx, commands, guild_id).await?;
                        info!(%guild_id, count = commands.len(), "commands registered to guild");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, commands).await?;
                        info!(count = commands.len(), "commands registered globally");
                    }
                }

                let host = Arc::new(DiscordHost::new(ctx.http.clone()));
                Ok(Data::new(host, settings, purge_config))
            })
        })
        .options(options)
        .build();

    let client = serenity::ClientBuilder::new(config.token, intents)
        .framework(framework)
        .await;

    match client {
        Ok(mut client) => {
            if let Err(why) = client.start().await {
                error!(error = %why, "client stopped");
            }
        }
        Err(why) => error!(error = %why, "could not build client"),
    }
}
