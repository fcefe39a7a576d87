#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use poise::serenity_prelude as serenity;
use tracing::info;

pub(crate) use pb_core::structs::{Data, Error, FrameworkContext};
mod member_leave;

pub async fn handler(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: FrameworkContext<'_>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            info!(user = %data_about_bot.user.tag(), "logged in");
        }
        serenity::FullEvent::GuildMemberRemoval {
            guild_id,
            user,
            member_data_if_available: _,
        } => member_leave::handle(data, *guild_id, user).await,
        _ => {}
    }
    Ok(())
}
