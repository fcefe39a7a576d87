#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use pb_core::structs::{Command, Context, Data, Error};

mod admin;
mod checks;
mod purge;

#[must_use]
pub fn commands() -> Vec<Command> {
    purge::commands()
        .into_iter()
        .chain(admin::commands())
        .collect()
}

/// Replies so only the invoking user sees it.
async fn say_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_exposed_once() {
        let names: Vec<String> = commands().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            ["purgeuser", "status", "cancelpurge", "setup", "help", "register"]
        );
    }
}
