pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type FrameworkContext<'a> = poise::FrameworkContext<'a, Data, Error>;
pub type Command = poise::Command<Data, Error>;

use crate::config::PurgeConfig;
use crate::host::GuildHost;
use crate::purge::PurgeService;
use crate::settings::Settings;
use std::sync::Arc;

pub struct Data {
    /// Running purges and the per-guild locks that serialize them.
    pub purges: Arc<PurgeService>,
    /// Per-guild log channels, persisted to disk on every change.
    pub settings: Arc<Settings>,
}

impl Data {
    #[must_use]
    pub fn new(host: Arc<dyn GuildHost>, settings: Arc<Settings>, config: PurgeConfig) -> Self {
        Data {
            purges: Arc::new(PurgeService::new(host, Arc::clone(&settings), config)),
            settings,
        }
    }
}
