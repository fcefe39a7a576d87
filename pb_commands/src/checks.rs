use serenity::all::{ChannelId, ChannelType, Guild, GuildChannel, Member, Permissions};

/// What the bot needs to find and delete messages and post its logs.
const REQUIRED: [(&str, Permissions); 5] = [
    ("Manage Messages", Permissions::MANAGE_MESSAGES),
    ("Read Message History", Permissions::READ_MESSAGE_HISTORY),
    ("Manage Threads", Permissions::MANAGE_THREADS),
    ("View Channels", Permissions::VIEW_CHANNEL),
    ("Send Messages", Permissions::SEND_MESSAGES),
];

/// Names of the required permissions missing from `granted`.
pub fn missing_permissions(granted: Permissions) -> Vec<&'static str> {
    if granted.administrator() {
        return Vec::new();
    }

    REQUIRED
        .iter()
        .filter(|(_, permission)| !granted.contains(*permission))
        .map(|(name, _)| *name)
        .collect()
}

pub fn can_send_in(guild: &Guild, channel: &GuildChannel, me: &Member) -> bool {
    channel.kind == ChannelType::Text && guild.user_permissions_in(channel, me).send_messages()
}

/// The top-most text channel the bot may post in.
pub fn first_sendable_channel(guild: &Guild, me: &Member) -> Option<ChannelId> {
    guild
        .channels
        .values()
        .filter(|channel| can_send_in(guild, channel, me))
        .min_by_key(|channel| (channel.position, channel.id))
        .map(|channel| channel.id)
}
