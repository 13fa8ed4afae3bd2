//! Seams between the session manager and the voice stack.
//!
//! Production code implements these over songbird and the serenity cache
//! (see [`super::driver`] and [`crate::bot::cache`]); tests plug in fakes.

use async_trait::async_trait;
use serenity::model::id::{ChannelId, GuildId, UserId};
use std::sync::Arc;

use super::{error::VoiceError, events::PlaybackEvents};

/// Voice transport: opens connections and owns the low-level per-guild handles.
#[async_trait]
pub trait VoiceDriver: Send + Sync + 'static {
    /// Item accepted by the playback queue.
    type Track: Send + 'static;
    type Voicebox: Voicebox;
    type Queue: PlaybackQueue<Track = Self::Track>;

    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Self::Voicebox, VoiceError>;

    /// Whether the driver still holds a low-level connection for the guild.
    fn has_connection(&self, guild_id: GuildId) -> bool;

    /// Tears down the low-level connection for the guild, if any.
    async fn disconnect(&self, guild_id: GuildId) -> Result<(), VoiceError>;

    /// Creates a playback queue driven by `voicebox`, wired to the playback hooks.
    async fn bind_queue(
        &self,
        guild_id: GuildId,
        voicebox: &Self::Voicebox,
        events: Arc<dyn PlaybackEvents>,
    ) -> Self::Queue;
}

/// Handle to a live voice connection.
#[async_trait]
pub trait Voicebox: Send + Sync + 'static {
    async fn is_alive(&self) -> bool;

    /// Canal al que se unió la conexión.
    fn channel_id(&self) -> ChannelId;

    async fn leave(&self) -> Result<(), VoiceError>;
}

#[async_trait]
pub trait PlaybackQueue: Send + Sync + 'static {
    type Track: Send + 'static;

    async fn len(&self) -> usize;

    async fn append(&self, track: Self::Track);
}

/// Read-only view of the gateway cache.
pub trait GatewayCache: Send + Sync + 'static {
    fn current_user_id(&self) -> UserId;

    fn has_voice_state(&self, guild_id: GuildId, user_id: UserId) -> bool;

    fn channel_exists(&self, guild_id: GuildId, channel_id: ChannelId) -> bool;

    /// Voice states currently pointing at `channel_id`, the bot's own included.
    fn voice_members(&self, guild_id: GuildId, channel_id: ChannelId) -> usize;
}
