use serenity::model::id::{ChannelId, GuildId};
use std::{fmt, sync::Arc};
use tracing::{debug, info, warn};

use super::{
    error::SessionError,
    events::{PlaybackEvents, PlaybackLog},
    locks::GuildLocks,
    player::{Player, PlayerRegistry, MAX_QUEUE_SIZE},
    voice::{GatewayCache, PlaybackQueue, VoiceDriver, Voicebox},
};
use crate::sources::AudioResolver;

/// Why a session was considered stale by [`VoiceSessionManager::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    ConnectionDead,
    NoDriverConnection,
    NoVoiceState,
    ChannelGone,
    Alone,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StaleReason::ConnectionDead => "la conexión de voz no está viva",
            StaleReason::NoDriverConnection => "el driver no tiene conexión para el guild",
            StaleReason::NoVoiceState => "el bot no tiene estado de voz en caché",
            StaleReason::ChannelGone => "el canal ya no existe",
            StaleReason::Alone => "el bot está solo en el canal",
        };
        f.write_str(text)
    }
}

/// Guild-scoped voice session lifecycle.
///
/// Every registry mutation happens while holding that guild's lock, `leave`
/// included. `join` runs verification and its own attempt in one critical
/// section, so nothing can interleave between the health check and the
/// connect.
pub struct VoiceSessionManager<D, C, R>
where
    D: VoiceDriver,
    C: GatewayCache,
    R: AudioResolver<Track = D::Track>,
{
    driver: D,
    cache: C,
    resolver: R,
    players: PlayerRegistry<D>,
    locks: GuildLocks,
    events: Arc<dyn PlaybackEvents>,
}

impl<D, C, R> VoiceSessionManager<D, C, R>
where
    D: VoiceDriver,
    C: GatewayCache,
    R: AudioResolver<Track = D::Track>,
{
    pub fn new(driver: D, cache: C, resolver: R) -> Self {
        Self {
            driver,
            cache,
            resolver,
            players: PlayerRegistry::new(),
            locks: GuildLocks::new(),
            events: Arc::new(PlaybackLog::new()),
        }
    }

    /// Replaces the default logging hooks handed to new queues.
    #[allow(dead_code)]
    pub fn with_events(mut self, events: Arc<dyn PlaybackEvents>) -> Self {
        self.events = events;
        self
    }

    /// Drops the guild's session if it went stale.
    pub async fn verify(&self, guild_id: GuildId) -> Option<StaleReason> {
        let _guard = self.locks.lock(guild_id).await;
        self.verify_locked(guild_id).await
    }

    /// Conecta al canal; `Ok(false)` si ya había una sesión activa.
    pub async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<bool, SessionError> {
        let _guard = self.locks.lock(guild_id).await;
        self.verify_locked(guild_id).await;

        if self.players.contains(guild_id) {
            debug!("Ya conectado en guild {}, se ignora join", guild_id);
            return Ok(false);
        }

        let voicebox = self.driver.connect(guild_id, channel_id).await?;
        let queue = self
            .driver
            .bind_queue(guild_id, &voicebox, self.events.clone())
            .await;

        self.players.insert(guild_id, Player { voicebox, queue });
        info!("🔊 Conectado al canal {} en guild {}", channel_id, guild_id);

        Ok(true)
    }

    pub async fn leave(&self, guild_id: GuildId) -> bool {
        let _guard = self.locks.lock(guild_id).await;
        self.leave_locked(guild_id).await
    }

    /// Resolves `url` and appends it to the guild's queue.
    ///
    /// The guild lock is held while the URL resolves, so a slow resolution
    /// delays every other operation on the same guild.
    pub async fn play(&self, guild_id: GuildId, url: &str) -> Result<(), SessionError> {
        let _guard = self.locks.lock(guild_id).await;

        let player = self.players.get(guild_id).ok_or(SessionError::NotInVoice)?;

        if player.queue.len().await >= MAX_QUEUE_SIZE {
            return Err(SessionError::QueueFull {
                capacity: MAX_QUEUE_SIZE,
            });
        }

        let track = self.resolver.resolve(url).await?;
        player.queue.append(track).await;
        info!("➕ Agregado a la cola de guild {}: {}", guild_id, url);

        Ok(())
    }

    pub fn is_connected(&self, guild_id: GuildId) -> bool {
        self.players.contains(guild_id)
    }

    pub async fn queue_len(&self, guild_id: GuildId) -> Option<usize> {
        let player = self.players.get(guild_id)?;
        Some(player.queue.len().await)
    }

    /// Sesiones activas en este momento.
    #[allow(dead_code)]
    pub fn sessions(&self) -> usize {
        self.players.len()
    }

    async fn verify_locked(&self, guild_id: GuildId) -> Option<StaleReason> {
        let player = self.players.get(guild_id)?;
        let reason = self.staleness(guild_id, &player).await?;

        info!("🚪 Sesión obsoleta en guild {}: {}", guild_id, reason);
        self.leave_locked(guild_id).await;

        Some(reason)
    }

    async fn staleness(&self, guild_id: GuildId, player: &Player<D>) -> Option<StaleReason> {
        if !player.voicebox.is_alive().await {
            return Some(StaleReason::ConnectionDead);
        }
        if !self.driver.has_connection(guild_id) {
            return Some(StaleReason::NoDriverConnection);
        }
        if !self
            .cache
            .has_voice_state(guild_id, self.cache.current_user_id())
        {
            return Some(StaleReason::NoVoiceState);
        }

        let channel_id = player.voicebox.channel_id();
        if !self.cache.channel_exists(guild_id, channel_id) {
            return Some(StaleReason::ChannelGone);
        }
        if self.cache.voice_members(guild_id, channel_id) == 1 {
            return Some(StaleReason::Alone);
        }

        None
    }

    async fn leave_locked(&self, guild_id: GuildId) -> bool {
        let Some(player) = self.players.remove(guild_id) else {
            return false;
        };

        // Ambas desconexiones son best-effort e independientes
        if let Err(e) = player.voicebox.leave().await {
            warn!("Error al salir del canal de voz en guild {}: {}", guild_id, e);
        }

        if self.driver.has_connection(guild_id) {
            if let Err(e) = self.driver.disconnect(guild_id).await {
                warn!("Error al cerrar la conexión de voz en guild {}: {}", guild_id, e);
            }
        }

        info!("👋 Desconectado del canal de voz en guild {}", guild_id);
        true
    }
}
