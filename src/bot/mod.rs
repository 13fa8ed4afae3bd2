//! # Bot Module
//!
//! Discord event handling for melody.
//!
//! - Slash command registration (`/join`, `/leave`, `/play`)
//! - Interaction dispatch to the [`Sessions`] manager
//! - Session health checks on voice state updates
//!
//! The session manager is created after the serenity client (it needs the
//! client's cache) and lives in the client's TypeMap under [`SessionKey`].

use anyhow::Result;
use serenity::{
    all::{Context, EventHandler, GuildId, Interaction, Ready, VoiceState},
    async_trait,
    prelude::TypeMapKey,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub mod cache;
pub mod commands;
pub mod handlers;

use crate::{
    audio::{driver::SongbirdDriver, VoiceSessionManager},
    config::Config,
    sources::YtDlpResolver,
};

/// Session manager wired to songbird, the serenity cache and yt-dlp.
pub type Sessions = VoiceSessionManager<SongbirdDriver, cache::SerenityCache, YtDlpResolver>;

pub struct SessionKey;

impl TypeMapKey for SessionKey {
    type Value = Arc<Sessions>;
}

/// Obtiene el gestor de sesiones del contexto
pub async fn sessions(ctx: &Context) -> Result<Arc<Sessions>> {
    let data = ctx.data.read().await;
    data.get::<SessionKey>()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Gestor de sesiones no inicializado"))
}

pub struct MelodyBot {
    config: Arc<Config>,
}

impl MelodyBot {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    async fn register_commands(&self, ctx: &Context) -> Result<()> {
        info!("📝 Registrando comandos slash...");

        match self.config.guild_id {
            Some(guild_id) => {
                let guild_id = GuildId::new(guild_id);
                commands::register_guild_commands(ctx, guild_id).await?;
                info!("✅ Comandos de guild registrados para: {}", guild_id);
            }
            None => {
                commands::register_global_commands(ctx).await?;
                info!("✅ Comandos globales registrados");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl EventHandler for MelodyBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🤖 {} está en línea!", ready.user.name);
        info!("📊 Conectado a {} servidores", ready.guilds.len());

        if let Err(e) = self.register_commands(&ctx).await {
            error!("Error al registrar comandos: {:?}", e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let sessions = match sessions(&ctx).await {
            Ok(sessions) => sessions,
            Err(e) => {
                error!("{:?}", e);
                return;
            }
        };

        if let Err(e) = handlers::handle_command(&ctx, command, &sessions).await {
            error!("Error manejando comando: {:?}", e);
        }
    }

    /// Re-checks the guild's session whenever someone's voice state changes,
    /// which covers the bot being kicked and the bot being left alone.
    async fn voice_state_update(&self, ctx: Context, _old: Option<VoiceState>, new: VoiceState) {
        let Some(guild_id) = new.guild_id else {
            return;
        };

        let sessions = match sessions(&ctx).await {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("{:?}", e);
                return;
            }
        };

        if !sessions.is_connected(guild_id) {
            return;
        }

        match sessions.verify(guild_id).await {
            Some(reason) => info!("🔌 Sesión cerrada en guild {}: {}", guild_id, reason),
            None => debug!("Sesión de guild {} sigue activa", guild_id),
        }
    }
}
