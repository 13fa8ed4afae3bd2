use anyhow::Result;
use serenity::{model::gateway::GatewayIntents, Client};
use songbird::{SerenityInit, Songbird};
use std::sync::Arc;
use tracing::{error, info};

mod audio;
mod bot;
mod config;
mod sources;

use crate::audio::{driver::SongbirdDriver, VoiceSessionManager};
use crate::bot::{cache::SerenityCache, MelodyBot, SessionKey};
use crate::config::Config;
use crate::sources::{AudioResolver, YtDlpResolver};

#[tokio::main]
async fn main() -> Result<()> {
    // Inicializar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("melody=debug".parse()?)
                .add_directive("serenity=info".parse()?)
                .add_directive("songbird=info".parse()?),
        )
        .init();

    info!("🎵 Iniciando melody v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    info!("{}", config.summary());

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let songbird = Songbird::serenity();
    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(MelodyBot::new(config.clone()))
        .register_songbird_with(songbird.clone())
        .await?;

    let resolver = YtDlpResolver::new()?;
    info!("🔗 Fuente de audio: {}", resolver.source_name());

    let sessions = VoiceSessionManager::new(
        SongbirdDriver::new(songbird),
        SerenityCache::new(client.cache.clone()),
        resolver,
    );

    {
        let mut data = client.data.write().await;
        data.insert::<SessionKey>(Arc::new(sessions));
    }

    // Manejar shutdown graceful
    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Error al registrar Ctrl+C: {:?}", e);
            return;
        }
        info!("⚠️ Señal de shutdown recibida, cerrando...");
        shard_manager.shutdown_all().await;
    });

    info!("🚀 Bot iniciado exitosamente");
    if let Err(why) = client.start().await {
        error!("Error al ejecutar cliente: {:?}", why);
    }

    Ok(())
}
