use anyhow::Result;
use serenity::{
    builder::{CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse},
    model::{
        application::CommandInteraction,
        id::{ChannelId, GuildId, UserId},
    },
    prelude::Context,
};
use tracing::{error, info};

use super::Sessions;
use crate::audio::{player::MAX_QUEUE_SIZE, SessionError};

/// Maneja comandos slash
pub async fn handle_command(ctx: &Context, command: CommandInteraction, sessions: &Sessions) -> Result<()> {
    let Some(guild_id) = command.guild_id else {
        return reply(ctx, &command, "❌ This command only works in a server", true).await;
    };

    info!(
        "📝 Comando /{} usado por {} en guild {}",
        command.data.name, command.user.name, guild_id
    );

    match command.data.name.as_str() {
        "join" => handle_join(ctx, &command, sessions, guild_id).await,
        "leave" => handle_leave(ctx, &command, sessions, guild_id).await,
        "play" => handle_play(ctx, &command, sessions, guild_id).await,
        _ => reply(ctx, &command, "❌ Unknown command", true).await,
    }
}

async fn handle_join(
    ctx: &Context,
    command: &CommandInteraction,
    sessions: &Sessions,
    guild_id: GuildId,
) -> Result<()> {
    let Some(channel_id) = user_voice_channel(ctx, guild_id, command.user.id) else {
        return reply(ctx, command, "❌ You need to be in a voice channel", true).await;
    };

    let content = match sessions.join(guild_id, channel_id).await {
        Ok(true) => "🔊 Joined the voice channel".to_string(),
        Ok(false) => "ℹ️ I am already in a voice channel".to_string(),
        Err(e) => failure_message(guild_id, &e),
    };

    reply(ctx, command, &content, false).await
}

async fn handle_leave(
    ctx: &Context,
    command: &CommandInteraction,
    sessions: &Sessions,
    guild_id: GuildId,
) -> Result<()> {
    let content = if sessions.leave(guild_id).await {
        "👋 Left the voice channel"
    } else {
        "❌ I am not in a voice channel!"
    };

    reply(ctx, command, content, false).await
}

async fn handle_play(
    ctx: &Context,
    command: &CommandInteraction,
    sessions: &Sessions,
    guild_id: GuildId,
) -> Result<()> {
    let Some(url) = command
        .data
        .options
        .iter()
        .find(|opt| opt.name == "url")
        .and_then(|opt| opt.value.as_str())
    else {
        return reply(ctx, command, "❌ Missing url", true).await;
    };

    // Resolver la URL puede tardar, así que se difiere la respuesta
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    // Unirse al canal del usuario si todavía no hay sesión
    if !sessions.is_connected(guild_id) {
        if let Some(channel_id) = user_voice_channel(ctx, guild_id, command.user.id) {
            if let Err(e) = sessions.join(guild_id, channel_id).await {
                return edit_reply(ctx, command, &failure_message(guild_id, &e)).await;
            }
        }
    }

    let content = match sessions.play(guild_id, url).await {
        Ok(()) => {
            let queued = sessions.queue_len(guild_id).await.unwrap_or(0);
            format!("🎵 Queued <{}> ({}/{})", url, queued, MAX_QUEUE_SIZE)
        }
        Err(e) => failure_message(guild_id, &e),
    };

    edit_reply(ctx, command, &content).await
}

/// Texto para el usuario; los errores internos se registran y se ocultan.
fn failure_message(guild_id: GuildId, err: &SessionError) -> String {
    if err.is_user_facing() {
        format!("❌ {}", err)
    } else {
        error!("Error en guild {}: {:?}", guild_id, err);
        match err {
            SessionError::Resolve(_) => "❌ Could not play that URL".to_string(),
            _ => "❌ Could not connect to the voice channel".to_string(),
        }
    }
}

async fn reply(ctx: &Context, command: &CommandInteraction, content: &str, ephemeral: bool) -> Result<()> {
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(ephemeral),
            ),
        )
        .await?;

    Ok(())
}

async fn edit_reply(ctx: &Context, command: &CommandInteraction, content: &str) -> Result<()> {
    command
        .edit_response(&ctx.http, EditInteractionResponse::new().content(content))
        .await?;

    Ok(())
}

fn user_voice_channel(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
    let guild = guild_id.to_guild_cached(&ctx.cache)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|voice_state| voice_state.channel_id)
}
