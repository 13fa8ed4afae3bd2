use anyhow::Result;
use serenity::{
    builder::{CreateCommand, CreateCommandOption},
    model::{application::CommandOptionType, id::GuildId},
    prelude::Context,
};

/// Registra comandos globales
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    for command in all_commands() {
        ctx.http.create_global_command(&command).await?;
    }

    Ok(())
}

/// Registra comandos para una guild específica (desarrollo)
pub async fn register_guild_commands(ctx: &Context, guild_id: GuildId) -> Result<()> {
    guild_id.set_commands(&ctx.http, all_commands()).await?;

    Ok(())
}

fn all_commands() -> Vec<CreateCommand> {
    vec![join_command(), leave_command(), play_command()]
}

fn join_command() -> CreateCommand {
    CreateCommand::new("join").description("Join your current voice channel")
}

fn leave_command() -> CreateCommand {
    CreateCommand::new("leave").description("Leave the voice channel")
}

fn play_command() -> CreateCommand {
    CreateCommand::new("play")
        .description("Queue a song from a URL")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "url", "Link to the song")
                .required(true),
        )
}
