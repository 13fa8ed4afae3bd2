use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub guild_id: Option<u64>, // Para comandos de desarrollo
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_vars(
            std::env::var("DISCORD_TOKEN").ok(),
            std::env::var("GUILD_ID").ok(),
        )?;

        config.validate()?;

        Ok(config)
    }

    fn from_vars(token: Option<String>, guild: Option<String>) -> Result<Self> {
        let discord_token = token.ok_or_else(|| anyhow::anyhow!("DISCORD_TOKEN no está definido"))?;

        let guild_id = match guild {
            Some(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("GUILD_ID inválido: {}", raw))?,
            ),
            _ => None,
        };

        Ok(Self {
            discord_token,
            guild_id,
        })
    }

    /// Validates configuration values for correctness.
    ///
    /// - The token must not be blank
    /// - A guild id, when given, must be non-zero
    pub fn validate(&self) -> Result<()> {
        if self.discord_token.trim().is_empty() {
            anyhow::bail!("Discord token must not be empty");
        }

        if self.guild_id == Some(0) {
            anyhow::bail!("Guild id must be greater than 0");
        }

        Ok(())
    }

    /// Returns a summary of the current configuration for logging.
    ///
    /// The token is never included.
    pub fn summary(&self) -> String {
        format!(
            "Config Summary:\n  \
            Discord: commands {}\n  \
            Queue: {} tracks max",
            self.guild_id
                .map_or("global".to_string(), |id| format!("for guild {}", id)),
            crate::audio::player::MAX_QUEUE_SIZE,
        )
    }
}
