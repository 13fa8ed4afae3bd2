//! # Audio Module
//!
//! Guild-scoped voice sessions for the bot.
//!
//! ## Architecture
//!
//! ### [`session`] - Session Manager
//! - Join, leave, health verification and enqueueing per guild
//! - Serializes every operation on a guild through [`locks::GuildLocks`]
//!
//! ### [`player`] - Session Store
//! - One [`player::Player`] (voice connection + queue) per guild
//! - Fixed queue capacity of [`player::MAX_QUEUE_SIZE`] tracks
//!
//! ### [`voice`] - Collaborator Seams
//! - Traits the manager drives: voice driver, connection handle, queue, cache
//! - [`driver`] implements them over songbird
//!
//! ## Example Usage
//!
//! ```ignore
//! # async fn example(sessions: &Sessions) -> anyhow::Result<()> {
//! use serenity::all::{ChannelId, GuildId};
//!
//! let guild_id = GuildId::new(123456789);
//!
//! if sessions.join(guild_id, ChannelId::new(987654321)).await? {
//!     sessions.play(guild_id, "https://example.com/song.mp3").await?;
//! }
//! sessions.leave(guild_id).await;
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod error;
pub mod events;
pub mod locks;
pub mod player;
pub mod session;
pub mod voice;

pub use error::{SessionError, VoiceError};
pub use session::{StaleReason, VoiceSessionManager};
