use dashmap::DashMap;
use serenity::model::id::GuildId;
use std::sync::Arc;

use super::voice::VoiceDriver;

/// Capacidad fija de la cola por guild.
pub const MAX_QUEUE_SIZE: usize = 10;

/// One guild's active voice session.
pub struct Player<D: VoiceDriver> {
    pub voicebox: D::Voicebox,
    pub queue: D::Queue,
}

/// Active sessions keyed by guild.
///
/// Values are handed out as `Arc`s so callers never keep a map shard locked
/// across an `.await`. Mutations are expected to happen under the guild lock.
pub struct PlayerRegistry<D: VoiceDriver> {
    players: DashMap<GuildId, Arc<Player<D>>>,
}

impl<D: VoiceDriver> PlayerRegistry<D> {
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
        }
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<Player<D>>> {
        self.players.get(&guild_id).map(|p| p.clone())
    }

    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.players.contains_key(&guild_id)
    }

    pub fn insert(&self, guild_id: GuildId, player: Player<D>) {
        self.players.insert(guild_id, Arc::new(player));
    }

    pub fn remove(&self, guild_id: GuildId) -> Option<Arc<Player<D>>> {
        self.players.remove(&guild_id).map(|(_, player)| player)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }
}

impl<D: VoiceDriver> Default for PlayerRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}
