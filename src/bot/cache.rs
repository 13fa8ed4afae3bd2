use serenity::{
    cache::Cache,
    model::{
        id::{ChannelId, GuildId, UserId},
        voice::VoiceState,
    },
};
use std::{collections::HashMap, sync::Arc};

use crate::audio::voice::GatewayCache;

/// [`GatewayCache`] over serenity's in-memory cache.
pub struct SerenityCache {
    cache: Arc<Cache>,
}

impl SerenityCache {
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

impl GatewayCache for SerenityCache {
    fn current_user_id(&self) -> UserId {
        self.cache.current_user().id
    }

    fn has_voice_state(&self, guild_id: GuildId, user_id: UserId) -> bool {
        self.cache
            .guild(guild_id)
            .map(|guild| in_voice(&guild.voice_states, user_id))
            .unwrap_or(false)
    }

    fn channel_exists(&self, guild_id: GuildId, channel_id: ChannelId) -> bool {
        self.cache
            .guild(guild_id)
            .map(|guild| guild.channels.contains_key(&channel_id))
            .unwrap_or(false)
    }

    fn voice_members(&self, guild_id: GuildId, channel_id: ChannelId) -> usize {
        self.cache
            .guild(guild_id)
            .map(|guild| members_in(&guild.voice_states, channel_id))
            .unwrap_or(0)
    }
}

/// Discord deja el estado en caché con `channel_id: None` tras desconectarse.
fn in_voice(states: &HashMap<UserId, VoiceState>, user_id: UserId) -> bool {
    states
        .get(&user_id)
        .is_some_and(|state| state.channel_id.is_some())
}

fn members_in(states: &HashMap<UserId, VoiceState>, channel_id: ChannelId) -> usize {
    states
        .values()
        .filter(|state| state.channel_id == Some(channel_id))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn voice_state(user: u64, channel: Option<u64>) -> VoiceState {
        serde_json::from_value(json!({
            "guild_id": "1",
            "channel_id": channel.map(|id| id.to_string()),
            "user_id": user.to_string(),
            "session_id": format!("session-{}", user),
            "deaf": false,
            "mute": false,
            "self_deaf": false,
            "self_mute": false,
            "self_stream": false,
            "self_video": false,
            "suppress": false,
            "request_to_speak_timestamp": null
        }))
        .unwrap()
    }

    fn states(entries: &[(u64, Option<u64>)]) -> HashMap<UserId, VoiceState> {
        entries
            .iter()
            .map(|&(user, channel)| (UserId::new(user), voice_state(user, channel)))
            .collect()
    }

    #[test]
    fn voice_state_requires_a_channel() {
        let states = states(&[(42, Some(100)), (7, None)]);

        assert!(in_voice(&states, UserId::new(42)));
        // Desconectado pero todavía en caché
        assert!(!in_voice(&states, UserId::new(7)));
        assert!(!in_voice(&states, UserId::new(99)));
    }

    #[test]
    fn members_are_counted_per_channel() {
        let states = states(&[(42, Some(100)), (1, Some(100)), (2, Some(200)), (3, None)]);

        assert_eq!(members_in(&states, ChannelId::new(100)), 2);
        assert_eq!(members_in(&states, ChannelId::new(200)), 1);
        assert_eq!(members_in(&states, ChannelId::new(300)), 0);
    }

    #[test]
    fn bot_alone_counts_as_one() {
        let states = states(&[(42, Some(100))]);

        assert_eq!(members_in(&states, ChannelId::new(100)), 1);
    }

    #[test]
    fn unknown_guild_reads_as_empty() {
        let cache = SerenityCache::new(Arc::new(Cache::new()));
        let guild = GuildId::new(1);

        assert!(!cache.has_voice_state(guild, UserId::new(42)));
        assert!(!cache.channel_exists(guild, ChannelId::new(100)));
        assert_eq!(cache.voice_members(guild, ChannelId::new(100)), 0);
    }
}
