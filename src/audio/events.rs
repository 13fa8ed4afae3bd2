use serenity::model::id::GuildId;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Hooks invoked by the streaming driver as the queue advances.
pub trait PlaybackEvents: Send + Sync + 'static {
    /// La cola avanzó y empezó a sonar el siguiente track.
    fn on_next(&self, guild_id: GuildId, tracks: usize);

    /// Un track no pudo reproducirse.
    fn on_fail(&self, guild_id: GuildId, detail: String);
}

/// Default hooks: log every event and keep running totals.
#[derive(Debug, Default)]
pub struct PlaybackLog {
    advanced: AtomicU64,
    failed: AtomicU64,
}

impl PlaybackLog {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn advanced(&self) -> u64 {
        self.advanced.load(Ordering::Relaxed)
    }

    #[allow(dead_code)]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }
}

impl PlaybackEvents for PlaybackLog {
    fn on_next(&self, guild_id: GuildId, tracks: usize) {
        let total = self.advanced.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            "▶️ Reproduciendo siguiente en guild {} ({} tracks en el evento, {} en total)",
            guild_id, tracks, total
        );
    }

    fn on_fail(&self, guild_id: GuildId, detail: String) {
        let total = self.failed.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            "❌ Fallo al reproducir en guild {}: {} ({} fallos en total)",
            guild_id, detail, total
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counters_track_events() {
        let log = PlaybackLog::new();
        let guild = GuildId::new(5);

        log.on_next(guild, 1);
        log.on_next(guild, 1);
        log.on_fail(guild, "decode error".to_string());

        assert_eq!(log.advanced(), 2);
        assert_eq!(log.failed(), 1);
    }
}
