use dashmap::DashMap;
use serenity::model::id::GuildId;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

/// Per-guild async locks.
///
/// The lock for a guild is fetched with a single `entry` call, so concurrent
/// first-time callers always converge on the same instance. Entries are
/// evicted when the last guard is dropped and nobody else holds or waits on
/// the lock, which keeps the map bounded by the number of guilds with an
/// operation in flight.
#[derive(Debug, Default)]
pub struct GuildLocks {
    locks: Arc<DashMap<GuildId, Arc<Mutex<()>>>>,
}

impl GuildLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Espera el lock del guild y devuelve un guard que lo libera al soltarse.
    pub async fn lock(&self, guild_id: GuildId) -> GuildGuard {
        let lock = self
            .locks
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;

        GuildGuard {
            guild_id,
            guard: Some(guard),
            locks: self.locks.clone(),
        }
    }

    /// Número de locks vivos en el registro.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one guild's session state.
#[derive(Debug)]
pub struct GuildGuard {
    guild_id: GuildId,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<GuildId, Arc<Mutex<()>>>>,
}

impl GuildGuard {
    #[allow(dead_code)]
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }
}

impl Drop for GuildGuard {
    fn drop(&mut self) {
        // El guard mantiene su propio Arc; soltarlo primero deja solo la copia del mapa
        drop(self.guard.take());

        let evicted = self
            .locks
            .remove_if(&self.guild_id, |_, lock| Arc::strong_count(lock) == 1)
            .is_some();

        if evicted {
            debug!("🔓 Lock liberado y eliminado para guild {}", self.guild_id);
        }
    }
}
