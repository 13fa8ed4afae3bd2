use async_trait::async_trait;
use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};
use songbird::{
    input::Input, Call, Event, EventContext, EventHandler as VoiceEventHandler, Songbird,
    TrackEvent,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::Mutex;
use tracing::debug;

use super::{
    error::VoiceError,
    events::PlaybackEvents,
    voice::{PlaybackQueue, VoiceDriver, Voicebox},
};

/// Songbird-backed voice driver.
pub struct SongbirdDriver {
    manager: Arc<Songbird>,
    bindings: Arc<QueueBindings>,
}

impl SongbirdDriver {
    pub fn new(manager: Arc<Songbird>) -> Self {
        Self {
            manager,
            bindings: Arc::new(QueueBindings::default()),
        }
    }
}

/// Current queue binding per guild.
///
/// songbird keeps a `Call` alive when `remove` fails, so a later join can
/// hand back a call that still carries the hooks of the previous session.
/// Every bind gets a fresh generation; notifiers from older generations
/// unregister themselves instead of forwarding.
#[derive(Debug, Default)]
struct QueueBindings {
    current: DashMap<GuildId, u64>,
    next: AtomicU64,
}

impl QueueBindings {
    fn rebind(&self, guild_id: GuildId) -> u64 {
        let generation = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        self.current.insert(guild_id, generation);
        generation
    }

    fn is_current(&self, guild_id: GuildId, generation: u64) -> bool {
        self.current
            .get(&guild_id)
            .is_some_and(|current| *current == generation)
    }
}

#[async_trait]
impl VoiceDriver for SongbirdDriver {
    type Track = Input;
    type Voicebox = SongbirdVoicebox;
    type Queue = SongbirdQueue;

    async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<SongbirdVoicebox, VoiceError> {
        let call = self
            .manager
            .join(guild_id, channel_id)
            .await
            .map_err(|e| VoiceError::Connect(e.to_string()))?;

        Ok(SongbirdVoicebox { call, channel_id })
    }

    fn has_connection(&self, guild_id: GuildId) -> bool {
        self.manager.get(guild_id).is_some()
    }

    async fn disconnect(&self, guild_id: GuildId) -> Result<(), VoiceError> {
        self.manager
            .remove(guild_id)
            .await
            .map_err(|e| VoiceError::Disconnect(e.to_string()))
    }

    async fn bind_queue(
        &self,
        guild_id: GuildId,
        voicebox: &SongbirdVoicebox,
        events: Arc<dyn PlaybackEvents>,
    ) -> SongbirdQueue {
        let mut call = voicebox.call.lock().await;

        // Una llamada reutilizada puede traer tracks de la sesión anterior
        call.queue().stop();

        let generation = self.bindings.rebind(guild_id);
        call.add_global_event(
            Event::Track(TrackEvent::Play),
            PlaybackNotifier {
                guild_id,
                generation,
                bindings: self.bindings.clone(),
                events: events.clone(),
                kind: NotifyKind::Next,
            },
        );
        call.add_global_event(
            Event::Track(TrackEvent::Error),
            PlaybackNotifier {
                guild_id,
                generation,
                bindings: self.bindings.clone(),
                events,
                kind: NotifyKind::Fail,
            },
        );

        debug!(
            "Cola enlazada al driver de guild {} (enlace #{})",
            guild_id, generation
        );

        SongbirdQueue {
            call: voicebox.call.clone(),
        }
    }
}

pub struct SongbirdVoicebox {
    call: Arc<Mutex<Call>>,
    channel_id: ChannelId,
}

#[async_trait]
impl Voicebox for SongbirdVoicebox {
    async fn is_alive(&self) -> bool {
        self.call.lock().await.current_connection().is_some()
    }

    fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    async fn leave(&self) -> Result<(), VoiceError> {
        self.call
            .lock()
            .await
            .leave()
            .await
            .map_err(|e| VoiceError::Disconnect(e.to_string()))
    }
}

/// Songbird's built-in track queue for one call.
pub struct SongbirdQueue {
    call: Arc<Mutex<Call>>,
}

#[async_trait]
impl PlaybackQueue for SongbirdQueue {
    type Track = Input;

    async fn len(&self) -> usize {
        self.call.lock().await.queue().len()
    }

    async fn append(&self, track: Input) {
        let mut call = self.call.lock().await;
        call.enqueue_input(track).await;
    }
}

#[derive(Debug, Clone, Copy)]
enum NotifyKind {
    Next,
    Fail,
}

/// Forwards songbird track events to the playback hooks.
struct PlaybackNotifier {
    guild_id: GuildId,
    generation: u64,
    bindings: Arc<QueueBindings>,
    events: Arc<dyn PlaybackEvents>,
    kind: NotifyKind,
}

#[async_trait]
impl VoiceEventHandler for PlaybackNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if !self.bindings.is_current(self.guild_id, self.generation) {
            debug!(
                "Descartando hook obsoleto #{} en guild {}",
                self.generation, self.guild_id
            );
            return Some(Event::Cancel);
        }

        let EventContext::Track(track_list) = ctx else {
            return None;
        };

        match self.kind {
            NotifyKind::Next => self.events.on_next(self.guild_id, track_list.len()),
            NotifyKind::Fail => {
                for (state, _handle) in track_list.iter() {
                    self.events
                        .on_fail(self.guild_id, format!("{:?}", state.playing));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::events::PlaybackLog;
    use pretty_assertions::assert_eq;

    fn notifier(
        bindings: &Arc<QueueBindings>,
        events: Arc<PlaybackLog>,
        generation: u64,
    ) -> PlaybackNotifier {
        PlaybackNotifier {
            guild_id: GuildId::new(1),
            generation,
            bindings: bindings.clone(),
            events,
            kind: NotifyKind::Next,
        }
    }

    #[test]
    fn rebind_moves_guild_to_new_generation() {
        let bindings = QueueBindings::default();
        let guild = GuildId::new(1);
        let other = GuildId::new(2);

        let first = bindings.rebind(guild);
        let second = bindings.rebind(guild);
        let unrelated = bindings.rebind(other);

        assert!(second > first);
        assert!(!bindings.is_current(guild, first));
        assert!(bindings.is_current(guild, second));
        assert!(bindings.is_current(other, unrelated));
    }

    #[tokio::test]
    async fn hooks_from_reused_call_cancel_themselves() {
        let bindings = Arc::new(QueueBindings::default());
        let log = Arc::new(PlaybackLog::new());
        let guild = GuildId::new(1);

        let old = notifier(&bindings, log.clone(), bindings.rebind(guild));
        assert!(old.act(&EventContext::Track(&[])).await.is_none());
        assert_eq!(log.advanced(), 1);

        // Mismo Call, nueva sesión: los dos pares de hooks quedan registrados
        let new = notifier(&bindings, log.clone(), bindings.rebind(guild));
        assert!(matches!(
            old.act(&EventContext::Track(&[])).await,
            Some(Event::Cancel)
        ));
        assert!(new.act(&EventContext::Track(&[])).await.is_none());

        assert_eq!(log.advanced(), 2);
    }
}
