use thiserror::Error;

use crate::sources::ResolveError;

/// Fallos del transporte de voz (conexión y desconexión).
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("failed to connect to voice channel: {0}")]
    Connect(String),

    #[error("failed to disconnect from voice channel: {0}")]
    Disconnect(String),
}

/// Errors surfaced by the session manager.
///
/// `NotInVoice` and `QueueFull` are domain errors meant to be shown to the
/// user as-is. The other variants wrap collaborator failures.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("I am not in a voice channel!")]
    NotInVoice,

    #[error("Too many songs in queue! (max {capacity})")]
    QueueFull { capacity: usize },

    #[error(transparent)]
    Voice(#[from] VoiceError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl SessionError {
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::NotInVoice | Self::QueueFull { .. })
    }
}
