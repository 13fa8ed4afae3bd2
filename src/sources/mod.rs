pub mod ytdl;

use async_trait::async_trait;
use thiserror::Error;

pub use ytdl::YtDlpResolver;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("could not fetch audio from {url}: {reason}")]
    Fetch { url: String, reason: String },
}

/// Turns a URL into something the playback queue can stream.
#[cfg_attr(test, mockall::automock(type Track = String;))]
#[async_trait]
pub trait AudioResolver: Send + Sync + 'static {
    type Track: Send + 'static;

    async fn resolve(&self, url: &str) -> Result<Self::Track, ResolveError>;

    /// Nombre de la fuente, usado en logs
    fn source_name(&self) -> &'static str;
}

/// Acepta solo URLs http(s) bien formadas.
pub fn validate_url(raw: &str) -> Result<url::Url, ResolveError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|_| ResolveError::InvalidUrl(raw.to_string()))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        _ => Err(ResolveError::InvalidUrl(raw.to_string())),
    }
}
