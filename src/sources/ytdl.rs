use async_trait::async_trait;
use songbird::input::{Compose, Input, YoutubeDl};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{validate_url, AudioResolver, ResolveError};

/// Resolves URLs through yt-dlp, which also handles plain audio links.
///
/// Metadata is fetched eagerly so unplayable URLs fail here instead of
/// silently inside the driver.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    http: reqwest::Client,
}

impl YtDlpResolver {
    pub fn new() -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { http })
    }
}

#[async_trait]
impl AudioResolver for YtDlpResolver {
    type Track = Input;

    async fn resolve(&self, url: &str) -> Result<Input, ResolveError> {
        let url = validate_url(url)?;
        debug!("🔗 Resolviendo {}", url);

        let mut source = YoutubeDl::new(self.http.clone(), url.to_string());

        match source.aux_metadata().await {
            Ok(metadata) => {
                info!(
                    "🎵 Resuelto: {}",
                    metadata.title.as_deref().unwrap_or(url.as_str())
                );
                Ok(Input::from(source))
            }
            Err(e) => {
                warn!("❌ yt-dlp no pudo resolver {}: {}", url, e);
                Err(ResolveError::Fetch {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "yt-dlp"
    }
}
