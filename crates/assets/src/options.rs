// ABOUTME: Configuration for the asset Inspector: InspectorOptions and the fluent InspectorBuilder.
// ABOUTME: Collaborators (header fetcher, media prober) can be swapped for fakes in tests.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AssetError;
use crate::inspector::Inspector;
use crate::probe::{FfprobeProber, MediaProber};
use crate::resource::{HeaderFetcher, ReqwestFetcher};

/// Tunables for asset inspection.
#[derive(Debug, Clone)]
pub struct InspectorOptions {
    /// Issue a HEAD request and read its headers.
    pub check_existence: bool,
    /// Run the media probe for duration and container type.
    pub probe_media: bool,
    /// Upper bound for each sub-step of a single inspection.
    pub timeout: Duration,
    pub user_agent: String,
    pub ffprobe_path: String,
}

impl Default for InspectorOptions {
    fn default() -> Self {
        Self {
            check_existence: true,
            probe_media: true,
            timeout: Duration::from_secs(30),
            user_agent: concat!("podgen/", env!("CARGO_PKG_VERSION")).to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

/// Builder for constructing Inspector instances.
#[derive(Clone, Default)]
pub struct InspectorBuilder {
    opts: InspectorOptions,
    fetcher: Option<Arc<dyn HeaderFetcher>>,
    prober: Option<Arc<dyn MediaProber>>,
}

impl fmt::Debug for InspectorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorBuilder")
            .field("opts", &self.opts)
            .field("custom_fetcher", &self.fetcher.is_some())
            .field("custom_prober", &self.prober.is_some())
            .finish()
    }
}

impl InspectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or skip the HEAD existence check.
    pub fn check_existence(mut self, enabled: bool) -> Self {
        self.opts.check_existence = enabled;
        self
    }

    /// Enable or skip the media probe.
    pub fn probe_media(mut self, enabled: bool) -> Self {
        self.opts.probe_media = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Path or name of the ffprobe binary.
    pub fn ffprobe_path(mut self, path: impl Into<String>) -> Self {
        self.opts.ffprobe_path = path.into();
        self
    }

    /// Use a custom existence-check collaborator.
    pub fn header_fetcher(mut self, fetcher: Arc<dyn HeaderFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Use a custom media probe collaborator.
    pub fn media_prober(mut self, prober: Arc<dyn MediaProber>) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Build the Inspector, constructing default collaborators where none were given.
    pub fn build(self) -> Result<Inspector, AssetError> {
        let fetcher: Arc<dyn HeaderFetcher> = match self.fetcher {
            Some(f) => f,
            None => Arc::new(
                ReqwestFetcher::with_settings(self.opts.timeout, &self.opts.user_agent)
                    .map_err(|e| {
                        AssetError::unreachable("", "build client", Some(anyhow::Error::new(e)))
                    })?,
            ),
        };
        let prober: Arc<dyn MediaProber> = match self.prober {
            Some(p) => p,
            None => Arc::new(FfprobeProber::new(self.opts.ffprobe_path.clone())),
        };
        Ok(Inspector::new(self.opts, fetcher, prober))
    }
}
