// ABOUTME: The Inspector checks one asset URL: existence/headers, then media probe.
// ABOUTME: Every sub-step is bounded by a timeout and failures come back as typed AssetErrors.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::debug;
use url::Url;

use crate::error::AssetError;
use crate::hash::{hash_candidates, ContentHash};
use crate::mime::{essence, guess_from_url, is_generic_binary, is_media_type};
use crate::options::{InspectorBuilder, InspectorOptions};
use crate::probe::{MediaProbe, MediaProber, ProbeError};
use crate::resource::{HeadResponse, HeaderFetcher, TransportError};

/// Successful inspection of one asset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetInfo {
    pub url: String,
    pub final_url: String,
    /// Effective enclosure type: header, then probe, then extension guess.
    pub mime_type: Option<String>,
    pub byte_length: Option<u64>,
    pub duration_seconds: Option<u64>,
    /// Hash candidates in priority order.
    pub hash_candidates: Vec<ContentHash>,
}

impl AssetInfo {
    /// Highest-priority content-hash candidate.
    pub fn content_hash(&self) -> Option<&ContentHash> {
        self.hash_candidates.first()
    }
}

/// Outcome of inspecting one asset URL.
pub type AssetProbeResult = Result<AssetInfo, AssetError>;

/// Asset inspection service. Holds no state between calls.
#[derive(Clone)]
pub struct Inspector {
    opts: InspectorOptions,
    fetcher: Arc<dyn HeaderFetcher>,
    prober: Arc<dyn MediaProber>,
}

impl std::fmt::Debug for Inspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inspector").field("opts", &self.opts).finish()
    }
}

impl Inspector {
    pub fn new(
        opts: InspectorOptions,
        fetcher: Arc<dyn HeaderFetcher>,
        prober: Arc<dyn MediaProber>,
    ) -> Self {
        Self {
            opts,
            fetcher,
            prober,
        }
    }

    pub fn builder() -> InspectorBuilder {
        InspectorBuilder::new()
    }

    pub fn options(&self) -> &InspectorOptions {
        &self.opts
    }

    /// Inspects a single asset URL.
    pub async fn inspect(&self, url: &str) -> AssetProbeResult {
        let parsed = Url::parse(url).map_err(|e| {
            AssetError::invalid_url(url, "inspect", Some(anyhow::anyhow!("invalid URL: {}", e)))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AssetError::invalid_url(
                url,
                "inspect",
                Some(anyhow::anyhow!("scheme must be http or https")),
            ));
        }

        let mut info = AssetInfo {
            url: url.to_string(),
            final_url: url.to_string(),
            ..Default::default()
        };
        let mut header_mime: Option<String> = None;

        if self.opts.check_existence {
            let head = self.check_existence(url).await?;
            if let Some(ct) = head.header("content-type") {
                let ct = essence(ct);
                if is_generic_binary(&ct) {
                    debug!("{} served as {}, resolving type from probe or extension", url, ct);
                } else if !ct.is_empty() {
                    if !is_media_type(&ct) {
                        return Err(AssetError::unsupported_media_type(
                            url,
                            "HEAD",
                            Some(anyhow::anyhow!("server reports {}", ct)),
                        ));
                    }
                    header_mime = Some(ct);
                }
            }
            info.byte_length = head.content_length();
            info.hash_candidates = hash_candidates(&head.headers);
            if !head.final_url.is_empty() {
                info.final_url = head.final_url;
            }
        }

        let mut probe = MediaProbe::default();
        if self.opts.probe_media {
            probe = self.probe(url, &info.final_url).await?;
        }
        info.duration_seconds = probe.duration_seconds;

        let mime = header_mime
            .or(probe.mime_type)
            .or_else(|| guess_from_url(&info.final_url).map(str::to_string))
            .or_else(|| guess_from_url(url).map(str::to_string));
        match mime {
            Some(m) if is_media_type(&m) => info.mime_type = Some(m),
            Some(m) => {
                return Err(AssetError::unsupported_media_type(
                    url,
                    "inspect",
                    Some(anyhow::anyhow!("{} is not audio or video", m)),
                ))
            }
            None => {
                return Err(AssetError::unsupported_media_type(
                    url,
                    "inspect",
                    Some(anyhow::anyhow!("could not determine media type")),
                ))
            }
        }

        debug!(
            "Inspected {}: type={:?} length={:?} duration={:?} hashes={}",
            url,
            info.mime_type,
            info.byte_length,
            info.duration_seconds,
            info.hash_candidates.len()
        );
        Ok(info)
    }

    /// Inspects many URLs with at most `concurrency` in flight.
    ///
    /// Results come back in input order regardless of completion order.
    pub async fn inspect_all(&self, urls: &[String], concurrency: usize) -> Vec<AssetProbeResult> {
        stream::iter(urls.iter())
            .map(|u| self.inspect(u))
            .buffered(concurrency.max(1))
            .collect()
            .await
    }

    async fn check_existence(&self, url: &str) -> Result<HeadResponse, AssetError> {
        let head = self
            .bounded(self.fetcher.fetch_headers(url))
            .await
            .ok_or_else(|| {
                AssetError::timeout(
                    url,
                    "HEAD",
                    Some(anyhow::anyhow!("no response after {:?}", self.opts.timeout)),
                )
            })?
            .map_err(|e| match e {
                TransportError::Timeout => {
                    AssetError::timeout(url, "HEAD", Some(anyhow::Error::new(e)))
                }
                TransportError::Request(_) => {
                    AssetError::unreachable(url, "HEAD", Some(anyhow::Error::new(e)))
                }
            })?;

        if !head.is_success() {
            return Err(AssetError::unreachable(
                url,
                "HEAD",
                Some(anyhow::anyhow!("HTTP status {}", head.status)),
            ));
        }
        Ok(head)
    }

    async fn probe(&self, url: &str, target: &str) -> Result<MediaProbe, AssetError> {
        self.bounded(self.prober.probe_media(target))
            .await
            .ok_or_else(|| {
                AssetError::timeout(
                    url,
                    "probe",
                    Some(anyhow::anyhow!("no result after {:?}", self.opts.timeout)),
                )
            })?
            .map_err(|e: ProbeError| AssetError::probe(url, "probe", Some(anyhow::Error::new(e))))
    }

    /// Runs `fut` under the configured timeout; `None` means it ran out of time.
    async fn bounded<T>(&self, fut: impl Future<Output = T>) -> Option<T> {
        tokio::time::timeout(self.opts.timeout, fut).await.ok()
    }
}
