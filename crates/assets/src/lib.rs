// ABOUTME: Asset inspection for podcast media URLs: existence check, hash headers, media probe.
// ABOUTME: Re-exports Inspector, InspectorBuilder, AssetInfo, AssetError and the collaborator traits.

//! Network-facing half of podgen.
//!
//! An [`Inspector`] answers one question per episode: is this media URL
//! reachable, what is it, and how long is it? Both sub-steps go through
//! narrow capability traits ([`HeaderFetcher`], [`MediaProber`]) so callers
//! and tests can substitute their own transport.
//!
//! ```no_run
//! use podgen_assets::Inspector;
//!
//! # async fn run() -> Result<(), podgen_assets::AssetError> {
//! let inspector = Inspector::builder().probe_media(false).build()?;
//! let info = inspector.inspect("https://cdn.example.com/ep1.mp3").await?;
//! println!("{:?} {:?}", info.mime_type, info.content_hash());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod hash;
pub mod inspector;
pub mod mime;
pub mod options;
pub mod probe;
pub mod resource;

pub use crate::error::{AssetError, ErrorCode};
pub use crate::hash::{best_hash, hash_candidates, ContentHash, HashSource};
pub use crate::inspector::{AssetInfo, AssetProbeResult, Inspector};
pub use crate::options::{InspectorBuilder, InspectorOptions};
pub use crate::probe::{FfprobeProber, MediaProbe, MediaProber, ProbeError};
pub use crate::resource::{HeadResponse, HeaderFetcher, ReqwestFetcher, TransportError};
