// ABOUTME: Media probing through the MediaProber capability.
// ABOUTME: The ffprobe implementation runs the binary with JSON output and reads duration and container.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use crate::mime::from_probe_format;

/// What a probe learned about a media file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaProbe {
    /// Whole seconds, truncated.
    pub duration_seconds: Option<u64>,
    pub mime_type: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("failed to run ffprobe: {0}")]
    Spawn(String),
    #[error("ffprobe exited with {code:?}: {message}")]
    Failed { code: Option<i32>, message: String },
    #[error("unreadable ffprobe output: {0}")]
    Output(String),
}

/// Capability for container/stream inspection.
#[async_trait]
pub trait MediaProber: Send + Sync {
    async fn probe_media(&self, url: &str) -> Result<MediaProbe, ProbeError>;
}

/// `MediaProber` that shells out to `ffprobe`.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    command: String,
}

impl FfprobeProber {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl MediaProber for FfprobeProber {
    async fn probe_media(&self, url: &str) -> Result<MediaProbe, ProbeError> {
        debug!("Probing media: {}", url);

        let mut cmd = Command::new(&self.command);
        cmd.args([
            "-hide_banner",
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            url,
        ]);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // The caller's timeout drops this future; make sure the child goes with it.
        cmd.kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .map_err(|e| ProbeError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ProbeError::Failed {
                code: output.status.code(),
                message: if stderr.is_empty() {
                    "no diagnostic output".to_string()
                } else {
                    stderr
                },
            });
        }

        let data: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ProbeError::Output(e.to_string()))?;
        parse_probe_output(&data)
    }
}

/// Reads duration and MIME type from ffprobe's JSON document.
///
/// Duration comes from the format section, falling back to the first stream
/// that reports one.
pub fn parse_probe_output(data: &Value) -> Result<MediaProbe, ProbeError> {
    if let Some(err) = data.get("error") {
        let message = err
            .get("string")
            .and_then(Value::as_str)
            .unwrap_or("unknown ffprobe error")
            .to_string();
        let code = err.get("code").and_then(Value::as_i64).map(|c| c as i32);
        return Err(ProbeError::Failed { code, message });
    }

    let streams: &[Value] = data
        .get("streams")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    let format = data.get("format");

    if streams.is_empty() && format.is_none() {
        return Err(ProbeError::Output("no streams or format section".to_string()));
    }

    let duration = format
        .and_then(|f| f.get("duration"))
        .and_then(parse_seconds)
        .or_else(|| {
            streams
                .iter()
                .find_map(|s| s.get("duration").and_then(parse_seconds))
        });

    // Cover art shows up as a video stream flagged attached_pic; it does not make the file a video.
    let has_video = streams.iter().any(|s| {
        s.get("codec_type").and_then(Value::as_str) == Some("video")
            && s.get("disposition")
                .and_then(|d| d.get("attached_pic"))
                .and_then(Value::as_i64)
                != Some(1)
    });

    let mime_type = format
        .and_then(|f| f.get("format_name"))
        .and_then(Value::as_str)
        .and_then(|name| from_probe_format(name, has_video))
        .map(str::to_string);

    Ok(MediaProbe {
        duration_seconds: duration,
        mime_type,
    })
}

fn parse_seconds(v: &Value) -> Option<u64> {
    let secs = match v {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    if secs.is_finite() && secs >= 0.0 {
        Some(secs as u64)
    } else {
        None
    }
}
