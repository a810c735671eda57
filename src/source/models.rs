use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level document printed by `yt-dlp --dump-single-json`
#[derive(Debug, Clone, Deserialize)]
pub struct VideoMetadata {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub formats: Vec<FormatMetadata>,
}

/// One entry of the `formats` array
#[derive(Debug, Clone, Deserialize)]
pub struct FormatMetadata {
    pub format_id: String,
    #[serde(default)]
    pub ext: String,
    pub url: Option<String>,
    pub protocol: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tbr: Option<f64>,
    pub filesize: Option<u64>,
    pub filesize_approx: Option<f64>,
    #[serde(default)]
    pub http_headers: HashMap<String, String>,
}

/// A selectable encoding variant of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDescriptor {
    pub format_id: String,
    pub ext: String,
    pub url: String,
    pub protocol: String,
    pub has_video: bool,
    pub has_audio: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Total bitrate in KBit/s
    pub bitrate: Option<f64>,
    /// Exact size in bytes, when the host declares one
    pub filesize: Option<u64>,
    pub filesize_approx: Option<u64>,
    pub headers: Vec<(String, String)>,
}

impl StreamDescriptor {
    pub fn is_progressive(&self) -> bool {
        self.has_video && self.has_audio
    }

    /// True when the bytes can be fetched with a single HTTP GET.
    pub fn is_direct(&self) -> bool {
        matches!(self.protocol.as_str(), "http" | "https")
    }

    pub fn resolution_label(&self) -> String {
        match (self.width, self.height) {
            (Some(w), Some(h)) => format!("{}x{}", w, h),
            (None, Some(h)) => format!("{}p", h),
            _ => "unknown resolution".to_string(),
        }
    }
}

/// A resolved video and the streams the host offers for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub streams: Vec<StreamDescriptor>,
}

impl Video {
    /// Picks the progressive, directly downloadable stream with the largest
    /// height. Equal heights are decided by bitrate.
    pub fn highest_resolution(&self) -> Option<&StreamDescriptor> {
        self.streams
            .iter()
            .filter(|s| s.is_progressive() && s.is_direct())
            .max_by(|a, b| {
                a.height
                    .unwrap_or(0)
                    .cmp(&b.height.unwrap_or(0))
                    .then_with(|| {
                        a.bitrate
                            .unwrap_or(0.0)
                            .total_cmp(&b.bitrate.unwrap_or(0.0))
                    })
            })
    }
}

impl From<VideoMetadata> for Video {
    fn from(meta: VideoMetadata) -> Self {
        let streams = meta
            .formats
            .into_iter()
            .filter_map(|f| {
                let url = f.url?;
                let protocol = f.protocol.unwrap_or_else(|| {
                    url.split_once("://")
                        .map(|(scheme, _)| scheme.to_string())
                        .unwrap_or_default()
                });
                let mut headers: Vec<(String, String)> = f.http_headers.into_iter().collect();
                headers.sort();

                Some(StreamDescriptor {
                    format_id: f.format_id,
                    ext: if f.ext.is_empty() {
                        "mp4".to_string()
                    } else {
                        f.ext
                    },
                    url,
                    protocol,
                    has_video: f.vcodec.as_deref() != Some("none"),
                    has_audio: f.acodec.as_deref() != Some("none"),
                    width: f.width,
                    height: f.height,
                    bitrate: f.tbr,
                    filesize: f.filesize,
                    filesize_approx: f
                        .filesize_approx
                        .filter(|n| n.is_finite() && *n > 0.0)
                        .map(|n| n as u64),
                    headers,
                })
            })
            .collect();

        Self {
            id: meta.id,
            title: meta.title,
            streams,
        }
    }
}

/// Settings for the yt-dlp backed source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Program used to resolve video metadata
    pub program: PathBuf,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(if cfg!(target_os = "windows") {
                "yt-dlp.exe"
            } else {
                "yt-dlp"
            }),
            user_agent: concat!("video-downloader/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
