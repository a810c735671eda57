use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt};
use log::{debug, warn};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::models::{SourceConfig, StreamDescriptor, Video, VideoMetadata};
use super::{ChunkCallback, VideoSource};
use crate::domain::SourceError;
use crate::utils::output_file_name;

/// Resolves videos through the `yt-dlp` executable and fetches the chosen
/// stream over plain HTTP.
#[derive(Clone)]
pub struct YtDlpSource {
    config: SourceConfig,
    http: Client,
}

impl YtDlpSource {
    pub fn new(config: SourceConfig) -> Self {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self { config, http }
    }

    pub fn parse_metadata(json: &[u8]) -> Result<Video, SourceError> {
        let meta: VideoMetadata = serde_json::from_slice(json)?;
        Ok(Video::from(meta))
    }

    async fn fetch_metadata(&self, url: &str) -> Result<Video, SourceError> {
        let program = self.config.program.display().to_string();
        debug!("Resolving {} with {}", url, program);

        let output = Command::new(&self.config.program)
            .args(["--dump-single-json", "--no-playlist", "--no-warnings", "--"])
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SourceError::ToolMissing(program.clone()),
                _ => SourceError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Resolve(error_summary(
                &stderr,
                &output.status.to_string(),
            )));
        }

        Self::parse_metadata(&output.stdout)
    }

    async fn fetch_stream(
        &self,
        video: &Video,
        stream: &StreamDescriptor,
        target_dir: &Path,
        on_chunk: ChunkCallback<'_>,
    ) -> Result<PathBuf, SourceError> {
        let mut request = self.http.get(&stream.url);
        for (name, value) in &stream.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await?.error_for_status()?;

        let mut active = stream.clone();
        active.filesize = stream
            .filesize
            .or(response.content_length())
            .or(stream.filesize_approx);

        let path = target_dir.join(output_file_name(&video.title, &video.id, &stream.ext));
        let mut file = tokio::fs::File::create(&path).await?;

        let mut downloaded: u64 = 0;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;

            downloaded += chunk.len() as u64;
            let remaining = active
                .filesize
                .map_or(0, |total| total.saturating_sub(downloaded));
            on_chunk(&active, &chunk, remaining);
        }

        file.flush().await?;
        file.sync_all().await?;
        debug!("Wrote {} bytes to {}", downloaded, path.display());

        Ok(path)
    }
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new(SourceConfig::default())
    }
}

impl VideoSource for YtDlpSource {
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Video, SourceError>> {
        self.fetch_metadata(url).boxed()
    }

    fn transfer<'a>(
        &'a self,
        video: &'a Video,
        stream: &'a StreamDescriptor,
        target_dir: &'a Path,
        on_chunk: ChunkCallback<'a>,
    ) -> BoxFuture<'a, Result<PathBuf, SourceError>> {
        self.fetch_stream(video, stream, target_dir, on_chunk).boxed()
    }
}

/// Picks the most useful line out of yt-dlp's stderr.
fn error_summary(stderr: &str, status: &str) -> String {
    let lines = stderr.lines().map(str::trim).filter(|l| !l.is_empty());

    if let Some(line) = lines.clone().filter(|l| l.starts_with("ERROR:")).last() {
        return line.trim_start_matches("ERROR:").trim().to_string();
    }

    lines
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| format!("yt-dlp exited with {}", status))
}
