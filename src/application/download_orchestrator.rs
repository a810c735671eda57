use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info, trace, warn};
use thiserror::Error;
use url::Url;

use crate::{
    domain::DownloadError,
    source::{StreamDescriptor, VideoSource},
};

/// Progress callback handed to [`DownloadOrchestrator::download_highest`].
pub type ProgressCallback<'a> = &'a mut (dyn FnMut(u8) + Send);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProgressError {
    #[error("total size is unknown")]
    UnknownTotal,

    #[error("{remaining} bytes remaining exceeds total of {total}")]
    RemainingExceedsTotal { total: u64, remaining: u64 },
}

/// `floor(downloaded / total * 100)` where `downloaded = total - remaining`.
pub fn progress_percent(total: Option<u64>, remaining: u64) -> Result<u8, ProgressError> {
    let total = match total {
        Some(t) if t > 0 => t,
        _ => return Err(ProgressError::UnknownTotal),
    };

    let downloaded = total
        .checked_sub(remaining)
        .ok_or(ProgressError::RemainingExceedsTotal { total, remaining })?;

    let percent = u128::from(downloaded) * 100 / u128::from(total);
    Ok(percent.min(100) as u8)
}

/// Progress for one chunk; any computation problem reads as 0%.
fn best_effort_percent(stream: &StreamDescriptor, remaining: u64) -> u8 {
    match progress_percent(stream.filesize, remaining) {
        Ok(percent) => percent,
        Err(ProgressError::UnknownTotal) => {
            trace!("Size of stream {} unknown, reporting 0%", stream.format_id);
            0
        }
        Err(e) => {
            warn!("Progress for stream {} unavailable: {}", stream.format_id, e);
            0
        }
    }
}

/// Downloads the best single-file rendition of a video through a
/// [`VideoSource`].
#[derive(Clone)]
pub struct DownloadOrchestrator {
    source: Arc<dyn VideoSource>,
}

impl DownloadOrchestrator {
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self { source }
    }

    /// Resolves `url`, picks its highest-resolution stream and writes it to
    /// `output_dir` (the working directory when `None`). Returns the absolute
    /// path of the new file.
    ///
    /// `on_progress` is invoked synchronously on the calling task once per
    /// chunk.
    pub async fn download_highest(
        &self,
        url: &str,
        output_dir: Option<&Path>,
        mut on_progress: Option<ProgressCallback<'_>>,
    ) -> Result<PathBuf, DownloadError> {
        let url = check_url(url)?;

        let target_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().map_err(DownloadError::OutputDirectory)?,
        };
        let target_dir = tokio::fs::canonicalize(&target_dir)
            .await
            .map_err(DownloadError::OutputDirectory)?;

        let video = self.source.resolve(url.as_str()).await?;
        let stream = video
            .highest_resolution()
            .ok_or(DownloadError::NoStreams)?;

        info!(
            "Downloading \"{}\" as format {} ({}) into {}",
            video.title,
            stream.format_id,
            stream.resolution_label(),
            target_dir.display()
        );

        let mut on_chunk = |stream: &StreamDescriptor, _chunk: &[u8], remaining: u64| {
            let percent = best_effort_percent(stream, remaining);
            if let Some(callback) = on_progress.as_mut() {
                callback(percent);
            }
        };

        let path = self
            .source
            .transfer(&video, stream, &target_dir, &mut on_chunk)
            .await?;

        debug!("Download of {} finished", url);
        Ok(path)
    }
}

fn check_url(raw: &str) -> Result<Url, DownloadError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| DownloadError::InvalidUrl(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(DownloadError::InvalidUrl(raw.to_string())),
    }
}
