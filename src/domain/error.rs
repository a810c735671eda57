use thiserror::Error;

/// Input problems caught before a worker starts. The message is shown as-is
/// in the warning dialog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a video URL.")]
    EmptyUrl,

    #[error("Choose an existing folder or leave the field empty.")]
    MissingDirectory,
}

/// Failures reported by the video collaborator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("`{0}` was not found; install yt-dlp or put it on PATH")]
    ToolMissing(String),

    #[error("Could not resolve video: {0}")]
    Resolve(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    #[error("No downloadable stream is available for this video")]
    NoStreams,

    #[error("Output directory is not usable: {0}")]
    OutputDirectory(std::io::Error),

    #[error(transparent)]
    Source(#[from] SourceError),
}
