pub mod client;
pub mod models;

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;

use crate::domain::SourceError;
use models::Video;

pub use client::YtDlpSource;
pub use models::{SourceConfig, StreamDescriptor};

/// Called once per received chunk with the stream being written, the chunk
/// itself and the number of bytes still expected.
pub type ChunkCallback<'a> = &'a mut (dyn FnMut(&StreamDescriptor, &[u8], u64) + Send);

/// The library that knows how to talk to a video host.
pub trait VideoSource: Send + Sync {
    /// Looks the URL up and lists the streams available for it.
    fn resolve<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Video, SourceError>>;

    /// Writes `stream` into `target_dir` and returns the path of the new file.
    fn transfer<'a>(
        &'a self,
        video: &'a Video,
        stream: &'a StreamDescriptor,
        target_dir: &'a Path,
        on_chunk: ChunkCallback<'a>,
    ) -> BoxFuture<'a, Result<PathBuf, SourceError>>;
}
