pub mod error;
pub mod model;

pub use error::{DownloadError, SourceError, ValidationError};
pub use model::{DownloadOutcome, DownloadRequest, Notice, NoticeLevel, Phase};
