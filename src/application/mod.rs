pub mod download_orchestrator;

pub use download_orchestrator::DownloadOrchestrator;
