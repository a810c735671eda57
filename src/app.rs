use std::path::PathBuf;
use std::sync::Arc;

use futures::channel::mpsc;
use futures::{Stream, StreamExt};
use iced::Task;
use log::{error, info, warn};

use crate::application::DownloadOrchestrator;
use crate::domain::{DownloadOutcome, DownloadRequest, Notice, NoticeLevel};
use crate::source::{SourceConfig, YtDlpSource};
use crate::ui::{DownloadMessage, DownloadView};

pub struct DownloadApp {
    view: DownloadView,
    orchestrator: Arc<DownloadOrchestrator>,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        let source = Arc::new(YtDlpSource::new(SourceConfig::default()));
        Self::with_orchestrator(DownloadOrchestrator::new(source))
    }

    pub fn with_orchestrator(orchestrator: DownloadOrchestrator) -> Self {
        Self {
            view: DownloadView::default(),
            orchestrator: Arc::new(orchestrator),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    FolderSelected(Option<PathBuf>),
    /// Percentage reported by the worker, not yet clamped
    DownloadProgress(i32),
    DownloadFinished(DownloadOutcome),
    NoticeClosed,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::BrowsePressed => {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .set_title("Choose the download folder")
                                .pick_folder()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::FolderSelected,
                    );
                }
                DownloadMessage::DownloadPressed => {
                    return match app.view.begin() {
                        Ok(request) => {
                            info!("Starting download of {}", request.url);
                            spawn_download(app.orchestrator.clone(), request)
                        }
                        Err(notice) => show_notice(notice),
                    };
                }
                _ => {}
            }
        }
        Message::FolderSelected(Some(path)) => {
            app.view.set_output_dir(&path);
        }
        Message::FolderSelected(None) => {}
        Message::DownloadProgress(percent) => {
            app.view.apply_progress(percent);
        }
        Message::DownloadFinished(outcome) => {
            let notice = app.view.finish(outcome);
            return show_notice(notice);
        }
        Message::NoticeClosed => {}
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

/// Runs one download on a detached tokio task.
fn spawn_download(
    orchestrator: Arc<DownloadOrchestrator>,
    request: DownloadRequest,
) -> Task<Message> {
    Task::stream(download_messages(orchestrator, request))
}

/// Messages produced by one download worker: progress percentages in the
/// order chunks arrive, each value sent once, then a single
/// `DownloadFinished`. The worker only talks to the UI through this stream,
/// which iced drains into `update`.
fn download_messages(
    orchestrator: Arc<DownloadOrchestrator>,
    request: DownloadRequest,
) -> impl Stream<Item = Message> + Send + 'static {
    let (tx, rx) = mpsc::unbounded();

    let start = async move {
        tokio::spawn(async move {
            let progress_tx = tx.clone();
            let mut last_sent: Option<u8> = None;
            let mut on_progress = move |percent: u8| {
                if last_sent == Some(percent) {
                    return;
                }
                last_sent = Some(percent);
                // The receiver is gone once the window closes.
                let _ = progress_tx
                    .unbounded_send(Message::DownloadProgress(i32::from(percent)));
            };

            let outcome = match orchestrator
                .download_highest(
                    &request.url,
                    request.output_dir.as_deref(),
                    Some(&mut on_progress),
                )
                .await
            {
                Ok(path) => {
                    info!("Saved {}", path.display());
                    DownloadOutcome::Success(path)
                }
                Err(e) => {
                    error!("Download of {} failed: {}", request.url, e);
                    DownloadOutcome::Failure(e.to_string())
                }
            };

            if tx.unbounded_send(Message::DownloadFinished(outcome)).is_err() {
                warn!("Download finished after the window closed");
            }
        });

        rx
    };

    futures::stream::once(start).flatten()
}

fn show_notice(notice: Notice) -> Task<Message> {
    let level = match notice.level {
        NoticeLevel::Info => rfd::MessageLevel::Info,
        NoticeLevel::Warning => rfd::MessageLevel::Warning,
        NoticeLevel::Error => rfd::MessageLevel::Error,
    };

    Task::perform(
        async move {
            rfd::AsyncMessageDialog::new()
                .set_level(level)
                .set_title(notice.title.as_str())
                .set_description(notice.body.as_str())
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await
        },
        |_| Message::NoticeClosed,
    )
}
