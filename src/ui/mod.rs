use std::path::{Path, PathBuf};

use iced::{
    widget::{button, column, progress_bar, row, text, text_input, Space},
    Alignment, Element, Length,
};

use crate::domain::{DownloadOutcome, DownloadRequest, Notice, Phase, ValidationError};

const LABEL_WIDTH: f32 = 110.0;

/// Main view state
pub struct DownloadView {
    pub url: String,
    pub output_dir: String,
    /// Always within 0..=100
    pub progress: u8,
    pub status_message: String,
    pub phase: Phase,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            url: String::new(),
            output_dir: String::new(),
            progress: 0,
            status_message: "Ready".to_string(),
            phase: Phase::Idle,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    OutputDirChanged(String),
    BrowsePressed,
    DownloadPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.url = url;
            }
            DownloadMessage::OutputDirChanged(dir) => {
                self.output_dir = dir;
            }
            DownloadMessage::BrowsePressed | DownloadMessage::DownloadPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Busy
    }

    pub fn set_output_dir(&mut self, dir: &Path) {
        self.output_dir = dir.display().to_string();
    }

    /// Checks the form fields without touching any state.
    pub fn validate(&self) -> Result<DownloadRequest, ValidationError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl);
        }

        let dir = self.output_dir.trim();
        let output_dir = if dir.is_empty() {
            None
        } else {
            let path = PathBuf::from(dir);
            if !path.is_dir() {
                return Err(ValidationError::MissingDirectory);
            }
            Some(path)
        };

        Ok(DownloadRequest {
            url: url.to_string(),
            output_dir,
        })
    }

    /// Idle -> Busy. On invalid input the view stays idle and the returned
    /// notice should be shown instead of starting a worker.
    pub fn begin(&mut self) -> Result<DownloadRequest, Notice> {
        let request = self
            .validate()
            .map_err(|e| Notice::warning("Warning", e.to_string()))?;

        self.phase = Phase::Busy;
        self.progress = 0;
        self.status_message = downloading_status(0);
        Ok(request)
    }

    pub fn apply_progress(&mut self, percent: i32) {
        self.progress = percent.clamp(0, 100) as u8;
        self.status_message = downloading_status(self.progress);
    }

    /// Busy -> Idle. The progress bar keeps its last value on failure.
    pub fn finish(&mut self, outcome: DownloadOutcome) -> Notice {
        self.phase = Phase::Idle;

        match outcome {
            DownloadOutcome::Success(path) => {
                self.progress = 100;
                self.status_message = "Download complete".to_string();
                Notice::info("Completed", format!("Video downloaded:\n{}", path.display()))
            }
            DownloadOutcome::Failure(description) => {
                self.status_message = "Error occurred".to_string();
                Notice::error("Error", format!("Download failed:\n{}", description))
            }
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let url_row = row![
            text("Video URL").width(Length::Fixed(LABEL_WIDTH)),
            text_input("https://www.youtube.com/watch?v=...", &self.url)
                .on_input(DownloadMessage::UrlChanged)
                .padding(6)
                .width(Length::Fill),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let folder_row = row![
            text("Save Folder").width(Length::Fixed(LABEL_WIDTH)),
            text_input("Current folder", &self.output_dir)
                .on_input(DownloadMessage::OutputDirChanged)
                .padding(6)
                .width(Length::Fill),
            button("Browse...").on_press(DownloadMessage::BrowsePressed),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let download_button = button("Download")
            .padding([8, 20])
            .on_press_maybe((!self.is_busy()).then_some(DownloadMessage::DownloadPressed));

        column![
            url_row,
            folder_row,
            progress_bar(0.0..=100.0, f32::from(self.progress)),
            text(&self.status_message).size(14),
            row![Space::new().width(Length::Fill), download_button],
        ]
        .padding(12)
        .spacing(12)
        .into()
    }
}

fn downloading_status(percent: u8) -> String {
    format!("Downloading... {}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NoticeLevel;

    fn view_with(url: &str, dir: &str) -> DownloadView {
        DownloadView {
            url: url.to_string(),
            output_dir: dir.to_string(),
            ..DownloadView::default()
        }
    }

    #[test]
    fn test_empty_url_stays_idle() {
        let mut view = view_with("   ", "");
        let notice = view.begin().unwrap_err();

        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.body, "Please enter a video URL.");
        assert_eq!(view.phase, Phase::Idle);
        assert!(!view.is_busy());
        assert_eq!(view.status_message, "Ready");
    }

    #[test]
    fn test_missing_directory_stays_idle() {
        let mut view = view_with("https://youtu.be/abc", "/nonexistent/path");
        let notice = view.begin().unwrap_err();

        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.body, ValidationError::MissingDirectory.to_string());
        assert_eq!(view.phase, Phase::Idle);
    }

    #[test]
    fn test_begin_trims_and_accepts_existing_directory() {
        let dir = std::env::temp_dir();
        let mut view = view_with(" https://youtu.be/abc ", &format!(" {} ", dir.display()));
        view.progress = 42;

        let request = view.begin().unwrap();
        assert_eq!(request.url, "https://youtu.be/abc");
        assert_eq!(request.output_dir, Some(dir));
        assert!(view.is_busy());
        assert_eq!(view.progress, 0);
        assert_eq!(view.status_message, "Downloading... 0%");
    }

    #[test]
    fn test_empty_directory_means_default_location() {
        let mut view = view_with("https://youtu.be/abc", "");
        assert_eq!(view.begin().unwrap().output_dir, None);
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut view = view_with("https://youtu.be/abc", "");
        view.begin().unwrap();

        for (reported, shown) in [(-5, 0), (0, 0), (37, 37), (100, 100), (250, 100)] {
            view.apply_progress(reported);
            assert_eq!(view.progress, shown);
            assert_eq!(view.status_message, format!("Downloading... {}%", shown));
        }
        assert!(view.is_busy());
    }

    #[test]
    fn test_successful_download() {
        let mut view = view_with("https://youtu.be/abc", "");
        view.begin().unwrap();

        let mut statuses = Vec::new();
        for p in [0, 50, 100] {
            view.apply_progress(p);
            statuses.push(view.status_message.clone());
        }
        assert_eq!(
            statuses,
            ["Downloading... 0%", "Downloading... 50%", "Downloading... 100%"]
        );

        let notice = view.finish(DownloadOutcome::Success(PathBuf::from("/downloads/video.mp4")));
        assert_eq!(notice.level, NoticeLevel::Info);
        assert!(notice.body.contains("/downloads/video.mp4"));
        assert_eq!(view.progress, 100);
        assert_eq!(view.status_message, "Download complete");
        assert!(!view.is_busy());
    }

    #[test]
    fn test_failure_keeps_last_progress() {
        let mut view = view_with("https://youtu.be/abc", "");
        view.begin().unwrap();
        view.apply_progress(30);

        let notice = view.finish(DownloadOutcome::Failure("Video unavailable".to_string()));
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.body.contains("Video unavailable"));
        assert_eq!(view.progress, 30);
        assert_eq!(view.status_message, "Error occurred");
        assert!(!view.is_busy());
    }

    #[test]
    fn test_second_download_starts_fresh() {
        let mut view = view_with("https://youtu.be/abc", "");
        view.begin().unwrap();
        view.apply_progress(60);
        view.finish(DownloadOutcome::Failure("timeout".to_string()));

        let request = view.begin().unwrap();
        assert_eq!(request.url, "https://youtu.be/abc");
        assert!(view.is_busy());
        assert_eq!(view.progress, 0);
        assert_eq!(view.status_message, "Downloading... 0%");

        view.finish(DownloadOutcome::Success(PathBuf::from("/tmp/a.mp4")));
        assert!(!view.is_busy());
    }

    #[test]
    fn test_input_messages_update_fields() {
        let mut view = DownloadView::default();
        view.update(DownloadMessage::UrlChanged("https://youtu.be/x".to_string()));
        view.update(DownloadMessage::OutputDirChanged("/tmp".to_string()));
        view.set_output_dir(Path::new("/home/user/Videos"));

        assert_eq!(view.url, "https://youtu.be/x");
        assert_eq!(view.output_dir, "/home/user/Videos");
    }
}
