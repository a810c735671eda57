mod app;
mod application;
mod domain;
mod source;
mod ui;
mod utils;

use iced::{window, Size};

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("YouTube Downloader")
        .window(window::Settings {
            size: Size::new(560.0, 260.0),
            resizable: false,
            ..Default::default()
        })
        .run()
}
