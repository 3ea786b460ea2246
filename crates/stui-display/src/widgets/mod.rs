#![forbid(unsafe_code)]

//! Concrete windows of the torrent client UI.

mod download_list;
mod log_view;
mod status_bar;
mod title;

pub use download_list::DownloadList;
pub use log_view::LogView;
pub use status_bar::StatusBar;
pub use title::TitleBar;
