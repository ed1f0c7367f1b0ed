use crate::backend::types::MediaItem;
use crate::backend::MediaUpdate;
use crate::gallery::preview::Thumbnail;
use crate::gallery::upload::PreparedFile;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Action {
    NextItem,
    PrevItem,
    NextInput,
    PrevInput,
    Enter,
    Back,
    Refresh,
    Menu,
    Toggle,
    Download,
    ClearSelection,
    Filter,
    Search,
    NextPage,
    PrevPage,
    Open,
    Delete,
    Edit,
    Upload,
    Export,
    Logout,
    Admin,
    Health,
    Quit,
    Render,
    Update(Box<Data>),
    Transition(Transition),
    Status(Status),
}

/// Results delivered to views by background tasks.
#[derive(Debug, Clone)]
pub enum Data {
    Media(MediaUpdate),
    Preview(String, Result<Thumbnail, String>),
    Archived(Result<ArchiveReport, String>),
    Saved(Result<PathBuf, String>),
    Prepared(Result<PreparedFile, String>),
    Uploaded(Result<Vec<MediaItem>, String>),
    Deleted(Result<String, String>),
    CaptionUpdated(Result<MediaItem, String>),
    LoggedIn(Result<(), String>),
    LoggedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: Option<PathBuf>,
    pub entries: usize,
    pub skipped: usize,
}

impl ArchiveReport {
    pub fn message(&self) -> String {
        match &self.path {
            None => String::from("Nothing downloaded"),
            Some(path) if self.skipped > 0 => format!(
                "Saved {} files to {} ({} skipped)",
                self.entries,
                path.display(),
                self.skipped
            ),
            Some(path) => format!("Saved {} files to {}", self.entries, path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Gallery,
    Login,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Push(View),
    Pop,
    Replace(View),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_messages() {
        let mut report = ArchiveReport {
            path: None,
            entries: 0,
            skipped: 2,
        };
        assert_eq!(report.message(), "Nothing downloaded");
        report.path = Some(PathBuf::from("/tmp/media-2024-06-01.zip"));
        report.entries = 3;
        assert_eq!(
            report.message(),
            "Saved 3 files to /tmp/media-2024-06-01.zip (2 skipped)"
        );
        report.skipped = 0;
        assert_eq!(report.message(), "Saved 3 files to /tmp/media-2024-06-01.zip");
    }
}
