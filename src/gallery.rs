//! Gallery workflows that do not depend on the terminal: the active media
//! collection, selection, archive building, lightbox navigation and upload
//! staging.

pub mod archive;
pub mod collection;
pub mod download;
pub mod lightbox;
pub mod preview;
pub mod selection;
pub mod upload;

pub use archive::{Archive, ArchiveBuilder, BlobFetcher};
pub use collection::Collection;
pub use lightbox::{LightboxCommand, Navigator, SwipeTracker};
pub use selection::SelectionSet;
pub use upload::{MediaUploader, UploadBatch};

#[cfg(test)]
pub(crate) mod testing {
    use crate::backend::types::{MediaData, MediaItem, MediaKind};

    pub fn item(id: &str, kind: MediaKind, caption: Option<&str>) -> MediaItem {
        let ext = kind.default_extension();
        MediaItem::new(
            kind,
            MediaData {
                id: id.to_string(),
                url: format!("https://cdn.test/{id}.{ext}"),
                caption: caption.map(String::from),
                uploaded_at: None,
            },
        )
    }

    pub fn images(ids: &[&str]) -> Vec<MediaItem> {
        ids.iter()
            .map(|id| item(id, MediaKind::Image, None))
            .collect()
    }
}
