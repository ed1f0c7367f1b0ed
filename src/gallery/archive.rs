use super::collection::Collection;
use super::download;
use super::selection::SelectionSet;
use crate::backend::types::MediaItem;
use crate::backend::ApiError;
use chrono::{Local, NaiveDate};
use futures_util::future;
use std::collections::HashSet;
use std::future::Future;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Source of the raw bytes behind a media URL.
pub trait BlobFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

#[derive(Debug, Error)]
#[error("failed to fetch {url}: {source}")]
pub struct FetchError {
    pub url: String,
    pub source: ApiError,
}

impl FetchError {
    pub fn new(url: &str, source: ApiError) -> Self {
        Self {
            url: url.to_string(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub id: String,
    pub reason: String,
}

/// A ZIP container built in memory from selected media.
#[derive(Debug, Clone)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub entries: Vec<String>,
    pub skipped: Vec<SkippedItem>,
}

impl Archive {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    /// Writes the archive into `dir` without replacing an existing file.
    pub async fn save(&self, dir: &Path) -> Result<PathBuf, ArchiveError> {
        let path = download::save(dir, &self.file_name, &self.bytes).await?;
        log::info!("saved {} ({} entries)", path.display(), self.entries.len());
        Ok(path)
    }
}

pub fn archive_file_name(date: NaiveDate) -> String {
    format!("media-{}.zip", date.format("%Y-%m-%d"))
}

/// Hands out entry names that are unique within one archive.
#[derive(Default)]
struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    fn allocate(&mut self, item: &MediaItem) -> String {
        let (stem, ext) = (download::file_stem(item), download::file_extension(item));
        let name = [
            format!("{stem}.{ext}"),
            format!("{stem}-{}.{ext}", item.id()),
        ]
        .into_iter()
        .chain((1..).map(|n| format!("{stem}-{}-{n}.{ext}", item.id())))
        .find(|name| !self.used.contains(name))
        .unwrap_or_default();
        self.used.insert(name.clone());
        name
    }
}

pub struct ArchiveBuilder<F> {
    fetcher: F,
}

impl<F> ArchiveBuilder<F>
where
    F: BlobFetcher + Sync,
{
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
    /// Builds an archive of the selected items, named after today's local date.
    /// Returns `None` without fetching anything when the selection is empty.
    pub async fn build(
        &self,
        selection: &SelectionSet,
        collection: &Collection,
    ) -> Result<Option<Archive>, ArchiveError> {
        self.build_on(selection, collection, Local::now().date_naive())
            .await
    }
    pub async fn build_on(
        &self,
        selection: &SelectionSet,
        collection: &Collection,
        date: NaiveDate,
    ) -> Result<Option<Archive>, ArchiveError> {
        if selection.is_empty() {
            return Ok(None);
        }
        let mut items = selection.resolve(collection);
        items.sort_by_key(|item| collection.index_of(item.id()));
        log::debug!(
            "archive {} of {} selected items",
            items.len(),
            selection.len()
        );
        let fetched = future::join_all(items.into_iter().map(|item| async move {
            (item, self.fetcher.fetch(item.url()).await)
        }))
        .await;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut names = NameAllocator::default();
        let (mut entries, mut skipped) = (Vec::new(), Vec::new());
        for (item, result) in fetched {
            match result {
                Ok(bytes) => {
                    let name = names.allocate(item);
                    writer.start_file(name.as_str(), options)?;
                    writer.write_all(&bytes)?;
                    entries.push(name);
                }
                Err(e) => {
                    log::warn!("skip {}: {e}", item.id());
                    skipped.push(SkippedItem {
                        id: item.id().to_string(),
                        reason: e.source.user_message(),
                    });
                }
            }
        }
        let bytes = writer.finish()?.into_inner();
        Ok(Some(Archive {
            file_name: archive_file_name(date),
            bytes,
            entries,
            skipped,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::MediaKind;
    use crate::gallery::testing::{images, item};
    use reqwest::StatusCode;
    use std::io::Read;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use zip::ZipArchive;

    #[derive(Default)]
    struct FakeFetcher {
        missing: HashSet<String>,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn failing(urls: &[&str]) -> Self {
            Self {
                missing: urls.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl BlobFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.missing.contains(url) {
                Err(FetchError::new(
                    url,
                    ApiError::Server {
                        status: StatusCode::NOT_FOUND,
                        message: String::from("Media not found"),
                    },
                ))
            } else {
                Ok(url.as_bytes().to_vec())
            }
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("invalid date")
    }

    fn select(ids: &[&str]) -> SelectionSet {
        let mut selection = SelectionSet::new();
        for id in ids {
            selection.toggle(id);
        }
        selection
    }

    fn read_entries(archive: &Archive) -> Vec<(String, Vec<u8>)> {
        let mut zip = ZipArchive::new(Cursor::new(archive.bytes.as_slice()))
            .expect("failed to read archive");
        (0..zip.len())
            .map(|i| {
                let mut file = zip.by_index(i).expect("failed to read entry");
                let mut buf = Vec::new();
                file.read_to_end(&mut buf).expect("failed to read entry");
                (file.name().to_string(), buf)
            })
            .collect()
    }

    #[test]
    fn file_name_from_date() {
        assert_eq!(archive_file_name(date()), "media-2024-06-01.zip");
    }

    #[tokio::test]
    async fn empty_selection_builds_nothing() {
        let collection = images(&["a", "b"]).into_iter().collect::<Collection>();
        let builder = ArchiveBuilder::new(FakeFetcher::default());
        let result = builder
            .build(&SelectionSet::new(), &collection)
            .await
            .expect("failed to build");
        assert!(result.is_none());
        assert_eq!(builder.fetcher().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn one_entry_per_selected_item() {
        let collection = images(&["a", "b", "c", "d", "e"])
            .into_iter()
            .collect::<Collection>();
        let selection = select(&["a", "c", "e"]);
        let builder = ArchiveBuilder::new(FakeFetcher::default());
        let archive = builder
            .build_on(&selection, &collection, date())
            .await
            .expect("failed to build")
            .expect("archive expected");
        assert_eq!(archive.file_name, "media-2024-06-01.zip");
        assert_eq!(archive.entries, vec!["a.jpg", "c.jpg", "e.jpg"]);
        assert!(archive.skipped.is_empty());
        let entries = read_entries(&archive);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].0, "c.jpg");
        assert_eq!(entries[1].1, b"https://cdn.test/c.jpg");
    }

    #[tokio::test]
    async fn shared_captions_do_not_collide() {
        let collection = [
            item("a", MediaKind::Image, Some("Cake")),
            item("b", MediaKind::Image, Some("Cake")),
            item("c", MediaKind::Image, Some("Cake")),
            item("Cake-a", MediaKind::Image, None),
            item("v", MediaKind::Video, Some("Cake")),
        ]
        .into_iter()
        .collect::<Collection>();
        let selection = select(&["a", "b", "c", "v", "Cake-a"]);
        let builder = ArchiveBuilder::new(FakeFetcher::default());
        let archive = builder
            .build_on(&selection, &collection, date())
            .await
            .expect("failed to build")
            .expect("archive expected");
        assert_eq!(
            archive.entries,
            vec![
                "Cake.jpg",
                "Cake-b.jpg",
                "Cake-c.jpg",
                "Cake-a.jpg",
                "Cake.mp4"
            ]
        );
        let unique = archive.entries.iter().collect::<HashSet<_>>();
        assert_eq!(unique.len(), 5);
        assert_eq!(read_entries(&archive).len(), 5);
    }

    #[test]
    fn allocator_falls_back_to_counter() {
        let mut names = NameAllocator::default();
        let first = item("x", MediaKind::Image, Some("Toast"));
        assert_eq!(names.allocate(&first), "Toast.jpg");
        assert_eq!(names.allocate(&first), "Toast-x.jpg");
        assert_eq!(names.allocate(&first), "Toast-x-1.jpg");
        assert_eq!(names.allocate(&first), "Toast-x-2.jpg");
    }

    #[tokio::test]
    async fn failed_fetches_are_skipped() {
        let collection = images(&["a", "b", "c"]).into_iter().collect::<Collection>();
        let selection = select(&["a", "b", "c", "stale"]);
        let builder = ArchiveBuilder::new(FakeFetcher::failing(&["https://cdn.test/b.jpg"]));
        let archive = builder
            .build_on(&selection, &collection, date())
            .await
            .expect("failed to build")
            .expect("archive expected");
        assert_eq!(builder.fetcher().calls.load(Ordering::SeqCst), 3);
        assert_eq!(archive.entries, vec!["a.jpg", "c.jpg"]);
        assert_eq!(
            archive.skipped,
            vec![SkippedItem {
                id: String::from("b"),
                reason: String::from("Media not found"),
            }]
        );
    }

    #[tokio::test]
    async fn all_failed_is_empty() {
        let collection = images(&["a"]).into_iter().collect::<Collection>();
        let builder = ArchiveBuilder::new(FakeFetcher::failing(&["https://cdn.test/a.jpg"]));
        let archive = builder
            .build_on(&select(&["a"]), &collection, date())
            .await
            .expect("failed to build")
            .expect("archive expected");
        assert!(archive.is_empty());
        assert_eq!(read_entries(&archive).len(), 0);
    }

    #[tokio::test]
    async fn save_into_directory() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let collection = images(&["a"]).into_iter().collect::<Collection>();
        let builder = ArchiveBuilder::new(FakeFetcher::default());
        let archive = builder
            .build_on(&select(&["a"]), &collection, date())
            .await
            .expect("failed to build")
            .expect("archive expected");
        let first = archive.save(dir.path()).await.expect("failed to save");
        let second = archive.save(dir.path()).await.expect("failed to save");
        assert_eq!(first.file_name().and_then(|s| s.to_str()), Some("media-2024-06-01.zip"));
        assert_eq!(
            second.file_name().and_then(|s| s.to_str()),
            Some("media-2024-06-01 (1).zip")
        );
    }
}
