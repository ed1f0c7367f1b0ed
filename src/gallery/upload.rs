use super::collection::Collection;
use super::preview::{self, Preview, PreviewError};
use crate::backend::types::{MediaItem, MediaKind, UploadFile, UploadRequest};
use crate::backend::ApiError;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please select at least one file")]
    NothingStaged,
    #[error("An upload is already in progress")]
    Busy,
    #[error("{0}: not a regular file")]
    NotAFile(String),
    #[error("{0}: unsupported file type")]
    Unsupported(String),
    #[error(transparent)]
    Preview(#[from] PreviewError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Failed(String),
}

impl UploadError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Server { message, .. }) => message.clone(),
            Self::Api(ApiError::AuthRequired) => ApiError::AuthRequired.to_string(),
            Self::Api(_) => String::from("Failed to upload media"),
            _ => self.to_string(),
        }
    }
}

/// Destination for a multipart upload of staged files.
pub trait MediaUploader {
    fn upload(
        &self,
        request: UploadRequest,
    ) -> impl Future<Output = Result<Vec<MediaItem>, ApiError>> + Send;
}

/// A local file that has been checked and previewed, ready to be staged.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedFile {
    pub path: PathBuf,
    pub name: String,
    pub kind: MediaKind,
    pub mime: String,
    pub size: u64,
    pub preview: Preview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedFile {
    pub local_id: u64,
    pub file: PreparedFile,
}

pub async fn prepare_file(path: &Path) -> Result<PreparedFile, UploadError> {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let metadata = tokio::fs::metadata(path).await?;
    if !metadata.is_file() {
        return Err(UploadError::NotAFile(name));
    }
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let Some(kind) = MediaKind::from_extension(ext) else {
        return Err(UploadError::Unsupported(name));
    };
    let preview = match kind {
        MediaKind::Image => Preview::Image(preview::thumbnail_from_path(path).await?),
        MediaKind::Video => Preview::Video(path.to_path_buf()),
    };
    Ok(PreparedFile {
        path: path.to_path_buf(),
        mime: kind.mime_type(ext).to_string(),
        name,
        kind,
        size: metadata.len(),
        preview,
    })
}

pub fn upload_summary(items: &[MediaItem]) -> String {
    let parts = [MediaKind::Image, MediaKind::Video]
        .into_iter()
        .filter_map(|kind| {
            let count = items.iter().filter(|item| item.kind() == kind).count();
            (count > 0).then(|| format!("{count} {}", kind.plural(count)))
        })
        .collect::<Vec<_>>();
    if parts.is_empty() {
        String::from("Upload finished, but the server returned no media")
    } else {
        format!("{} uploaded successfully!", parts.join(" and "))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
}

/// Files staged for upload together with their shared caption.
#[derive(Debug, Default)]
pub struct UploadBatch {
    files: Vec<StagedFile>,
    caption: String,
    state: UploadState,
}

impl UploadBatch {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn staged(&self) -> &[StagedFile] {
        &self.files
    }
    pub fn caption(&self) -> &str {
        &self.caption
    }
    pub fn state(&self) -> UploadState {
        self.state
    }
    pub fn is_uploading(&self) -> bool {
        self.state == UploadState::Uploading
    }
    fn ensure_idle(&self) -> Result<(), UploadError> {
        if self.is_uploading() {
            Err(UploadError::Busy)
        } else {
            Ok(())
        }
    }
    /// Appends an already prepared file and returns its local id.
    pub fn add(&mut self, file: PreparedFile) -> Result<u64, UploadError> {
        self.ensure_idle()?;
        let local_id = COUNTER.fetch_add(1, Ordering::SeqCst);
        log::debug!("stage {} as {local_id}", file.path.display());
        self.files.push(StagedFile { local_id, file });
        Ok(local_id)
    }
    /// Reads and previews `path`, then stages it.
    pub async fn stage(&mut self, path: &Path) -> Result<u64, UploadError> {
        self.ensure_idle()?;
        let file = prepare_file(path).await?;
        self.add(file)
    }
    pub async fn stage_files<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Vec<Result<u64, UploadError>> {
        let mut results = Vec::new();
        for path in paths {
            results.push(self.stage(path.as_ref()).await);
        }
        results
    }
    pub fn unstage(&mut self, local_id: u64) -> bool {
        if self.is_uploading() {
            return false;
        }
        let len = self.files.len();
        self.files.retain(|staged| staged.local_id != local_id);
        self.files.len() != len
    }
    pub fn set_caption(&mut self, caption: impl Into<String>) -> bool {
        if self.is_uploading() {
            return false;
        }
        self.caption = caption.into();
        true
    }
    pub fn clear(&mut self) -> bool {
        if self.is_uploading() {
            return false;
        }
        self.files.clear();
        self.caption.clear();
        true
    }
    /// Switches to `Uploading` and returns the request to send.
    pub fn begin_submit(&mut self) -> Result<UploadRequest, UploadError> {
        self.ensure_idle()?;
        if self.files.is_empty() {
            return Err(UploadError::NothingStaged);
        }
        self.state = UploadState::Uploading;
        let caption = self.caption.trim();
        Ok(UploadRequest {
            files: self
                .files
                .iter()
                .map(|staged| UploadFile {
                    path: staged.file.path.clone(),
                    name: staged.file.name.clone(),
                    mime: staged.file.mime.clone(),
                })
                .collect(),
            caption: (!caption.is_empty()).then(|| caption.to_string()),
        })
    }
    /// Applies the server's answer. On success the returned items are put in
    /// front of `collection` and the batch is emptied; on failure the staged
    /// files and caption are kept for a retry.
    pub fn finish_submit<E>(
        &mut self,
        result: Result<Vec<MediaItem>, E>,
        collection: &mut Collection,
    ) -> Result<String, UploadError>
    where
        E: Into<UploadError>,
    {
        self.state = UploadState::Idle;
        match result {
            Ok(items) => {
                let summary = upload_summary(&items);
                log::info!("{summary}");
                collection.prepend(items);
                self.clear();
                Ok(summary)
            }
            Err(e) => {
                let e = e.into();
                log::error!("failed to upload media: {e}");
                Err(e)
            }
        }
    }
    pub async fn submit<U>(
        &mut self,
        uploader: &U,
        collection: &mut Collection,
    ) -> Result<String, UploadError>
    where
        U: MediaUploader,
    {
        let request = self.begin_submit()?;
        let result = uploader.upload(request).await;
        self.finish_submit(result, collection)
    }
}
