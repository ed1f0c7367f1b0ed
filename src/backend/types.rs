use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
    /// Name used for a download when an item has neither caption nor identifier.
    pub fn fallback_name(&self) -> &'static str {
        match self {
            Self::Image => "photo",
            Self::Video => "video",
        }
    }
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Image => "jpg",
            Self::Video => "mp4",
        }
    }
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "webp" => Some(Self::Image),
            "mp4" | "m4v" | "mov" | "webm" | "mkv" | "avi" => Some(Self::Video),
            _ => None,
        }
    }
    pub fn mime_type(&self, ext: &str) -> &'static str {
        match (self, ext.to_ascii_lowercase().as_str()) {
            (Self::Image, "png") => "image/png",
            (Self::Image, "webp") => "image/webp",
            (Self::Image, _) => "image/jpeg",
            (Self::Video, "mov") => "video/quicktime",
            (Self::Video, "webm") => "video/webm",
            (Self::Video, "mkv") => "video/x-matroska",
            (Self::Video, "avi") => "video/x-msvideo",
            (Self::Video, _) => "video/mp4",
        }
    }
    pub fn plural(&self, count: usize) -> &'static str {
        match (self, count) {
            (Self::Image, 1) => "image",
            (Self::Image, _) => "images",
            (Self::Video, 1) => "video",
            (Self::Video, _) => "videos",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields shared by every kind of media item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaData {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(alias = "src")]
    pub url: String,
    #[serde(
        default,
        deserialize_with = "non_empty",
        skip_serializing_if = "Option::is_none"
    )]
    pub caption: Option<String>,
    #[serde(
        rename = "uploadedAt",
        alias = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<DateTime<Utc>>,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}

/// A single photo or video served by the gallery backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaItem {
    Image(MediaData),
    Video(MediaData),
}

impl MediaItem {
    pub fn new(kind: MediaKind, data: MediaData) -> Self {
        match kind {
            MediaKind::Image => Self::Image(data),
            MediaKind::Video => Self::Video(data),
        }
    }
    pub fn data(&self) -> &MediaData {
        match self {
            Self::Image(data) | Self::Video(data) => data,
        }
    }
    pub fn kind(&self) -> MediaKind {
        match self {
            Self::Image(_) => MediaKind::Image,
            Self::Video(_) => MediaKind::Video,
        }
    }
    pub fn id(&self) -> &str {
        &self.data().id
    }
    pub fn url(&self) -> &str {
        &self.data().url
    }
    pub fn caption(&self) -> Option<&str> {
        self.data().caption.as_deref()
    }
    pub fn uploaded_at(&self) -> Option<&DateTime<Utc>> {
        self.data().uploaded_at.as_ref()
    }
    /// Caption if present, otherwise the identifier.
    pub fn title(&self) -> &str {
        self.caption().unwrap_or(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub page: u32,
    pub limit: u32,
    pub kind: Option<MediaKind>,
    pub search: Option<String>,
}

impl Default for MediaQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            kind: None,
            search: None,
        }
    }
}

impl MediaQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(kind) = self.kind {
            params.push(("type", kind.to_string()));
        }
        if let Some(search) = self.search.as_ref().filter(|s| !s.is_empty()) {
            params.push(("search", search.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MediaPage {
    pub media: Vec<MediaItem>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

impl MediaPage {
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        (self.total.div_ceil(self.limit as usize) as u32).max(1)
    }
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub path: PathBuf,
    pub name: String,
    pub mime: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub files: Vec<UploadFile>,
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Acknowledgement {
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}
