use image::imageops::FilterType;
use image::{DynamicImage, ImageError, RgbImage};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

/// Longest edge of a generated thumbnail, in pixels.
pub const THUMBNAIL_SIZE: u32 = 96;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] ImageError),
    #[error("preview task failed: {0}")]
    Join(#[from] task::JoinError),
}

/// Downscaled raster plus the dimensions of the original image.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub image: RgbImage,
}

impl Thumbnail {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PreviewError> {
        Ok(Self::from(image::load_from_memory(bytes)?))
    }
}

impl From<DynamicImage> for Thumbnail {
    fn from(decoded: DynamicImage) -> Self {
        Self {
            width: decoded.width(),
            height: decoded.height(),
            image: decoded
                .resize(THUMBNAIL_SIZE, THUMBNAIL_SIZE, FilterType::Triangle)
                .to_rgb8(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Image(Thumbnail),
    /// Videos are previewed by handing the local file to the system player.
    Video(PathBuf),
}

impl Preview {
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        match self {
            Self::Image(thumbnail) => Some(thumbnail),
            Self::Video(_) => None,
        }
    }
}

/// Decodes on a blocking thread.
pub async fn thumbnail_from_bytes(bytes: Vec<u8>) -> Result<Thumbnail, PreviewError> {
    task::spawn_blocking(move || Thumbnail::from_bytes(&bytes)).await?
}

pub async fn thumbnail_from_path(path: &Path) -> Result<Thumbnail, PreviewError> {
    let path = path.to_path_buf();
    task::spawn_blocking(move || -> Result<_, PreviewError> {
        Ok(Thumbnail::from(image::open(path)?))
    })
    .await?
}

#[cfg(test)]
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]))
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("failed to encode png");
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn downscale() {
        let thumbnail = thumbnail_from_bytes(png_bytes(400, 200))
            .await
            .expect("failed to decode");
        assert_eq!((thumbnail.width, thumbnail.height), (400, 200));
        assert_eq!(thumbnail.image.dimensions(), (96, 48));
    }

    #[tokio::test]
    async fn from_path() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("a.png");
        std::fs::write(&path, png_bytes(10, 20)).expect("failed to write");
        let thumbnail = thumbnail_from_path(&path).await.expect("failed to decode");
        assert_eq!((thumbnail.width, thumbnail.height), (10, 20));
    }

    #[tokio::test]
    async fn invalid_bytes() {
        assert!(matches!(
            thumbnail_from_bytes(b"not an image".to_vec()).await,
            Err(PreviewError::Decode(_))
        ));
    }
}
