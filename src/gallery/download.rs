//! File naming and saving for downloaded media.

use crate::backend::types::MediaItem;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const MAX_STEM_LEN: usize = 100;

/// Extension of the last path segment of `url`, ignoring query and fragment.
pub fn url_extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();
    let (_, ext) = segment.rsplit_once('.')?;
    (!ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric())).then_some(ext)
}

fn sanitize(name: &str) -> String {
    let cleaned = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect::<String>();
    cleaned
        .trim_matches(|c: char| c.is_whitespace() || c == '.')
        .chars()
        .take(MAX_STEM_LEN)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// File name without extension: the caption, else the identifier, else a
/// per-kind fallback.
pub fn file_stem(item: &MediaItem) -> String {
    [item.caption(), Some(item.id())]
        .into_iter()
        .flatten()
        .map(sanitize)
        .find(|s| !s.is_empty())
        .unwrap_or_else(|| item.kind().fallback_name().to_string())
}

pub fn file_extension(item: &MediaItem) -> &str {
    url_extension(item.url()).unwrap_or(item.kind().default_extension())
}

pub fn file_name(item: &MediaItem) -> String {
    format!("{}.{}", file_stem(item), file_extension(item))
}

fn numbered(file_name: &str, n: usize) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{file_name} ({n})"),
    }
}

/// Writes `bytes` into `dir` under `file_name`, choosing `name (1).ext`,
/// `name (2).ext`, ... instead of replacing an existing file.
pub async fn save(dir: &Path, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir).await?;
    let mut n = 0;
    loop {
        let path = dir.join(if n == 0 {
            file_name.to_string()
        } else {
            numbered(file_name, n)
        });
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(bytes).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e),
        }
    }
}
