//! Storage of uploaded post images.
//!
//! Files land under `<media root>/posts/` keeping their (sanitised) original
//! name; a random suffix is added when the name is taken. Posts store the
//! path relative to the media root, e.g. `posts/small.gif`.

use image::ImageFormat;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::MediaConfig;
use crate::error::{AppError, Result};
use crate::forms::UploadedFile;

pub const POST_IMAGE_DIR: &str = "posts";

const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Gif,
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a stored file; `None` for paths escaping the root.
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let rel = Path::new(relative);
        if relative.is_empty()
            || rel
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(rel))
    }

    /// Write an already validated image into `posts/` and return its relative path.
    pub async fn save_post_image(&self, file: &UploadedFile) -> Result<String> {
        let dir = self.root.join(POST_IMAGE_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let base = sanitize_filename(&file.filename);
        for attempt in 0..8 {
            let name = if attempt == 0 {
                base.clone()
            } else {
                with_suffix(&base, &random_suffix())
            };
            let path = dir.join(&name);

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut out) => {
                    out.write_all(&file.bytes).await?;
                    out.flush().await?;
                    let relative = format!("{}/{}", POST_IMAGE_DIR, name);
                    debug!(path = %relative, bytes = file.bytes.len(), "stored post image");
                    return Ok(relative);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Media(format!(
            "could not find a free file name for {}",
            file.filename
        )))
    }
}

/// Check that an upload is an image in one of the accepted formats.
///
/// The error is the message shown next to the form field.
pub fn validate_image(file: &UploadedFile) -> std::result::Result<ImageFormat, String> {
    match image::guess_format(&file.bytes) {
        Ok(format) if ALLOWED_FORMATS.contains(&format) => Ok(format),
        Ok(format) => {
            warn!(filename = %file.filename, ?format, "unsupported image format");
            Err("Формат изображения не поддерживается.".to_string())
        }
        Err(_) => Err(
            "Загрузите правильное изображение. Файл, который вы загрузили, поврежден или не является изображением."
                .to_string(),
        ),
    }
}

/// Keep the last path segment and replace anything outside `[A-Za-z0-9._-]`.
fn sanitize_filename(raw: &str) -> String {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

fn with_suffix(name: &str, suffix: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}_{}.{}", stem, suffix, ext),
        _ => format!("{}_{}", name, suffix),
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect()
}
