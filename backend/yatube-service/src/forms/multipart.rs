/// Reading the multipart body of the post create/edit form.
use actix_multipart::Multipart;
use futures_util::stream::StreamExt;
use tracing::warn;

use crate::error::{AppError, Result};

/// A file field as received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Raw values of the post form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSubmission {
    pub text: String,
    pub group: Option<String>,
    pub image: Option<UploadedFile>,
    /// "Clear" checkbox next to an existing image
    pub clear_image: bool,
}

/// Drain the multipart payload into a [`PostSubmission`].
///
/// Unknown fields are ignored; an empty file input counts as no upload.
pub async fn read_post_submission(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<PostSubmission> {
    let mut submission = PostSubmission::default();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;

        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => continue,
        };
        let content_type = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| AppError::Validation(format!("Multipart error: {}", e)))?;
            if bytes.len() + chunk.len() > max_upload_bytes {
                warn!(field = %name, limit = max_upload_bytes, "upload rejected: too large");
                return Err(AppError::Validation(format!(
                    "Upload exceeds {} bytes",
                    max_upload_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "text" => submission.text = String::from_utf8_lossy(&bytes).into_owned(),
            "group" => submission.group = Some(String::from_utf8_lossy(&bytes).into_owned()),
            "image-clear" => submission.clear_image = !bytes.is_empty(),
            "image" => {
                let filename = filename.unwrap_or_default();
                if !filename.is_empty() && !bytes.is_empty() {
                    submission.image = Some(UploadedFile {
                        filename,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    Ok(submission)
}
