use actix_multipart::Multipart;
use futures::TryStreamExt;
use std::path::Path;

use super::AppError;

pub const PROFILE_IMAGE_FIELD: &str = "profileImage";
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Public prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";
const PROFILE_DIR: &str = "profiles";

#[derive(Debug)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Reads the first multipart field called `field_name` into memory.
pub async fn read_file_field(
    payload: &mut Multipart,
    field_name: &str,
    max_bytes: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let Some(disposition) = field.content_disposition() else {
            continue;
        };
        if disposition.get_name() != Some(field_name) {
            continue;
        }
        let original_name = disposition.get_filename().unwrap_or("upload").to_string();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            if bytes.len() + chunk.len() > max_bytes {
                return Err(AppError::InvalidRequest(format!(
                    "file exceeds {} bytes",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(UploadedFile {
            original_name,
            bytes,
        });
    }

    Err(AppError::InvalidRequest("no file uploaded".to_string()))
}

fn malformed(e: actix_multipart::MultipartError) -> AppError {
    log::debug!("Multipart error: {}", e);
    AppError::InvalidRequest("malformed multipart body".to_string())
}

/// Final path component of a client-supplied name, restricted to `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
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

pub fn stored_file_name(timestamp_nanos: i64, original_name: &str) -> String {
    format!("{}_{}", timestamp_nanos, sanitize_file_name(original_name))
}

/// Writes the image under `<root>/profiles/` and returns its public URL.
pub async fn save_profile_image(root: &Path, file: &UploadedFile) -> Result<String, AppError> {
    let dir = root.join(PROFILE_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {}", e)))?;

    let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let file_name = stored_file_name(nanos, &file.original_name);

    tokio::fs::write(dir.join(&file_name), &file.bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to save file: {}", e)))?;

    log::info!("💾 Stored profile image {} ({} bytes)", file_name, file.bytes.len());

    Ok(format!("{}/{}/{}", PUBLIC_PREFIX, PROFILE_DIR, file_name))
}
