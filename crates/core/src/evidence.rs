//! Evidence photo rules and storage-key construction.
//!
//! A complaint carries at most three photos, each under 5 MB, and only
//! JPEG/PNG/WEBP are accepted. Validation runs over the *whole* batch
//! before a single byte is uploaded; the declared content type is
//! cross-checked against the file's magic bytes so a mislabelled upload
//! cannot slip through.

use image::ImageFormat;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum number of evidence photos per complaint.
pub const MAX_EVIDENCE_FILES: usize = 3;

/// Maximum size of a single evidence photo in bytes (5 MB).
pub const MAX_EVIDENCE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted MIME types for evidence photos.
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// A single candidate file in an evidence batch, before upload.
#[derive(Debug)]
pub struct EvidenceFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Map an accepted MIME type to the canonical storage extension.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

fn format_matches(content_type: &str, format: ImageFormat) -> bool {
    matches!(
        (content_type, format),
        ("image/jpeg", ImageFormat::Jpeg)
            | ("image/png", ImageFormat::Png)
            | ("image/webp", ImageFormat::WebP)
    )
}

/// Validate an evidence batch against the count, size, and type rules.
///
/// `existing_count` is the number of photos already linked to the
/// complaint; the combined total may not exceed [`MAX_EVIDENCE_FILES`].
/// Returns the storage extension for each file, in input order. Nothing is
/// uploaded if any file fails.
pub fn validate_batch(
    files: &[EvidenceFile],
    existing_count: usize,
) -> Result<Vec<&'static str>, CoreError> {
    if files.is_empty() {
        return Err(CoreError::Validation("No evidence files provided".into()));
    }
    if existing_count + files.len() > MAX_EVIDENCE_FILES {
        return Err(CoreError::Validation(format!(
            "A complaint can have at most {MAX_EVIDENCE_FILES} photos ({existing_count} already attached)"
        )));
    }

    let mut extensions = Vec::with_capacity(files.len());
    for file in files {
        let Some(ext) = extension_for(&file.content_type) else {
            return Err(CoreError::Validation(format!(
                "Unsupported file type '{}' for '{}'. Allowed: JPG, PNG, WEBP",
                file.content_type, file.file_name
            )));
        };
        if file.bytes.len() > MAX_EVIDENCE_BYTES {
            return Err(CoreError::Validation(format!(
                "'{}' exceeds the 5MB photo limit",
                file.file_name
            )));
        }
        let sniffed = image::guess_format(&file.bytes).map_err(|_| {
            CoreError::Validation(format!("'{}' is not a recognisable image", file.file_name))
        })?;
        if !format_matches(&file.content_type, sniffed) {
            return Err(CoreError::Validation(format!(
                "'{}' content does not match its declared type {}",
                file.file_name, file.content_type
            )));
        }
        extensions.push(ext);
    }
    Ok(extensions)
}

/// Build the storage key for one photo in a batch.
///
/// Keys are namespaced by reporter and complaint so storage-side policies
/// can scope access: `{reporter}/{complaint}/{unix_millis}_{index}.{ext}`.
pub fn storage_key(
    reporter_user_id: DbId,
    complaint_id: DbId,
    uploaded_at: Timestamp,
    index: usize,
    extension: &str,
) -> String {
    format!(
        "{reporter_user_id}/{complaint_id}/{}_{index}.{extension}",
        uploaded_at.timestamp_millis()
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
