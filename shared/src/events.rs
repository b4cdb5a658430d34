//! Upload notifications from S3.

use aws_lambda_events::event::s3::S3Event;
use gallery_atoms::storage::ObjectRef;
use gallery_atoms::{GalleryError, Result};
use percent_encoding::percent_decode_str;

/// S3 sends keys form-encoded: spaces as `+`, everything else as `%XX`.
pub fn decode_object_key(raw: &str) -> Result<String> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| GalleryError::InvalidEvent(format!("object key {} is not UTF-8: {}", raw, e)))
}

/// The uploaded object named by the first record. Later records are ignored.
pub fn uploaded_object(event: &S3Event) -> Result<ObjectRef> {
    let record = event
        .records
        .first()
        .ok_or_else(|| GalleryError::InvalidEvent("event has no records".to_string()))?;

    let bucket = record
        .s3
        .bucket
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| GalleryError::InvalidEvent("record has no bucket name".to_string()))?;

    let raw_key = record
        .s3
        .object
        .key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| GalleryError::InvalidEvent("record has no object key".to_string()))?;

    if event.records.len() > 1 {
        tracing::warn!(records = event.records.len(), "only the first record is processed");
    }

    Ok(ObjectRef::new(bucket, decode_object_key(raw_key)?))
}
