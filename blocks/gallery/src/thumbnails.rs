use gallery_atoms::storage::{ObjectRef, ObjectStore};
use gallery_atoms::thumbnails::{render_thumbnail, THUMBNAIL_CONTENT_TYPE};
use gallery_atoms::{GalleryError, Result};

/// Read the original, render a thumbnail and store it under the same key in
/// the thumbnails bucket. Returns where the thumbnail was written.
pub async fn create_thumbnail(
    store: &impl ObjectStore,
    thumbnails_bucket: &str,
    object: &ObjectRef,
) -> Result<ObjectRef> {
    // Writing into the source bucket would trigger this function again
    if object.bucket == thumbnails_bucket {
        tracing::warn!(bucket = %object.bucket, key = %object.key, "⚠️ upload is already in the thumbnails bucket");
        return Err(GalleryError::InvalidEvent(format!(
            "refusing to thumbnail {} into its own bucket",
            object
        )));
    }

    tracing::info!(bucket = %object.bucket, key = %object.key, "creating thumbnail");

    let original = store.get_object(object).await?;
    let thumbnail = render_thumbnail(&original)?;

    let target = object.in_bucket(thumbnails_bucket);
    store
        .put_object(&target, thumbnail, THUMBNAIL_CONTENT_TYPE)
        .await?;

    tracing::info!(thumbnail = %target, "✅ thumbnail created");
    Ok(target)
}
