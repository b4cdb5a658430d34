use gallery_atoms::records::{Confidence, ImageRecord, ImageTable, LabelDetail, NewImageRecord};
use gallery_atoms::storage::{public_url, ObjectRef, ObjectStore};
use gallery_atoms::vision::{DetectedLabel, DetectedText, ImageAnalyzer, TextKind};
use gallery_atoms::Result;

pub const MAX_LABELS: i32 = 20;
pub const MIN_LABEL_CONFIDENCE: f32 = 70.0;
pub const MIN_MODERATION_CONFIDENCE: f32 = 60.0;

/// Labels keep their verbatim name; confidence is rounded to two places
pub fn label_details(labels: &[DetectedLabel]) -> Vec<LabelDetail> {
    labels
        .iter()
        .map(|label| LabelDetail {
            name: label.name.clone(),
            confidence: Confidence::from_score(label.confidence),
        })
        .collect()
}

/// Full lines only, in service order. Word fragments repeat the lines.
pub fn line_text(detections: &[DetectedText]) -> Vec<String> {
    detections
        .iter()
        .filter(|d| d.kind == TextKind::Line)
        .map(|d| d.text.clone())
        .collect()
}

/// Analyze an uploaded image and store one new record for it.
///
/// Steps run one after another; the first failure aborts and nothing is written.
/// The thumbnail URL is derived from the key, whether or not the thumbnail exists yet.
pub async fn process_upload(
    store: &impl ObjectStore,
    analyzer: &impl ImageAnalyzer,
    table: &impl ImageTable,
    thumbnails_bucket: &str,
    object: &ObjectRef,
) -> Result<ImageRecord> {
    tracing::info!(bucket = %object.bucket, key = %object.key, "📥 processing image");

    let file_size = store.object_size(object).await?;

    let labels = analyzer
        .detect_labels(object, MAX_LABELS, MIN_LABEL_CONFIDENCE)
        .await?;
    let text = analyzer.detect_text(object).await?;
    let faces = analyzer.detect_faces(object).await?;
    let moderation = analyzer
        .detect_moderation_labels(object, MIN_MODERATION_CONFIDENCE)
        .await?;

    let record = ImageRecord::create(NewImageRecord {
        original_url: object.public_url(),
        thumbnail_url: public_url(thumbnails_bucket, &object.key),
        file_name: object.key.clone(),
        file_size,
        labels: label_details(&labels),
        text: line_text(&text),
        faces: faces.len() as u32,
        moderation_flags: moderation.into_iter().map(|m| m.name).collect(),
    });

    table.put_record(&record).await?;

    tracing::info!(
        image_id = %record.image_id,
        labels = record.labels.len(),
        text_items = record.text.len(),
        faces = record.faces,
        moderation_flags = record.moderation_flags.len(),
        "✅ stored image record"
    );
    Ok(record)
}
