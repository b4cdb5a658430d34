use async_trait::async_trait;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{Attribute, Image, S3Object, TextTypes};
use aws_sdk_rekognition::Client as RekognitionClient;

use super::model::{DetectedFace, DetectedLabel, DetectedText, ModerationLabel, TextKind};
use crate::error::{GalleryError, Result};
use crate::storage::ObjectRef;

/// External vision-analysis service. Each call is one independent round trip.
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    async fn detect_labels(
        &self,
        object: &ObjectRef,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>>;

    async fn detect_text(&self, object: &ObjectRef) -> Result<Vec<DetectedText>>;

    /// Faces with all attributes requested
    async fn detect_faces(&self, object: &ObjectRef) -> Result<Vec<DetectedFace>>;

    async fn detect_moderation_labels(
        &self,
        object: &ObjectRef,
        min_confidence: f32,
    ) -> Result<Vec<ModerationLabel>>;
}

#[derive(Clone, Debug)]
pub struct RekognitionAnalyzer {
    client: RekognitionClient,
}

impl RekognitionAnalyzer {
    pub fn new(client: RekognitionClient) -> Self {
        Self { client }
    }
}

/// Rekognition reads the image straight from S3
fn s3_image(object: &ObjectRef) -> Image {
    Image::builder()
        .s3_object(
            S3Object::builder()
                .bucket(&object.bucket)
                .name(&object.key)
                .build(),
        )
        .build()
}

fn analysis_error(operation: &str, object: &ObjectRef, e: impl std::error::Error) -> GalleryError {
    GalleryError::Analysis(format!(
        "{} failed for {}: {}",
        operation,
        object,
        DisplayErrorContext(e)
    ))
}

#[async_trait]
impl ImageAnalyzer for RekognitionAnalyzer {
    async fn detect_labels(
        &self,
        object: &ObjectRef,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>> {
        let output = self
            .client
            .detect_labels()
            .image(s3_image(object))
            .max_labels(max_labels)
            .min_confidence(min_confidence)
            .send()
            .await
            .map_err(|e| analysis_error("detect_labels", object, e))?;

        Ok(output
            .labels()
            .iter()
            .filter_map(|label| {
                Some(DetectedLabel {
                    name: label.name()?.to_string(),
                    confidence: label.confidence().unwrap_or_default(),
                })
            })
            .collect())
    }

    async fn detect_text(&self, object: &ObjectRef) -> Result<Vec<DetectedText>> {
        let output = self
            .client
            .detect_text()
            .image(s3_image(object))
            .send()
            .await
            .map_err(|e| analysis_error("detect_text", object, e))?;

        Ok(output
            .text_detections()
            .iter()
            .filter_map(|detection| {
                let kind = match detection.r#type()? {
                    TextTypes::Line => TextKind::Line,
                    _ => TextKind::Word,
                };
                Some(DetectedText {
                    text: detection.detected_text()?.to_string(),
                    kind,
                })
            })
            .collect())
    }

    async fn detect_faces(&self, object: &ObjectRef) -> Result<Vec<DetectedFace>> {
        let output = self
            .client
            .detect_faces()
            .image(s3_image(object))
            .attributes(Attribute::All)
            .send()
            .await
            .map_err(|e| analysis_error("detect_faces", object, e))?;

        Ok(output
            .face_details()
            .iter()
            .map(|face| DetectedFace {
                confidence: face.confidence(),
            })
            .collect())
    }

    async fn detect_moderation_labels(
        &self,
        object: &ObjectRef,
        min_confidence: f32,
    ) -> Result<Vec<ModerationLabel>> {
        let output = self
            .client
            .detect_moderation_labels()
            .image(s3_image(object))
            .min_confidence(min_confidence)
            .send()
            .await
            .map_err(|e| analysis_error("detect_moderation_labels", object, e))?;

        Ok(output
            .moderation_labels()
            .iter()
            .filter_map(|label| {
                Some(ModerationLabel {
                    name: label.name()?.to_string(),
                    confidence: label.confidence().unwrap_or_default(),
                })
            })
            .collect())
    }
}
