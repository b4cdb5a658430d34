//! In-memory stand-ins for the AWS-backed services, for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{GalleryError, Result};
use crate::records::{ImageRecord, ImageTable};
use crate::storage::{ObjectRef, ObjectStore};
use crate::vision::{DetectedFace, DetectedLabel, DetectedText, ImageAnalyzer, ModerationLabel};

/// Image table kept in a map. Set `failure` to make every call fail.
#[derive(Default)]
pub struct MemoryImageTable {
    records: Mutex<HashMap<String, ImageRecord>>,
    failure: Option<String>,
}

impl MemoryImageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = ImageRecord>) -> Self {
        let table = Self::new();
        table.records.lock().unwrap().extend(
            records
                .into_iter()
                .map(|record| (record.image_id.clone(), record)),
        );
        table
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<ImageRecord> {
        self.records.lock().unwrap().values().cloned().collect()
    }

    fn check(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(GalleryError::Persistence(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ImageTable for MemoryImageTable {
    async fn put_record(&self, record: &ImageRecord) -> Result<()> {
        self.check()?;
        self.records
            .lock()
            .unwrap()
            .insert(record.image_id.clone(), record.clone());
        Ok(())
    }

    async fn get_record(&self, image_id: &str) -> Result<Option<ImageRecord>> {
        self.check()?;
        Ok(self.records.lock().unwrap().get(image_id).cloned())
    }

    async fn scan_records(&self) -> Result<Vec<ImageRecord>> {
        self.check()?;
        Ok(self.records())
    }
}

/// Object store kept in a map keyed by `bucket/key`.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, object: &ObjectRef, body: Vec<u8>, content_type: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(object.to_string(), (body, content_type.to_string()));
    }

    /// Body and content type of a stored object
    pub fn get(&self, object: &ObjectRef) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(&object.to_string()).cloned()
    }

    fn missing(object: &ObjectRef) -> GalleryError {
        GalleryError::Storage(format!("NoSuchKey: {}", object))
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn object_size(&self, object: &ObjectRef) -> Result<u64> {
        self.get(object)
            .map(|(body, _)| body.len() as u64)
            .ok_or_else(|| Self::missing(object))
    }

    async fn get_object(&self, object: &ObjectRef) -> Result<Vec<u8>> {
        self.get(object)
            .map(|(body, _)| body)
            .ok_or_else(|| Self::missing(object))
    }

    async fn put_object(
        &self,
        object: &ObjectRef,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.insert(object, body, content_type);
        Ok(())
    }
}

/// Analyzer returning canned results, recording the thresholds it was called with.
#[derive(Default)]
pub struct StubAnalyzer {
    labels: Vec<DetectedLabel>,
    text: Vec<DetectedText>,
    faces: Vec<DetectedFace>,
    moderation: Vec<ModerationLabel>,
    failure: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl StubAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: Vec<DetectedLabel>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_text(mut self, text: Vec<DetectedText>) -> Self {
        self.text = text;
        self
    }

    pub fn with_faces(mut self, faces: Vec<DetectedFace>) -> Self {
        self.faces = faces;
        self
    }

    pub fn with_moderation(mut self, moderation: Vec<ModerationLabel>) -> Self {
        self.moderation = moderation;
        self
    }

    /// Every call fails with an analysis error
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Calls made so far, e.g. `detect_labels(max=20, min=70)`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match &self.failure {
            Some(message) => Err(GalleryError::Analysis(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ImageAnalyzer for StubAnalyzer {
    async fn detect_labels(
        &self,
        _object: &ObjectRef,
        max_labels: i32,
        min_confidence: f32,
    ) -> Result<Vec<DetectedLabel>> {
        self.record(format!("detect_labels(max={}, min={})", max_labels, min_confidence))?;
        Ok(self.labels.clone())
    }

    async fn detect_text(&self, _object: &ObjectRef) -> Result<Vec<DetectedText>> {
        self.record("detect_text".to_string())?;
        Ok(self.text.clone())
    }

    async fn detect_faces(&self, _object: &ObjectRef) -> Result<Vec<DetectedFace>> {
        self.record("detect_faces".to_string())?;
        Ok(self.faces.clone())
    }

    async fn detect_moderation_labels(
        &self,
        _object: &ObjectRef,
        min_confidence: f32,
    ) -> Result<Vec<ModerationLabel>> {
        self.record(format!("detect_moderation_labels(min={})", min_confidence))?;
        Ok(self.moderation.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::NewImageRecord;

    fn new_record(file_name: &str) -> ImageRecord {
        ImageRecord::create(NewImageRecord {
            original_url: format!("https://uploads.s3.amazonaws.com/{}", file_name),
            thumbnail_url: format!("https://thumbs.s3.amazonaws.com/{}", file_name),
            file_name: file_name.to_string(),
            file_size: 12,
            labels: vec![],
            text: vec![],
            faces: 0,
            moderation_flags: vec![],
        })
    }

    #[tokio::test]
    async fn memory_table_put_get_and_scan() {
        let table = MemoryImageTable::new();
        let record = new_record("cat.jpg");

        table.put_record(&record).await.unwrap();

        assert_eq!(table.get_record(&record.image_id).await.unwrap(), Some(record.clone()));
        assert_eq!(table.get_record("unknown").await.unwrap(), None);
        assert_eq!(table.scan_records().await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn failing_table_rejects_every_call() {
        let table = MemoryImageTable::failing("table offline");

        assert!(matches!(
            table.put_record(&new_record("a.jpg")).await,
            Err(GalleryError::Persistence(_))
        ));
        assert!(table.get_record("a").await.is_err());
        assert!(table.scan_records().await.is_err());
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn memory_store_round_trips_objects() {
        let store = MemoryObjectStore::new();
        let object = ObjectRef::new("uploads", "dir/cat.jpg");

        store.put_object(&object, vec![1, 2, 3], "image/jpeg").await.unwrap();

        assert_eq!(store.object_size(&object).await.unwrap(), 3);
        assert_eq!(store.get_object(&object).await.unwrap(), vec![1, 2, 3]);
        assert_eq!(store.get(&object).unwrap().1, "image/jpeg");

        let other = object.in_bucket("thumbs");
        assert!(matches!(
            store.get_object(&other).await,
            Err(GalleryError::Storage(message)) if message.contains("thumbs/dir/cat.jpg")
        ));
    }

    #[tokio::test]
    async fn stub_analyzer_records_calls_until_failure() {
        let object = ObjectRef::new("uploads", "cat.jpg");
        let analyzer = StubAnalyzer::new().with_labels(vec![DetectedLabel {
            name: "Cat".to_string(),
            confidence: 99.0,
        }]);

        let labels = analyzer.detect_labels(&object, 5, 50.0).await.unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(analyzer.calls(), vec!["detect_labels(max=5, min=50)"]);

        let failing = StubAnalyzer::new().failing("ThrottlingException");
        assert!(matches!(
            failing.detect_faces(&object).await,
            Err(GalleryError::Analysis(_))
        ));
        assert_eq!(failing.calls(), vec!["detect_faces"]);
    }
}
