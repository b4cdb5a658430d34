use aws_lambda_events::event::s3::S3Event;
use gallery_atoms::records::ImageTable;
use gallery_atoms::storage::ObjectStore;
use gallery_atoms::vision::ImageAnalyzer;
use gallery_atoms::Result;
use gallery_block::ingest::process_upload;
use gallery_block::types::{InvocationResult, ProcessedImage};
use gallery_shared::events::uploaded_object;
use lambda_runtime::{Error, LambdaEvent};

/// Services the analysis step runs against
pub(crate) struct Pipeline<S, A, T> {
    pub store: S,
    pub analyzer: A,
    pub table: T,
    pub thumbnails_bucket: String,
}

impl<S: ObjectStore, A: ImageAnalyzer, T: ImageTable> Pipeline<S, A, T> {
    async fn process(&self, event: &S3Event) -> Result<ProcessedImage> {
        let object = uploaded_object(event)?;
        let record = process_upload(
            &self.store,
            &self.analyzer,
            &self.table,
            &self.thumbnails_bucket,
            &object,
        )
        .await?;
        Ok(ProcessedImage::from(&record))
    }
}

/// Upload handler. Any failure is logged and reported in the result envelope;
/// nothing is retried here.
pub(crate) async fn function_handler<S: ObjectStore, A: ImageAnalyzer, T: ImageTable>(
    event: LambdaEvent<S3Event>,
    pipeline: &Pipeline<S, A, T>,
) -> Result<InvocationResult, Error> {
    match pipeline.process(&event.payload).await {
        Ok(summary) => Ok(InvocationResult::ok(serde_json::to_string(&summary)?)),
        Err(e) => {
            tracing::error!("❌ Error processing image: {}", e);
            Ok(InvocationResult::failed(
                serde_json::json!({ "error": e.to_string() }).to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_atoms::storage::ObjectRef;
    use gallery_atoms::testing::{MemoryImageTable, MemoryObjectStore, StubAnalyzer};
    use gallery_atoms::vision::DetectedLabel;
    use lambda_runtime::Context;
    use serde_json::{json, Value};

    fn s3_event(bucket: &str, key: &str) -> LambdaEvent<S3Event> {
        let payload = json!({
            "Records": [{
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventTime": "2024-01-02T10:00:00.000Z",
                "eventName": "ObjectCreated:Put",
                "userIdentity": { "principalId": "AWS:AIDAEXAMPLE" },
                "requestParameters": { "sourceIPAddress": "203.0.113.7" },
                "responseElements": {},
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "configurationId": "upload-trigger",
                    "bucket": {
                        "name": bucket,
                        "ownerIdentity": { "principalId": "A3NL1KOZZKExample" },
                        "arn": format!("arn:aws:s3:::{}", bucket)
                    },
                    "object": { "key": key, "size": 3, "eTag": "abc", "sequencer": "01" }
                }
            }]
        });
        LambdaEvent::new(serde_json::from_value(payload).unwrap(), Context::default())
    }

    fn pipeline(store: MemoryObjectStore) -> Pipeline<MemoryObjectStore, StubAnalyzer, MemoryImageTable> {
        Pipeline {
            store,
            analyzer: StubAnalyzer::new().with_labels(vec![DetectedLabel {
                name: "Dog".to_string(),
                confidence: 97.531,
            }]),
            table: MemoryImageTable::new(),
            thumbnails_bucket: "gallery-thumbs".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_upload_summary() {
        let store = MemoryObjectStore::new();
        store.insert(&ObjectRef::new("gallery-uploads", "my dog.jpg"), vec![1, 2, 3], "image/jpeg");
        let pipeline = pipeline(store);

        let result = function_handler(s3_event("gallery-uploads", "my+dog.jpg"), &pipeline)
            .await
            .unwrap();

        assert!(result.is_success());
        let body: Value = serde_json::from_str(&result.body).unwrap();
        assert_eq!(body["message"], "Image processed successfully");
        assert_eq!(body["tags"], json!(["Dog"]));

        let stored = pipeline.table.records();
        assert_eq!(stored.len(), 1);
        assert_eq!(body["imageId"], stored[0].image_id.as_str());
        assert_eq!(stored[0].file_name, "my dog.jpg");
        assert_eq!(stored[0].labels[0].confidence.to_string(), "97.53");
    }

    #[tokio::test]
    async fn test_missing_object_reports_failure() {
        let pipeline = pipeline(MemoryObjectStore::new());

        let result = function_handler(s3_event("gallery-uploads", "gone.jpg"), &pipeline)
            .await
            .unwrap();

        assert_eq!(result.status_code, 500);
        let body: Value = serde_json::from_str(&result.body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("gone.jpg"));
        assert!(pipeline.table.is_empty());
    }

    #[tokio::test]
    async fn test_event_without_records_reports_failure() {
        let pipeline = pipeline(MemoryObjectStore::new());
        let event = LambdaEvent::new(
            serde_json::from_value(json!({ "Records": [] })).unwrap(),
            Context::default(),
        );

        let result = function_handler(event, &pipeline).await.unwrap();

        assert_eq!(result.status_code, 500);
        assert!(pipeline.table.is_empty());
    }

    #[test]
    fn test_envelope_uses_status_code_key() {
        let json = serde_json::to_value(InvocationResult::ok("{}")).unwrap();
        assert_eq!(json, json!({ "statusCode": 200, "body": "{}" }));
    }
}
