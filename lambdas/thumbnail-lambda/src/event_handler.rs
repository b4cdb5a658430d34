use aws_lambda_events::event::s3::S3Event;
use gallery_atoms::storage::{ObjectRef, ObjectStore};
use gallery_atoms::Result;
use gallery_block::thumbnails::create_thumbnail;
use gallery_block::types::InvocationResult;
use gallery_shared::events::uploaded_object;
use lambda_runtime::{Error, LambdaEvent};

async fn thumbnail_for(
    event: &S3Event,
    store: &impl ObjectStore,
    thumbnails_bucket: &str,
) -> Result<ObjectRef> {
    let object = uploaded_object(event)?;
    create_thumbnail(store, thumbnails_bucket, &object).await
}

/// Thumbnail handler. The body is plain text in both outcomes.
pub(crate) async fn function_handler(
    event: LambdaEvent<S3Event>,
    store: &impl ObjectStore,
    thumbnails_bucket: &str,
) -> Result<InvocationResult, Error> {
    match thumbnail_for(&event.payload, store, thumbnails_bucket).await {
        Ok(thumbnail) => Ok(InvocationResult::ok(format!(
            "Thumbnail created for {}",
            thumbnail.key
        ))),
        Err(e) => {
            tracing::error!("❌ Error creating thumbnail: {}", e);
            Ok(InvocationResult::failed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_atoms::testing::MemoryObjectStore;
    use lambda_runtime::Context;
    use serde_json::json;
    use std::io::Cursor;

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
                    "configurationId": "thumbnail-trigger",
                    "bucket": {
                        "name": bucket,
                        "ownerIdentity": { "principalId": "A3NL1KOZZKExample" },
                        "arn": format!("arn:aws:s3:::{}", bucket)
                    },
                    "object": { "key": key, "size": 1024, "eTag": "abc", "sequencer": "01" }
                }
            }]
        });
        LambdaEvent::new(serde_json::from_value(payload).unwrap(), Context::default())
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_thumbnail_created() {
        let store = MemoryObjectStore::new();
        store.insert(
            &ObjectRef::new("gallery-uploads", "beach day.png"),
            png(1200, 600),
            "image/png",
        );

        let result = function_handler(
            s3_event("gallery-uploads", "beach+day.png"),
            &store,
            "gallery-thumbs",
        )
        .await
        .unwrap();

        assert!(result.is_success());
        assert_eq!(result.body, "Thumbnail created for beach day.png");
        let (body, content_type) = store
            .get(&ObjectRef::new("gallery-thumbs", "beach day.png"))
            .unwrap();
        assert_eq!(content_type, "image/jpeg");
        let thumbnail = image::load_from_memory(&body).unwrap();
        assert_eq!((thumbnail.width(), thumbnail.height()), (400, 200));
    }

    #[tokio::test]
    async fn test_missing_original_reports_failure() {
        let store = MemoryObjectStore::new();

        let result = function_handler(
            s3_event("gallery-uploads", "gone.png"),
            &store,
            "gallery-thumbs",
        )
        .await
        .unwrap();

        assert_eq!(result.status_code, 500);
        assert!(result.body.contains("gone.png"), "{}", result.body);
        assert!(store
            .get(&ObjectRef::new("gallery-thumbs", "gone.png"))
            .is_none());
    }

    #[tokio::test]
    async fn test_upload_into_thumbnails_bucket_is_refused() {
        let store = MemoryObjectStore::new();
        store.insert(&ObjectRef::new("gallery-thumbs", "a.png"), png(20, 20), "image/png");

        let result = function_handler(s3_event("gallery-thumbs", "a.png"), &store, "gallery-thumbs")
            .await
            .unwrap();

        assert_eq!(result.status_code, 500);
        assert_eq!(
            store.get(&ObjectRef::new("gallery-thumbs", "a.png")).unwrap().1,
            "image/png"
        );
    }
}
