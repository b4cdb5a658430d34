use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;

use super::model::{Confidence, ImageRecord, LabelDetail};
use crate::error::{GalleryError, Result};

/// Key-value store holding one item per processed image, keyed by `imageId`.
#[async_trait]
pub trait ImageTable: Send + Sync {
    /// Write the whole record in one put. Records are never updated afterwards.
    async fn put_record(&self, record: &ImageRecord) -> Result<()>;

    /// Fetch one record. `Ok(None)` means no such id.
    async fn get_record(&self, image_id: &str) -> Result<Option<ImageRecord>>;

    /// Read every record in the table, unordered.
    async fn scan_records(&self) -> Result<Vec<ImageRecord>>;
}

/// DynamoDB-backed image table
#[derive(Clone, Debug)]
pub struct DynamoImageTable {
    client: DynamoClient,
    table_name: String,
}

impl DynamoImageTable {
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

#[async_trait]
impl ImageTable for DynamoImageTable {
    async fn put_record(&self, record: &ImageRecord) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .send()
            .await
            .map_err(|e| {
                GalleryError::Persistence(format!(
                    "put_item error: {}",
                    DisplayErrorContext(e)
                ))
            })?;
        Ok(())
    }

    async fn get_record(&self, image_id: &str) -> Result<Option<ImageRecord>> {
        let result = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("imageId", AttributeValue::S(image_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                GalleryError::Persistence(format!(
                    "get_item error: {}",
                    DisplayErrorContext(e)
                ))
            })?;

        result.item().map(record_from_item).transpose()
    }

    async fn scan_records(&self) -> Result<Vec<ImageRecord>> {
        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        // A single scan page stops at 1 MB; keep going until there is no cursor
        loop {
            let page = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| {
                    GalleryError::Persistence(format!("scan error: {}", DisplayErrorContext(e)))
                })?;

            for item in page.items() {
                records.push(record_from_item(item)?);
            }

            match page.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        tracing::debug!(table = %self.table_name, count = records.len(), "scanned image records");
        Ok(records)
    }
}

fn string_list(values: &[String]) -> AttributeValue {
    AttributeValue::L(values.iter().cloned().map(AttributeValue::S).collect())
}

/// Encode a record as a DynamoDB item. Confidence goes in as an `N` decimal string.
pub fn record_to_item(record: &ImageRecord) -> HashMap<String, AttributeValue> {
    let labels = record
        .labels
        .iter()
        .map(|label| {
            AttributeValue::M(HashMap::from([
                ("Name".to_string(), AttributeValue::S(label.name.clone())),
                (
                    "Confidence".to_string(),
                    AttributeValue::N(label.confidence.to_string()),
                ),
            ]))
        })
        .collect();

    HashMap::from([
        ("imageId".to_string(), AttributeValue::S(record.image_id.clone())),
        ("originalUrl".to_string(), AttributeValue::S(record.original_url.clone())),
        ("thumbnailUrl".to_string(), AttributeValue::S(record.thumbnail_url.clone())),
        ("fileName".to_string(), AttributeValue::S(record.file_name.clone())),
        ("uploadDate".to_string(), AttributeValue::S(record.upload_date.clone())),
        ("fileSize".to_string(), AttributeValue::N(record.file_size.to_string())),
        ("tags".to_string(), string_list(&record.tags)),
        ("labels".to_string(), AttributeValue::L(labels)),
        ("text".to_string(), string_list(&record.text)),
        ("faces".to_string(), AttributeValue::N(record.faces.to_string())),
        ("moderationFlags".to_string(), string_list(&record.moderation_flags)),
        ("processed".to_string(), AttributeValue::Bool(record.processed)),
    ])
}

fn get_string(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn get_strings(item: &HashMap<String, AttributeValue>, name: &str) -> Vec<String> {
    item.get(name)
        .and_then(|v| v.as_l().ok())
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_s().ok())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn get_number<T: std::str::FromStr + Default>(
    item: &HashMap<String, AttributeValue>,
    name: &str,
) -> T {
    item.get(name)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .unwrap_or_default()
}

fn label_from_attribute(value: &AttributeValue) -> Result<LabelDetail> {
    let map = value
        .as_m()
        .map_err(|_| GalleryError::MalformedRecord("label is not a map".to_string()))?;
    let name = get_string(map, "Name");
    let confidence = match map.get("Confidence").and_then(|v| v.as_n().ok()) {
        Some(n) => n.parse::<Confidence>().map_err(GalleryError::MalformedRecord)?,
        None => Confidence::default(),
    };
    Ok(LabelDetail { name, confidence })
}

/// Decode a DynamoDB item. Only `imageId` is mandatory; other fields default.
pub fn record_from_item(item: &HashMap<String, AttributeValue>) -> Result<ImageRecord> {
    let image_id = item
        .get("imageId")
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| GalleryError::MalformedRecord("item has no imageId".to_string()))?
        .to_string();

    let labels = match item.get("labels").and_then(|v| v.as_l().ok()) {
        Some(values) => values
            .iter()
            .map(label_from_attribute)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(ImageRecord {
        image_id,
        original_url: get_string(item, "originalUrl"),
        thumbnail_url: get_string(item, "thumbnailUrl"),
        file_name: get_string(item, "fileName"),
        upload_date: get_string(item, "uploadDate"),
        file_size: get_number(item, "fileSize"),
        tags: get_strings(item, "tags"),
        labels,
        text: get_strings(item, "text"),
        faces: get_number(item, "faces"),
        moderation_flags: get_strings(item, "moderationFlags"),
        processed: item
            .get("processed")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
    })
}
