use gallery_atoms::records::ImageRecord;
use serde::{Deserialize, Serialize};

// ========== INGEST ==========
/// Summary returned after an upload has been analyzed and stored
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImage {
    pub message: String,
    pub image_id: String,
    pub tags: Vec<String>,
}

impl From<&ImageRecord> for ProcessedImage {
    fn from(record: &ImageRecord) -> Self {
        ProcessedImage {
            message: "Image processed successfully".to_string(),
            image_id: record.image_id.clone(),
            tags: record.tags.clone(),
        }
    }
}

// ========== SEARCH ==========
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageList {
    pub images: Vec<ImageRecord>,
    pub count: usize,
}

impl ImageList {
    pub fn new(images: Vec<ImageRecord>) -> Self {
        ImageList {
            count: images.len(),
            images,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorBody {
            error: error.into(),
        }
    }
}

// ========== EVENT RESULT ==========
/// Result envelope of the upload-triggered functions.
/// `body` is itself a string, JSON or plain text depending on the function.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResult {
    pub fn ok(body: impl Into<String>) -> Self {
        InvocationResult {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn failed(body: impl Into<String>) -> Self {
        InvocationResult {
            status_code: 500,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}
