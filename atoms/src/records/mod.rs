pub mod model;
pub mod service;

pub use model::{upload_timestamp, Confidence, ImageRecord, LabelDetail, NewImageRecord};
pub use service::{record_from_item, record_to_item, DynamoImageTable, ImageTable};
