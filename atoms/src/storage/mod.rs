pub mod model;
pub mod service;

pub use model::{public_url, ObjectRef};
pub use service::{ObjectStore, S3ObjectStore};
