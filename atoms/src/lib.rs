//! Domain atoms for the image pipeline.
//!
//! Each atom owns a model and the service that talks to the AWS backend for it.
//! Services take their clients as constructor arguments and never reach for
//! process-wide state.

pub mod error;
pub mod records;
pub mod storage;
pub mod thumbnails;
pub mod vision;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{GalleryError, Result};
