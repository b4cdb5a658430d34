pub mod model;
pub mod service;

pub use model::{DetectedFace, DetectedLabel, DetectedText, ModerationLabel, TextKind};
pub use service::{ImageAnalyzer, RekognitionAnalyzer};
