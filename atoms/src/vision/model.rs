/// Object or scene label as returned by the vision service
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLabel {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Line,
    Word,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectedText {
    pub text: String,
    pub kind: TextKind,
}

/// A detected face. Per-face attributes are requested but not kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetectedFace {
    pub confidence: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModerationLabel {
    pub name: String,
    pub confidence: f32,
}
