use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Label confidence in percent, held as an exact count of hundredths.
///
/// DynamoDB stores it as a decimal string number (`"98.76"`); JSON has no
/// fixed-point type, so serde renders it as a float and nothing else does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Confidence(u32);

impl Confidence {
    const SCALE: u32 = 100;
    const MAX: u32 = 100 * Self::SCALE;

    /// Round a raw service score (0-100) to two decimal places.
    ///
    /// Scores arrive as `f32` from the SDK, so a value sitting on a `.xx5`
    /// boundary rounds as its nearest `f32` does: `71.005` becomes `71.00`.
    pub fn from_score(score: f32) -> Self {
        let hundredths = (f64::from(score) * f64::from(Self::SCALE)).round();
        Confidence(hundredths.clamp(0.0, f64::from(Self::MAX)) as u32)
    }

    pub fn from_hundredths(hundredths: u32) -> Self {
        Confidence(hundredths.min(Self::MAX))
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(Self::SCALE)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / Self::SCALE, self.0 % Self::SCALE)
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));

        // Plain decimals with at most two fractional digits parse exactly
        if !whole.is_empty()
            && frac.len() <= 2
            && whole.chars().all(|c| c.is_ascii_digit())
            && frac.chars().all(|c| c.is_ascii_digit())
        {
            let whole: u32 = whole
                .parse()
                .map_err(|e| format!("invalid confidence {}: {}", s, e))?;
            let frac: u32 = format!("{:0<2}", frac)
                .parse()
                .map_err(|e| format!("invalid confidence {}: {}", s, e))?;
            return Ok(Confidence::from_hundredths(
                whole.saturating_mul(Self::SCALE).saturating_add(frac),
            ));
        }

        // Anything else (exponents, more digits) gets rounded
        s.parse::<f64>()
            .map(|v| Confidence::from_score(v as f32))
            .map_err(|e| format!("invalid confidence {}: {}", s, e))
    }
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Confidence::from_hundredths(
            (value * f64::from(Self::SCALE)).round().max(0.0) as u32,
        ))
    }
}

/// One label detected in an image, with its rounded confidence.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LabelDetail {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Confidence")]
    pub confidence: Confidence,
}

/// Metadata for one processed upload. Written once, never updated.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub image_id: String,
    pub original_url: String,
    pub thumbnail_url: String,
    pub file_name: String,
    pub upload_date: String,
    pub file_size: u64,
    /// Label names only, in the same order as `labels`
    pub tags: Vec<String>,
    pub labels: Vec<LabelDetail>,
    pub text: Vec<String>,
    pub faces: u32,
    pub moderation_flags: Vec<String>,
    pub processed: bool,
}

/// Everything the ingestion step knows before the record gets its id.
#[derive(Debug, Clone)]
pub struct NewImageRecord {
    pub original_url: String,
    pub thumbnail_url: String,
    pub file_name: String,
    pub file_size: u64,
    pub labels: Vec<LabelDetail>,
    pub text: Vec<String>,
    pub faces: u32,
    pub moderation_flags: Vec<String>,
}

impl ImageRecord {
    /// Assign a fresh id and timestamp. `tags` is always projected from `labels`.
    pub fn create(new: NewImageRecord) -> Self {
        let tags = new.labels.iter().map(|l| l.name.clone()).collect();
        ImageRecord {
            image_id: uuid::Uuid::new_v4().to_string(),
            original_url: new.original_url,
            thumbnail_url: new.thumbnail_url,
            file_name: new.file_name,
            upload_date: upload_timestamp(chrono::Utc::now()),
            file_size: new.file_size,
            tags,
            labels: new.labels,
            text: new.text,
            faces: new.faces,
            moderation_flags: new.moderation_flags,
            processed: true,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Fixed-width UTC timestamp so that string order is time order.
pub fn upload_timestamp(now: chrono::DateTime<chrono::Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
