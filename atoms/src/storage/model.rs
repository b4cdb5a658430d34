use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;

// Everything but RFC 3986 unreserved characters is escaped within a key segment
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A stored object: bucket plus (already URL-decoded) key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Same key, different bucket
    pub fn in_bucket(&self, bucket: &str) -> Self {
        Self::new(bucket, self.key.clone())
    }

    pub fn public_url(&self) -> String {
        public_url(&self.bucket, &self.key)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Virtual-hosted style address. Built, not checked: the object may not exist yet.
/// The key is percent-encoded per segment; `/` separators are kept.
pub fn public_url(bucket: &str, key: &str) -> String {
    let path = key
        .split('/')
        .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");
    format!("https://{}.s3.amazonaws.com/{}", bucket, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_uses_virtual_host() {
        let object = ObjectRef::new("uploads", "2024/cat.jpg");
        assert_eq!(object.public_url(), "https://uploads.s3.amazonaws.com/2024/cat.jpg");
        assert_eq!(
            object.in_bucket("thumbs").public_url(),
            "https://thumbs.s3.amazonaws.com/2024/cat.jpg"
        );
        assert_eq!(object.to_string(), "uploads/2024/cat.jpg");
    }

    #[test]
    fn public_url_escapes_decoded_keys() {
        let object = ObjectRef::new("uploads", "summer trip/my dog (1)+café.jpg");
        assert_eq!(
            object.public_url(),
            "https://uploads.s3.amazonaws.com/summer%20trip/my%20dog%20%281%29%2Bcaf%C3%A9.jpg"
        );
        assert_eq!(object.key, "summer trip/my dog (1)+café.jpg");
    }
}
