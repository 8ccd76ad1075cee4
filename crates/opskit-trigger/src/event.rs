//! Storage-bucket notification payloads.

use serde::{Deserialize, Serialize};

use crate::error::TriggerError;

/// A bucket notification carrying one or more object records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntity {
    /// URL-encoded object key, as delivered in the notification.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Bucket and decoded key of an object named in a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectEvent {
    pub fn from_json(bytes: &[u8]) -> Result<Self, TriggerError> {
        serde_json::from_slice(bytes).map_err(|e| TriggerError::MalformedEvent(e.to_string()))
    }

    /// The first record's object, with its key decoded.
    pub fn first_object(&self) -> Result<ObjectRef, TriggerError> {
        let record = self.records.first().ok_or(TriggerError::NoRecords)?;
        Ok(ObjectRef {
            bucket: record.s3.bucket.name.clone(),
            key: decode_key(&record.s3.object.key)?,
        })
    }
}

/// Decode a notification key: `+` is a space, then `%XX` escapes as UTF-8.
pub fn decode_key(raw: &str) -> Result<String, TriggerError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|key| key.into_owned())
        .map_err(|_| TriggerError::InvalidKey(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{
        "Records": [
            {
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": "uploads" },
                    "object": { "key": "reports/Q3+summary%281%29.pdf", "size": 1024 }
                }
            }
        ]
    }"#;

    #[test]
    fn parse_and_decode_first_object() {
        let event = ObjectEvent::from_json(EVENT.as_bytes()).unwrap();
        assert_eq!(event.records[0].event_name.as_deref(), Some("ObjectCreated:Put"));

        let object = event.first_object().unwrap();
        assert_eq!(object.bucket, "uploads");
        assert_eq!(object.key, "reports/Q3 summary(1).pdf");
    }

    #[test]
    fn literal_plus_is_percent_encoded() {
        assert_eq!(decode_key("a%2Bb+c").unwrap(), "a+b c");
    }

    #[test]
    fn utf8_keys() {
        assert_eq!(decode_key("caf%C3%A9.txt").unwrap(), "café.txt");
    }

    #[test]
    fn invalid_utf8_key() {
        assert!(matches!(decode_key("%FF%FE"), Err(TriggerError::InvalidKey(_))));
    }

    #[test]
    fn empty_records() {
        let event = ObjectEvent::from_json(br#"{"Records": []}"#).unwrap();
        assert!(matches!(event.first_object(), Err(TriggerError::NoRecords)));

        let event = ObjectEvent::from_json(b"{}").unwrap();
        assert!(matches!(event.first_object(), Err(TriggerError::NoRecords)));
    }

    #[test]
    fn malformed_event() {
        let err = ObjectEvent::from_json(br#"{"Records": [{"s3": {}}]}"#).unwrap_err();
        assert!(matches!(err, TriggerError::MalformedEvent(_)));
    }
}
