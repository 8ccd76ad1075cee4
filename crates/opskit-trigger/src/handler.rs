//! Object event handler.
//!
//! `ObjectEventHandler` resolves the first object named in a notification
//! and reports its content type. A notification that cannot be interpreted
//! is an error; a lookup that fails is an `ObjectFetch::Failed` outcome
//! carrying the cause.

use serde::Serialize;
use tracing::{error, info};

use crate::error::TriggerError;
use crate::event::ObjectEvent;
use crate::store::ObjectStore;

/// Outcome of looking up the object named in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ObjectFetch {
    Retrieved {
        bucket: String,
        key: String,
        content_type: String,
    },
    Failed {
        bucket: String,
        key: String,
        cause: String,
    },
}

impl ObjectFetch {
    pub fn is_retrieved(&self) -> bool {
        matches!(self, ObjectFetch::Retrieved { .. })
    }

    pub fn content_type(&self) -> Option<&str> {
        match self {
            ObjectFetch::Retrieved { content_type, .. } => Some(content_type),
            ObjectFetch::Failed { .. } => None,
        }
    }
}

pub struct ObjectEventHandler<S> {
    store: S,
}

impl<S: ObjectStore> ObjectEventHandler<S> {
    pub fn new(store: S) -> Self {
        info!("object event handler ready");
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parse a raw notification and handle it.
    pub async fn handle_json(&self, payload: &[u8]) -> Result<ObjectFetch, TriggerError> {
        let event = ObjectEvent::from_json(payload)?;
        self.handle(&event).await
    }

    pub async fn handle(&self, event: &ObjectEvent) -> Result<ObjectFetch, TriggerError> {
        let object = event.first_object()?;

        match self.store.content_type(&object.bucket, &object.key).await {
            Ok(content_type) => {
                info!(
                    bucket = %object.bucket,
                    key = %object.key,
                    content_type = %content_type,
                    "content type"
                );
                Ok(ObjectFetch::Retrieved {
                    bucket: object.bucket,
                    key: object.key,
                    content_type,
                })
            }
            Err(e) => {
                error!(
                    bucket = %object.bucket,
                    key = %object.key,
                    error = %e,
                    "error getting object; check that the bucket and key exist"
                );
                Ok(ObjectFetch::Failed {
                    bucket: object.bucket,
                    key: object.key,
                    cause: e.to_string(),
                })
            }
        }
    }
}
