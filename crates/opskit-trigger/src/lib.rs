//! opskit-trigger — storage-bucket event handler.
//!
//! Receives an object-created notification, resolves the bucket and key of
//! the first record, and looks the object up in an [`ObjectStore`] to report
//! its content type.
//!
//! ```text
//! notification JSON
//!   │
//!   ├── ObjectEvent::from_json      (malformed → TriggerError)
//!   ├── first_object()              (+ and %XX decoding of the key)
//!   ├── ObjectStore::head_object()
//!   │
//!   ▼
//! ObjectFetch::Retrieved { content_type } | ObjectFetch::Failed { cause }
//! ```

pub mod error;
pub mod event;
pub mod handler;
pub mod store;

pub use error::{StoreError, TriggerError};
pub use event::{ObjectEvent, ObjectRef};
pub use handler::{ObjectEventHandler, ObjectFetch};
pub use store::{FsObjectStore, MemoryObjectStore, ObjectMetadata, ObjectStore};
