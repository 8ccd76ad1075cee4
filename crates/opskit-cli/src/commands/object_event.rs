use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use opskit_trigger::{FsObjectStore, ObjectEventHandler, ObjectFetch};

pub fn object_event(event: &Path, root: PathBuf) -> anyhow::Result<()> {
    let payload = std::fs::read(event)
        .with_context(|| format!("failed to read event {}", event.display()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let handler = ObjectEventHandler::new(FsObjectStore::new(root));
    let fetch = runtime.block_on(handler.handle_json(&payload))?;

    match fetch {
        ObjectFetch::Retrieved { content_type, .. } => {
            println!("{content_type}");
            Ok(())
        }
        ObjectFetch::Failed { bucket, key, cause } => {
            bail!("error getting object {key} from bucket {bucket}: {cause}")
        }
    }
}
