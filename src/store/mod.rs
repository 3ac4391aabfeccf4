pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::KeyValueStore;
use disk::DiskStore;
use memory::MemoryStore;
use std::sync::Arc;
use tracing::warn;

/// Opens the persistent store under the configured data directory.
///
/// Falls back to an in-memory store when the directory cannot be used, so
/// conversions keep working without a persisted history.
pub fn open_store(config: &AppConfig) -> Arc<dyn KeyValueStore> {
    let opened = config
        .default_data_path()
        .and_then(|path| DiskStore::open(&path.join("history")));

    match opened {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!("History will not be persisted: {:#}", e);
            Arc::new(MemoryStore::new())
        }
    }
}
