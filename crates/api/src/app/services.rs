use std::sync::Arc;

use stockroom_infra::{InventoryService, JsonFileStore, ServiceError, SnapshotStore};

use crate::config::ApiConfig;

/// Inventory service shared by every request handler.
pub type SharedInventory = Arc<InventoryService<Arc<dyn SnapshotStore>>>;

/// Open the configured JSON file (creating it if needed) and load it once.
pub fn build_services(config: &ApiConfig) -> Result<SharedInventory, ServiceError> {
    let store = JsonFileStore::open(&config.data_file)?;
    with_store(Arc::new(store))
}

/// Build the shared service over any snapshot store (tests use the in-memory one).
pub fn with_store(store: Arc<dyn SnapshotStore>) -> Result<SharedInventory, ServiceError> {
    Ok(Arc::new(InventoryService::open(store)?))
}
