use shortcut_storage::{KeyValueStore, StorageKeys, StorageResult};
use tracing::info;
use uuid::Uuid;

/// Identifier sent as `instance` on every licensing call.
///
/// A configured value wins. Otherwise the value persisted in the
/// device-local store is used, generating a UUID v4 on first use.
pub fn resolve_instance_id(
    configured: Option<&str>,
    local: &dyn KeyValueStore,
) -> StorageResult<String> {
    if let Some(id) = configured.map(str::trim).filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }

    if let Some(id) = local.get(StorageKeys::INSTANCE_ID)? {
        return Ok(id);
    }

    let id = Uuid::new_v4().to_string();
    local.set(StorageKeys::INSTANCE_ID, &id)?;
    info!(instance_id = %id, "generated instance id");
    Ok(id)
}
