//! Storage key constants.

/// Storage keys used by the shortcut service.
pub struct StorageKeys;

impl StorageKeys {
    /// Device-local: base64 key material for the status codec.
    pub const KEY_MATERIAL: &'static str = "secure_storage_key";

    /// Device-local: extension-instance identifier sent to the licensing API.
    pub const INSTANCE_ID: &'static str = "instance_id";

    /// Synced: encrypted premium status blob.
    pub const ENCRYPTED_PREMIUM_STATUS: &'static str = "encryptedPremiumStatus";

    /// Synced: shortcut list (JSON array).
    pub const CUSTOM_SHORTCUTS: &'static str = "customShortcuts";

    /// Synced: panel position and display preferences (JSON).
    pub const PANEL_PREFERENCES: &'static str = "panelPreferences";

    /// Synced: domains on which the panel stays hidden (JSON array).
    pub const DOMAIN_BLACKLIST: &'static str = "domainBlacklist";

    /// Keys that live in the device-local store.
    pub const LOCAL: [&'static str; 2] = [Self::KEY_MATERIAL, Self::INSTANCE_ID];

    /// Keys that live in the synced store.
    pub const SYNCED: [&'static str; 4] = [
        Self::ENCRYPTED_PREMIUM_STATUS,
        Self::CUSTOM_SHORTCUTS,
        Self::PANEL_PREFERENCES,
        Self::DOMAIN_BLACKLIST,
    ];
}
