use web_sys::Storage;

use super::browser_window;
use crate::error::{ArcadeError, Result};
use crate::settings::SettingsStore;

/// `window.localStorage` as a settings store.
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self> {
        let storage = browser_window()?
            .local_storage()
            .map_err(|_| ArcadeError::StoreUnavailable)?
            .ok_or(ArcadeError::StoreUnavailable)?;
        Ok(Self { storage })
    }
}

impl SettingsStore for LocalStorageStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| ArcadeError::Store(format!("read {key}: {}", ArcadeError::from(e))))
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| ArcadeError::Store(format!("write {key}: {}", ArcadeError::from(e))))
    }
}
