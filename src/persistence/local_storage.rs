//! Browser LocalStorage backend (WASM only)

use web_sys::Storage;

use super::KeyValueStore;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// The window's LocalStorage, if the browser exposes one
    pub fn open() -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| Error::Storage("LocalStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

fn js_err(e: wasm_bindgen::JsValue) -> Error {
    Error::Storage(format!("{e:?}"))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_err)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_err)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_err)
    }
}
