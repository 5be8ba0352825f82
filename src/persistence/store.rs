//! Key-value backends
//!
//! - `MemoryStore`: in-process map, shareable between clones (tests, headless runs)
//! - `FileStore`: one JSON file per key in a directory
//! - `LocalStorageStore`: browser LocalStorage (wasm32)

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::KeyValueStore;
use crate::error::StorageError;

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Rc<RefCell<HashMap<String, String>>>,
    failing: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail, as if storage were unavailable
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn len(&self) -> usize {
        self.data.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.borrow().is_empty()
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.get() {
            return Err(StorageError::Unavailable("memory store disabled".into()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.data.borrow().get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.data
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub use file::FileStore;

mod file {
    use std::fs;
    use std::io::ErrorKind;
    use std::path::PathBuf;

    use super::KeyValueStore;
    use crate::error::StorageError;

    /// One `<key>.json` file per key inside a directory
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        fn path(&self, key: &str) -> PathBuf {
            self.dir.join(format!("{key}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            match fs::read_to_string(self.path(key)) {
                Ok(json) => Ok(Some(json)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        /// Write to a temp file, then rename over the old record
        fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            fs::create_dir_all(&self.dir)?;
            let path = self.path(key);
            let tmp = path.with_extension("json.tmp");
            fs::write(&tmp, value)?;
            fs::rename(&tmp, &path)?;
            Ok(())
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;
    use crate::error::StorageError;

    /// Browser LocalStorage
    #[derive(Debug, Clone, Default)]
    pub struct LocalStorageStore;

    impl LocalStorageStore {
        pub fn new() -> Self {
            Self
        }

        fn storage() -> Result<web_sys::Storage, StorageError> {
            web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("no window".into()))?
                .local_storage()
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
        }
    }

    impl KeyValueStore for LocalStorageStore {
        fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
            Self::storage()?
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }

        fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            Self::storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
        }
    }
}
