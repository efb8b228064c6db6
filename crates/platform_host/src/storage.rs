//! Persistent key-value storage contracts and the safe typed wrapper.
//!
//! The raw backend is fallible at every operation (quota exhaustion,
//! disabled storage). [`KeyValueStore`] wraps it so that callers never see a
//! failure: reads degrade to the caller's default, writes report `false`.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Prefix applied to every key this application persists, so app data never
/// collides with unrelated records in a shared store.
pub const STORAGE_PREFIX: &str = "redcards_";

const PROBE_KEY: &str = "__storage_test__";

/// Raw persistent string storage.
///
/// Implementations map directly onto the platform store and surface its
/// failures; callers are expected to go through [`KeyValueStore`].
pub trait StorageBackend {
    /// Reads the raw string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot be read.
    fn get_raw(&self, key: &str) -> Result<Option<String>, String>;

    /// Stores `value` verbatim under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store rejects the write.
    fn set_raw(&self, key: &str, value: &str) -> Result<(), String>;

    /// Removes `key` if present.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot be mutated.
    fn remove_raw(&self, key: &str) -> Result<(), String>;

    /// Lists every key currently present in the backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying store cannot be enumerated.
    fn keys(&self) -> Result<Vec<String>, String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op storage backend for unsupported targets; accepts writes and stores
/// nothing.
pub struct NoopStorageBackend;

impl StorageBackend for NoopStorageBackend {
    fn get_raw(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn set_raw(&self, _key: &str, _value: &str) -> Result<(), String> {
        Ok(())
    }

    fn remove_raw(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory storage backend keyed by string.
pub struct MemoryStorageBackend {
    inner: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorageBackend {
    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether the backend holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorageBackend {
    fn get_raw(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_raw(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, String> {
        Ok(self.inner.borrow().keys().cloned().collect())
    }
}

/// Namespaced, JSON-tolerant wrapper over a [`StorageBackend`].
///
/// Every operation is total: a failing backend degrades to a safe return
/// value rather than propagating, so a broken store can never crash the
/// caller.
#[derive(Clone)]
pub struct KeyValueStore {
    backend: Rc<dyn StorageBackend>,
}

impl KeyValueStore {
    /// Wraps `backend` with the application key prefix.
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    fn prefixed(key: &str) -> String {
        format!("{STORAGE_PREFIX}{key}")
    }

    /// Reads a value, JSON-parsing the stored text and falling back to the
    /// raw string when it is not valid JSON. Returns `None` when the key is
    /// absent or the backend fails.
    pub fn get(&self, key: &str) -> Option<Value> {
        let raw = match self.backend.get_raw(&Self::prefixed(key)) {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("storage read failed for {key}: {err}");
                return None;
            }
        };
        Some(serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
    }

    /// Reads a value, returning `default` when the key is absent or the
    /// backend fails.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Reads and deserializes a typed value. Returns `None` when the key is
    /// absent, the stored text does not deserialize as `T`, or the backend
    /// fails.
    pub fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_raw(&Self::prefixed(key)) {
            Ok(raw) => raw?,
            Err(err) => {
                log::warn!("storage read failed for {key}: {err}");
                return None;
            }
        };
        serde_json::from_str(&raw).ok()
    }

    /// Stores a string verbatim. Returns `false` when the backend fails.
    pub fn set_text(&self, key: &str, value: &str) -> bool {
        match self.backend.set_raw(&Self::prefixed(key), value) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("storage write failed for {key}: {err}");
                false
            }
        }
    }

    /// Serializes and stores a JSON value. Returns `false` when
    /// serialization or the backend fails.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("storage serialization failed for {key}: {err}");
                return false;
            }
        };
        self.set_text(key, &raw)
    }

    /// Removes a key. Returns `false` when the backend fails.
    pub fn remove(&self, key: &str) -> bool {
        match self.backend.remove_raw(&Self::prefixed(key)) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("storage remove failed for {key}: {err}");
                false
            }
        }
    }

    /// Removes every key carrying the application prefix, leaving unrelated
    /// records untouched. Returns `false` when the backend fails.
    pub fn clear(&self) -> bool {
        let keys = match self.backend.keys() {
            Ok(keys) => keys,
            Err(err) => {
                log::warn!("storage clear failed: {err}");
                return false;
            }
        };
        let mut ok = true;
        for key in keys.iter().filter(|k| k.starts_with(STORAGE_PREFIX)) {
            if let Err(err) = self.backend.remove_raw(key) {
                log::warn!("storage clear failed for {key}: {err}");
                ok = false;
            }
        }
        ok
    }

    /// Probes the backend with a disposable write and remove. Reports
    /// `false` on any failure.
    pub fn is_available(&self) -> bool {
        self.backend.set_raw(PROBE_KEY, "test").is_ok()
            && self.backend.remove_raw(PROBE_KEY).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct StoredThing {
        count: u32,
    }

    /// Backend that fails every operation, for degradation tests.
    #[derive(Debug, Clone, Copy, Default)]
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn get_raw(&self, _key: &str) -> Result<Option<String>, String> {
            Err("storage disabled".to_string())
        }

        fn set_raw(&self, _key: &str, _value: &str) -> Result<(), String> {
            Err("quota exceeded".to_string())
        }

        fn remove_raw(&self, _key: &str) -> Result<(), String> {
            Err("storage disabled".to_string())
        }

        fn keys(&self) -> Result<Vec<String>, String> {
            Err("storage disabled".to_string())
        }
    }

    fn memory_store() -> (KeyValueStore, MemoryStorageBackend) {
        let backend = MemoryStorageBackend::default();
        (KeyValueStore::new(Rc::new(backend.clone())), backend)
    }

    #[test]
    fn set_json_round_trips_typed_values_under_prefix() {
        let (store, backend) = memory_store();
        assert!(store.set_json("thing", &StoredThing { count: 3 }));
        assert_eq!(
            backend.get_raw("redcards_thing").expect("raw read"),
            Some("{\"count\":3}".to_string())
        );
        assert_eq!(
            store.get_typed::<StoredThing>("thing"),
            Some(StoredThing { count: 3 })
        );
    }

    #[test]
    fn set_text_stores_strings_verbatim() {
        let (store, backend) = memory_store();
        assert!(store.set_text("greeting", "hello"));
        assert_eq!(
            backend.get_raw("redcards_greeting").expect("raw read"),
            Some("hello".to_string())
        );
    }

    #[test]
    fn get_falls_back_to_raw_string_on_malformed_json() {
        let (store, backend) = memory_store();
        backend
            .set_raw("redcards_broken", "{not json")
            .expect("seed raw");
        assert_eq!(
            store.get("broken"),
            Some(Value::String("{not json".to_string()))
        );
    }

    #[test]
    fn get_parses_stored_json() {
        let (store, _) = memory_store();
        store.set_json("numbers", &json!({ "a": 1 }));
        assert_eq!(store.get("numbers"), Some(json!({ "a": 1 })));
    }

    #[test]
    fn get_or_returns_default_when_absent() {
        let (store, _) = memory_store();
        assert_eq!(store.get_or("missing", json!(42)), json!(42));
    }

    #[test]
    fn failing_backend_degrades_instead_of_raising() {
        let store = KeyValueStore::new(Rc::new(BrokenBackend));
        assert_eq!(store.get("anything"), None);
        assert_eq!(store.get_or("anything", json!("fallback")), json!("fallback"));
        assert!(!store.set_text("anything", "value"));
        assert!(!store.set_json("anything", &1));
        assert!(!store.remove("anything"));
        assert!(!store.clear());
        assert!(!store.is_available());
    }

    #[test]
    fn clear_removes_only_prefixed_keys() {
        let (store, backend) = memory_store();
        store.set_text("mine", "x");
        backend
            .set_raw("unrelated_key", "y")
            .expect("seed unrelated");
        assert!(store.clear());
        assert_eq!(store.get("mine"), None);
        assert_eq!(
            backend.get_raw("unrelated_key").expect("raw read"),
            Some("y".to_string())
        );
    }

    #[test]
    fn is_available_probe_leaves_no_residue() {
        let (store, backend) = memory_store();
        assert!(store.is_available());
        assert!(backend.is_empty());
    }
}
