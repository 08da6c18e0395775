//! # Storage Traits
//!
//! The persistence collaborator is a plain key-value store: named entries
//! holding JSON text, with no transactions. The domain layer only ever talks
//! to this trait, so the in-memory and file-backed stores are interchangeable.

use anyhow::Result;

pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Returns true if something was removed.
    fn remove(&self, key: &str) -> Result<bool>;
}
