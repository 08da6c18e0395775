//! # Storage Module
//!
//! Persistence for the tracker. The domain layer depends only on the
//! [`KeyValueStorage`] abstraction; collections go through [`RecordStore`]
//! and single values through [`DocumentStore`].
//!
//! ## Backends
//!
//! - **MemoryStorage**: in-process map, nothing survives the process
//! - **JsonFileStorage**: one JSON file per key in the data directory

pub mod document_store;
pub mod json_file;
pub mod keys;
pub mod memory;
pub mod record_store;
pub mod traits;

pub use document_store::{DocumentLoad, DocumentStore};
pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use record_store::{RecordStore, StoredRecord, WritePolicy};
pub use traits::KeyValueStorage;
