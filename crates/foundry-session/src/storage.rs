//! Durable storage for the collection store.
//!
//! The storage document is a YAML mapping of universe name to a list of
//! symbol strings:
//!
//! ```yaml
//! Nifty 50:
//! - NSE:INFY-EQ
//! - NSE:TCS-EQ
//! Banks: []
//! ```
//!
//! Reads and writes always cover the whole document. Callers go through
//! [`load_or_seed`] and [`persist`], which never fail: a missing document or
//! one that is not a mapping degrades to the seed store, and a failed write
//! is logged and left for the next mutation to retry.

use std::fs;
use std::path::{Path, PathBuf};

use foundry_universe::store::CollectionStore;
use serde_yaml::Value;
use tracing::{error, info, warn};

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors produced while reading or writing the storage document.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The file exists but could not be read or written.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("invalid YAML: {0}")]
    Decode(#[source] serde_yaml::Error),

    /// The document is valid YAML but not a mapping.
    #[error("storage document is {found}, expected a mapping of universe name to symbols")]
    NotAMapping { found: &'static str },

    /// One entry of the mapping has the wrong shape. Logged and skipped.
    #[error("bad entry `{key}`: {reason}")]
    BadEntry { key: String, reason: String },

    /// The store could not be encoded.
    #[error("failed to encode store: {0}")]
    Encode(#[source] serde_yaml::Error),
}

// ---------------------------------------------------------------------------
// Document codec
// ---------------------------------------------------------------------------

/// Decode a storage document.
///
/// Only a document that is not a mapping is rejected. Inside the mapping,
/// numeric and boolean keys or symbols are read as their string form (a bare
/// BSE scrip code like `500325` is a number to YAML). A `null` value is read
/// as an empty list, which is what a hand-written `Tech:` line produces.
/// Entries that still cannot be read (a nested list or mapping where a
/// symbol belongs, a scalar where a list belongs) are dropped one at a time
/// with a warning. Duplicate symbols are dropped; stored order is kept.
pub fn decode_document(text: &str) -> Result<CollectionStore, StorageError> {
    if text.trim().is_empty() {
        return Err(StorageError::NotAMapping {
            found: "an empty document",
        });
    }
    let document: Value = serde_yaml::from_str(text).map_err(StorageError::Decode)?;
    let mapping = match document {
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(StorageError::NotAMapping {
                found: value_kind(&other),
            })
        }
    };

    let mut lists = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let Some(name) = scalar_string(&key) else {
            skip_entry(StorageError::BadEntry {
                key: format!("{key:?}"),
                reason: format!("universe name is {}, expected a string", value_kind(&key)),
            });
            continue;
        };
        let symbols = match value {
            Value::Null => Vec::new(),
            Value::Sequence(items) => {
                let mut symbols = Vec::with_capacity(items.len());
                for item in items {
                    match scalar_string(&item) {
                        Some(symbol) => symbols.push(symbol),
                        None => skip_entry(StorageError::BadEntry {
                            key: name.clone(),
                            reason: format!(
                                "symbol is {}, expected a string; symbol dropped",
                                value_kind(&item)
                            ),
                        }),
                    }
                }
                symbols
            }
            other => {
                skip_entry(StorageError::BadEntry {
                    key: name,
                    reason: format!("value is {}, expected a list; universe dropped", value_kind(&other)),
                });
                continue;
            }
        };
        lists.push((name, symbols));
    }

    Ok(CollectionStore::from_lists(lists))
}

/// The string form of a scalar key or symbol.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn skip_entry(error: StorageError) {
    warn!(error = %error, "skipping unreadable storage entry");
}

/// Encode the store as a storage document.
pub fn encode_document(store: &CollectionStore) -> Result<String, StorageError> {
    serde_yaml::to_string(&store.to_document()).map_err(StorageError::Encode)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// A place the store is read from at session start and written to after
/// each committed mutation.
pub trait Storage {
    /// Read the stored document. `Ok(None)` means nothing is stored yet.
    fn load(&self) -> Result<Option<CollectionStore>, StorageError>;

    /// Replace the stored document with `store`.
    fn save(&mut self, store: &CollectionStore) -> Result<(), StorageError>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

/// Load the stored store, falling back to `seed` when nothing usable is
/// stored. Never fails.
pub fn load_or_seed<S: Storage + ?Sized>(storage: &S, seed: CollectionStore) -> CollectionStore {
    match storage.load() {
        Ok(Some(store)) => {
            info!(
                location = %storage.location(),
                universes = store.len(),
                "loaded universes"
            );
            store
        }
        Ok(None) => {
            info!(location = %storage.location(), "no stored universes, using seed");
            seed
        }
        Err(e) => {
            warn!(
                location = %storage.location(),
                error = %e,
                "stored universes unreadable, using seed"
            );
            seed
        }
    }
}

/// Write `store`, logging the outcome. Returns whether the write succeeded.
pub fn persist<S: Storage + ?Sized>(storage: &mut S, store: &CollectionStore) -> bool {
    match storage.save(store) {
        Ok(()) => {
            info!(
                location = %storage.location(),
                universes = store.len(),
                "universes persisted"
            );
            true
        }
        Err(e) => {
            error!(location = %storage.location(), error = %e, "failed to persist universes");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// YamlFileStorage
// ---------------------------------------------------------------------------

/// The storage document as a YAML file on disk.
#[derive(Debug, Clone)]
pub struct YamlFileStorage {
    path: PathBuf,
}

impl YamlFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for YamlFileStorage {
    fn load(&self) -> Result<Option<CollectionStore>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        decode_document(&text).map(Some)
    }

    fn save(&mut self, store: &CollectionStore) -> Result<(), StorageError> {
        let text = encode_document(store)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        fs::write(&self.path, text).map_err(|e| self.io_error(e))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory storage that keeps the encoded document and records every
/// successful write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Option<String>,
    writes: Vec<CollectionStore>,
    fail_writes: bool,
}

impl MemoryStorage {
    /// Storage with nothing stored.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage holding the raw document `text`, well-formed or not.
    pub fn with_document(text: &str) -> Self {
        Self {
            document: Some(text.to_owned()),
            ..Self::default()
        }
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The current raw document.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Every store successfully written, oldest first.
    pub fn writes(&self) -> &[CollectionStore] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<CollectionStore>, StorageError> {
        self.document.as_deref().map(decode_document).transpose()
    }

    fn save(&mut self, store: &CollectionStore) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "writes disabled"),
            });
        }
        self.document = Some(encode_document(store)?);
        self.writes.push(store.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_owned()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
