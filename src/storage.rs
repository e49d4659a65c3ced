//! File-backed key-value persistence mirroring the original storage slots.
//!
//! Each key is a file in the data directory holding the raw value text, so
//! a directory seeded from an exported browser storage dump loads as-is.
//! Reads are lenient: missing or corrupt data is treated as "no data", never
//! as an error to the caller.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::{Error, transaction::Transaction};

/// The slot holding the serialized transaction list.
pub const TRANSACTIONS_KEY: &str = "transacciones";

/// The slot holding the display theme, `"claro"` or `"oscuro"`.
pub const THEME_KEY: &str = "modo";

/// The slot holding the last-applied filter criteria.
pub const FILTERS_KEY: &str = "filtros";

/// Synchronous key-value storage over a data directory.
///
/// Values are written read-then-write without transactional guarantees;
/// concurrent processes sharing a directory can overwrite each other.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    /// Open the storage rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref().to_owned();

        fs::create_dir_all(&dir).map_err(|error| Error::Storage {
            key: dir.display().to_string(),
            reason: error.to_string(),
        })?;

        Ok(Self { dir })
    }

    /// Read the raw value stored under `key`, or `None` if the slot is
    /// empty.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the slot exists but cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match fs::read_to_string(self.dir.join(key)) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Error::Storage {
                key: key.to_owned(),
                reason: error.to_string(),
            }),
        }
    }

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the slot cannot be written.
    pub fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        fs::write(self.dir.join(key), value).map_err(|error| Error::Storage {
            key: key.to_owned(),
            reason: error.to_string(),
        })
    }

    /// Serialize the full transaction list into the `transacciones` slot.
    ///
    /// # Errors
    /// Returns an [Error::JsonSerialization] if the list cannot be
    /// serialized, or an [Error::Storage] if the slot cannot be written.
    pub fn save_transactions(&self, transactions: &[Transaction]) -> Result<(), Error> {
        let json = serde_json::to_string(transactions)
            .map_err(|error| Error::JsonSerialization(error.to_string()))?;

        self.set(TRANSACTIONS_KEY, &json)
    }

    /// Load the transaction list from the `transacciones` slot.
    ///
    /// Missing or corrupt data loads as an empty list: corruption is logged
    /// and treated as "no data" so a damaged slot never takes the
    /// application down.
    pub fn load_transactions(&self) -> Vec<Transaction> {
        let text = match self.get(TRANSACTIONS_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!("could not read stored transactions: {error}");
                return Vec::new();
            }
        };

        match serde_json::from_str(&text) {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::warn!("discarding corrupt transaction data: {error}");
                Vec::new()
            }
        }
    }

    /// Store a preference value under `key`.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the slot cannot be written.
    pub fn save_preference(&self, key: &str, value: &str) -> Result<(), Error> {
        self.set(key, value)
    }

    /// Read a preference value, or `None` when it is absent or unreadable.
    pub fn load_preference(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("could not read preference \"{key}\": {error}");
                None
            }
        }
    }
}
