//! Defines the crate level error type.

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The input for a new or edited transaction failed validation.
    ///
    /// Carries every rule failure so the caller can present all of the
    /// problems at once instead of one per attempt.
    #[error("invalid transaction input: {}", .0.join(", "))]
    InvalidInput(Vec<String>),

    /// Tried to update a transaction that does not exist.
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// A storage slot could not be read or written.
    ///
    /// The in-memory state stays authoritative for the session when this
    /// happens on a write, so callers should treat it as a warning rather
    /// than a failed operation.
    #[error("could not access the storage slot \"{key}\": {reason}")]
    Storage {
        /// The storage key that was being read or written.
        key: String,
        /// The underlying I/O error, as text.
        reason: String,
    },

    /// A value could not be serialized as JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerialization(String),

    /// The CSV export file could not be written.
    #[error("could not write the CSV export: {0}")]
    ExportFailed(String),

    /// A chart could not be rendered to HTML.
    #[error("could not render chart: {0}")]
    ChartRender(String),

    /// A date string could not be parsed.
    #[error("\"{0}\" is not a valid date, expected the format YYYY-MM-DD")]
    InvalidDate(String),
}
