//! CSV export of the transaction list.
//!
//! The output format matches the original export: a fixed Spanish header,
//! one row per transaction in store order, and every field double-quoted
//! except the numeric amount.

use std::{fs, path::Path};

use crate::{Error, transaction::Transaction};

/// The header row of the export.
pub const CSV_HEADER: &str = "Fecha,Descripción,Monto,Categoría,Tipo";

/// Render the transactions as CSV text.
pub fn to_csv(transactions: &[Transaction]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for transaction in transactions {
        out.push_str(&format!(
            "\"{}\",\"{}\",{},\"{}\",\"{}\"\n",
            transaction.display_date(),
            escape(&transaction.description),
            transaction.amount,
            escape(&transaction.category),
            transaction.kind.stored_label(),
        ));
    }

    out
}

/// Write the transactions as CSV to `path`.
///
/// # Errors
/// Returns an [Error::ExportFailed] if the file cannot be written.
pub fn write_csv(transactions: &[Transaction], path: impl AsRef<Path>) -> Result<(), Error> {
    fs::write(path.as_ref(), to_csv(transactions))
        .map_err(|error| Error::ExportFailed(error.to_string()))
}

/// Double any quotes inside a quoted field.
fn escape(field: &str) -> String {
    field.replace('"', "\"\"")
}
