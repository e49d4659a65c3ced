//! The predefined categories and the categories observed in the data.

use crate::transaction::Transaction;

/// The categories offered out of the box. Category values are free strings,
/// so this list is a convenience for pickers, not a constraint.
pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Alimentación",
    "Transporte",
    "Vivienda",
    "Entretenimiento",
    "Salud",
    "Educación",
    "Ingresos",
    "Otros",
];

/// The predefined categories plus every category present in `transactions`,
/// deduplicated, in first-seen order. Stray user-introduced categories are
/// kept, never pruned.
pub fn known_categories(transactions: &[Transaction]) -> Vec<String> {
    let mut categories: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| (*c).to_owned()).collect();

    for transaction in transactions {
        if !categories.contains(&transaction.category) {
            categories.push(transaction.category.clone());
        }
    }

    categories
}
