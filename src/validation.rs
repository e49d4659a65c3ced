//! Input validation for new and edited transactions.
//!
//! This is the single gate before a draft reaches the store. All rules are
//! checked and all failures collected so the user sees every problem at
//! once.

use unicode_segmentation::UnicodeSegmentation;

use crate::transaction::TransactionDraft;

/// The minimum length of a transaction description, in grapheme clusters.
pub const MIN_DESCRIPTION_LENGTH: usize = 3;

/// Check a draft against the entry rules.
///
/// Returns `Ok(())` for a valid draft, or every failed rule as a
/// user-facing message. Pure: never mutates the draft and has no side
/// effects.
pub fn validate(draft: &TransactionDraft) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if draft.description.trim().graphemes(true).count() < MIN_DESCRIPTION_LENGTH {
        errors.push(format!(
            "The description must be at least {MIN_DESCRIPTION_LENGTH} characters long"
        ));
    }

    if !draft.amount.is_finite() || draft.amount <= 0.0 {
        errors.push("The amount must be a positive number".to_owned());
    }

    if draft.category.trim().is_empty() {
        errors.push("A category must be selected".to_owned());
    }

    if draft.kind.is_none() {
        errors.push("A kind (income or expense) must be selected".to_owned());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
