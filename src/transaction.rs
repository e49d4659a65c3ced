//! Defines the core transaction model shared by every component.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::Error;

/// Identifier for a transaction, derived from its creation time.
pub type TransactionId = i64;

/// The format dates are entered in, e.g. "2024-01-10".
const INPUT_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The format dates are displayed and persisted in, e.g. "10/01/2024".
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

time::serde::format_description!(stored_date, Date, "[day]/[month]/[year]");

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money earned, counted towards the balance.
    #[serde(rename = "ingreso")]
    Income,
    /// Money spent, counted against the balance.
    #[serde(rename = "gasto")]
    Expense,
}

impl TransactionKind {
    /// The lowercase English label, e.g. for table cells.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The vocabulary the kind is persisted and exported with.
    pub fn stored_label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "ingreso",
            TransactionKind::Expense => "gasto",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    /// Accepts both the English labels and the stored vocabulary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Ok(TransactionKind::Income),
            "expense" | "gasto" => Ok(TransactionKind::Expense),
            other => Err(Error::InvalidInput(vec![format!(
                "\"{other}\" is not a transaction kind, expected income or expense"
            )])),
        }
    }
}

/// A single recorded income or expense event.
///
/// The serialized form keeps the field names and value vocabulary of the
/// original storage slots so existing data directories load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, unique within the store.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    #[serde(rename = "descripcion")]
    pub description: String,
    /// The amount of money involved. Always positive; the direction comes
    /// from [Transaction::kind].
    #[serde(rename = "monto")]
    pub amount: f64,
    /// The category the transaction belongs to, e.g. "Alimentación".
    #[serde(rename = "categoria")]
    pub category: String,
    /// Whether the transaction is an income or an expense.
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    /// When the transaction happened.
    #[serde(rename = "fecha", with = "stored_date")]
    pub date: Date,
}

impl Transaction {
    /// The amount signed by the kind: positive for income, negative for
    /// expenses.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// The date in display form, e.g. "10/01/2024".
    pub fn display_date(&self) -> String {
        self.date
            .format(DISPLAY_DATE_FORMAT)
            .unwrap_or_else(|_| self.date.to_string())
    }
}

/// The user-supplied fields for a new or edited transaction.
///
/// Drafts come from the presentation layer and must pass
/// [crate::validation::validate] before they reach the store. `kind` and
/// `date` are optional because a form submission may omit them; a missing
/// kind fails validation, a missing date is filled with today's date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionDraft {
    /// A text description of what the transaction is for.
    pub description: String,
    /// The amount of money involved, expected to be positive.
    pub amount: f64,
    /// The category the transaction belongs to.
    pub category: String,
    /// Whether the transaction is an income or an expense, if selected.
    pub kind: Option<TransactionKind>,
    /// When the transaction happened, if given.
    pub date: Option<Date>,
}

impl TransactionDraft {
    /// Create a draft with every required field set and no explicit date.
    pub fn new(description: &str, amount: f64, category: &str, kind: TransactionKind) -> Self {
        Self {
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            kind: Some(kind),
            date: None,
        }
    }

    /// Set the date for the draft.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }
}

/// Parse a date in the entry format, e.g. "2024-01-10".
///
/// # Errors
/// Returns an [Error::InvalidDate] if `text` is not a calendar date in
/// `YYYY-MM-DD` form.
pub fn parse_input_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), INPUT_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}
