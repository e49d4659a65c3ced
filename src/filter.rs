//! Filtering of transaction snapshots and persistence of the last-used
//! criteria.

use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    Error,
    storage::{FILTERS_KEY, LocalStorage},
    transaction::{Transaction, TransactionKind},
};

/// Narrows a view to one transaction kind, or lets everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    /// Keep every kind.
    #[default]
    All,
    /// Keep only the given kind.
    Only(TransactionKind),
}

/// Narrows a view to one category by exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Keep every category.
    #[default]
    All,
    /// Keep only the given category.
    Only(String),
}

/// Narrows a view to one calendar month, regardless of year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    /// Keep every month.
    #[default]
    All,
    /// Keep only the given month.
    Only(Month),
}

/// The active filter selection. The default lets everything through.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// The kind criterion.
    pub kind: KindFilter,
    /// The category criterion.
    pub category: CategoryFilter,
    /// The month criterion.
    pub month: MonthFilter,
}

impl FilterCriteria {
    /// Whether every criterion is `All`, i.e. the identity filter.
    pub fn is_all(&self) -> bool {
        self == &FilterCriteria::default()
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        if let KindFilter::Only(kind) = self.kind
            && transaction.kind != kind
        {
            return false;
        }

        if let CategoryFilter::Only(category) = &self.category
            && &transaction.category != category
        {
            return false;
        }

        if let MonthFilter::Only(month) = self.month
            && transaction.date.month() != month
        {
            return false;
        }

        true
    }
}

/// Derive the view of `transactions` matching `criteria`.
///
/// Criteria combine with logical AND; an empty result is valid. The input
/// is never mutated.
pub fn apply_filters(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| criteria.matches(t))
        .cloned()
        .collect()
}

/// The on-disk shape of the `filtros` slot, kept to the original
/// vocabulary: `todos`/`todas` for "all", zero-padded month numbers, and an
/// optional `mes` field.
#[derive(Serialize, Deserialize)]
struct StoredCriteria {
    tipo: String,
    categoria: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mes: Option<String>,
}

impl From<&FilterCriteria> for StoredCriteria {
    fn from(criteria: &FilterCriteria) -> Self {
        StoredCriteria {
            tipo: match criteria.kind {
                KindFilter::All => "todos".to_owned(),
                KindFilter::Only(kind) => kind.stored_label().to_owned(),
            },
            categoria: match &criteria.category {
                CategoryFilter::All => "todas".to_owned(),
                CategoryFilter::Only(category) => category.clone(),
            },
            mes: match criteria.month {
                MonthFilter::All => Some("todos".to_owned()),
                MonthFilter::Only(month) => Some(format!("{:02}", u8::from(month))),
            },
        }
    }
}

impl From<StoredCriteria> for FilterCriteria {
    /// Lenient: the slot is plain JSON a user can edit, so unknown values
    /// degrade to `All` instead of erroring.
    fn from(stored: StoredCriteria) -> Self {
        let kind = match stored.tipo.as_str() {
            "ingreso" => KindFilter::Only(TransactionKind::Income),
            "gasto" => KindFilter::Only(TransactionKind::Expense),
            _ => KindFilter::All,
        };

        let category = match stored.categoria.as_str() {
            "todas" | "" => CategoryFilter::All,
            category => CategoryFilter::Only(category.to_owned()),
        };

        let month = stored
            .mes
            .as_deref()
            .and_then(|mes| mes.parse::<u8>().ok())
            .and_then(|number| Month::try_from(number).ok())
            .map_or(MonthFilter::All, MonthFilter::Only);

        FilterCriteria {
            kind,
            category,
            month,
        }
    }
}

/// Persist `criteria` into the `filtros` slot so it survives a restart.
///
/// # Errors
/// Returns an [Error::Storage] if the slot cannot be written, or an
/// [Error::JsonSerialization] if the criteria cannot be serialized.
pub fn save_criteria(storage: &LocalStorage, criteria: &FilterCriteria) -> Result<(), Error> {
    let json = serde_json::to_string(&StoredCriteria::from(criteria))
        .map_err(|error| Error::JsonSerialization(error.to_string()))?;

    storage.save_preference(FILTERS_KEY, &json)
}

/// Load the last-applied criteria, or the identity criteria when nothing
/// usable is stored.
pub fn load_criteria(storage: &LocalStorage) -> FilterCriteria {
    let Some(text) = storage.load_preference(FILTERS_KEY) else {
        return FilterCriteria::default();
    };

    match serde_json::from_str::<StoredCriteria>(&text) {
        Ok(stored) => stored.into(),
        Err(error) => {
            tracing::warn!("discarding corrupt filter criteria: {error}");
            FilterCriteria::default()
        }
    }
}
