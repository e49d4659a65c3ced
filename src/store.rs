//! The transaction store: the owner of the canonical transaction list.
//!
//! All mutation goes through [TransactionStore]; every other component only
//! ever sees cloned snapshots or shared references. Each mutation is
//! followed immediately by a persistence write and a store-changed
//! notification to subscribers.

use time::macros::date;

use crate::{
    Error,
    clock::Clock,
    storage::LocalStorage,
    transaction::{Transaction, TransactionDraft, TransactionId, TransactionKind},
    validation::validate,
};

/// A callback invoked with a read-only snapshot after every mutation.
pub type ChangeListener = Box<dyn FnMut(&[Transaction])>;

/// Owns the ordered transaction list and keeps it in sync with storage.
///
/// Insertion order is preserved: updates edit in place and deletions remove
/// in place. If a persistence write fails the in-memory mutation stands
/// (there is no rollback) and the failure is returned as
/// [Error::Storage], which callers should surface as a non-fatal warning.
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    storage: LocalStorage,
    clock: Box<dyn Clock>,
    listeners: Vec<ChangeListener>,
}

impl TransactionStore {
    /// Open a store over `storage`, loading any persisted transactions.
    ///
    /// Missing or corrupt persisted data loads as an empty list.
    pub fn open(storage: LocalStorage, clock: Box<dyn Clock>) -> Self {
        let transactions = storage.load_transactions();

        Self {
            transactions,
            storage,
            clock,
            listeners: Vec::new(),
        }
    }

    /// Populate the store with the two example transactions, only if it is
    /// currently empty. Returns whether seeding happened.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the seeded list could not be
    /// persisted; the seed data is kept in memory regardless.
    pub fn seed_if_empty(&mut self) -> Result<bool, Error> {
        if !self.transactions.is_empty() {
            return Ok(false);
        }

        tracing::info!("seeding example transactions into an empty store");
        self.transactions = seed_transactions();
        self.after_change()?;

        Ok(true)
    }

    /// Create a transaction from a draft and append it to the sequence.
    ///
    /// Validation happens upstream; the check here is defensive. A draft
    /// without a date gets today's date from the clock.
    ///
    /// # Errors
    /// Returns an [Error::InvalidInput] if the draft is invalid, or an
    /// [Error::Storage] if the new list could not be persisted (the
    /// transaction is created in memory regardless).
    pub fn create(&mut self, draft: TransactionDraft) -> Result<Transaction, Error> {
        validate(&draft).map_err(Error::InvalidInput)?;
        let Some(kind) = draft.kind else {
            return Err(Error::InvalidInput(vec!["A kind must be selected".to_owned()]));
        };

        let transaction = Transaction {
            id: self.next_id(),
            description: draft.description,
            amount: draft.amount,
            category: draft.category,
            kind,
            date: draft.date.unwrap_or_else(|| self.clock.today()),
        };

        self.transactions.push(transaction.clone());
        self.after_change()?;

        Ok(transaction)
    }

    /// Replace all mutable fields of the transaction matching `id`, keeping
    /// its position in the sequence.
    ///
    /// # Errors
    /// Returns an [Error::UpdateMissingTransaction] if `id` is unknown, an
    /// [Error::InvalidInput] if the draft is invalid, or an
    /// [Error::Storage] if the updated list could not be persisted (the
    /// update is applied in memory regardless).
    pub fn update(&mut self, id: TransactionId, draft: TransactionDraft) -> Result<Transaction, Error> {
        validate(&draft).map_err(Error::InvalidInput)?;
        let Some(kind) = draft.kind else {
            return Err(Error::InvalidInput(vec!["A kind must be selected".to_owned()]));
        };

        let date = draft.date.unwrap_or_else(|| self.clock.today());

        let updated = {
            let Some(transaction) = self.transactions.iter_mut().find(|t| t.id == id) else {
                return Err(Error::UpdateMissingTransaction);
            };

            transaction.description = draft.description;
            transaction.amount = draft.amount;
            transaction.category = draft.category;
            transaction.kind = kind;
            transaction.date = date;
            transaction.clone()
        };

        self.after_change()?;

        Ok(updated)
    }

    /// Remove the transaction matching `id`.
    ///
    /// Idempotent: deleting an unknown `id` is a logged no-op, not an
    /// error.
    ///
    /// # Errors
    /// Returns an [Error::Storage] if the shrunk list could not be
    /// persisted (the transaction is removed from memory regardless).
    pub fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);

        if self.transactions.len() == before {
            tracing::debug!("ignoring delete for unknown transaction id {id}");
            return Ok(());
        }

        self.after_change()
    }

    /// A cloned snapshot of the full ordered sequence.
    pub fn list(&self) -> Vec<Transaction> {
        self.transactions.clone()
    }

    /// Look up a transaction by `id`.
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// The number of transactions in the store.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the store holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Register a listener invoked with a read-only snapshot after every
    /// mutation, whether or not the accompanying persistence write
    /// succeeded.
    pub fn subscribe(&mut self, listener: impl FnMut(&[Transaction]) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Persist the current sequence and notify subscribers.
    ///
    /// Listeners run even when the write fails, because memory stays
    /// authoritative and the presentation must reflect it.
    fn after_change(&mut self) -> Result<(), Error> {
        let persisted = self.storage.save_transactions(&self.transactions);

        if let Err(error) = &persisted {
            tracing::error!("transactions were mutated in memory but not persisted: {error}");
        }

        let Self { transactions, listeners, .. } = self;
        for listener in listeners.iter_mut() {
            listener(transactions);
        }

        persisted
    }

    /// The next unique ID: the clock's millisecond timestamp, bumped past
    /// the current maximum so IDs stay unique and monotonic even when two
    /// creations land on the same millisecond.
    fn next_id(&self) -> TransactionId {
        let stamp = self.clock.timestamp_millis();
        let max_id = self.transactions.iter().map(|t| t.id).max().unwrap_or(0);

        stamp.max(max_id + 1)
    }
}

/// The two example transactions a fresh install starts with.
fn seed_transactions() -> Vec<Transaction> {
    vec![
        Transaction {
            id: 1,
            description: "Salario".to_owned(),
            amount: 2000.0,
            category: "Ingresos".to_owned(),
            kind: TransactionKind::Income,
            date: date!(2023 - 05 - 15),
        },
        Transaction {
            id: 2,
            description: "Supermercado".to_owned(),
            amount: 150.5,
            category: "Alimentación".to_owned(),
            kind: TransactionKind::Expense,
            date: date!(2023 - 05 - 18),
        },
    ]
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use tempfile::{TempDir, tempdir};
    use time::macros::{date, datetime};

    use crate::{
        Error,
        clock::FixedClock,
        storage::LocalStorage,
        transaction::{TransactionDraft, TransactionKind},
    };

    use super::TransactionStore;

    fn open_test_store() -> (TempDir, TransactionStore) {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let clock = FixedClock(datetime!(2024-01-10 12:00 UTC));

        (dir, TransactionStore::open(storage, Box::new(clock)))
    }

    fn coffee_draft() -> TransactionDraft {
        TransactionDraft::new("Café", 4.5, "Alimentación", TransactionKind::Expense)
            .date(date!(2024 - 01 - 10))
    }

    #[test]
    fn create_appends_with_matching_fields_and_fresh_id() {
        let (_dir, mut store) = open_test_store();
        store.seed_if_empty().unwrap();
        let count_before = store.len();

        let created = store.create(coffee_draft()).unwrap();

        let transactions = store.list();
        assert_eq!(transactions.len(), count_before + 1);
        let last = transactions.last().unwrap();
        assert_eq!(last, &created);
        assert_eq!(last.description, "Café");
        assert_eq!(last.amount, 4.5);
        assert_eq!(last.display_date(), "10/01/2024");
        assert!(
            transactions.iter().filter(|t| t.id == created.id).count() == 1,
            "the new id must be unique"
        );
    }

    #[test]
    fn create_ids_are_monotonic_within_a_millisecond() {
        let (_dir, mut store) = open_test_store();

        let first = store.create(coffee_draft()).unwrap();
        let second = store.create(coffee_draft()).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn create_fills_a_missing_date_from_the_clock() {
        let (_dir, mut store) = open_test_store();
        let mut draft = coffee_draft();
        draft.date = None;

        let created = store.create(draft).unwrap();

        assert_eq!(created.date, date!(2024 - 01 - 10));
    }

    #[test]
    fn create_rejects_invalid_input_without_mutating() {
        let (_dir, mut store) = open_test_store();
        let draft = TransactionDraft {
            description: "ab".to_owned(),
            amount: -5.0,
            category: "".to_owned(),
            kind: None,
            date: None,
        };

        let result = store.create(draft);

        assert!(matches!(result, Err(Error::InvalidInput(errors)) if errors.len() == 4));
        assert!(store.is_empty());
    }

    #[test]
    fn update_replaces_fields_in_place() {
        let (_dir, mut store) = open_test_store();
        store.seed_if_empty().unwrap();
        let order_before: Vec<_> = store.list().iter().map(|t| t.id).collect();

        let updated = store
            .update(
                1,
                TransactionDraft::new("Salario Enero", 2100.0, "Ingresos", TransactionKind::Income)
                    .date(date!(2024 - 01 - 31)),
            )
            .unwrap();

        assert_eq!(updated.id, 1);
        assert_eq!(updated.description, "Salario Enero");
        assert_eq!(updated.amount, 2100.0);
        let order_after: Vec<_> = store.list().iter().map(|t| t.id).collect();
        assert_eq!(order_before, order_after, "updates must not reorder");
    }

    #[test]
    fn update_unknown_id_fails() {
        let (_dir, mut store) = open_test_store();
        store.seed_if_empty().unwrap();

        let result = store.update(999, coffee_draft());

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_is_idempotent() {
        let (_dir, mut store) = open_test_store();
        store.seed_if_empty().unwrap();

        store.delete(1).unwrap();
        assert_eq!(store.len(), 1);

        // The second delete of the same id is a no-op, not an error.
        store.delete(1).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn seed_if_empty_adds_exactly_the_two_examples() {
        let (_dir, mut store) = open_test_store();

        assert!(store.seed_if_empty().unwrap());

        let transactions = store.list();
        assert_eq!(transactions.len(), 2);

        assert_eq!(transactions[0].description, "Salario");
        assert_eq!(transactions[0].amount, 2000.0);
        assert_eq!(transactions[0].category, "Ingresos");
        assert_eq!(transactions[0].kind, TransactionKind::Income);
        assert_eq!(transactions[0].date, date!(2023 - 05 - 15));

        assert_eq!(transactions[1].description, "Supermercado");
        assert_eq!(transactions[1].amount, 150.5);
        assert_eq!(transactions[1].category, "Alimentación");
        assert_eq!(transactions[1].kind, TransactionKind::Expense);
        assert_eq!(transactions[1].date, date!(2023 - 05 - 18));
    }

    #[test]
    fn seed_if_empty_is_a_no_op_on_a_populated_store() {
        let (_dir, mut store) = open_test_store();
        store.seed_if_empty().unwrap();
        store.delete(1).unwrap();

        // Still one transaction left, so no reseeding.
        assert!(!store.seed_if_empty().unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn mutations_survive_a_reopen() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();

        let mut store = TransactionStore::open(
            storage.clone(),
            Box::new(FixedClock(datetime!(2024-01-10 12:00 UTC))),
        );
        store.seed_if_empty().unwrap();
        let created = store.create(coffee_draft()).unwrap();
        store.delete(2).unwrap();
        let expected = store.list();
        drop(store);

        let reopened = TransactionStore::open(
            storage,
            Box::new(FixedClock(datetime!(2024-01-11 12:00 UTC))),
        );

        assert_eq!(reopened.list(), expected);
        assert!(reopened.get(created.id).is_some());
    }

    #[test]
    fn list_returns_an_independent_snapshot() {
        let (_dir, mut store) = open_test_store();
        store.seed_if_empty().unwrap();

        let mut snapshot = store.list();
        snapshot.clear();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn listeners_see_every_mutation() {
        let (_dir, mut store) = open_test_store();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        store.subscribe(move |transactions| sink.borrow_mut().push(transactions.len()));

        store.seed_if_empty().unwrap();
        store.create(coffee_draft()).unwrap();
        store.delete(1).unwrap();

        assert_eq!(*seen.borrow(), vec![2, 3, 2]);
    }
}
