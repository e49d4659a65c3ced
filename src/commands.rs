//! Command handlers connecting user actions to the store and derived views.
//!
//! Each handler takes typed input, talks to the store, and reports the
//! outcome through the injected [AlertSink]. Persistence failures are
//! surfaced as warnings, not failures: the in-memory state stays
//! authoritative and the session continues memory-only (see the crate
//! error docs).

use std::path::{Path, PathBuf};

use crate::{
    Error,
    aggregation::{net_balance, total_by_kind},
    alert::{Alert, AlertSink, ConfirmationPrompt},
    charts,
    currency::format_currency,
    export,
    filter::{FilterCriteria, apply_filters, load_criteria, save_criteria},
    storage::LocalStorage,
    store::TransactionStore,
    theme::{Theme, load_theme, save_theme},
    transaction::{Transaction, TransactionDraft, TransactionId, TransactionKind},
    validation::validate,
};

/// The balance figures over a transaction set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceSummary {
    /// Total income.
    pub income: f64,
    /// Total expenses.
    pub expenses: f64,
    /// Income minus expenses.
    pub net: f64,
}

/// The application command layer.
///
/// Owns the store and the preference storage, and reports to the user
/// through the injected collaborators.
pub struct App {
    store: TransactionStore,
    storage: LocalStorage,
    alerts: Box<dyn AlertSink>,
    prompt: Box<dyn ConfirmationPrompt>,
}

impl App {
    /// Wire the command layer over an opened store and its preference
    /// storage.
    pub fn new(
        store: TransactionStore,
        storage: LocalStorage,
        alerts: Box<dyn AlertSink>,
        prompt: Box<dyn ConfirmationPrompt>,
    ) -> Self {
        Self {
            store,
            storage,
            alerts,
            prompt,
        }
    }

    /// Run the startup sequence: seed the store when it has never held
    /// data.
    pub fn start(&mut self) {
        match self.store.seed_if_empty() {
            Ok(true) => self
                .alerts
                .notify(Alert::Info("Added two example transactions to get you started".to_owned())),
            Ok(false) => {}
            Err(error) => self.warn_memory_only(&error),
        }
    }

    /// Record a new transaction.
    ///
    /// # Errors
    /// Returns an [Error::InvalidInput] when validation fails; every
    /// message is also sent to the alert sink and nothing is written.
    pub fn add(&mut self, draft: TransactionDraft) -> Result<(), Error> {
        if let Err(errors) = validate(&draft) {
            self.notify_validation_errors(&errors);
            return Err(Error::InvalidInput(errors));
        }

        let noun = kind_noun(draft.kind);

        match self.store.create(draft) {
            Ok(_) => {
                self.alerts.notify(Alert::Success(format!("{noun} recorded")));
                Ok(())
            }
            Err(error @ Error::Storage { .. }) => {
                self.alerts.notify(Alert::Success(format!("{noun} recorded")));
                self.warn_memory_only(&error);
                Ok(())
            }
            Err(error) => {
                self.alerts.notify(Alert::Error(error.to_string()));
                Err(error)
            }
        }
    }

    /// Replace the transaction matching `id` with the draft's fields.
    ///
    /// # Errors
    /// Returns an [Error::InvalidInput] when validation fails, or an
    /// [Error::UpdateMissingTransaction] when `id` is unknown; both are
    /// also reported through the alert sink.
    pub fn edit(&mut self, id: TransactionId, draft: TransactionDraft) -> Result<(), Error> {
        if let Err(errors) = validate(&draft) {
            self.notify_validation_errors(&errors);
            return Err(Error::InvalidInput(errors));
        }

        match self.store.update(id, draft) {
            Ok(_) => {
                self.alerts
                    .notify(Alert::Success("Transaction updated".to_owned()));
                Ok(())
            }
            Err(error @ Error::Storage { .. }) => {
                self.alerts
                    .notify(Alert::Success("Transaction updated".to_owned()));
                self.warn_memory_only(&error);
                Ok(())
            }
            Err(Error::UpdateMissingTransaction) => {
                self.alerts.notify(Alert::Error(
                    "Could not update the transaction: it could not be found".to_owned(),
                ));
                Err(Error::UpdateMissingTransaction)
            }
            Err(error) => {
                self.alerts.notify(Alert::Error(error.to_string()));
                Err(error)
            }
        }
    }

    /// Delete the transaction matching `id` after user confirmation.
    ///
    /// Unknown ids and declined confirmations are quiet no-ops.
    pub fn remove(&mut self, id: TransactionId) -> Result<(), Error> {
        let Some(transaction) = self.store.get(id).cloned() else {
            tracing::debug!("ignoring remove for unknown transaction id {id}");
            return Ok(());
        };

        let message = format!(
            "Delete {} of {} in {}?",
            transaction.kind.label(),
            format_currency(transaction.amount),
            transaction.category,
        );

        if !self.prompt.confirm(&message) {
            return Ok(());
        }

        match self.store.delete(id) {
            Ok(()) => {
                self.alerts
                    .notify(Alert::Success("Transaction deleted".to_owned()));
                Ok(())
            }
            Err(error) => {
                self.alerts
                    .notify(Alert::Success("Transaction deleted".to_owned()));
                self.warn_memory_only(&error);
                Ok(())
            }
        }
    }

    /// A snapshot of the full transaction list.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.store.list()
    }

    /// The last-applied filter criteria.
    pub fn filters(&self) -> FilterCriteria {
        load_criteria(&self.storage)
    }

    /// Persist `criteria` as the active filter selection.
    ///
    /// A failed write is reported as a warning; the criteria still apply
    /// for the current command.
    pub fn set_filters(&mut self, criteria: &FilterCriteria) {
        if let Err(error) = save_criteria(&self.storage, criteria) {
            self.warn_memory_only(&error);
        }
    }

    /// The snapshot narrowed by the active criteria.
    pub fn visible_transactions(&self) -> Vec<Transaction> {
        apply_filters(&self.store.list(), &self.filters())
    }

    /// The balance figures over the full transaction list.
    pub fn summary(&self) -> BalanceSummary {
        let transactions = self.store.list();

        BalanceSummary {
            income: total_by_kind(&transactions, TransactionKind::Income),
            expenses: total_by_kind(&transactions, TransactionKind::Expense),
            net: net_balance(&transactions),
        }
    }

    /// Export the full transaction list as CSV to `path`.
    ///
    /// # Errors
    /// Returns an [Error::ExportFailed] if the file cannot be written; the
    /// failure is also reported through the alert sink.
    pub fn export_csv(&mut self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();

        match export::write_csv(&self.store.list(), path) {
            Ok(()) => {
                self.alerts.notify(Alert::Success(format!(
                    "Data exported to {}",
                    path.display()
                )));
                Ok(())
            }
            Err(error) => {
                self.alerts
                    .notify(Alert::Error(format!("Could not export data: {error}")));
                Err(error)
            }
        }
    }

    /// Render the category and monthly charts as HTML files in `out_dir`,
    /// themed by the stored display theme.
    ///
    /// # Errors
    /// Returns an [Error::ChartRender] if a chart cannot be written; the
    /// failure is also reported through the alert sink.
    pub fn render_charts(&mut self, out_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, Error> {
        let theme = load_theme(&self.storage);

        match charts::render_charts(&self.store.list(), theme, out_dir) {
            Ok(paths) => {
                for path in &paths {
                    self.alerts
                        .notify(Alert::Success(format!("Chart written to {}", path.display())));
                }
                Ok(paths)
            }
            Err(error) => {
                self.alerts
                    .notify(Alert::Error(format!("Could not render charts: {error}")));
                Err(error)
            }
        }
    }

    /// The stored display theme.
    pub fn theme(&self) -> Theme {
        load_theme(&self.storage)
    }

    /// Persist `theme` as the display theme and report the switch.
    pub fn set_theme(&mut self, theme: Theme) {
        if let Err(error) = save_theme(&self.storage, theme) {
            self.warn_memory_only(&error);
        }

        let label = match theme {
            Theme::Dark => "Dark mode enabled",
            Theme::Light => "Light mode enabled",
        };
        self.alerts.notify(Alert::Success(label.to_owned()));
    }

    /// Flip the display theme and return the new value.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme().toggled();
        self.set_theme(next);
        next
    }

    fn notify_validation_errors(&mut self, errors: &[String]) {
        for error in errors {
            self.alerts.notify(Alert::Error(error.clone()));
        }
    }

    fn warn_memory_only(&mut self, error: &Error) {
        self.alerts.notify(Alert::Warning(format!(
            "Changes were kept in memory but could not be saved: {error}"
        )));
    }
}

fn kind_noun(kind: Option<TransactionKind>) -> &'static str {
    match kind {
        Some(TransactionKind::Income) => "Income",
        Some(TransactionKind::Expense) => "Expense",
        None => "Transaction",
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use tempfile::{TempDir, tempdir};
    use time::macros::{date, datetime};

    use crate::{
        clock::FixedClock,
        filter::{CategoryFilter, FilterCriteria},
        storage::LocalStorage,
        transaction::{TransactionDraft, TransactionKind},
    };

    use super::*;

    #[derive(Default)]
    struct RecordingAlerts(Rc<RefCell<Vec<Alert>>>);

    impl AlertSink for RecordingAlerts {
        fn notify(&mut self, alert: Alert) {
            self.0.borrow_mut().push(alert);
        }
    }

    struct ScriptedPrompt {
        answer: bool,
        asked: Rc<RefCell<Vec<String>>>,
    }

    impl ConfirmationPrompt for ScriptedPrompt {
        fn confirm(&mut self, message: &str) -> bool {
            self.asked.borrow_mut().push(message.to_owned());
            self.answer
        }
    }

    struct Harness {
        app: App,
        alerts: Rc<RefCell<Vec<Alert>>>,
        asked: Rc<RefCell<Vec<String>>>,
        _dir: TempDir,
    }

    fn harness(confirm_answer: bool) -> Harness {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        let store = TransactionStore::open(
            storage.clone(),
            Box::new(FixedClock(datetime!(2024-01-10 12:00 UTC))),
        );

        let alerts = Rc::new(RefCell::new(Vec::new()));
        let asked = Rc::new(RefCell::new(Vec::new()));
        let app = App::new(
            store,
            storage,
            Box::new(RecordingAlerts(Rc::clone(&alerts))),
            Box::new(ScriptedPrompt {
                answer: confirm_answer,
                asked: Rc::clone(&asked),
            }),
        );

        Harness {
            app,
            alerts,
            asked,
            _dir: dir,
        }
    }

    #[test]
    fn start_seeds_and_reports_once() {
        let mut harness = harness(true);

        harness.app.start();
        harness.app.start();

        assert_eq!(harness.app.transactions().len(), 2);
        let infos = harness
            .alerts
            .borrow()
            .iter()
            .filter(|a| matches!(a, Alert::Info(_)))
            .count();
        assert_eq!(infos, 1);
    }

    #[test]
    fn add_success_notifies_by_kind() {
        let mut harness = harness(true);

        harness
            .app
            .add(TransactionDraft::new(
                "Café",
                4.5,
                "Alimentación",
                TransactionKind::Expense,
            ))
            .unwrap();

        assert_eq!(
            harness.alerts.borrow().last(),
            Some(&Alert::Success("Expense recorded".to_owned()))
        );
        assert_eq!(harness.app.transactions().len(), 1);
    }

    #[test]
    fn invalid_add_reports_every_message_and_writes_nothing() {
        let mut harness = harness(true);
        let draft = TransactionDraft {
            description: "ab".to_owned(),
            amount: -5.0,
            category: "".to_owned(),
            kind: None,
            date: None,
        };

        let result = harness.app.add(draft);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(harness.app.transactions().is_empty());
        let alerts = harness.alerts.borrow();
        assert_eq!(alerts.len(), 4);
        assert!(alerts.iter().all(|a| matches!(a, Alert::Error(_))));
    }

    #[test]
    fn edit_unknown_id_notifies_and_errors() {
        let mut harness = harness(true);
        harness.app.start();

        let result = harness.app.edit(
            999,
            TransactionDraft::new("Gimnasio", 30.0, "Salud", TransactionKind::Expense),
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
        assert!(matches!(
            harness.alerts.borrow().last(),
            Some(Alert::Error(_))
        ));
    }

    #[test]
    fn remove_asks_before_deleting() {
        let mut harness = harness(true);
        harness.app.start();

        harness.app.remove(2).unwrap();

        assert_eq!(harness.app.transactions().len(), 1);
        let asked = harness.asked.borrow();
        assert_eq!(asked.len(), 1);
        assert_eq!(asked[0], "Delete expense of $150.50 in Alimentación?");
    }

    #[test]
    fn declined_confirmation_deletes_nothing() {
        let mut harness = harness(false);
        harness.app.start();

        harness.app.remove(2).unwrap();

        assert_eq!(harness.app.transactions().len(), 2);
    }

    #[test]
    fn remove_unknown_id_is_quiet() {
        let mut harness = harness(true);
        harness.app.start();

        harness.app.remove(999).unwrap();

        assert!(harness.asked.borrow().is_empty());
        assert!(harness.alerts.borrow().iter().all(|a| !matches!(a, Alert::Success(_))));
    }

    #[test]
    fn summary_matches_the_aggregation_identity() {
        let mut harness = harness(true);
        harness.app.start();

        let summary = harness.app.summary();

        assert_eq!(summary.income, 2000.0);
        assert_eq!(summary.expenses, 150.5);
        assert_eq!(summary.net, summary.income - summary.expenses);
    }

    #[test]
    fn filters_persist_between_calls() {
        let mut harness = harness(true);
        harness.app.start();
        harness
            .app
            .add(
                TransactionDraft::new("Café", 4.5, "Alimentación", TransactionKind::Expense)
                    .date(date!(2024 - 01 - 10)),
            )
            .unwrap();

        let criteria = FilterCriteria {
            category: CategoryFilter::Only("Alimentación".to_owned()),
            ..Default::default()
        };
        harness.app.set_filters(&criteria);

        assert_eq!(harness.app.filters(), criteria);
        let visible = harness.app.visible_transactions();
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|t| t.category == "Alimentación"));
    }

    #[test]
    fn export_writes_and_reports() {
        let mut harness = harness(true);
        harness.app.start();
        let path = harness._dir.path().join("transacciones.csv");

        harness.app.export_csv(&path).unwrap();

        assert!(path.exists());
        assert!(matches!(
            harness.alerts.borrow().last(),
            Some(Alert::Success(_))
        ));
    }

    #[test]
    fn toggle_theme_persists_and_reports() {
        let mut harness = harness(true);

        assert_eq!(harness.app.toggle_theme(), Theme::Dark);
        assert_eq!(harness.app.theme(), Theme::Dark);
        assert_eq!(
            harness.alerts.borrow().last(),
            Some(&Alert::Success("Dark mode enabled".to_owned()))
        );

        assert_eq!(harness.app.toggle_theme(), Theme::Light);
        assert_eq!(harness.app.theme(), Theme::Light);
    }
}
