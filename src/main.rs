//! The terminal front end: maps CLI subcommands onto the command layer and
//! renders the results.

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{
    Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use monedero::{
    App, Error, LocalStorage, Theme, Transaction, TransactionDraft, TransactionKind,
    TransactionStore,
    aggregation::net_balance,
    alert::{Alert, AlertSink, ConfirmationPrompt},
    category::known_categories,
    clock::SystemClock,
    currency::{format_currency, format_signed_currency},
    filter::{CategoryFilter, FilterCriteria, KindFilter, MonthFilter},
    transaction::parse_input_date,
};

/// A personal finance tracker for the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the data files. Defaults to the platform data
    /// directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction.
    Add {
        /// What the transaction was for, at least 3 characters.
        #[arg(long)]
        description: String,
        /// The amount of money, positive.
        #[arg(long)]
        amount: f64,
        /// The category, e.g. "Alimentación". See `categories`.
        #[arg(long)]
        category: String,
        /// income or expense.
        #[arg(long)]
        kind: TransactionKind,
        /// The date as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Replace the fields of an existing transaction.
    Edit {
        /// The ID of the transaction to edit.
        id: i64,
        /// What the transaction was for, at least 3 characters.
        #[arg(long)]
        description: String,
        /// The amount of money, positive.
        #[arg(long)]
        amount: f64,
        /// The category, e.g. "Alimentación". See `categories`.
        #[arg(long)]
        category: String,
        /// income or expense.
        #[arg(long)]
        kind: TransactionKind,
        /// The date as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a transaction after confirmation.
    Delete {
        /// The ID of the transaction to delete.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show the transactions matching the active filters.
    ///
    /// Any filter flag given here replaces that part of the saved criteria
    /// and is remembered for the next run.
    List {
        /// all, income, or expense.
        #[arg(long)]
        kind: Option<String>,
        /// all, or an exact category name.
        #[arg(long)]
        category: Option<String>,
        /// all, or a month number 1-12.
        #[arg(long)]
        month: Option<String>,
    },
    /// Show income, expense, and net balance totals.
    Summary,
    /// List the known categories.
    Categories,
    /// Export all transactions as CSV.
    Export {
        /// The file to write.
        #[arg(long, default_value = "transacciones.csv")]
        out: PathBuf,
    },
    /// Render the category and monthly charts as HTML files.
    Charts {
        /// The directory to write the HTML files into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Show or change the display theme.
    Theme {
        /// What to switch to. Omit to show the current theme.
        mode: Option<ThemeMode>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

/// Prints alerts as emoji-prefixed terminal lines.
struct TerminalAlerts;

impl AlertSink for TerminalAlerts {
    fn notify(&mut self, alert: Alert) {
        match alert {
            Alert::Success(message) => println!("✅ {message}"),
            Alert::Error(message) => eprintln!("❌ {message}"),
            Alert::Warning(message) => eprintln!("⚠️ {message}"),
            Alert::Info(message) => println!("ℹ️ {message}"),
        }
    }
}

/// Asks yes/no questions on the terminal. Anything but y/yes declines.
struct TerminalPrompt;

impl ConfirmationPrompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Confirms everything, for `--yes`.
struct AssumeYes;

impl ConfirmationPrompt for AssumeYes {
    fn confirm(&mut self, _: &str) -> bool {
        true
    }
}

fn main() -> ExitCode {
    setup_logging();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!("command failed: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    tracing::debug!("using data directory {}", data_dir.display());

    let storage = LocalStorage::open(&data_dir).inspect_err(report_error)?;
    let mut store = TransactionStore::open(storage.clone(), Box::new(SystemClock));
    store.subscribe(|transactions| {
        tracing::debug!("store changed, now {} transactions", transactions.len());
    });

    let prompt: Box<dyn ConfirmationPrompt> = match cli.command {
        Command::Delete { yes: true, .. } => Box::new(AssumeYes),
        _ => Box::new(TerminalPrompt),
    };

    let mut app = App::new(store, storage, Box::new(TerminalAlerts), prompt);
    app.start();

    match cli.command {
        Command::Add {
            description,
            amount,
            category,
            kind,
            date,
        } => {
            let draft = build_draft(&description, amount, &category, kind, date.as_deref())
                .inspect_err(report_error)?;
            app.add(draft)
        }
        Command::Edit {
            id,
            description,
            amount,
            category,
            kind,
            date,
        } => {
            let draft = build_draft(&description, amount, &category, kind, date.as_deref())
                .inspect_err(report_error)?;
            app.edit(id, draft)
        }
        Command::Delete { id, .. } => app.remove(id),
        Command::List {
            kind,
            category,
            month,
        } => {
            let criteria = merge_criteria(app.filters(), kind, category, month)
                .inspect_err(report_error)?;
            app.set_filters(&criteria);
            print_transactions(&app.visible_transactions());
            Ok(())
        }
        Command::Summary => {
            let summary = app.summary();
            println!("Income:   {}", format_currency(summary.income));
            println!("Expenses: {}", format_currency(summary.expenses));
            println!("Balance:  {}", format_currency(summary.net));
            Ok(())
        }
        Command::Categories => {
            for category in known_categories(&app.transactions()) {
                println!("{category}");
            }
            Ok(())
        }
        Command::Export { out } => app.export_csv(out),
        Command::Charts { out_dir } => app.render_charts(out_dir).map(|_| ()),
        Command::Theme { mode } => {
            match mode {
                None => println!("{}", app.theme().as_str()),
                Some(ThemeMode::Light) => app.set_theme(Theme::Light),
                Some(ThemeMode::Dark) => app.set_theme(Theme::Dark),
                Some(ThemeMode::Toggle) => {
                    app.toggle_theme();
                }
            }
            Ok(())
        }
    }
}

/// Report errors raised before they reach the command layer's alert sink.
fn report_error(error: &Error) {
    TerminalAlerts.notify(Alert::Error(error.to_string()));
}

fn build_draft(
    description: &str,
    amount: f64,
    category: &str,
    kind: TransactionKind,
    date: Option<&str>,
) -> Result<TransactionDraft, Error> {
    let mut draft = TransactionDraft::new(description, amount, category, kind);

    if let Some(text) = date {
        draft = draft.date(parse_input_date(text)?);
    }

    Ok(draft)
}

/// Overlay the provided filter flags onto the saved criteria. A flag that
/// is not given leaves the saved value in place, mirroring how the original
/// filter selectors kept their positions.
fn merge_criteria(
    saved: FilterCriteria,
    kind: Option<String>,
    category: Option<String>,
    month: Option<String>,
) -> Result<FilterCriteria, Error> {
    let mut criteria = saved;

    if let Some(kind) = kind {
        criteria.kind = match kind.trim().to_lowercase().as_str() {
            "all" | "todos" => KindFilter::All,
            other => KindFilter::Only(other.parse()?),
        };
    }

    if let Some(category) = category {
        criteria.category = match category.trim() {
            "all" | "todas" => CategoryFilter::All,
            other => CategoryFilter::Only(other.to_owned()),
        };
    }

    if let Some(month) = month {
        criteria.month = match month.trim().to_lowercase().as_str() {
            "all" | "todos" => MonthFilter::All,
            other => {
                let number: u8 = other.parse().map_err(|_| invalid_month(other))?;
                let month = time::Month::try_from(number).map_err(|_| invalid_month(other))?;
                MonthFilter::Only(month)
            }
        };
    }

    Ok(criteria)
}

fn invalid_month(text: &str) -> Error {
    Error::InvalidInput(vec![format!(
        "\"{text}\" is not a month, expected a number from 1 to 12 or \"all\""
    )])
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions");
        return;
    }

    println!(
        "{:<16} {:<12} {:<28} {:>14}  {:<16} {:<8}",
        "ID", "Date", "Description", "Amount", "Category", "Kind"
    );

    for transaction in transactions {
        println!(
            "{:<16} {:<12} {:<28} {:>14}  {:<16} {:<8}",
            transaction.id,
            transaction.display_date(),
            transaction.description,
            format_signed_currency(transaction.signed_amount()),
            transaction.category,
            transaction.kind.label(),
        );
    }

    println!("Total: {}", format_signed_currency(net_balance(transactions)));
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("monedero")
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_filter(filter),
        )
        .init();
}
