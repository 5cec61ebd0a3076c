use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::LedgerService;
use crate::domain::{AccountId, Favorite, Money, Payment};

/// Wallet - accounts, payments and favorites kept in flat dump files
#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "An in-process wallet ledger backed by flat dump files")]
#[command(version)]
pub struct Cli {
    /// Directory holding accounts.dump, payments.dump and favorites.dump
    #[arg(short, long, env = "WALLET_DATA_DIR", default_value = "wallet-data")]
    pub data_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new account for a phone number
    Register {
        /// Phone number (must not be registered yet)
        phone: String,
    },

    /// Add money to an account
    Deposit {
        account: AccountId,
        #[arg(allow_negative_numbers = true)]
        amount: Money,
    },

    /// Pay from an account
    Pay {
        account: AccountId,
        #[arg(allow_negative_numbers = true)]
        amount: Money,
        /// Category tag (e.g., "food", "auto")
        category: String,
    },

    /// Show an account
    Account { id: AccountId },

    /// Show a payment
    Payment { id: String },

    /// Reject a payment and credit its amount back
    Reject { payment: String },

    /// Pay again with the amount and category of an earlier payment
    Repeat { payment: String },

    /// Save a payment as a named favorite
    Favorite {
        payment: String,
        /// Label for the favorite
        name: String,
    },

    /// Pay using a favorite
    PayFavorite { favorite: String },

    /// List the payments of an account
    History {
        account: AccountId,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write the history as paged payments dumps into this directory
        #[arg(long)]
        out: Option<PathBuf>,

        /// Payments per page when writing with --out
        #[arg(long, default_value_t = 100)]
        records: usize,
    },

    /// Append all accounts to a single '|'-separated file
    ExportAccounts { file: PathBuf },

    /// Append the accounts of a single '|'-separated file
    ImportAccounts { file: PathBuf },

    /// Run the demonstration flow against an empty in-memory ledger
    Demo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        if matches!(self.command, Commands::Demo) {
            return run_demo();
        }

        let mut service = load_ledger(&self.data_dir)?;
        let changed = run_command(&mut service, self.command)?;
        if changed {
            save_ledger(&service, &self.data_dir)?;
        }
        Ok(())
    }
}

fn load_ledger(data_dir: &Path) -> Result<LedgerService> {
    let mut service = LedgerService::new();
    if data_dir.is_dir() {
        service
            .import(data_dir)
            .with_context(|| format!("Failed to load ledger from {}", data_dir.display()))?;
    }
    Ok(service)
}

fn save_ledger(service: &LedgerService, data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    service
        .export(data_dir)
        .with_context(|| format!("Failed to save ledger to {}", data_dir.display()))?;
    Ok(())
}

/// Run one command. Returns true when the ledger was modified.
fn run_command(service: &mut LedgerService, command: Commands) -> Result<bool> {
    match command {
        Commands::Register { phone } => {
            let account = service.register_account(phone)?;
            println!("Registered account {} ({})", account.id, account.phone);
            Ok(true)
        }

        Commands::Deposit { account, amount } => {
            service.deposit(account, amount)?;
            let balance = service.find_account_by_id(account)?.balance;
            println!("Deposited {} to account {} (balance {})", amount, account, balance);
            Ok(true)
        }

        Commands::Pay {
            account,
            amount,
            category,
        } => {
            let payment = service.pay(account, amount, category)?;
            print_payment_created("Paid", &payment);
            Ok(true)
        }

        Commands::Account { id } => {
            let summary = service.account_summary(id)?;
            println!("Account: {}", summary.account.id);
            println!("  Phone:        {}", summary.account.phone);
            println!("  Balance:      {}", summary.account.balance);
            println!("  Payments:     {}", summary.payment_count);
            println!("  Outstanding:  {}", summary.outstanding);
            Ok(false)
        }

        Commands::Payment { id } => {
            let payment = service.find_payment_by_id(&id)?;
            println!("Payment: {}", payment.id);
            println!("  Account:   {}", payment.account_id);
            println!("  Amount:    {}", payment.amount);
            println!("  Category:  {}", payment.category);
            println!("  Status:    {}", payment.status);
            Ok(false)
        }

        Commands::Reject { payment } => {
            service.reject(&payment)?;
            let rejected = service.find_payment_by_id(&payment)?;
            println!(
                "Rejected payment {} ({} credited back to account {})",
                rejected.id, rejected.amount, rejected.account_id
            );
            Ok(true)
        }

        Commands::Repeat { payment } => {
            let repeated = service.repeat(&payment)?;
            print_payment_created("Repeated", &repeated);
            Ok(true)
        }

        Commands::Favorite { payment, name } => {
            let favorite = service.favorite_payment(&payment, name)?;
            print_favorite(&favorite);
            Ok(true)
        }

        Commands::PayFavorite { favorite } => {
            let payment = service.pay_from_favorite(&favorite)?;
            print_payment_created("Paid from favorite", &payment);
            Ok(true)
        }

        Commands::History {
            account,
            format,
            out,
            records,
        } => {
            let history = service.account_history(account)?;
            match out {
                Some(dir) => {
                    fs::create_dir_all(&dir).with_context(|| {
                        format!("Failed to create output directory: {}", dir.display())
                    })?;
                    let written = service.history_to_files(&history, &dir, records)?;
                    eprintln!("Exported {} payments to {} file(s)", history.len(), written.len());
                    for path in written {
                        println!("{}", path.display());
                    }
                }
                None => print_history(&history, format)?,
            }
            Ok(false)
        }

        Commands::ExportAccounts { file } => {
            let count = service
                .export_to_file(&file)
                .with_context(|| format!("Failed to export accounts to {}", file.display()))?;
            eprintln!("Exported {} accounts", count);
            Ok(false)
        }

        Commands::ImportAccounts { file } => {
            let count = service
                .import_from_file(&file)
                .with_context(|| format!("Failed to import accounts from {}", file.display()))?;
            eprintln!("Imported {} accounts", count);
            Ok(count > 0)
        }

        Commands::Demo => run_demo().map(|_| false),
    }
}

fn print_payment_created(verb: &str, payment: &Payment) {
    println!(
        "{}: {} from account {} [{}] ({})",
        verb, payment.amount, payment.account_id, payment.category, payment.id
    );
}

fn print_favorite(favorite: &Favorite) {
    println!(
        "Favorite '{}': {} [{}] for account {} ({})",
        favorite.name, favorite.amount, favorite.category, favorite.account_id, favorite.id
    );
}

fn print_history(history: &[Payment], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(history)?);
        }
        OutputFormat::Table => {
            if history.is_empty() {
                println!("No payments found.");
                return Ok(());
            }
            println!(
                "{:<36} {:>10} {:<15} {:<10}",
                "ID", "AMOUNT", "CATEGORY", "STATUS"
            );
            println!("{}", "-".repeat(74));
            for payment in history {
                println!(
                    "{:<36} {:>10} {:<15} {:<10}",
                    payment.id,
                    payment.amount,
                    truncate(&payment.category, 15),
                    payment.status
                );
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Register, fund, pay, reject, repeat and pay from a favorite, printing
/// the ledger state after each step.
fn run_demo() -> Result<()> {
    let mut service = LedgerService::new();

    let account = service.register_account("+992918246924")?;
    println!("Registered account: {:?}", account);

    service.deposit(account.id, 10)?;
    println!("After deposit: {:?}", service.find_account_by_id(account.id)?);

    let payment = service.pay(account.id, 5, "food")?;
    println!("Payment: {:?}", payment);
    println!(
        "Balance after payment: {}",
        service.find_account_by_id(account.id)?.balance
    );

    println!("Found payment: {:?}", service.find_payment_by_id(&payment.id)?);

    service.reject(&payment.id)?;
    println!(
        "Account after rejection: {:?}",
        service.find_account_by_id(account.id)?
    );
    println!(
        "Payment after rejection: {:?}",
        service.find_payment_by_id(&payment.id)?
    );

    let repeated = service.repeat(&payment.id)?;
    println!("Repeated payment: {:?}", repeated);

    let favorite = service.favorite_payment(&payment.id, "FooD")?;
    println!("Favorite added: {:?}", favorite);

    let from_favorite = service.pay_from_favorite(&favorite.id)?;
    println!("Paid from favorite: {:?}", from_favorite);
    println!(
        "Final balance: {}",
        service.find_account_by_id(account.id)?.balance
    );

    Ok(())
}
