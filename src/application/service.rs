use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{
    is_positive, outstanding_debits, payments_for_account, Account, AccountId, Favorite, Money,
    Payment, PaymentCategory, PaymentStatus, Phone,
};
use crate::io::{DumpError, ExportSummary, Exporter, ImportSummary, Importer};
use crate::storage::LedgerStore;

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, tests, embedding code).
///
/// Mutating operations take `&mut self`; the service owns its store, so a
/// caller that needs to share it across threads has to wrap it in a lock.
#[derive(Debug, Default)]
pub struct LedgerService {
    store: LedgerStore,
}

/// Per-account view used by the CLI `account` command.
pub struct AccountSummary {
    pub account: Account,
    pub payment_count: usize,
    pub outstanding: Money,
}

impl LedgerService {
    /// Create a service with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service over an existing store.
    pub fn with_store(store: LedgerStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn accounts(&self) -> &[Account] {
        self.store.accounts()
    }

    pub fn payments(&self) -> &[Payment] {
        self.store.payments()
    }

    pub fn favorites(&self) -> &[Favorite] {
        self.store.favorites()
    }

    // ========================
    // Registration & funding
    // ========================

    /// Register a new account under a phone number that is not taken yet.
    pub fn register_account(&mut self, phone: impl Into<Phone>) -> Result<Account, AppError> {
        let phone = phone.into();
        if self.store.account_by_phone(&phone).is_some() {
            return Err(AppError::PhoneAlreadyRegistered(phone));
        }

        let id = self.store.allocate_account_id();
        let account = Account::new(id, phone);
        self.store.push_account(account.clone());

        debug!(account_id = id, "account registered");
        Ok(account)
    }

    /// Add money to an account. There is no upper bound other than the range
    /// of `Money`; a deposit that would overflow it is refused.
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<(), AppError> {
        if !is_positive(amount) {
            return Err(AppError::AmountMustBePositive(amount));
        }

        let account = self
            .store
            .account_mut(account_id)
            .ok_or(AppError::AccountNotFound(account_id))?;
        account.balance = credited(account, amount)?;

        debug!(account_id, amount, balance = account.balance, "deposit applied");
        Ok(())
    }

    // ========================
    // Payments
    // ========================

    /// Debit an account and record an in-progress payment.
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> Result<Payment, AppError> {
        if !is_positive(amount) {
            return Err(AppError::AmountMustBePositive(amount));
        }
        self.debit_and_record(account_id, amount, category.into())
    }

    /// Shared tail of `pay` and `pay_from_favorite`:
    /// account lookup, balance check, debit, append.
    fn debit_and_record(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: PaymentCategory,
    ) -> Result<Payment, AppError> {
        let account = self
            .store
            .account_mut(account_id)
            .ok_or(AppError::AccountNotFound(account_id))?;

        if !account.can_afford(amount) {
            return Err(AppError::NotEnoughBalance {
                account_id,
                balance: account.balance,
                required: amount,
            });
        }
        account.balance -= amount;

        let payment = Payment::new(account_id, amount, category);
        self.store.push_payment(payment.clone());

        debug!(
            account_id,
            payment_id = %payment.id,
            amount,
            category = %payment.category,
            "payment recorded"
        );
        Ok(payment)
    }

    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<&Account, AppError> {
        self.store
            .account(account_id)
            .ok_or(AppError::AccountNotFound(account_id))
    }

    pub fn find_payment_by_id(&self, payment_id: &str) -> Result<&Payment, AppError> {
        self.store
            .payment(payment_id)
            .ok_or_else(|| AppError::PaymentNotFound(payment_id.to_string()))
    }

    /// Credit a payment back to its account and mark it failed.
    ///
    /// A payment can be rejected once; a second attempt fails with
    /// `PaymentAlreadyRejected` and leaves the balance alone.
    pub fn reject(&mut self, payment_id: &str) -> Result<(), AppError> {
        let payment = self.find_payment_by_id(payment_id)?;
        if payment.is_rejected() {
            return Err(AppError::PaymentAlreadyRejected(payment_id.to_string()));
        }
        let (account_id, amount) = (payment.account_id, payment.amount);

        let account = self
            .store
            .account_mut(account_id)
            .ok_or(AppError::AccountNotFound(account_id))?;
        account.balance = credited(account, amount)?;

        if let Some(payment) = self.store.payment_mut(payment_id) {
            payment.status = PaymentStatus::Fail;
        }

        debug!(account_id, payment_id, amount, "payment rejected");
        Ok(())
    }

    /// Record a new payment with the amount and category of an earlier one.
    pub fn repeat(&mut self, payment_id: &str) -> Result<Payment, AppError> {
        let payment = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) =
            (payment.account_id, payment.amount, payment.category.clone());
        let account_id = self.find_account_by_id(account_id)?.id;

        self.pay(account_id, amount, category)
    }

    // ========================
    // Favorites
    // ========================

    /// Save a payment's account, amount and category as a named template.
    pub fn favorite_payment(
        &mut self,
        payment_id: &str,
        name: impl Into<String>,
    ) -> Result<Favorite, AppError> {
        let favorite = Favorite::from_payment(self.find_payment_by_id(payment_id)?, name);
        self.store.push_favorite(favorite.clone());

        debug!(favorite_id = %favorite.id, payment_id, "favorite created");
        Ok(favorite)
    }

    pub fn find_favorite_by_id(&self, favorite_id: &str) -> Result<&Favorite, AppError> {
        self.store
            .favorite(favorite_id)
            .ok_or_else(|| AppError::FavoriteNotFound(favorite_id.to_string()))
    }

    /// Pay the stored amount of a favorite from its account.
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<Payment, AppError> {
        let favorite = self.find_favorite_by_id(favorite_id)?;
        let (account_id, amount, category) =
            (favorite.account_id, favorite.amount, favorite.category.clone());

        // Imported favorites are not validated, so guard the debit here.
        if !is_positive(amount) {
            return Err(AppError::AmountMustBePositive(amount));
        }
        self.debit_and_record(account_id, amount, category)
    }

    // ========================
    // History
    // ========================

    /// All payments of an account in the order they were recorded.
    pub fn account_history(&self, account_id: AccountId) -> Result<Vec<Payment>, AppError> {
        let account = self.find_account_by_id(account_id)?;
        Ok(payments_for_account(account.id, self.store.payments()))
    }

    pub fn account_summary(&self, account_id: AccountId) -> Result<AccountSummary, AppError> {
        let account = self.find_account_by_id(account_id)?.clone();
        let payments = self.store.payments();
        Ok(AccountSummary {
            payment_count: payments.iter().filter(|p| p.account_id == account_id).count(),
            outstanding: outstanding_debits(account_id, payments),
            account,
        })
    }

    // ========================
    // Persistence
    // ========================

    /// Append all accounts to a single `|`-separated file.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<usize, DumpError> {
        Exporter::new(&self.store).export_to_file(path)
    }

    /// Append the accounts of a single `|`-separated file.
    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, DumpError> {
        Importer::new(&mut self.store).import_from_file(path)
    }

    /// Write the non-empty collections as `*.dump` files into `dir`.
    pub fn export(&self, dir: impl AsRef<Path>) -> Result<ExportSummary, DumpError> {
        Exporter::new(&self.store).export_dir(dir)
    }

    /// Merge whatever `*.dump` files exist in `dir` into the store.
    pub fn import(&mut self, dir: impl AsRef<Path>) -> Result<ImportSummary, DumpError> {
        Importer::new(&mut self.store).import_dir(dir)
    }

    /// Write `payments` into pages of at most `records` lines.
    pub fn history_to_files(
        &self,
        payments: &[Payment],
        dir: impl AsRef<Path>,
        records: usize,
    ) -> Result<Vec<PathBuf>, DumpError> {
        Exporter::new(&self.store).history_to_files(payments, dir, records)
    }
}

/// Balance of `account` after adding `amount`, or `BalanceOverflow`.
fn credited(account: &Account, amount: Money) -> Result<Money, AppError> {
    account
        .balance
        .checked_add(amount)
        .ok_or(AppError::BalanceOverflow {
            account_id: account.id,
            balance: account.balance,
            amount,
        })
}
