// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::Path;
use wallet_ledger::domain::{AccountId, Money};
use wallet_ledger::LedgerService;

/// Helper to create a service with one registered account holding `balance`
pub fn funded_service(phone: &str, balance: Money) -> Result<(LedgerService, AccountId)> {
    let mut service = LedgerService::new();
    let account = service.register_account(phone)?;
    if balance > 0 {
        service.deposit(account.id, balance)?;
    }
    Ok((service, account.id))
}

/// Current balance of an account
pub fn balance_of(service: &LedgerService, account_id: AccountId) -> Result<Money> {
    Ok(service.find_account_by_id(account_id)?.balance)
}

/// Lines of a dump file, without the trailing empty one
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::to_string)
        .collect())
}

/// Sorted file names of a directory
pub fn file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| -> Result<String> { Ok(entry?.file_name().to_string_lossy().into_owned()) })
        .collect::<Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
