use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use tracing::info;

use crate::domain::{Account, Favorite, Payment};
use crate::storage::LedgerStore;

use super::format::{
    parse_account, parse_favorite, parse_payment, split_record, Origin, ACCOUNTS_FILE,
    FAVORITES_FILE, PACKED_TERMINATOR, PAYMENTS_FILE,
};
use super::DumpError;

/// Result of a directory import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub accounts_added: usize,
    pub accounts_updated: usize,
    pub payments: usize,
    pub favorites: usize,
}

/// Importer for loading dump files into the store.
///
/// Files are parsed completely before the store is touched, so a malformed
/// record leaves the store as it was.
pub struct Importer<'a> {
    store: &'a mut LedgerStore,
}

impl<'a> Importer<'a> {
    pub fn new(store: &'a mut LedgerStore) -> Self {
        Self { store }
    }

    /// Append the accounts of a `|`-packed file.
    ///
    /// Whatever follows the last `|` is ignored, which drops a record cut off
    /// by an interrupted write. Accounts are appended without checking for
    /// duplicates; the ID counter is advanced past every imported ID.
    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, DumpError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        let name = path.display().to_string();

        let mut segments: Vec<&str> = data.split(char::from(PACKED_TERMINATOR)).collect();
        // Either empty (the file ends with `|`) or a record cut off mid-write
        segments.pop();

        let accounts = segments
            .into_iter()
            .enumerate()
            .map(|(index, segment)| {
                let line = index as u64 + 1;
                parse_account(&split_record(segment), Origin { file: &name, line })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = accounts.len();
        for account in accounts {
            self.store.push_account(account);
        }

        info!(path = %name, accounts = count, "accounts imported");
        Ok(count)
    }

    /// Load `accounts.dump`, `payments.dump` and `favorites.dump` from `dir`.
    ///
    /// Missing files are skipped. Accounts are matched by ID: a known account
    /// gets its balance overwritten, an unknown one is appended. Payments and
    /// favorites are always appended.
    pub fn import_dir(&mut self, dir: impl AsRef<Path>) -> Result<ImportSummary, DumpError> {
        let dir = dir.as_ref();

        let accounts: Vec<Account> = read_dump(dir, ACCOUNTS_FILE, parse_account)?;
        let payments: Vec<Payment> = read_dump(dir, PAYMENTS_FILE, parse_payment)?;
        let favorites: Vec<Favorite> = read_dump(dir, FAVORITES_FILE, parse_favorite)?;

        let mut summary = ImportSummary {
            payments: payments.len(),
            favorites: favorites.len(),
            ..ImportSummary::default()
        };

        for account in accounts {
            if self
                .store
                .upsert_account(account.id, account.phone, account.balance)
            {
                summary.accounts_updated += 1;
            } else {
                summary.accounts_added += 1;
            }
        }
        for payment in payments {
            self.store.push_payment(payment);
        }
        for favorite in favorites {
            self.store.push_favorite(favorite);
        }

        info!(
            dir = %dir.display(),
            accounts_added = summary.accounts_added,
            accounts_updated = summary.accounts_updated,
            payments = summary.payments,
            favorites = summary.favorites,
            "ledger imported"
        );
        Ok(summary)
    }
}

/// Parse every line of `dir/file`; a missing file yields no records.
fn read_dump<T, F>(dir: &Path, file: &str, parse: F) -> Result<Vec<T>, DumpError>
where
    F: Fn(&csv::StringRecord, Origin<'_>) -> Result<T, DumpError>,
{
    let Some(dump) = open_optional(&dir.join(file))? else {
        return Ok(Vec::new());
    };

    let mut items = Vec::new();
    for (index, line) in BufReader::new(dump).lines().enumerate() {
        let line_text = line?;
        let origin = Origin {
            file,
            line: index as u64 + 1,
        };
        items.push(parse(&split_record(&line_text), origin)?);
    }
    Ok(items)
}

fn open_optional(path: &Path) -> Result<Option<File>, DumpError> {
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
