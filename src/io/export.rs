use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

use crate::domain::Payment;
use crate::storage::LedgerStore;

use super::format::{
    account_record, favorite_record, history_page_name, line_writer, packed_writer,
    payment_record, ACCOUNTS_FILE, FAVORITES_FILE, PAYMENTS_FILE,
};
use super::DumpError;

/// Number of records written per collection by a directory export.
/// A zero count means the file was not touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub accounts: usize,
    pub payments: usize,
    pub favorites: usize,
}

/// Exporter for writing ledger contents to dump files
pub struct Exporter<'a> {
    store: &'a LedgerStore,
}

impl<'a> Exporter<'a> {
    pub fn new(store: &'a LedgerStore) -> Self {
        Self { store }
    }

    /// Append every account as `id;phone;balance|` to `path`, creating the
    /// file if needed. Existing content is kept.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<usize, DumpError> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = packed_writer(file);

        for account in self.store.accounts() {
            writer.write_record(account_record(account))?;
        }
        writer.flush()?;

        let count = self.store.accounts().len();
        info!(path = %path.display(), accounts = count, "accounts appended");
        Ok(count)
    }

    /// Write `accounts.dump`, `payments.dump` and `favorites.dump` into `dir`.
    ///
    /// A file is only written when its collection is non-empty; each written
    /// file atomically replaces the previous one.
    pub fn export_dir(&self, dir: impl AsRef<Path>) -> Result<ExportSummary, DumpError> {
        let dir = dir.as_ref();
        let mut summary = ExportSummary::default();

        let accounts = self.store.accounts();
        if !accounts.is_empty() {
            replace_file(&dir.join(ACCOUNTS_FILE), |writer| {
                for account in accounts {
                    writer.write_record(account_record(account))?;
                }
                Ok(())
            })?;
            summary.accounts = accounts.len();
        }

        let payments = self.store.payments();
        if !payments.is_empty() {
            write_payments(&dir.join(PAYMENTS_FILE), payments)?;
            summary.payments = payments.len();
        }

        let favorites = self.store.favorites();
        if !favorites.is_empty() {
            replace_file(&dir.join(FAVORITES_FILE), |writer| {
                for favorite in favorites {
                    writer.write_record(favorite_record(favorite))?;
                }
                Ok(())
            })?;
            summary.favorites = favorites.len();
        }

        info!(
            dir = %dir.display(),
            accounts = summary.accounts,
            payments = summary.payments,
            favorites = summary.favorites,
            "ledger exported"
        );
        Ok(summary)
    }

    /// Split `payments` into pages of at most `records` lines.
    ///
    /// Pages are named `payments1.dump`, `payments2.dump`, ...; when everything
    /// fits in one page the file is called `payments.dump`. An empty slice
    /// writes nothing. Returns the written paths in page order.
    pub fn history_to_files(
        &self,
        payments: &[Payment],
        dir: impl AsRef<Path>,
        records: usize,
    ) -> Result<Vec<PathBuf>, DumpError> {
        if records == 0 {
            return Err(DumpError::InvalidPageSize);
        }

        let dir = dir.as_ref();
        let single_page = payments.len() <= records;
        let mut written = Vec::new();

        for (index, page) in payments.chunks(records).enumerate() {
            let path = if single_page {
                dir.join(PAYMENTS_FILE)
            } else {
                dir.join(history_page_name(index + 1))
            };
            write_payments(&path, page)?;
            written.push(path);
        }

        info!(
            dir = %dir.display(),
            payments = payments.len(),
            files = written.len(),
            "payment history exported"
        );
        Ok(written)
    }
}

fn write_payments(path: &Path, payments: &[Payment]) -> Result<(), DumpError> {
    replace_file(path, |writer| {
        for payment in payments {
            writer.write_record(payment_record(payment))?;
        }
        Ok(())
    })
}

/// Write a newline-terminated dump next to `path`, then rename it into place.
fn replace_file<F>(path: &Path, fill: F) -> Result<(), DumpError>
where
    F: FnOnce(&mut csv::Writer<&mut File>) -> Result<(), DumpError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = line_writer(temp.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
