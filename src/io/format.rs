//! Record layout of the dump files.
//!
//! Fields are separated by `;` and written raw: there is no quoting or
//! escaping, so a field containing `;`, `|` or a newline corrupts the file.
//! The layout is kept byte-compatible with existing dumps.

use csv::{QuoteStyle, StringRecord, Terminator, WriterBuilder};
use std::io::Write;

use crate::domain::{Account, Favorite, Payment, PaymentStatus};

use super::DumpError;

pub const ACCOUNTS_FILE: &str = "accounts.dump";
pub const PAYMENTS_FILE: &str = "payments.dump";
pub const FAVORITES_FILE: &str = "favorites.dump";

const FIELD_DELIMITER: u8 = b';';
pub(crate) const PACKED_TERMINATOR: u8 = b'|';

/// Name of page `page` (1-based) of a multi-page history export.
pub fn history_page_name(page: usize) -> String {
    format!("payments{}.dump", page)
}

/// Writer for newline-terminated dumps.
pub(crate) fn line_writer<W: Write>(writer: W) -> csv::Writer<W> {
    writer_with_terminator(writer, b'\n')
}

/// Writer for the `|`-terminated accounts file.
pub(crate) fn packed_writer<W: Write>(writer: W) -> csv::Writer<W> {
    writer_with_terminator(writer, PACKED_TERMINATOR)
}

fn writer_with_terminator<W: Write>(writer: W, terminator: u8) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .terminator(Terminator::Any(terminator))
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(writer)
}

/// Split one dump line (or packed segment) into its fields.
///
/// Every line is a record: an empty line yields a single empty field, so it
/// fails the field-count check instead of being skipped.
pub(crate) fn split_record(line: &str) -> StringRecord {
    line.split(char::from(FIELD_DELIMITER)).collect()
}

// ========================
// Encoding
// ========================

pub(crate) fn account_record(account: &Account) -> [String; 3] {
    [
        account.id.to_string(),
        account.phone.clone(),
        account.balance.to_string(),
    ]
}

pub(crate) fn payment_record(payment: &Payment) -> [String; 5] {
    [
        payment.id.clone(),
        payment.account_id.to_string(),
        payment.amount.to_string(),
        payment.category.clone(),
        payment.status.as_str().to_string(),
    ]
}

pub(crate) fn favorite_record(favorite: &Favorite) -> [String; 5] {
    [
        favorite.id.clone(),
        favorite.account_id.to_string(),
        favorite.name.clone(),
        favorite.amount.to_string(),
        favorite.category.clone(),
    ]
}

// ========================
// Decoding
// ========================

/// Where a record came from, for error messages.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Origin<'a> {
    pub file: &'a str,
    pub line: u64,
}

impl Origin<'_> {
    fn expect_fields(&self, record: &StringRecord, expected: usize) -> Result<(), DumpError> {
        if record.len() != expected {
            return Err(DumpError::FieldCount {
                file: self.file.to_string(),
                line: self.line,
                expected,
                found: record.len(),
            });
        }
        Ok(())
    }

    fn number(&self, value: &str, field: &'static str) -> Result<i64, DumpError> {
        value.parse().map_err(|source| DumpError::InvalidNumber {
            file: self.file.to_string(),
            line: self.line,
            field,
            value: value.to_string(),
            source,
        })
    }

    fn status(&self, value: &str) -> Result<PaymentStatus, DumpError> {
        value.parse().map_err(|_| DumpError::InvalidStatus {
            file: self.file.to_string(),
            line: self.line,
            value: value.to_string(),
        })
    }
}

/// `id;phone;balance`
pub(crate) fn parse_account(record: &StringRecord, origin: Origin<'_>) -> Result<Account, DumpError> {
    origin.expect_fields(record, 3)?;
    let id = origin.number(&record[0], "account id")?;
    let balance = origin.number(&record[2], "balance")?;
    Ok(Account::new(id, &record[1]).with_balance(balance))
}

/// `id;accountID;amount;category;status`
pub(crate) fn parse_payment(record: &StringRecord, origin: Origin<'_>) -> Result<Payment, DumpError> {
    origin.expect_fields(record, 5)?;
    Ok(Payment {
        id: record[0].to_string(),
        account_id: origin.number(&record[1], "account id")?,
        amount: origin.number(&record[2], "amount")?,
        category: record[3].to_string(),
        status: origin.status(&record[4])?,
    })
}

/// `id;accountID;name;amount;category`
pub(crate) fn parse_favorite(
    record: &StringRecord,
    origin: Origin<'_>,
) -> Result<Favorite, DumpError> {
    origin.expect_fields(record, 5)?;
    Ok(Favorite {
        id: record[0].to_string(),
        account_id: origin.number(&record[1], "account id")?,
        name: record[2].to_string(),
        amount: origin.number(&record[3], "amount")?,
        category: record[4].to_string(),
    })
}
