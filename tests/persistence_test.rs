mod common;

use anyhow::Result;
use common::{balance_of, file_names, funded_service, read_lines};
use std::fs;
use tempfile::TempDir;
use wallet_ledger::domain::PaymentStatus;
use wallet_ledger::io::{ExportSummary, ACCOUNTS_FILE, FAVORITES_FILE, PAYMENTS_FILE};
use wallet_ledger::{DumpError, LedgerService};

#[test]
fn test_export_import_roundtrip() -> Result<()> {
    let temp = TempDir::new()?;
    let (mut service, id) = funded_service("+123", 100)?;
    let payment = service.pay(id, 30, "Food")?;
    let favorite = service.favorite_payment(&payment.id, "Lunch")?;

    let summary = service.export(temp.path())?;
    assert_eq!(
        summary,
        ExportSummary {
            accounts: 1,
            payments: 1,
            favorites: 1,
        }
    );

    let mut restored = LedgerService::new();
    let imported = restored.import(temp.path())?;
    assert_eq!(imported.accounts_added, 1);
    assert_eq!(imported.accounts_updated, 0);

    assert_eq!(restored.accounts(), service.accounts());
    assert_eq!(balance_of(&restored, id)?, 70);
    assert_eq!(restored.payments(), &[payment.clone()]);
    assert_eq!(restored.favorites(), &[favorite.clone()]);

    // The restored ledger is fully usable
    let again = restored.pay_from_favorite(&favorite.id)?;
    assert_eq!(again.amount, 30);
    assert_eq!(balance_of(&restored, id)?, 40);

    Ok(())
}

#[test]
fn test_export_writes_dump_layout() -> Result<()> {
    let temp = TempDir::new()?;
    let (mut service, id) = funded_service("+123", 100)?;
    let payment = service.pay(id, 30, "Food")?;
    service.reject(&payment.id)?;
    let favorite = service.favorite_payment(&payment.id, "Lunch")?;

    service.export(temp.path())?;

    assert_eq!(
        read_lines(&temp.path().join(ACCOUNTS_FILE))?,
        vec!["1;+123;100"]
    );
    assert_eq!(
        read_lines(&temp.path().join(PAYMENTS_FILE))?,
        vec![format!("{};1;30;Food;FAIL", payment.id)]
    );
    assert_eq!(
        read_lines(&temp.path().join(FAVORITES_FILE))?,
        vec![format!("{};1;Lunch;30;Food", favorite.id)]
    );
    assert!(fs::read_to_string(temp.path().join(ACCOUNTS_FILE))?.ends_with('\n'));

    Ok(())
}

#[test]
fn test_export_of_empty_ledger_writes_nothing() -> Result<()> {
    let temp = TempDir::new()?;
    let service = LedgerService::new();

    let summary = service.export(temp.path())?;

    assert_eq!(summary, ExportSummary::default());
    assert!(file_names(temp.path())?.is_empty());
    Ok(())
}

#[test]
fn test_import_upserts_accounts_and_appends_the_rest() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join(ACCOUNTS_FILE), "1;+1;500\n4;+4;40\n")?;
    fs::write(
        temp.path().join(PAYMENTS_FILE),
        "p-1;1;10;food;INPROGRESS\np-2;4;5;auto;FAIL\n",
    )?;

    let (mut service, id) = funded_service("+1", 10)?;
    let payment = service.pay(id, 10, "food")?;

    let summary = service.import(temp.path())?;

    assert_eq!(summary.accounts_updated, 1);
    assert_eq!(summary.accounts_added, 1);
    assert_eq!(summary.payments, 2);
    assert_eq!(summary.favorites, 0);

    assert_eq!(service.accounts().len(), 2);
    assert_eq!(balance_of(&service, 1)?, 500);
    assert_eq!(balance_of(&service, 4)?, 40);

    // Payments are appended without dedup, after the existing one
    let ids: Vec<&str> = service.payments().iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![payment.id.as_str(), "p-1", "p-2"]);
    assert_eq!(service.payments()[2].status, PaymentStatus::Fail);

    Ok(())
}

#[test]
fn test_import_advances_account_counter() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join(ACCOUNTS_FILE), "3;+3;0\n7;+7;0\n5;+5;0\n")?;

    let mut service = LedgerService::new();
    service.import(temp.path())?;

    let account = service.register_account("+8")?;
    assert_eq!(account.id, 8);
    Ok(())
}

#[test]
fn test_import_twice_duplicates_payments() -> Result<()> {
    let temp = TempDir::new()?;
    let (mut service, id) = funded_service("+1", 100)?;
    service.pay(id, 10, "food")?;
    service.export(temp.path())?;

    let mut restored = LedgerService::new();
    restored.import(temp.path())?;
    restored.import(temp.path())?;

    assert_eq!(restored.accounts().len(), 1);
    assert_eq!(restored.payments().len(), 2);
    Ok(())
}

#[test]
fn test_import_rejects_malformed_lines() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join(ACCOUNTS_FILE), "1;+1;10\n2;+2\n")?;

    let mut service = LedgerService::new();
    let err = service.import(temp.path()).unwrap_err();

    assert!(matches!(
        err,
        DumpError::FieldCount {
            line: 2,
            expected: 3,
            found: 2,
            ..
        }
    ));
    assert!(service.accounts().is_empty());
    Ok(())
}

#[test]
fn test_import_rejects_blank_lines() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join(ACCOUNTS_FILE), "1;+1;10\n\n2;+2;20\n")?;

    let mut service = LedgerService::new();
    let err = service.import(temp.path()).unwrap_err();

    assert!(matches!(
        err,
        DumpError::FieldCount {
            line: 2,
            expected: 3,
            ..
        }
    ));
    assert!(service.accounts().is_empty());
    Ok(())
}

#[test]
fn test_single_file_import_rejects_empty_record() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("accounts.txt");
    fs::write(&path, "1;+1;10||2;+2;20|")?;

    let mut service = LedgerService::new();
    let err = service.import_from_file(&path).unwrap_err();

    assert!(matches!(err, DumpError::FieldCount { line: 2, .. }));
    assert!(service.accounts().is_empty());
    Ok(())
}

#[test]
fn test_import_rejects_non_numeric_ids() -> Result<()> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join(ACCOUNTS_FILE), "one;+1;10\n")?;

    let mut service = LedgerService::new();
    let err = service.import(temp.path()).unwrap_err();

    assert!(matches!(
        err,
        DumpError::InvalidNumber {
            field: "account id",
            ..
        }
    ));
    Ok(())
}

#[test]
fn test_single_file_roundtrip() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("accounts.txt");

    let mut service = LedgerService::new();
    let first = service.register_account("+123")?;
    service.deposit(first.id, 100)?;
    service.register_account("+456")?;

    assert_eq!(service.export_to_file(&path)?, 2);
    assert_eq!(fs::read_to_string(&path)?, "1;+123;100|2;+456;0|");

    let mut restored = LedgerService::new();
    assert_eq!(restored.import_from_file(&path)?, 2);
    assert_eq!(restored.accounts(), service.accounts());

    let next = restored.register_account("+789")?;
    assert_eq!(next.id, 3);

    Ok(())
}

#[test]
fn test_single_file_export_appends() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join("accounts.txt");
    fs::write(&path, "9;+9;9|")?;

    let (service, _) = funded_service("+1", 5)?;
    service.export_to_file(&path)?;

    assert_eq!(fs::read_to_string(&path)?, "9;+9;9|1;+1;5|");

    let mut restored = LedgerService::new();
    assert_eq!(restored.import_from_file(&path)?, 2);
    assert_eq!(restored.accounts()[0].id, 9);
    assert_eq!(restored.accounts()[1].id, 1);

    Ok(())
}
