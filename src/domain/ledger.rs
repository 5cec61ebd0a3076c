use super::{AccountId, Money, Payment};

/// Sum of the payments of an account that are still debited (not rejected).
///
/// For an account funded only through deposits this satisfies
/// `balance == deposited - outstanding_debits(..)`.
pub fn outstanding_debits(account_id: AccountId, payments: &[Payment]) -> Money {
    payments
        .iter()
        .filter(|p| p.account_id == account_id && !p.is_rejected())
        .map(|p| p.amount)
        .sum()
}

/// Payments of one account in insertion order.
pub fn payments_for_account(account_id: AccountId, payments: &[Payment]) -> Vec<Payment> {
    payments
        .iter()
        .filter(|p| p.account_id == account_id)
        .cloned()
        .collect()
}
