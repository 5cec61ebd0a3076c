use thiserror::Error;

use crate::domain::{AccountId, Money};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Phone already registered: {0}")]
    PhoneAlreadyRegistered(String),

    #[error("Amount must be positive, got {0}")]
    AmountMustBePositive(Money),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Not enough balance in account {account_id}: balance {balance}, required {required}")]
    NotEnoughBalance {
        account_id: AccountId,
        balance: Money,
        required: Money,
    },

    #[error("Balance of account {account_id} would overflow: balance {balance}, adding {amount}")]
    BalanceOverflow {
        account_id: AccountId,
        balance: Money,
        amount: Money,
    },

    #[error("Favorite not found: {0}")]
    FavoriteNotFound(String),

    #[error("Payment already rejected: {0}")]
    PaymentAlreadyRejected(String),
}
