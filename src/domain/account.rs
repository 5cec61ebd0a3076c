use serde::{Deserialize, Serialize};

use super::Money;

pub type AccountId = i64;

/// Phone numbers are stored verbatim; two accounts never share one.
pub type Phone = String;

/// A registered, phone-identified balance holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub phone: Phone,
    pub balance: Money,
}

impl Account {
    /// A freshly registered account starts with a zero balance.
    pub fn new(id: AccountId, phone: impl Into<Phone>) -> Self {
        Self {
            id,
            phone: phone.into(),
            balance: 0,
        }
    }

    pub fn with_balance(mut self, balance: Money) -> Self {
        self.balance = balance;
        self
    }

    pub fn can_afford(&self, amount: Money) -> bool {
        self.balance >= amount
    }
}
