use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{AccountId, Money};

pub type PaymentId = String;

/// Free-form category tag, e.g. "food" or "auto".
pub type PaymentCategory = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Settled against the account and not rejected
    #[serde(rename = "INPROGRESS")]
    InProgress,
    /// Rejected; the amount has been credited back
    #[serde(rename = "FAIL")]
    Fail,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::InProgress => "INPROGRESS",
            PaymentStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown payment status '{}'", self.0)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for PaymentStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INPROGRESS" => Ok(PaymentStatus::InProgress),
            "FAIL" => Ok(PaymentStatus::Fail),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// A single debit against an account.
///
/// Payments are never deleted. Rejection flips the status in place; repeating
/// a payment records a brand-new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub account_id: AccountId,
    /// Always positive for payments created by the ledger
    pub amount: Money,
    pub category: PaymentCategory,
    pub status: PaymentStatus,
}

impl Payment {
    /// Create an in-progress payment under a fresh identifier.
    pub fn new(
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            category: category.into(),
            status: PaymentStatus::InProgress,
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.status == PaymentStatus::Fail
    }
}
