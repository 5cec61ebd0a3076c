use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AccountId, Money, Payment, PaymentCategory};

pub type FavoriteId = String;

/// A named template derived from a past payment.
///
/// Amount and category are copied when the favorite is created, so later
/// changes to the source payment (e.g. a rejection) do not affect it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub account_id: AccountId,
    pub name: String,
    pub amount: Money,
    pub category: PaymentCategory,
}

impl Favorite {
    pub fn from_payment(payment: &Payment, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: payment.account_id,
            name: name.into(),
            amount: payment.amount,
            category: payment.category.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favorite_snapshots_payment() {
        let payment = Payment::new(3, 500, "mobile");
        let favorite = Favorite::from_payment(&payment, "Phone bill");

        assert_eq!(favorite.account_id, 3);
        assert_eq!(favorite.name, "Phone bill");
        assert_eq!(favorite.amount, 500);
        assert_eq!(favorite.category, "mobile");
        assert_ne!(favorite.id, payment.id);
    }
}
