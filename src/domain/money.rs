/// Money is a unit-less integer amount. There are no fractional units.
pub type Money = i64;

/// Returns true if the amount can be moved by a deposit or a payment.
pub fn is_positive(amount: Money) -> bool {
    amount > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_positive() {
        assert!(is_positive(1));
        assert!(is_positive(Money::MAX));
        assert!(!is_positive(0));
        assert!(!is_positive(-10));
    }
}
