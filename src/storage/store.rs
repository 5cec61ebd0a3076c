use crate::domain::{Account, AccountId, Favorite, Money, Payment, Phone};

/// In-memory collections backing the ledger.
///
/// Collections keep insertion order, which is also the order dumps are
/// written in. Lookups are linear scans; IDs are unique so the first match is
/// the only match.
#[derive(Debug, Default)]
pub struct LedgerStore {
    /// Highest account ID handed out or observed through an import
    last_account_id: AccountId,
    accounts: Vec<Account>,
    payments: Vec<Payment>,
    favorites: Vec<Favorite>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Account ID counter
    // ========================

    /// Reserve the next account ID. IDs start at 1 and are never reused.
    pub fn allocate_account_id(&mut self) -> AccountId {
        self.last_account_id += 1;
        self.last_account_id
    }

    /// Advance the counter past an ID that entered the store from outside.
    pub fn observe_account_id(&mut self, id: AccountId) {
        if id > self.last_account_id {
            self.last_account_id = id;
        }
    }

    pub fn last_account_id(&self) -> AccountId {
        self.last_account_id
    }

    // ========================
    // Accounts
    // ========================

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account(&self, id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn account_by_phone(&self, phone: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.phone == phone)
    }

    /// Append an account as-is. The counter is advanced past its ID.
    pub fn push_account(&mut self, account: Account) {
        self.observe_account_id(account.id);
        self.accounts.push(account);
    }

    /// Overwrite the balance of a known account or append a new one.
    ///
    /// Returns true when an existing account was updated. The phone of an
    /// existing account is left untouched.
    pub fn upsert_account(&mut self, id: AccountId, phone: Phone, balance: Money) -> bool {
        self.observe_account_id(id);
        match self.account_mut(id) {
            Some(existing) => {
                existing.balance = balance;
                true
            }
            None => {
                self.accounts.push(Account::new(id, phone).with_balance(balance));
                false
            }
        }
    }

    // ========================
    // Payments
    // ========================

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn payment(&self, id: &str) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == id)
    }

    pub fn payment_mut(&mut self, id: &str) -> Option<&mut Payment> {
        self.payments.iter_mut().find(|p| p.id == id)
    }

    pub fn push_payment(&mut self, payment: Payment) {
        self.payments.push(payment);
    }

    // ========================
    // Favorites
    // ========================

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    pub fn favorite(&self, id: &str) -> Option<&Favorite> {
        self.favorites.iter().find(|f| f.id == id)
    }

    pub fn push_favorite(&mut self, favorite: Favorite) {
        self.favorites.push(favorite);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_account_id_starts_at_one() {
        let mut store = LedgerStore::new();
        assert_eq!(store.allocate_account_id(), 1);
        assert_eq!(store.allocate_account_id(), 2);
        assert_eq!(store.last_account_id(), 2);
    }

    #[test]
    fn test_observe_never_moves_counter_back() {
        let mut store = LedgerStore::new();
        store.observe_account_id(10);
        store.observe_account_id(4);
        assert_eq!(store.allocate_account_id(), 11);
    }

    #[test]
    fn test_push_account_advances_counter() {
        let mut store = LedgerStore::new();
        store.push_account(Account::new(5, "+5"));
        assert_eq!(store.allocate_account_id(), 6);
        assert_eq!(store.account(5).map(|a| a.phone.as_str()), Some("+5"));
    }

    #[test]
    fn test_upsert_updates_balance_only() {
        let mut store = LedgerStore::new();
        store.push_account(Account::new(1, "+1").with_balance(10));

        let updated = store.upsert_account(1, "+other".to_string(), 70);
        assert!(updated);
        assert_eq!(store.accounts().len(), 1);
        let account = store.account(1).unwrap();
        assert_eq!(account.balance, 70);
        assert_eq!(account.phone, "+1");

        let updated = store.upsert_account(3, "+3".to_string(), 30);
        assert!(!updated);
        assert_eq!(store.accounts().len(), 2);
        assert_eq!(store.last_account_id(), 3);
    }

    #[test]
    fn test_lookups_miss_cleanly() {
        let store = LedgerStore::new();
        assert!(store.account(1).is_none());
        assert!(store.account_by_phone("+1").is_none());
        assert!(store.payment("nope").is_none());
        assert!(store.favorite("nope").is_none());
    }

    #[test]
    fn test_payment_lookup_and_mutation() {
        let mut store = LedgerStore::new();
        let payment = Payment::new(1, 10, "food");
        let id = payment.id.clone();
        store.push_payment(payment);

        store.payment_mut(&id).unwrap().amount = 20;
        assert_eq!(store.payment(&id).unwrap().amount, 20);
    }
}
