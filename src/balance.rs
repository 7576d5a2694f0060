//! Balance updates: the only read-modify-write operation in the ledger.

use std::sync::Arc;

use tracing::debug;

use crate::stores::CustomerStore;
use crate::{BalanceOutcome, Customer, Error, Identifier};

pub struct BalanceUpdater {
    customers: Arc<CustomerStore>,
}

impl BalanceUpdater {
    pub fn new(customers: Arc<CustomerStore>) -> Self {
        Self { customers }
    }

    /// Adds `amount` to the balance of customer `id`.
    ///
    /// The lookup and the write happen under the customer store's write lock,
    /// so concurrent updates to the same customer never lose an increment.
    /// The stored record is replaced with an empty guest name, matching the
    /// ledger's historical behavior.
    ///
    /// # Errors
    /// Returns [`Error::BalanceOverflow`] if the new balance does not fit in a
    /// `u64`. The stored record is left unchanged in that case.
    pub async fn add_balance(&self, id: &Identifier, amount: u64) -> Result<BalanceOutcome, Error> {
        self.customers
            .records()
            .replace_with(id, |current| {
                let Some(customer) = current else {
                    return (None, Ok(BalanceOutcome::CustomerNotFound));
                };
                let Some(balance) = customer.amount else {
                    return (None, Ok(BalanceOutcome::IncompleteRecord));
                };
                match balance.checked_add(amount) {
                    Some(new_balance) => {
                        debug!(%id, balance, new_balance, "Updating balance");
                        let updated = Customer {
                            id: *id,
                            guest_name: String::new(),
                            amount: Some(new_balance),
                        };
                        (Some(updated), Ok(BalanceOutcome::Updated { new_balance }))
                    }
                    None => (
                        None,
                        Err(Error::BalanceOverflow {
                            id: *id,
                            balance,
                            amount,
                        }),
                    ),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::RecordStore;
    use crate::{IdentifierSource, OsRandomSource};

    fn setup() -> (Arc<CustomerStore>, BalanceUpdater) {
        let customers = Arc::new(CustomerStore::new(Arc::new(OsRandomSource)));
        let updater = BalanceUpdater::new(customers.clone());
        (customers, updater)
    }

    #[tokio::test]
    async fn test_add_balance() {
        let (customers, updater) = setup();
        let alice = customers.create_user("Alice", 100).await.unwrap();

        let outcome = updater.add_balance(&alice.id, 50).await.unwrap();
        assert_eq!(outcome, BalanceOutcome::Updated { new_balance: 150 });

        let stored = customers.read_customer(&alice.id).await.unwrap();
        assert_eq!(stored.amount, Some(150));
        // Guest name is cleared on every update
        assert_eq!(stored.guest_name, "");

        let all = customers.read_customers().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, Some(150));
    }

    #[tokio::test]
    async fn test_add_zero() {
        let (customers, updater) = setup();
        let alice = customers.create_user("Alice", 7).await.unwrap();
        let outcome = updater.add_balance(&alice.id, 0).await.unwrap();
        assert_eq!(outcome, BalanceOutcome::Updated { new_balance: 7 });
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let (customers, updater) = setup();
        let alice = customers.create_user("Alice", 100).await.unwrap();
        let before = customers.read_customers().await;

        let unknown = OsRandomSource.generate().unwrap();
        let outcome = updater.add_balance(&unknown, 10).await.unwrap();
        assert_eq!(outcome, BalanceOutcome::CustomerNotFound);
        assert_eq!(outcome.to_string(), "Customer not found");

        assert_eq!(customers.read_customers().await, before);
        assert_eq!(customers.read_customer(&alice.id).await, Some(alice));
    }

    #[tokio::test]
    async fn test_incomplete_record() {
        let incomplete = Customer {
            id: OsRandomSource.generate().unwrap(),
            guest_name: "Ghost".to_string(),
            amount: None,
        };
        let customers = Arc::new(CustomerStore::with_records(
            Arc::new(OsRandomSource),
            RecordStore::from_records(vec![incomplete.clone()]),
        ));
        let updater = BalanceUpdater::new(customers.clone());

        let outcome = updater.add_balance(&incomplete.id, 10).await.unwrap();
        assert_eq!(outcome, BalanceOutcome::IncompleteRecord);
        assert_eq!(customers.read_customer(&incomplete.id).await, Some(incomplete));
    }

    #[tokio::test]
    async fn test_overflow_rejected() {
        let (customers, updater) = setup();
        let rich = customers.create_user("Rich", u64::MAX - 1).await.unwrap();

        let result = updater.add_balance(&rich.id, 2).await;
        assert!(matches!(
            result,
            Err(Error::BalanceOverflow { balance, amount: 2, .. }) if balance == u64::MAX - 1
        ));
        // Record untouched, name included
        assert_eq!(customers.read_customer(&rich.id).await, Some(rich.clone()));

        // Exactly reaching the maximum is fine
        let outcome = updater.add_balance(&rich.id, 1).await.unwrap();
        assert_eq!(outcome, BalanceOutcome::Updated { new_balance: u64::MAX });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_do_not_lose_increments() {
        const N: u64 = 500;
        let (customers, updater) = setup();
        let updater = Arc::new(updater);
        let id = customers.create_user("Alice", 0).await.unwrap().id;

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let updater = updater.clone();
                tokio::spawn(async move { updater.add_balance(&id, 1).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(customers.read_customer(&id).await.unwrap().amount, Some(N));
    }
}
