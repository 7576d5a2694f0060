use std::sync::Arc;

use crate::stores::RecordStore;
use crate::{Customer, Error, Identifier, IdentifierSource};

pub struct CustomerStore {
    records: RecordStore<Customer>,
    ids: Arc<dyn IdentifierSource>,
}

impl CustomerStore {
    pub fn new(ids: Arc<dyn IdentifierSource>) -> Self {
        Self::with_records(ids, RecordStore::new())
    }

    pub fn with_records(ids: Arc<dyn IdentifierSource>, records: RecordStore<Customer>) -> Self {
        Self { records, ids }
    }

    /// Creates a customer under a freshly generated identifier.
    /// The store is left unmodified if generation fails or the id collides.
    pub async fn create_user(
        &self,
        guest_name: impl Into<String>,
        amount: u64,
    ) -> Result<Customer, Error> {
        let id = self.ids.generate()?;
        let customer = Customer {
            id,
            guest_name: guest_name.into(),
            amount: Some(amount),
        };
        self.records.insert_new(id, customer.clone()).await?;
        Ok(customer)
    }

    pub async fn read_customers(&self) -> Vec<Customer> {
        self.records.values().await
    }

    pub async fn read_customer(&self, id: &Identifier) -> Option<Customer> {
        self.records.get(id).await
    }

    pub fn records(&self) -> &RecordStore<Customer> {
        &self.records
    }
}
