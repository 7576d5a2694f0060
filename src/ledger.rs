//! The ledger service: owns both stores and exposes one method per call-handler.
//!
//! A [`HotelLedger`] is constructed once at startup and passed to whatever
//! serves requests. Each handler runs to completion on its own; mutations are
//! serialized by the per-store write lock, reads share the read lock.
//!
//! A persistent ledger also holds its data directory's lock from `open` until
//! it is dropped, so separate processes take turns on load, mutate, checkpoint.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::snapshot::{DirLock, SnapshotDir};
use crate::stores::{CustomerStore, RecordStore, ReservationPolicy, ReservationStore};
use crate::{
    BalanceOutcome, BalanceUpdater, Config, Customer, Error, Identifier, IdentifierSource,
    OsRandomSource, Reservation, ReservationRequest,
};

pub struct HotelLedger {
    customers: Arc<CustomerStore>,
    reservations: ReservationStore,
    balances: BalanceUpdater,
    snapshots: Option<(SnapshotDir, DirLock)>,
}

impl HotelLedger {
    /// Creates an empty ledger that is never persisted.
    pub fn in_memory(ids: Arc<dyn IdentifierSource>, policy: ReservationPolicy) -> Self {
        Self::assemble(
            CustomerStore::new(ids.clone()),
            ReservationStore::new(ids, policy),
            None,
        )
    }

    /// Opens the ledger described by `config` with OS-random identifiers.
    pub async fn open(config: &Config) -> Result<Self, Error> {
        Self::open_with(config, Arc::new(OsRandomSource)).await
    }

    /// Opens the ledger, loading snapshots from the configured data directory if any.
    ///
    /// Waits for any other ledger holding the same directory to be dropped.
    pub async fn open_with(
        config: &Config,
        ids: Arc<dyn IdentifierSource>,
    ) -> Result<Self, Error> {
        let policy = config.reservation_policy.clone();
        let Some(data_dir) = &config.data_dir else {
            return Ok(Self::in_memory(ids, policy));
        };

        let snapshots = SnapshotDir::new(data_dir);
        let lock = snapshots.lock().await?;
        let customers = snapshots.load_customers().await?;
        let reservations = snapshots.load_reservations().await?;
        info!(
            data_dir = %snapshots.root().display(),
            customers = customers.len(),
            reservations = reservations.len(),
            "Opened ledger"
        );

        Ok(Self::assemble(
            CustomerStore::with_records(ids.clone(), RecordStore::from_records(customers)),
            ReservationStore::with_records(ids, policy, RecordStore::from_records(reservations)),
            Some((snapshots, lock)),
        ))
    }

    fn assemble(
        customers: CustomerStore,
        reservations: ReservationStore,
        snapshots: Option<(SnapshotDir, DirLock)>,
    ) -> Self {
        let customers = Arc::new(customers);
        Self {
            balances: BalanceUpdater::new(customers.clone()),
            customers,
            reservations,
            snapshots,
        }
    }

    /// Writes a snapshot of both stores. Does nothing for an in-memory ledger.
    pub async fn checkpoint(&self) -> Result<(), Error> {
        let Some((snapshots, _)) = &self.snapshots else {
            return Ok(());
        };
        let customers = self.customers.read_customers().await;
        let reservations = self.reservations.get_room_list().await;
        snapshots.save(&customers, &reservations).await
    }

    #[instrument(skip(self, guest_name))]
    pub async fn create_user(&self, guest_name: String, amount: u64) -> Result<Customer, Error> {
        let result = self.customers.create_user(guest_name, amount).await;
        match &result {
            Ok(customer) => info!(id = %customer.id, "Created customer"),
            Err(e) => warn!(error = %e, "Failed to create customer"),
        }
        result
    }

    pub async fn read_customers(&self) -> Vec<Customer> {
        self.customers.read_customers().await
    }

    pub async fn read_customer_id(&self, id: &Identifier) -> Option<Customer> {
        self.customers.read_customer(id).await
    }

    #[instrument(skip_all, fields(room_type = %request.room_type))]
    pub async fn add_hotel_room_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<Reservation, Error> {
        let result = self.reservations.add_hotel_room_reservation(request).await;
        match &result {
            Ok(reservation) => info!(id = %reservation.id, "Added reservation"),
            Err(e) => warn!(error = %e, "Rejected reservation"),
        }
        result
    }

    pub async fn get_room_list(&self) -> Vec<Reservation> {
        self.reservations.get_room_list().await
    }

    pub async fn get_room_details(&self, id: &Identifier) -> Option<Reservation> {
        self.reservations.get_room_details(id).await
    }

    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn add_balance(&self, id: &Identifier, amount: u64) -> Result<BalanceOutcome, Error> {
        let result = self.balances.add_balance(id, amount).await;
        match &result {
            Ok(outcome) => info!(%outcome, "Balance update"),
            Err(e) => warn!(error = %e, "Balance update failed"),
        }
        result
    }
}
