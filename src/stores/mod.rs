//! Storage layer for the ledger. Provides:
//! - A generic ordered, identifier-keyed store ([`RecordStore`])
//! - Customer accounts and balances ([`CustomerStore`])
//! - Hotel room reservations ([`ReservationStore`])
//!
//! Every store is an in-memory `BTreeMap` guarded by a tokio `RwLock`.
//! Durability is handled separately by [`crate::snapshot`].

mod customers;
mod record_store;
mod reservations;

pub use customers::CustomerStore;
pub use record_store::RecordStore;
pub use reservations::{ReservationPolicy, ReservationStore};
