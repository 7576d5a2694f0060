//! Errors for the reservation and customer-balance ledger.
//!
//! Contains error variants for:
//! - Identifier generation and parsing
//! - Balance arithmetic (overflow)
//! - Optional reservation policy checks (room type, capacity)
//! - Configuration and snapshot persistence
//!
//! Lookup misses and incomplete records are not errors: lookups return
//! `Option`, and balance updates report them through [`crate::BalanceOutcome`].

use crate::Identifier;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("identifier generation failed: {0}")]
    IdentifierGeneration(#[from] rand::Error),

    #[error("identifier {0} is already in use")]
    DuplicateIdentifier(Identifier),

    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("adding {amount} to balance {balance} of customer {id} overflows")]
    BalanceOverflow {
        id: Identifier,
        balance: u64,
        amount: u64,
    },

    #[error("room type {0:?} is not available")]
    RoomTypeNotAvailable(String),

    #[error("no available rooms (capacity {capacity})")]
    NoAvailableRooms { capacity: usize },

    #[error("{0}")]
    Usage(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    AsyncCsv(#[from] csv_async::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
