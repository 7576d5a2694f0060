mod balance;
mod config;
mod csv_utils;
mod dto;
mod error;
mod identifier;
mod ledger;
mod runner;
pub mod snapshot;
pub mod stores;

pub use balance::BalanceUpdater;
pub use config::Config;
pub use csv_utils::write_csv;
pub use dto::{BalanceOutcome, Customer, Record, Reservation, ReservationRequest};
pub use error::{Error, Result};
pub use identifier::{Identifier, IdentifierSource, OsRandomSource, IDENTIFIER_LEN};
pub use ledger::HotelLedger;
pub use runner::{run, Command, USAGE};
