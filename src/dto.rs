use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Identifier;

/// Records kept in a [`crate::stores::RecordStore`] are addressed by their own id.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> &Identifier;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Identifier,
    pub guest_name: String,
    /// Always set for customers created through the ledger. A snapshot row with
    /// an empty amount loads as `None`, which balance updates treat as incomplete.
    pub amount: Option<u64>,
}

impl Record for Customer {
    fn id(&self) -> &Identifier {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: Identifier,
    pub guest_name: String,
    pub check_in_date: String,
    pub check_out_date: String,
    pub number_of_guests: u64,
    pub room_type: String,
    pub amount: u64,
}

impl Record for Reservation {
    fn id(&self) -> &Identifier {
        &self.id
    }
}

/// Caller-supplied fields of a new reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationRequest {
    pub check_in_date: String,
    pub guest_name: String,
    pub check_out_date: String,
    pub amount: u64,
    pub room_type: String,
    pub number_of_guests: u64,
}

impl ReservationRequest {
    pub fn into_reservation(self, id: Identifier) -> Reservation {
        Reservation {
            id,
            guest_name: self.guest_name,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            number_of_guests: self.number_of_guests,
            room_type: self.room_type,
            amount: self.amount,
        }
    }
}

/// Reported result of a balance update that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceOutcome {
    Updated { new_balance: u64 },
    CustomerNotFound,
    IncompleteRecord,
}

impl fmt::Display for BalanceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated { new_balance } => {
                write!(f, "Balance added successfully. New balance: {new_balance}")
            }
            Self::CustomerNotFound => f.write_str("Customer not found"),
            Self::IncompleteRecord => f.write_str("Customer data is incomplete"),
        }
    }
}
