use std::path::PathBuf;

use crate::stores::ReservationPolicy;
use crate::Error;

pub const DATA_DIR_VAR: &str = "HOTEL_LEDGER_DATA_DIR";
pub const ROOM_TYPES_VAR: &str = "HOTEL_LEDGER_ROOM_TYPES";
pub const ROOM_CAPACITY_VAR: &str = "HOTEL_LEDGER_ROOM_CAPACITY";

/// Runtime settings for a [`crate::HotelLedger`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Snapshot directory. `None` keeps the ledger in memory only.
    pub data_dir: Option<PathBuf>,
    pub reservation_policy: ReservationPolicy,
}

impl Config {
    /// Reads the configuration from `HOTEL_LEDGER_*` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = get(DATA_DIR_VAR).map(PathBuf::from);

        let room_types = get(ROOM_TYPES_VAR).map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|room_type| !room_type.is_empty())
                .map(str::to_owned)
                .collect()
        });

        let capacity = get(ROOM_CAPACITY_VAR)
            .map(|value| {
                value.trim().parse::<usize>().map_err(|_| Error::InvalidConfig {
                    key: ROOM_CAPACITY_VAR,
                    value,
                })
            })
            .transpose()?;

        Ok(Self {
            data_dir,
            reservation_policy: ReservationPolicy {
                room_types,
                capacity,
            },
        })
    }
}
