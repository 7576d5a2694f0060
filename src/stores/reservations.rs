use std::sync::Arc;

use crate::stores::RecordStore;
use crate::{Error, Identifier, IdentifierSource, Reservation, ReservationRequest};

/// Optional admission checks for new reservations. The default accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationPolicy {
    /// Accepted room types. `None` accepts any room type.
    pub room_types: Option<Vec<String>>,
    /// Maximum number of reservations held. `None` means unbounded.
    pub capacity: Option<usize>,
}

impl ReservationPolicy {
    fn check_room_type(&self, room_type: &str) -> Result<(), Error> {
        match &self.room_types {
            Some(allowed) if !allowed.iter().any(|t| t == room_type) => {
                Err(Error::RoomTypeNotAvailable(room_type.to_owned()))
            }
            _ => Ok(()),
        }
    }
}

pub struct ReservationStore {
    records: RecordStore<Reservation>,
    ids: Arc<dyn IdentifierSource>,
    policy: ReservationPolicy,
}

impl ReservationStore {
    pub fn new(ids: Arc<dyn IdentifierSource>, policy: ReservationPolicy) -> Self {
        Self::with_records(ids, policy, RecordStore::new())
    }

    pub fn with_records(
        ids: Arc<dyn IdentifierSource>,
        policy: ReservationPolicy,
        records: RecordStore<Reservation>,
    ) -> Self {
        Self {
            records,
            ids,
            policy,
        }
    }

    /// Stores a new reservation under a freshly generated identifier.
    ///
    /// Dates, party size and amount are stored as given. Only the configured
    /// [`ReservationPolicy`] is enforced, and a rejected request never
    /// touches the store.
    pub async fn add_hotel_room_reservation(
        &self,
        request: ReservationRequest,
    ) -> Result<Reservation, Error> {
        let id = self.ids.generate()?;
        self.policy.check_room_type(&request.room_type)?;
        let reservation = request.into_reservation(id);
        self.records
            .insert_new_within(id, reservation.clone(), self.policy.capacity)
            .await?;
        Ok(reservation)
    }

    pub async fn get_room_list(&self) -> Vec<Reservation> {
        self.records.values().await
    }

    pub async fn get_room_details(&self, id: &Identifier) -> Option<Reservation> {
        self.records.get(id).await
    }

    pub fn records(&self) -> &RecordStore<Reservation> {
        &self.records
    }
}
