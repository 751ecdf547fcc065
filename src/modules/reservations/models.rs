use serde::{Deserialize, Serialize};

/// A meeting-room booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub name: String,
    pub room_id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time_start: String,
    pub time_end: String,
    pub purpose: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReservationQuery {
    pub date: Option<String>,
}
