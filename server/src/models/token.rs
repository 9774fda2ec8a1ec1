use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A booked darshan ticket. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: Uuid,
    pub temple: String,
    pub name: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub created_at: DateTime<Utc>,
}

/// Booking request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewToken {
    pub temple: String,
    pub name: String,
    pub date: NaiveDate,
    pub time_slot: String,
}

impl Token {
    pub fn issue(booking: NewToken, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            temple: booking.temple,
            name: booking.name.trim().to_string(),
            date: booking.date,
            time_slot: booking.time_slot,
            created_at,
        }
    }
}
