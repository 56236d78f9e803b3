use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Available,
    Booked,
    Delivered,
    Cancelled,
}

/// A freight shipment offered for booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Load {
    pub load_id: u64,
    pub origin: String,
    pub destination: String,
    pub pickup_datetime: NaiveDateTime,
    pub delivery_datetime: NaiveDateTime,
    pub equipment_type: String,
    // Per-mile when miles is known, otherwise a flat total.
    pub rate: Decimal,
    pub weight: u32,
    pub commodity_type: String,
    #[serde(default)]
    pub num_of_pieces: Option<u32>,
    #[serde(default)]
    pub miles: Option<u32>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: LoadStatus,
}

impl Load {
    pub fn is_available(&self) -> bool {
        self.status == LoadStatus::Available
    }
}
