use crate::engine::entry::Load;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Quoted price for a load. `total_rate` is never rounded here;
/// presentation rounding happens in the narration only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateQuote {
    pub total_rate: Decimal,
    pub per_mile_rate: Option<Decimal>,
}

/// Total earnings used to rank candidates: per-mile rate times mileage
/// when mileage is known, otherwise the stored rate is already the total.
pub fn total_rate(load: &Load) -> Decimal {
    match load.miles {
        Some(miles) if miles > 0 => load.rate * Decimal::from(miles),
        _ => load.rate,
    }
}

/// Computes the quote for a request. Multi-unit bookings price the stored
/// rate per unit; never combined with mileage pricing.
pub fn quote(load: &Load, unit_count: u32) -> RateQuote {
    if unit_count > 1 {
        return RateQuote {
            total_rate: load.rate * Decimal::from(unit_count),
            per_mile_rate: None,
        };
    }
    match load.miles {
        Some(miles) if miles > 0 => RateQuote {
            total_rate: load.rate * Decimal::from(miles),
            per_mile_rate: Some(load.rate),
        },
        _ => RateQuote {
            total_rate: load.rate,
            per_mile_rate: None,
        },
    }
}
