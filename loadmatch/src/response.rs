//! Response formatting for the voice agent.
//!
//! Maps each `MatchOutcome` to a stable machine status token, a
//! `load_found` flag and a narration sentence. The narration only ever
//! references fields the caller actually supplied; numeric payload fields
//! stay unrounded while dollar amounts in `say` are rounded to 2 dp.

use crate::engine::entry::{MatchOutcome, SearchRequest};
use rust_decimal::Decimal;
use serde::Serialize;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_EQUIPMENT_UNAVAILABLE: &str = "equipment_unavailable";
pub const STATUS_INSUFFICIENT_CAPACITY: &str = "insufficient_capacity";
pub const STATUS_INSUFFICIENT_INVENTORY: &str = "insufficient_inventory";
pub const STATUS_NO_LOADS: &str = "no_loads";
pub const STATUS_ERROR: &str = "error";

#[derive(Debug, Serialize, Default)]
pub struct SearchReply {
    pub load_found: bool,
    pub status: String,
    pub message: String,
    pub say: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_datetime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_of_pieces: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_mile_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Shapes the webhook reply for one match outcome.
pub fn format_outcome(
    outcome: &MatchOutcome,
    request: &SearchRequest,
    equipment_types: &[String],
) -> SearchReply {
    let mut reply = match outcome {
        MatchOutcome::Matched { load, quote } => {
            let commodity_info = if load.commodity_type.is_empty() {
                "You'll be carrying freight".to_string()
            } else {
                format!("You'll be carrying {}", load.commodity_type)
            };
            let pieces_info = load
                .num_of_pieces
                .map(|n| format!(" ({} pieces)", n))
                .unwrap_or_default();
            let equipment_info = request
                .equipment()
                .map(|e| format!(" Your {} can handle this perfectly!", e))
                .unwrap_or_default();
            let rate_info = if request.unit_count > 1 {
                format!(
                    "The total rate is ${} for {} loads",
                    dollars(quote.total_rate),
                    request.unit_count
                )
            } else {
                match quote.per_mile_rate {
                    Some(per_mile) => format!(
                        "The total rate is ${} (${} per mile)",
                        dollars(quote.total_rate),
                        dollars(per_mile)
                    ),
                    None => format!("The total rate is ${}", dollars(quote.total_rate)),
                }
            };
            SearchReply {
                load_found: true,
                status: STATUS_SUCCESS.to_string(),
                message: "Load found".to_string(),
                say: format!(
                    "I found the best load for you! Load ID {}, from {} to {}, \
                     pickup on {}, delivery on {}. {}{} weighing {} lbs.{} {}. \
                     Are you interested in this load?",
                    load.load_id,
                    load.origin,
                    load.destination,
                    load.pickup_datetime.format("%Y-%m-%d %H:%M"),
                    load.delivery_datetime.format("%Y-%m-%d %H:%M"),
                    commodity_info,
                    pieces_info,
                    load.weight,
                    equipment_info,
                    rate_info
                ),
                load_id: Some(load.load_id),
                origin: Some(load.origin.clone()),
                destination: Some(load.destination.clone()),
                pickup_datetime: Some(load.pickup_datetime.format("%Y-%m-%d %H:%M").to_string()),
                delivery_datetime: Some(
                    load.delivery_datetime.format("%Y-%m-%d %H:%M").to_string(),
                ),
                weight: Some(load.weight),
                commodity: Some(load.commodity_type.clone()),
                num_of_pieces: load.num_of_pieces,
                base_rate: Some(load.rate),
                total_rate: Some(quote.total_rate),
                per_mile_rate: quote.per_mile_rate,
                ..SearchReply::default()
            }
        }
        MatchOutcome::EquipmentUnavailable => {
            // Only reachable when the request named an equipment type.
            let requested = request.equipment().unwrap_or("that");
            SearchReply {
                load_found: false,
                status: STATUS_EQUIPMENT_UNAVAILABLE.to_string(),
                message: "Equipment type not available".to_string(),
                say: format!(
                    "I'm sorry, but we don't have any {} equipment available. \
                     Our available equipment types are: {}. Would you like to \
                     search for loads with any of these equipment types?",
                    requested,
                    equipment_types.join(", ")
                ),
                ..SearchReply::default()
            }
        }
        MatchOutcome::InsufficientCapacity {
            load_id,
            capacity,
            requested,
        } => SearchReply {
            load_found: false,
            status: STATUS_INSUFFICIENT_CAPACITY.to_string(),
            message: "Load capacity exceeded".to_string(),
            say: format!(
                "The best matching load can take {} pieces, but you asked for \
                 {}. Would a smaller shipment work for you?",
                capacity, requested
            ),
            load_id: Some(*load_id),
            num_of_pieces: Some(*capacity),
            requested_count: Some(*requested),
            ..SearchReply::default()
        },
        MatchOutcome::InsufficientInventory {
            available,
            requested,
        } => SearchReply {
            load_found: false,
            status: STATUS_INSUFFICIENT_INVENTORY.to_string(),
            message: "Not enough matching loads available".to_string(),
            say: format!(
                "I only have {} loads matching your criteria right now, but \
                 you asked for {}. Would you like to book the {} I have \
                 available?",
                available, requested, available
            ),
            available_count: Some(*available),
            requested_count: Some(*requested),
            ..SearchReply::default()
        },
        MatchOutcome::NoMatch => SearchReply {
            load_found: false,
            status: STATUS_NO_LOADS.to_string(),
            message: "No matching loads found".to_string(),
            say: format!(
                "I'm sorry, but I couldn't find any loads matching {}. Would \
                 you like me to search for other available loads?",
                criteria_text(request)
            ),
            ..SearchReply::default()
        },
    };
    reply.conversation_id = request.conversation_id.clone();
    reply
}

/// Reply for a collaborator fault; distinct from `no_loads` so the caller
/// knows the search itself failed.
pub fn error_reply(message: &str) -> SearchReply {
    SearchReply {
        load_found: false,
        status: STATUS_ERROR.to_string(),
        message: message.to_string(),
        say: "I'm sorry, there was an error searching for loads. Please try again.".to_string(),
        ..SearchReply::default()
    }
}

// Narration-only rounding; payload fields stay unrounded.
fn dollars(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Human-readable summary of whichever criteria the caller supplied.
fn criteria_text(request: &SearchRequest) -> String {
    let mut parts = Vec::new();
    if let Some(equipment) = request.equipment() {
        parts.push(format!("{} equipment", equipment));
    }
    if request.weight_capacity > 0 {
        parts.push(format!("weight capacity {} lbs", request.weight_capacity));
    }
    if !request.available_dates.is_empty() {
        parts.push(format!("available {}", request.available_dates.join(", ")));
    }
    if let Some(origin) = request.origin_pref() {
        parts.push(format!("from {}", origin));
    }
    if let Some(destination) = request.destination_pref() {
        parts.push(format!("to {}", destination));
    }
    if let Some(commodity) = request.commodity_pref() {
        parts.push(format!("carrying {}", commodity));
    }
    if parts.is_empty() {
        "your criteria".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entry::{Load, LoadStatus};
    use crate::engine::matchlogic::RateQuote;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn equipment_types() -> Vec<String> {
        vec![
            "Dry Van".to_string(),
            "Flatbed".to_string(),
            "Reefer".to_string(),
            "Power Only".to_string(),
        ]
    }

    fn matched_outcome() -> MatchOutcome {
        let pickup = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        MatchOutcome::Matched {
            load: Load {
                load_id: 42,
                origin: "Chicago, IL".to_string(),
                destination: "Dallas, TX".to_string(),
                pickup_datetime: pickup,
                delivery_datetime: pickup + chrono::Duration::days(2),
                equipment_type: "Dry Van".to_string(),
                rate: dec!(1.20),
                weight: 20000,
                commodity_type: "Electronics".to_string(),
                num_of_pieces: Some(150),
                miles: Some(1200),
                dimensions: None,
                notes: None,
                status: LoadStatus::Available,
            },
            quote: RateQuote {
                total_rate: dec!(1440.0),
                per_mile_rate: Some(dec!(1.20)),
            },
        }
    }

    #[test]
    fn test_matched_reply_payload() {
        let request = SearchRequest {
            equipment_type: Some("Dry Van".to_string()),
            conversation_id: Some("call-9".to_string()),
            ..SearchRequest::default()
        };
        let reply = format_outcome(&matched_outcome(), &request, &equipment_types());
        assert!(reply.load_found);
        assert_eq!(reply.status, STATUS_SUCCESS);
        assert_eq!(reply.load_id, Some(42));
        assert_eq!(reply.total_rate, Some(dec!(1440.0)));
        assert_eq!(reply.per_mile_rate, Some(dec!(1.20)));
        assert_eq!(reply.conversation_id.as_deref(), Some("call-9"));
        assert!(reply.say.contains("Your Dry Van can handle this perfectly!"));
        assert!(reply.say.contains("$1440.00 ($1.20 per mile)"));
    }

    #[test]
    fn test_narration_skips_unsupplied_equipment() {
        let reply = format_outcome(
            &matched_outcome(),
            &SearchRequest::default(),
            &equipment_types(),
        );
        assert!(!reply.say.contains("can handle this perfectly"));
    }

    #[test]
    fn test_equipment_unavailable_lists_vocabulary() {
        let request = SearchRequest {
            equipment_type: Some("Submarine".to_string()),
            ..SearchRequest::default()
        };
        let reply = format_outcome(
            &MatchOutcome::EquipmentUnavailable,
            &request,
            &equipment_types(),
        );
        assert!(!reply.load_found);
        assert_eq!(reply.status, STATUS_EQUIPMENT_UNAVAILABLE);
        assert!(reply.say.contains("Submarine"));
        assert!(reply.say.contains("Dry Van, Flatbed, Reefer, Power Only"));
    }

    #[test]
    fn test_insufficient_inventory_carries_both_counts() {
        let outcome = MatchOutcome::InsufficientInventory {
            available: 2,
            requested: 5,
        };
        let reply = format_outcome(&outcome, &SearchRequest::default(), &equipment_types());
        assert_eq!(reply.status, STATUS_INSUFFICIENT_INVENTORY);
        assert_eq!(reply.available_count, Some(2));
        assert_eq!(reply.requested_count, Some(5));
    }

    #[test]
    fn test_no_match_criteria_only_mentions_supplied_fields() {
        let request = SearchRequest {
            origin: Some("Chicago".to_string()),
            ..SearchRequest::default()
        };
        let reply = format_outcome(&MatchOutcome::NoMatch, &request, &equipment_types());
        assert_eq!(reply.status, STATUS_NO_LOADS);
        assert!(reply.say.contains("from Chicago"));
        assert!(!reply.say.contains("equipment"));
        assert!(!reply.say.contains("weight capacity"));
    }

    #[test]
    fn test_empty_request_no_match_falls_back_to_generic_text() {
        let reply = format_outcome(
            &MatchOutcome::NoMatch,
            &SearchRequest::default(),
            &equipment_types(),
        );
        assert!(reply.say.contains("your criteria"));
    }

    #[test]
    fn test_error_reply_status() {
        let reply = error_reply("Failed to search loads");
        assert_eq!(reply.status, STATUS_ERROR);
        assert!(!reply.load_found);
    }
}
