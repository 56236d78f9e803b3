//! Search orchestration over the load inventory.
//!
//! The matcher itself is pure; this layer takes a read snapshot of the
//! inventory, releases the lock, and runs the pipeline against it. A
//! failing store surfaces as `EngineError::Unavailable` so callers can
//! tell "nothing matched" apart from "could not search".

use crate::engine::data::Inventory;
use crate::engine::entry::{Load, MatchOutcome, SearchRequest};
use crate::engine::matchlogic::{EngineConfig, Matcher};
use std::sync::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("load inventory unavailable: {0}")]
    Unavailable(String),
}

pub struct LoadBoard {
    inventory: RwLock<Inventory>,
    matcher: Matcher,
}

impl LoadBoard {
    pub fn new(inventory: Inventory, config: EngineConfig) -> Self {
        Self {
            inventory: RwLock::new(inventory),
            matcher: Matcher::new(config),
        }
    }

    pub fn equipment_types(&self) -> &[String] {
        self.matcher.equipment_types()
    }

    /// Runs one search against a snapshot of the current inventory.
    pub fn search(&self, request: &SearchRequest) -> Result<MatchOutcome, EngineError> {
        let snapshot = self.snapshot()?;
        Ok(self.matcher.find_best(request, &snapshot))
    }

    /// All currently available loads, in store order.
    pub fn available_loads(&self) -> Result<Vec<Load>, EngineError> {
        self.snapshot()
    }

    fn snapshot(&self) -> Result<Vec<Load>, EngineError> {
        let inventory = self
            .inventory
            .read()
            .map_err(|e| EngineError::Unavailable(e.to_string()))?;
        Ok(inventory.list_available())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::entry::LoadStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn seeded_board() -> LoadBoard {
        let pickup = NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut inventory = Inventory::new();
        inventory
            .add_load(Load {
                load_id: 1,
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
            })
            .unwrap();
        LoadBoard::new(inventory, EngineConfig::default())
    }

    #[test]
    fn test_search_over_snapshot() {
        let board = seeded_board();
        let request = SearchRequest {
            equipment_type: Some("Dry Van".to_string()),
            available_dates: vec!["2025-09-15".to_string()],
            ..SearchRequest::default()
        };
        match board.search(&request).unwrap() {
            MatchOutcome::Matched { load, quote } => {
                assert_eq!(load.load_id, 1);
                assert_eq!(quote.total_rate, dec!(1440.0));
            }
            other => panic!("expected a match, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_board_is_no_match_not_error() {
        let board = LoadBoard::new(Inventory::new(), EngineConfig::default());
        let outcome = board.search(&SearchRequest::default()).unwrap();
        assert!(matches!(outcome, MatchOutcome::NoMatch));
    }

    #[test]
    fn test_available_loads_listing() {
        let board = seeded_board();
        let loads = board.available_loads().unwrap();
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].load_id, 1);
    }
}
