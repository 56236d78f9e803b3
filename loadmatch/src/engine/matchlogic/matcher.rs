use crate::engine::entry::{Load, MatchOutcome, SearchRequest};
use crate::engine::matchlogic::rate;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Immutable engine configuration: the fixed equipment vocabulary offered
/// to carriers. Passed in at construction, never process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub equipment_types: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            equipment_types: vec![
                "Dry Van".to_string(),
                "Flatbed".to_string(),
                "Reefer".to_string(),
                "Power Only".to_string(),
            ],
        }
    }
}

type LoadPredicate<'a> = Box<dyn Fn(&Load) -> bool + 'a>;

fn ci_eq(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn ci_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Staged-relaxation matcher over an inventory snapshot.
///
/// Stages run in fixed order and the first usable result wins:
/// equipment existence gate, best-of-candidate-dates exact search, piece
/// capacity check, partial location relaxation, fleet-size check. One-shot:
/// no retries, no backtracking once a stage commits.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: EngineConfig,
}

impl Matcher {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn equipment_types(&self) -> &[String] {
        &self.config.equipment_types
    }

    /// Runs the staged search. Pure over the snapshot: never mutates any
    /// load, never panics on malformed requests.
    pub fn find_best(&self, request: &SearchRequest, loads: &[Load]) -> MatchOutcome {
        // Stage 0: if the equipment class is absent from the whole board,
        // that is a materially different answer than "nothing matched".
        if let Some(equipment) = request.equipment() {
            let exists = loads
                .iter()
                .any(|l| l.is_available() && ci_eq(&l.equipment_type, equipment));
            if !exists {
                log::warn!("equipment type '{}' not present in inventory", equipment);
                return MatchOutcome::EquipmentUnavailable;
            }
        }

        // Stage 1: exact search, best total rate within the first workable date.
        let candidate = self.date_search(request, loads);

        // Stage 2: the piece capacity check applies only to an exact-match
        // candidate and never falls through to the partial search.
        if let (Some(load), Some(requested)) = (candidate, request.piece_count) {
            if let Some(capacity) = load.num_of_pieces {
                if requested > capacity {
                    return MatchOutcome::InsufficientCapacity {
                        load_id: load.load_id,
                        capacity,
                        requested,
                    };
                }
            }
        }

        // Stage 3: location relaxation when the exact search came up empty.
        let candidate = candidate.or_else(|| self.partial_search(request, loads));

        let load = match candidate {
            Some(load) => load,
            None => return MatchOutcome::NoMatch,
        };

        // Stage 4: a single match is not enough for a multi-unit booking.
        if request.unit_count > 1 {
            let available = self.count_core_matches(request, loads) as u32;
            if available < request.unit_count {
                return MatchOutcome::InsufficientInventory {
                    available,
                    requested: request.unit_count,
                };
            }
        }

        MatchOutcome::Matched {
            load: load.clone(),
            quote: rate::quote(load, request.unit_count),
        }
    }

    /// One predicate per supplied non-date criterion, evaluated as a
    /// conjunction in `passes`.
    fn core_predicates<'a>(&self, request: &'a SearchRequest) -> Vec<LoadPredicate<'a>> {
        let mut predicates: Vec<LoadPredicate<'a>> = Vec::new();
        if let Some(equipment) = request.equipment() {
            predicates.push(Box::new(move |l: &Load| ci_eq(&l.equipment_type, equipment)));
        }
        if let Some(origin) = request.origin_pref() {
            predicates.push(Box::new(move |l: &Load| ci_contains(&l.origin, origin)));
        }
        if let Some(destination) = request.destination_pref() {
            predicates.push(Box::new(move |l: &Load| {
                ci_contains(&l.destination, destination)
            }));
        }
        if let Some(commodity) = request.commodity_pref() {
            predicates.push(Box::new(move |l: &Load| {
                ci_contains(&l.commodity_type, commodity)
            }));
        }
        if request.weight_capacity > 0 {
            let capacity = request.weight_capacity;
            predicates.push(Box::new(move |l: &Load| l.weight <= capacity));
        }
        predicates
    }

    fn passes(load: &Load, predicates: &[LoadPredicate]) -> bool {
        load.is_available() && predicates.iter().all(|p| p(load))
    }

    /// Stage 1. Dates are tried in the caller's preference order; the
    /// first date with any candidates is definitive and later dates are
    /// never examined, even if they would pay better. Within that date the
    /// strictly highest total rate wins; ties keep the first-encountered
    /// load. Without dates, the first matching load in store order wins.
    fn date_search<'a>(&self, request: &SearchRequest, loads: &'a [Load]) -> Option<&'a Load> {
        let predicates = self.core_predicates(request);

        if request.available_dates.is_empty() {
            return loads.iter().find(|l| Self::passes(l, &predicates));
        }

        for raw_date in &request.available_dates {
            let date = match NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") {
                Ok(date) => date,
                Err(e) => {
                    log::warn!("invalid date '{}' in search request: {}", raw_date, e);
                    continue;
                }
            };
            let mut best: Option<(&Load, Decimal)> = None;
            for load in loads
                .iter()
                .filter(|l| Self::passes(l, &predicates) && l.pickup_datetime.date() == date)
            {
                let total = rate::total_rate(load);
                // Strictly-greater keeps the first-encountered load on ties.
                if best.map_or(true, |(_, top)| total > top) {
                    best = Some((load, total));
                }
            }
            if let Some((load, total)) = best {
                log::info!(
                    "selected load {} for {} at total rate {}",
                    load.load_id,
                    date,
                    total
                );
                return Some(load);
            }
        }
        None
    }

    /// Stage 3. Equipment stays mandatory when supplied; among whichever
    /// of origin/destination/commodity the carrier gave, one matching
    /// field is enough. Stage 1 already tried requiring all of them.
    fn partial_search<'a>(&self, request: &SearchRequest, loads: &'a [Load]) -> Option<&'a Load> {
        let mut location: Vec<LoadPredicate> = Vec::new();
        if let Some(origin) = request.origin_pref() {
            location.push(Box::new(move |l: &Load| ci_contains(&l.origin, origin)));
        }
        if let Some(destination) = request.destination_pref() {
            location.push(Box::new(move |l: &Load| {
                ci_contains(&l.destination, destination)
            }));
        }
        if let Some(commodity) = request.commodity_pref() {
            location.push(Box::new(move |l: &Load| {
                ci_contains(&l.commodity_type, commodity)
            }));
        }
        if location.is_empty() {
            return None;
        }

        let equipment = request.equipment();
        loads.iter().find(|l| {
            l.is_available()
                && equipment.map_or(true, |e| ci_eq(&l.equipment_type, e))
                && location.iter().any(|p| p(l))
        })
    }

    /// Stage 4 support: available loads passing the non-date criteria.
    fn count_core_matches(&self, request: &SearchRequest, loads: &[Load]) -> usize {
        let predicates = self.core_predicates(request);
        loads.iter().filter(|l| Self::passes(l, &predicates)).count()
    }
}
