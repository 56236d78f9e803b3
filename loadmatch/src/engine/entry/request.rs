use serde::{Deserialize, Serialize};

fn default_unit_count() -> u32 {
    1
}

/// Carrier-stated constraints extracted from a load search call.
///
/// Every field is optional; an entirely empty request matches the first
/// available load. Empty strings count as absent, matching what the voice
/// agent sends when the carrier skipped a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub equipment_type: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub commodity: Option<String>,
    /// Carrier's weight capacity in lbs; 0 means unconstrained.
    #[serde(default)]
    pub weight_capacity: u32,
    /// Piece count the carrier wants to haul; absent means unconstrained.
    #[serde(default)]
    pub piece_count: Option<u32>,
    /// Pickup dates in the carrier's preference order, `YYYY-MM-DD`.
    #[serde(default)]
    pub available_dates: Vec<String>,
    /// Number of equivalent loads the carrier wants to book at once.
    #[serde(default = "default_unit_count")]
    pub unit_count: u32,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            equipment_type: None,
            origin: None,
            destination: None,
            commodity: None,
            weight_capacity: 0,
            piece_count: None,
            available_dates: Vec::new(),
            unit_count: 1,
            conversation_id: None,
        }
    }
}

impl SearchRequest {
    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn equipment(&self) -> Option<&str> {
        Self::non_empty(&self.equipment_type)
    }

    pub fn origin_pref(&self) -> Option<&str> {
        Self::non_empty(&self.origin)
    }

    pub fn destination_pref(&self) -> Option<&str> {
        Self::non_empty(&self.destination)
    }

    pub fn commodity_pref(&self) -> Option<&str> {
        Self::non_empty(&self.commodity)
    }
}
