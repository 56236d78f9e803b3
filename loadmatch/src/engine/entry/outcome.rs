use crate::engine::entry::Load;
use crate::engine::matchlogic::RateQuote;
use serde::{Deserialize, Serialize};

/// Result of one matching attempt. Exactly one variant per request; the
/// variant drives both the machine status token and the narration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// A load matched; carries the quoted rate for this request.
    Matched { load: Load, quote: RateQuote },
    /// The requested equipment class is not offered at all.
    EquipmentUnavailable,
    /// The best matching load cannot hold the requested piece count.
    InsufficientCapacity {
        load_id: u64,
        capacity: u32,
        requested: u32,
    },
    /// Fewer matching loads exist than the carrier wants to book.
    InsufficientInventory { available: u32, requested: u32 },
    /// No load survived any stage.
    NoMatch,
}
