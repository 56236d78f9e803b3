pub mod load;
pub mod outcome;
pub mod request;

pub use load::{Load, LoadStatus};
pub use outcome::MatchOutcome;
pub use request::SearchRequest;
