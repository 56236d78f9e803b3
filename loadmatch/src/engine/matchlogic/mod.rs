//! Core matching logic: the staged-relaxation pipeline and the rate
//! calculator it quotes with.

pub mod matcher;
pub mod rate;

pub use matcher::{EngineConfig, Matcher};
pub use rate::{quote, total_rate, RateQuote};
