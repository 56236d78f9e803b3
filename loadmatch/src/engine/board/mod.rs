pub mod load_board;

pub use load_board::{EngineError, LoadBoard};
