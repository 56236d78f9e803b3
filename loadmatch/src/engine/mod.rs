//! Load Matching Engine Module
//!
//! This module contains the core components of the load matching system:
//! - `data`: inventory storage for load records
//! - `entry`: load, search request and outcome definitions
//! - `matchlogic`: staged matching pipeline and rate calculation
//! - `board`: search orchestration over inventory snapshots

pub mod board;
pub mod data;
pub mod entry;
pub mod matchlogic;
