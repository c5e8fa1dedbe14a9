//! Coach Pairing - pairs coaches and coachees across repeated sessions
//!
//! The core derives repeat counts and role history from past sessions and
//! greedily builds a new round that avoids repeats, honours exclusions and
//! category limits, rotates roles and balances location preference.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{PairingEngine, PairingStats, PairKey, StatsCalculator, ScoringWeights};
pub use crate::models::{Category, LocationPreference, PairingOutcome, PairingRecord, Participant, SessionHistoryEntry};
