// Core algorithm exports
pub mod filters;
pub mod history;
pub mod pairing;
pub mod scoring;
pub mod stats;

pub use filters::{can_pair, categories_compatible, is_excluded, partition_by_category};
pub use history::{dedupe, history_statistics, search_by_date_range, HistoryStatistics};
pub use pairing::PairingEngine;
pub use scoring::{calculate_pair_score, determine_coach, should_reverse_roles, ScoringWeights};
pub use stats::{PairKey, PairingStats, Role, StatsCalculator};
