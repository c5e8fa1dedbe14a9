use crate::models::SessionHistoryEntry;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Order-independent key for two participant ids
///
/// The two ids are stored sorted, so `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            PairKey(a.to_string(), b.to_string())
        } else {
            PairKey(b.to_string(), a.to_string())
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.0, self.1)
    }
}

/// Role someone held relative to a specific partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Coach,
    Coachee,
}

/// Indices derived from pairing history
///
/// Rebuilt from scratch for every pairing run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairingStats {
    pub pair_counts: HashMap<PairKey, u32>,
    pub last_pairing_date: HashMap<PairKey, DateTime<Utc>>,
    /// person id -> partner id -> roles the person held with that partner
    pub role_history: HashMap<String, HashMap<String, HashSet<Role>>>,
}

impl PairingStats {
    pub fn pair_count(&self, a: &str, b: &str) -> u32 {
        self.pair_counts.get(&PairKey::new(a, b)).copied().unwrap_or(0)
    }

    pub fn last_paired(&self, a: &str, b: &str) -> Option<DateTime<Utc>> {
        self.last_pairing_date.get(&PairKey::new(a, b)).copied()
    }

    /// Roles `person` held with `partner`, if they were ever paired
    pub fn roles_with(&self, person: &str, partner: &str) -> Option<&HashSet<Role>> {
        self.role_history.get(person).and_then(|partners| partners.get(partner))
    }

    /// Number of distinct partners `person` has coached
    pub fn coach_count(&self, person: &str) -> usize {
        self.role_history
            .get(person)
            .map(|partners| {
                partners
                    .values()
                    .filter(|roles| roles.contains(&Role::Coach))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.pair_counts.is_empty()
    }
}

/// Derives [`PairingStats`] from session history
pub struct StatsCalculator;

impl StatsCalculator {
    /// Build stats from history; entry order does not matter
    pub fn compute_stats(history: &[SessionHistoryEntry]) -> PairingStats {
        let mut stats = PairingStats::default();

        for session in history {
            for (coach, coachee) in session.paired_records() {
                let key = PairKey::new(&coach.id, &coachee.id);

                *stats.pair_counts.entry(key.clone()).or_insert(0) += 1;

                stats
                    .last_pairing_date
                    .entry(key)
                    .and_modify(|d| {
                        if session.created_at > *d {
                            *d = session.created_at;
                        }
                    })
                    .or_insert(session.created_at);

                record_role(&mut stats, &coach.id, &coachee.id, Role::Coach);
                record_role(&mut stats, &coachee.id, &coach.id, Role::Coachee);
            }
        }

        tracing::trace!(
            "Computed stats from {} sessions: {} distinct pairs",
            history.len(),
            stats.pair_counts.len()
        );

        stats
    }
}

fn record_role(stats: &mut PairingStats, person: &str, partner: &str, role: Role) {
    stats
        .role_history
        .entry(person.to_string())
        .or_default()
        .entry(partner.to_string())
        .or_default()
        .insert(role);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, PairingRecord, Participant};
    use chrono::TimeZone;

    fn person(id: &str) -> Participant {
        Participant::new(id, id.to_uppercase(), Category::Both)
    }

    fn session(day: u32, pairs: &[(&str, &str)]) -> SessionHistoryEntry {
        let records = pairs
            .iter()
            .map(|(c, e)| PairingRecord::paired(person(c), person(e)))
            .collect();
        SessionHistoryEntry::new(
            format!("Day {}", day),
            Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
            records,
        )
    }

    #[test]
    fn test_pair_key_order_independent() {
        assert_eq!(PairKey::new("b", "a"), PairKey::new("a", "b"));
        assert_eq!(PairKey::new("b", "a").to_string(), "a_b");
    }

    #[test]
    fn test_empty_history() {
        let stats = StatsCalculator::compute_stats(&[]);
        assert!(stats.is_empty());
        assert!(stats.last_pairing_date.is_empty());
        assert!(stats.role_history.is_empty());
    }

    #[test]
    fn test_counts_and_last_date() {
        let history = vec![session(5, &[("a", "b")]), session(1, &[("b", "a"), ("c", "d")])];
        let stats = StatsCalculator::compute_stats(&history);

        assert_eq!(stats.pair_count("a", "b"), 2);
        assert_eq!(stats.pair_count("d", "c"), 1);
        assert_eq!(stats.pair_count("a", "c"), 0);
        assert_eq!(
            stats.last_paired("b", "a"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_role_history_both_directions() {
        let history = vec![session(1, &[("a", "b")]), session(2, &[("b", "a")])];
        let stats = StatsCalculator::compute_stats(&history);

        let a_with_b = stats.roles_with("a", "b").unwrap();
        assert!(a_with_b.contains(&Role::Coach));
        assert!(a_with_b.contains(&Role::Coachee));
        assert_eq!(stats.coach_count("a"), 1);
        assert_eq!(stats.coach_count("z"), 0);
    }

    #[test]
    fn test_unpaired_records_ignored() {
        let mut entry = session(1, &[]);
        entry.pairings.push(PairingRecord::unpaired(person("a")));
        let stats = StatsCalculator::compute_stats(&[entry]);
        assert!(stats.is_empty());
        assert!(stats.role_history.is_empty());
    }
}
