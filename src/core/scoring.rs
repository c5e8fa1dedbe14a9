use crate::core::stats::{PairingStats, Role};
use crate::models::{Category, LocationPreference, Participant};

/// Score weights for a candidate pair
///
/// Scoring formula:
/// score = (
///     - repeat_penalty * times_paired_before
///     + location_bonus   # location preference satisfied
///     + reversal_bonus   # pair has role history to rotate
///     + jitter           # uniform in [0, tie_break_range)
/// )
///
/// The repeat penalty is larger than all other terms combined, so a fresh
/// pair always beats a repeat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub repeat_penalty: f64,
    pub location_bonus: f64,
    pub reversal_bonus: f64,
    pub tie_break_range: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            repeat_penalty: 100.0,
            location_bonus: 50.0,
            reversal_bonus: 25.0,
            tie_break_range: 10.0,
        }
    }
}

/// Usable tie-break width; negative or non-finite values disable the jitter
#[inline]
pub fn clamp_tie_break_range(range: f64) -> f64 {
    if range.is_finite() {
        range.max(0.0)
    } else {
        0.0
    }
}

/// Deterministic part of the pair score; callers add the jitter
pub fn calculate_pair_score(
    p1: &Participant,
    p2: &Participant,
    location_preference: LocationPreference,
    stats: &PairingStats,
    weights: &ScoringWeights,
) -> f64 {
    let mut score = 0.0;

    let pair_count = stats.pair_count(&p1.id, &p2.id);
    score -= pair_count as f64 * weights.repeat_penalty;

    if location_matches(p1, p2, location_preference) {
        score += weights.location_bonus;
    }

    if should_reverse_roles(p1, p2, stats) {
        score += weights.reversal_bonus;
    }

    score
}

/// Whether the location preference is satisfied; missing locations never are
#[inline]
pub fn location_matches(p1: &Participant, p2: &Participant, preference: LocationPreference) -> bool {
    let (l1, l2) = match (p1.location(), p2.location()) {
        (Some(l1), Some(l2)) => (l1, l2),
        _ => return false,
    };

    match preference {
        LocationPreference::Ignore => false,
        LocationPreference::Same => l1 == l2,
        LocationPreference::Different => l1 != l2,
    }
}

/// Whether the pair has role history worth rotating
///
/// Looks at p1's history with p2 first and only falls back to p2's history
/// with p1 when p1 has none. Any recorded coachee role counts, so this is
/// true for nearly every pair that has met before.
pub fn should_reverse_roles(p1: &Participant, p2: &Participant, stats: &PairingStats) -> bool {
    if let Some(roles) = stats.roles_with(&p1.id, &p2.id) {
        return roles.contains(&Role::Coachee);
    }
    if let Some(roles) = stats.roles_with(&p2.id, &p1.id) {
        return roles.contains(&Role::Coachee);
    }
    false
}

/// Pick the coach of a pair; returns true if `p1` coaches
///
/// Category constraints win, then role rotation, then whoever has coached
/// fewer partners (ties go to `p1`).
pub fn p1_is_coach(p1: &Participant, p2: &Participant, stats: &PairingStats) -> bool {
    use Category::*;

    match (p1.category, p2.category) {
        (CoachOnly, other) if other != CoachOnly => return true,
        (other, CoachOnly) if other != CoachOnly => return false,
        (CoacheeOnly, other) if other != CoacheeOnly => return false,
        (other, CoacheeOnly) if other != CoacheeOnly => return true,
        _ => {}
    }

    if should_reverse_roles(p1, p2, stats) {
        return stats
            .roles_with(&p1.id, &p2.id)
            .map(|roles| roles.contains(&Role::Coachee))
            .unwrap_or(false);
    }

    stats.coach_count(&p1.id) <= stats.coach_count(&p2.id)
}

/// Order a pair as (coach, coachee)
pub fn determine_coach<'a>(
    p1: &'a Participant,
    p2: &'a Participant,
    stats: &PairingStats,
) -> (&'a Participant, &'a Participant) {
    if p1_is_coach(p1, p2, stats) {
        (p1, p2)
    } else {
        (p2, p1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::stats::StatsCalculator;
    use crate::models::{PairingRecord, SessionHistoryEntry};
    use chrono::Utc;

    fn create_participant(id: &str, category: Category, location: Option<&str>) -> Participant {
        let p = Participant::new(id, format!("Person {}", id), category);
        match location {
            Some(l) => p.with_location(l),
            None => p,
        }
    }

    fn stats_from(pairs: &[(&Participant, &Participant)]) -> PairingStats {
        let records = pairs
            .iter()
            .map(|(c, e)| PairingRecord::paired((*c).clone(), (*e).clone()))
            .collect();
        StatsCalculator::compute_stats(&[SessionHistoryEntry::new("s", Utc::now(), records)])
    }

    #[test]
    fn test_clamp_tie_break_range() {
        assert_eq!(clamp_tie_break_range(10.0), 10.0);
        assert_eq!(clamp_tie_break_range(-1.0), 0.0);
        assert_eq!(clamp_tie_break_range(f64::INFINITY), 0.0);
        assert_eq!(clamp_tie_break_range(f64::NAN), 0.0);
    }

    #[test]
    fn test_fresh_pair_scores_zero() {
        let a = create_participant("a", Category::Both, None);
        let b = create_participant("b", Category::Both, None);
        let score = calculate_pair_score(
            &a,
            &b,
            LocationPreference::Ignore,
            &PairingStats::default(),
            &ScoringWeights::default(),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_location_bonus() {
        let a = create_participant("a", Category::Both, Some("Leeds"));
        let b = create_participant("b", Category::Both, Some("Leeds"));
        let c = create_participant("c", Category::Both, Some("York"));
        let d = create_participant("d", Category::Both, None);

        assert!(location_matches(&a, &b, LocationPreference::Same));
        assert!(!location_matches(&a, &c, LocationPreference::Same));
        assert!(location_matches(&a, &c, LocationPreference::Different));
        assert!(!location_matches(&a, &b, LocationPreference::Different));
        assert!(!location_matches(&a, &b, LocationPreference::Ignore));
        assert!(!location_matches(&a, &d, LocationPreference::Different));
    }

    #[test]
    fn test_repeat_penalty_dominates() {
        let a = create_participant("a", Category::Both, Some("Leeds"));
        let b = create_participant("b", Category::Both, Some("Leeds"));
        let c = create_participant("c", Category::Both, Some("York"));
        let stats = stats_from(&[(&a, &b)]);
        let weights = ScoringWeights::default();

        let repeat = calculate_pair_score(&a, &b, LocationPreference::Same, &stats, &weights);
        let fresh = calculate_pair_score(&a, &c, LocationPreference::Same, &stats, &weights);

        // a coached b, so only the location bonus offsets the penalty
        assert_eq!(repeat, -50.0);
        assert!(fresh > repeat);
    }

    #[test]
    fn test_reverse_roles_after_any_pairing() {
        let a = create_participant("a", Category::Both, None);
        let b = create_participant("b", Category::Both, None);
        let c = create_participant("c", Category::Both, None);
        let stats = stats_from(&[(&a, &b)]);

        // a coached b: a's history with b has only Coach, so the first branch answers
        assert!(!should_reverse_roles(&a, &b, &stats));
        // b's history with a has Coachee
        assert!(should_reverse_roles(&b, &a, &stats));
        assert!(!should_reverse_roles(&a, &c, &stats));
    }

    #[test]
    fn test_category_decides_coach() {
        let coach = create_participant("c", Category::CoachOnly, None);
        let coachee = create_participant("e", Category::CoacheeOnly, None);
        let both = create_participant("b", Category::Both, None);
        let stats = PairingStats::default();

        assert_eq!(determine_coach(&both, &coach, &stats).0.id, "c");
        assert_eq!(determine_coach(&coachee, &both, &stats).0.id, "b");
        assert_eq!(determine_coach(&coachee, &coach, &stats).0.id, "c");
    }

    #[test]
    fn test_previous_coachee_coaches_next() {
        let a = create_participant("a", Category::Both, None);
        let b = create_participant("b", Category::Both, None);
        let stats = stats_from(&[(&a, &b)]);

        assert_eq!(determine_coach(&b, &a, &stats).0.id, "b");
    }

    #[test]
    fn test_fewer_coach_credits_coaches() {
        let a = create_participant("a", Category::Both, None);
        let b = create_participant("b", Category::Both, None);
        let x = create_participant("x", Category::Both, None);
        let stats = stats_from(&[(&a, &x)]);

        // a has coached once, b never; b takes the coach role
        assert_eq!(determine_coach(&a, &b, &stats).0.id, "b");
        // no history at all, tie goes to p1
        assert_eq!(determine_coach(&b, &a, &PairingStats::default()).0.id, "b");
    }
}
