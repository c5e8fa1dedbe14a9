use crate::core::{
    filters::{can_pair, is_excluded, partition_by_category},
    scoring::{calculate_pair_score, clamp_tie_break_range, determine_coach, ScoringWeights},
    stats::PairingStats,
};
use crate::models::{LocationPreference, PairingOutcome, PairingRecord, Participant};
use rand::Rng;

/// Greedy pairing engine
///
/// # Phases
/// 1. Coach-only participants take their best coachee-only partner
/// 2. Everyone left is paired greedily by best remaining score
/// 3. Leftovers are reported (one person sits out, or exclusions block the rest)
///
/// `Both` participants are not considered in phase 1.
#[derive(Debug, Clone)]
pub struct PairingEngine<'a> {
    roster: &'a [Participant],
    stats: &'a PairingStats,
    weights: ScoringWeights,
}

impl<'a> PairingEngine<'a> {
    pub fn new(roster: &'a [Participant], stats: &'a PairingStats) -> Self {
        Self {
            roster,
            stats,
            weights: ScoringWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the width of the random tie-break term; 0 disables it
    pub fn with_tie_break_range(mut self, range: f64) -> Self {
        self.weights.tie_break_range = clamp_tie_break_range(range);
        self
    }

    /// Generate a round of pairings using thread-local randomness
    pub fn generate_pairings(
        &self,
        location_preference: LocationPreference,
        respect_exclusions: bool,
    ) -> PairingOutcome {
        self.generate_pairings_with_rng(location_preference, respect_exclusions, &mut rand::thread_rng())
    }

    /// Generate a round of pairings drawing tie-break jitter from `rng`
    pub fn generate_pairings_with_rng<R: Rng + ?Sized>(
        &self,
        location_preference: LocationPreference,
        respect_exclusions: bool,
        rng: &mut R,
    ) -> PairingOutcome {
        let mut outcome = PairingOutcome::default();

        if self.roster.len() < 2 {
            outcome
                .warnings
                .push("Need at least 2 participants to generate pairings".to_string());
            return outcome;
        }

        let mut available: Vec<&Participant> = self.roster.iter().collect();

        self.pair_restricted(&mut available, respect_exclusions, rng, &mut outcome);
        self.pair_remaining(&mut available, location_preference, respect_exclusions, rng, &mut outcome);

        tracing::info!(
            "Generated {} pairings for {} participants ({} warnings)",
            outcome.paired_count(),
            self.roster.len(),
            outcome.warnings.len()
        );

        outcome
    }

    /// Phase 1: coach-only against coachee-only
    fn pair_restricted<R: Rng + ?Sized>(
        &self,
        available: &mut Vec<&'a Participant>,
        respect_exclusions: bool,
        rng: &mut R,
        outcome: &mut PairingOutcome,
    ) {
        let partition = partition_by_category(self.roster);
        let mut coachees = partition.coachee_only;

        for coach in partition.coach_only.into_iter().rev() {
            let mut best: Option<(usize, f64)> = None;

            for (idx, coachee) in coachees.iter().enumerate().rev() {
                if respect_exclusions && is_excluded(coach, coachee) {
                    continue;
                }

                let score = self.score(coach, coachee, LocationPreference::Different, rng);
                if best.map_or(true, |(_, best_score)| score > best_score) {
                    best = Some((idx, score));
                }
            }

            match best {
                Some((idx, score)) => {
                    let coachee = coachees.remove(idx);
                    tracing::debug!(
                        "Phase 1: {} coaches {} (score {:.1})",
                        coach.name,
                        coachee.name,
                        score
                    );
                    remove_participant(available, coach);
                    remove_participant(available, coachee);
                    outcome
                        .pairings
                        .push(PairingRecord::paired(coach.clone(), coachee.clone()));
                }
                None if coachees.is_empty() => {
                    outcome.warnings.push(format!(
                        "No available coachees for coach-only participant: {}",
                        coach.name
                    ));
                }
                None => {}
            }
        }
    }

    /// Phase 2: best-scoring pair among everyone still available, repeated
    fn pair_remaining<R: Rng + ?Sized>(
        &self,
        available: &mut Vec<&'a Participant>,
        location_preference: LocationPreference,
        respect_exclusions: bool,
        rng: &mut R,
        outcome: &mut PairingOutcome,
    ) {
        while available.len() >= 2 {
            let mut best: Option<(usize, usize, f64)> = None;

            for i in 0..available.len() {
                for j in (i + 1)..available.len() {
                    let (p1, p2) = (available[i], available[j]);
                    if !can_pair(p1, p2, respect_exclusions) {
                        continue;
                    }

                    let score = self.score(p1, p2, location_preference, rng);
                    if best.map_or(true, |(_, _, best_score)| score > best_score) {
                        best = Some((i, j, score));
                    }
                }
            }

            let Some((i, j, score)) = best else {
                break;
            };

            // j > i, so removing j first keeps i valid
            let p2 = available.remove(j);
            let p1 = available.remove(i);
            let (coach, coachee) = determine_coach(p1, p2, self.stats);

            tracing::debug!(
                "Phase 2: {} coaches {} (score {:.1})",
                coach.name,
                coachee.name,
                score
            );

            outcome
                .pairings
                .push(PairingRecord::paired(coach.clone(), coachee.clone()));
        }

        match available.len() {
            0 => {}
            1 => {
                let alone = available[0];
                outcome.pairings.push(PairingRecord::unpaired(alone.clone()));
                outcome
                    .warnings
                    .push(format!("{} could not be paired and will work alone", alone.name));
            }
            n => {
                tracing::warn!("{} participants left unpaired by restrictions", n);
                outcome
                    .warnings
                    .push(format!("{} participants could not be paired due to restrictions", n));
            }
        }
    }

    fn score<R: Rng + ?Sized>(
        &self,
        p1: &Participant,
        p2: &Participant,
        location_preference: LocationPreference,
        rng: &mut R,
    ) -> f64 {
        calculate_pair_score(p1, p2, location_preference, self.stats, &self.weights) + self.jitter(rng)
    }

    #[inline]
    fn jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let range = clamp_tie_break_range(self.weights.tie_break_range);
        if range > 0.0 {
            rng.gen_range(0.0..range)
        } else {
            0.0
        }
    }
}

fn remove_participant(available: &mut Vec<&Participant>, target: &Participant) {
    if let Some(idx) = available.iter().position(|p| p.id == target.id) {
        available.remove(idx);
    }
}
