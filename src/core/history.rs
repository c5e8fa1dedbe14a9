use crate::models::SessionHistoryEntry;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// How many pairs [`history_statistics`] reports as most frequent
const TOP_PAIRS: usize = 10;

/// Sessions whose date falls in `[start, end]`, newest first
///
/// Whole calendar days: a session late on `end` is included.
pub fn search_by_date_range(
    history: &[SessionHistoryEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<SessionHistoryEntry> {
    if start > end {
        return Vec::new();
    }

    let mut results: Vec<SessionHistoryEntry> = history
        .iter()
        .filter(|entry| {
            let day = entry.created_at.date_naive();
            day >= start && day <= end
        })
        .cloned()
        .collect();

    sort_newest_first(&mut results);
    results
}

/// Drop sessions that repeat an earlier one's date and pairs
pub fn dedupe(history: Vec<SessionHistoryEntry>) -> Vec<SessionHistoryEntry> {
    let mut seen = HashSet::new();
    history
        .into_iter()
        .filter(|entry| seen.insert(session_fingerprint(entry)))
        .collect()
}

pub fn sort_newest_first(history: &mut [SessionHistoryEntry]) {
    history.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

fn session_fingerprint(entry: &SessionHistoryEntry) -> (NaiveDate, Vec<(String, String)>) {
    let mut pairs: Vec<(String, String)> = entry
        .pairings
        .iter()
        .map(|r| {
            let coachee = r
                .coachee
                .participant()
                .map(|p| p.id.clone())
                .unwrap_or_default();
            (r.coach.id.clone(), coachee)
        })
        .collect();
    pairs.sort();
    (entry.created_at.date_naive(), pairs)
}

/// A pair label with how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequentPair {
    pub pair: String,
    pub count: u32,
}

/// Summary figures over the whole history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStatistics {
    #[serde(rename = "totalSessions")]
    pub total_sessions: usize,
    #[serde(rename = "totalPairs")]
    pub total_pairs: usize,
    #[serde(rename = "sessionsPerYear")]
    pub sessions_per_year: BTreeMap<i32, usize>,
    #[serde(rename = "firstSession")]
    pub first_session: Option<NaiveDate>,
    #[serde(rename = "lastSession")]
    pub last_session: Option<NaiveDate>,
    #[serde(rename = "mostFrequentPairs")]
    pub most_frequent_pairs: Vec<FrequentPair>,
}

pub fn history_statistics(history: &[SessionHistoryEntry]) -> HistoryStatistics {
    let mut stats = HistoryStatistics {
        total_sessions: history.len(),
        ..Default::default()
    };
    let mut pair_counts: HashMap<String, u32> = HashMap::new();

    for entry in history {
        let day = entry.created_at.date_naive();
        *stats.sessions_per_year.entry(day.year()).or_insert(0) += 1;

        stats.first_session = Some(stats.first_session.map_or(day, |d| d.min(day)));
        stats.last_session = Some(stats.last_session.map_or(day, |d| d.max(day)));

        for (coach, coachee) in entry.paired_records() {
            stats.total_pairs += 1;
            let mut names = [coach.name.as_str(), coachee.name.as_str()];
            names.sort_unstable();
            *pair_counts.entry(names.join(" & ")).or_insert(0) += 1;
        }
    }

    let mut frequent: Vec<FrequentPair> = pair_counts
        .into_iter()
        .map(|(pair, count)| FrequentPair { pair, count })
        .collect();
    frequent.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.pair.cmp(&b.pair)));
    frequent.truncate(TOP_PAIRS);
    stats.most_frequent_pairs = frequent;

    stats
}
