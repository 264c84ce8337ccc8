//! Immutable per-trial and per-session records, plus the trend series the
//! charting collaborator consumes.

use serde::{Deserialize, Serialize};

use crate::modes::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Yes,
    No,
    Timeout,
}

impl Answer {
    pub fn as_str(self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
            Answer::Timeout => "timeout",
        }
    }
}

/// One answered (or timed-out) trial, appended to the session log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialLogEntry {
    pub mode: Mode,
    pub depth: u32,
    pub question: String,
    pub expected: bool,
    pub given: Answer,
    pub correct: bool,
    pub reaction_ms: Option<u64>,
    pub inverted: bool,
}

/// Finalized session summary handed to the storage collaborator. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Unix epoch milliseconds at session end.
    pub timestamp_ms: u64,
    pub score: u32,
    pub accuracy_pct: f32,
    pub answered: u32,
    pub highest_depth: u32,
    pub mean_reaction_ms: Option<f64>,
    pub per_depth_mean_ms: Vec<(u32, f64)>,
    pub duration_secs: u32,
    pub modes: Vec<Mode>,
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp_ms: u64,
    pub accuracy_pct: f32,
    pub score: u32,
}

/// Most recent `n` sessions as an ordered-by-time series for trend charts.
pub fn trend(history: &[HistoryRecord], n: usize) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = history
        .iter()
        .map(|r| TrendPoint {
            timestamp_ms: r.timestamp_ms,
            accuracy_pct: r.accuracy_pct,
            score: r.score,
        })
        .collect();
    points.sort_by_key(|p| p.timestamp_ms);
    let skip = points.len().saturating_sub(n);
    points.split_off(skip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ts: u64, score: u32) -> HistoryRecord {
        HistoryRecord {
            timestamp_ms: ts,
            score,
            accuracy_pct: 50.0,
            answered: 4,
            highest_depth: 2,
            mean_reaction_ms: None,
            per_depth_mean_ms: Vec::new(),
            duration_secs: 60,
            modes: vec![Mode::Linear],
            modifiers: Vec::new(),
        }
    }

    #[test]
    fn trend_keeps_most_recent_in_time_order() {
        let history = vec![record(30, 3), record(10, 1), record(20, 2), record(40, 4)];
        let points = trend(&history, 3);
        let ts: Vec<u64> = points.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(ts, vec![20, 30, 40]);
        assert_eq!(points[2].score, 4);
    }

    #[test]
    fn trend_handles_short_history() {
        let history = vec![record(10, 1)];
        assert_eq!(trend(&history, 5).len(), 1);
        assert!(trend(&[], 5).is_empty());
    }
}
