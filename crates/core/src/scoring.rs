//! Score, streak, and adaptive-depth bookkeeping for one session.

use hashbrown::HashMap;

use crate::config::MIN_DEPTH;

/// Depth rises after every streak that is a positive multiple of this.
pub const STREAK_STEP: u32 = 3;

const CORRECT_SCORE_PER_DEPTH: u32 = 10;
const INCORRECT_PENALTY: u32 = 20;

#[derive(Debug, Clone)]
pub struct ScoreBoard {
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub depth: u32,
    pub highest_depth: u32,
    pub attempted: u32,
    pub correct: u32,
    reaction_total_ms: u64,
    reaction_count: u32,
    per_depth_ms: HashMap<u32, (u64, u32)>,
}

impl ScoreBoard {
    pub fn new(depth: u32) -> Self {
        let depth = depth.max(MIN_DEPTH);
        Self {
            score: 0,
            streak: 0,
            max_streak: 0,
            depth,
            highest_depth: depth,
            attempted: 0,
            correct: 0,
            reaction_total_ms: 0,
            reaction_count: 0,
            per_depth_ms: HashMap::new(),
        }
    }

    /// Record one answered (or timed-out) question. Reaction time is bucketed
    /// under the depth the question was asked at, before any adaptation.
    pub fn record(&mut self, correct: bool, reaction_ms: Option<u64>, auto_progress: bool) {
        let asked_depth = self.depth;
        self.attempted += 1;

        if let Some(ms) = reaction_ms {
            self.reaction_total_ms += ms;
            self.reaction_count += 1;
            let bucket = self.per_depth_ms.entry(asked_depth).or_insert((0, 0));
            bucket.0 += ms;
            bucket.1 += 1;
        }

        if correct {
            self.correct += 1;
            self.score += asked_depth * CORRECT_SCORE_PER_DEPTH;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
            if auto_progress && self.streak % STREAK_STEP == 0 {
                self.depth += 1;
                self.highest_depth = self.highest_depth.max(self.depth);
            }
        } else {
            self.score = self.score.saturating_sub(INCORRECT_PENALTY);
            self.streak = 0;
            if auto_progress && self.depth > MIN_DEPTH {
                self.depth -= 1;
            }
        }
    }

    pub fn accuracy_pct(&self) -> f32 {
        if self.attempted == 0 {
            0.0
        } else {
            100.0 * self.correct as f32 / self.attempted as f32
        }
    }

    pub fn mean_reaction_ms(&self) -> Option<f64> {
        if self.reaction_count == 0 {
            None
        } else {
            Some(self.reaction_total_ms as f64 / self.reaction_count as f64)
        }
    }

    /// (depth, mean ms), ascending by depth.
    pub fn per_depth_mean_ms(&self) -> Vec<(u32, f64)> {
        let mut out: Vec<(u32, f64)> = self
            .per_depth_ms
            .iter()
            .map(|(&d, &(total, count))| (d, total as f64 / count as f64))
            .collect();
        out.sort_by_key(|&(d, _)| d);
        out
    }
}
