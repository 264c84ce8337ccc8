//! Session state machine: phases, timers, scoring, and the trial log.
//!
//! All transitions happen on a single logical actor: the owner calls these
//! methods from one place, feeding user events and timer ticks. A tick that
//! arrives for a phase the session has already left is ignored here, and the
//! driving layer additionally cancels per-phase timers before transitioning,
//! so stale ticks can never fire into the wrong phase.

use std::fmt;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::cipher::CipherMap;
use crate::config::Config;
use crate::history::{Answer, HistoryRecord, TrialLogEntry};
use crate::prng::Prng;
use crate::scoring::ScoreBoard;
use crate::trial::{generate_trial, Trial};

/// Interference re-rolls its displayed color at this cadence.
pub const INTERFERENCE_TICK_MS: u64 = 700;

pub const INTERFERENCE_COLORS: [&str; 4] = ["red", "green", "blue", "yellow"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Memorize,
    Interference,
    Question,
    Result,
    SessionEnd,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Memorize => "memorize",
            Phase::Interference => "interference",
            Phase::Question => "question",
            Phase::Result => "result",
            Phase::SessionEnd => "session_end",
        }
    }

    pub fn in_session(self) -> bool {
        !matches!(self, Phase::Setup | Phase::SessionEnd)
    }
}

/// The concurrent distractor gating entry into the question phase.
#[derive(Debug, Clone)]
pub struct InterferenceTask {
    pub target: u8,
    pub current: u8,
    pub hits: u32,
    pub misses: u32,
    /// Set by a correct acknowledgment; the next tick enters the question.
    resolved: bool,
}

impl InterferenceTask {
    fn roll(rng: &mut Prng) -> Self {
        let n = INTERFERENCE_COLORS.len();
        Self {
            target: rng.gen_range_usize(0, n) as u8,
            current: rng.gen_range_usize(0, n) as u8,
            hits: 0,
            misses: 0,
            resolved: false,
        }
    }

    pub fn target_color(&self) -> &'static str {
        INTERFERENCE_COLORS[self.target as usize]
    }

    pub fn current_color(&self) -> &'static str {
        INTERFERENCE_COLORS[self.current as usize]
    }
}

/// Outcome surfaced to the presentation layer after each question.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Feedback {
    pub correct: bool,
    pub given: Answer,
    pub expected: bool,
    pub inverted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    NoModeEnabled,
    WrongPhase(Phase),
    ConfigLocked,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoModeEnabled => write!(f, "enable at least one reasoning mode first"),
            SessionError::WrongPhase(p) => write!(f, "not allowed during the {} phase", p.name()),
            SessionError::ConfigLocked => {
                write!(f, "configuration can only change between rounds")
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[derive(Debug)]
pub struct SessionController {
    config: Config,
    rng: Prng,
    cipher: Option<CipherMap>,
    pub phase: Phase,
    pub board: ScoreBoard,
    pub trial: Option<Trial>,
    pub interference: Option<InterferenceTask>,
    pub elapsed_secs: u32,
    /// Countdown; `None` when the session timer is disabled.
    pub remaining_secs: Option<u32>,
    pub question_remaining_secs: Option<u32>,
    question_shown_at: Option<Instant>,
    pub trial_log: Vec<TrialLogEntry>,
    pub last_feedback: Option<Feedback>,
    /// Set exactly once, when the session finalizes.
    pub finished: Option<HistoryRecord>,
}

impl SessionController {
    pub fn new(config: Config, seed: u64) -> Self {
        let config = config.normalized();
        let depth = config.depth;
        Self {
            config,
            rng: Prng::new(seed),
            cipher: None,
            phase: Phase::Setup,
            board: ScoreBoard::new(depth),
            trial: None,
            interference: None,
            elapsed_secs: 0,
            remaining_secs: None,
            question_remaining_secs: None,
            question_shown_at: None,
            trial_log: Vec::new(),
            last_feedback: None,
            finished: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accepted only between rounds; in-flight trials never observe a change.
    pub fn set_config(&mut self, config: Config) -> Result<(), SessionError> {
        match self.phase {
            Phase::Setup | Phase::Result | Phase::SessionEnd => {
                self.config = config.normalized();
                Ok(())
            }
            _ => Err(SessionError::ConfigLocked),
        }
    }

    // ── user events ─────────────────────────────────────────────────────

    pub fn start_session(&mut self) -> Result<(), SessionError> {
        if self.phase.in_session() {
            return Err(SessionError::WrongPhase(self.phase));
        }
        if self.config.modes.is_empty() {
            return Err(SessionError::NoModeEnabled);
        }

        self.board = ScoreBoard::new(self.config.depth);
        self.trial_log.clear();
        self.last_feedback = None;
        self.finished = None;
        self.elapsed_secs = 0;
        self.remaining_secs = self.config.session_secs;
        self.cipher = None; // first generate_trial builds the session key

        self.begin_round()
    }

    pub fn finish_memorization(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Memorize {
            return Err(SessionError::WrongPhase(self.phase));
        }
        self.after_memorize();
        Ok(())
    }

    /// Correct acknowledgments resolve the distractor (returns `true`);
    /// incorrect ones record a miss and leave the phase unchanged.
    pub fn interference_ack(&mut self) -> Result<bool, SessionError> {
        if self.phase != Phase::Interference {
            return Err(SessionError::WrongPhase(self.phase));
        }
        let Some(task) = self.interference.as_mut() else {
            return Err(SessionError::WrongPhase(self.phase));
        };
        if task.resolved {
            return Ok(true);
        }
        if task.current == task.target {
            task.hits += 1;
            task.resolved = true;
            Ok(true)
        } else {
            task.misses += 1;
            Ok(false)
        }
    }

    pub fn answer(&mut self, yes: bool) -> Result<(), SessionError> {
        if self.phase != Phase::Question {
            return Err(SessionError::WrongPhase(self.phase));
        }
        self.finish_question(if yes { Answer::Yes } else { Answer::No });
        Ok(())
    }

    /// Explicit "next" from the result screen. Returns the finalized record
    /// when the session countdown has already expired.
    pub fn next_round(&mut self) -> Result<Option<&HistoryRecord>, SessionError> {
        if self.phase != Phase::Result {
            return Err(SessionError::WrongPhase(self.phase));
        }
        if self.remaining_secs == Some(0) {
            let record = self.finalize();
            self.finished = Some(record);
            self.phase = Phase::SessionEnd;
            return Ok(self.finished.as_ref());
        }
        self.begin_round()?;
        Ok(None)
    }

    /// Drop the in-flight round and return to setup. Nothing is recorded.
    pub fn abort(&mut self) -> Result<(), SessionError> {
        if !self.phase.in_session() {
            return Err(SessionError::WrongPhase(self.phase));
        }
        self.trial = None;
        self.interference = None;
        self.question_remaining_secs = None;
        self.question_shown_at = None;
        self.last_feedback = None;
        self.phase = Phase::Setup;
        Ok(())
    }

    pub fn return_to_setup(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::SessionEnd {
            return Err(SessionError::WrongPhase(self.phase));
        }
        self.phase = Phase::Setup;
        Ok(())
    }

    // ── timer events ────────────────────────────────────────────────────

    /// 1 Hz whenever a session is active, independent of phase.
    pub fn session_tick(&mut self) {
        if !self.phase.in_session() {
            return;
        }
        self.elapsed_secs += 1;
        if let Some(rem) = self.remaining_secs.as_mut() {
            *rem = rem.saturating_sub(1);
        }
    }

    /// 1 Hz while the question timer is enabled and the phase is Question.
    pub fn question_tick(&mut self) {
        if self.phase != Phase::Question {
            return;
        }
        let Some(rem) = self.question_remaining_secs.as_mut() else {
            return;
        };
        *rem = rem.saturating_sub(1);
        if *rem == 0 {
            self.finish_question(Answer::Timeout);
        }
    }

    /// Fast cadence while the phase is Interference: re-roll the displayed
    /// color, or complete the hand-off one tick after a correct hit.
    pub fn interference_tick(&mut self) {
        if self.phase != Phase::Interference {
            return;
        }
        let resolved = match self.interference.as_ref() {
            Some(task) => task.resolved,
            None => return,
        };
        if resolved {
            self.enter_question();
            return;
        }
        let next = self.rng.gen_range_usize(0, INTERFERENCE_COLORS.len()) as u8;
        if let Some(task) = self.interference.as_mut() {
            task.current = next;
        }
    }

    // ── internals ───────────────────────────────────────────────────────

    fn begin_round(&mut self) -> Result<(), SessionError> {
        let trial = generate_trial(&self.config, self.board.depth, &mut self.cipher, &mut self.rng)
            .map_err(|_| SessionError::NoModeEnabled)?;
        let needs_memorize = trial.needs_memorize;
        self.trial = Some(trial);
        if needs_memorize {
            self.phase = Phase::Memorize;
        } else {
            self.after_memorize();
        }
        Ok(())
    }

    fn after_memorize(&mut self) {
        if self.config.interference {
            self.interference = Some(InterferenceTask::roll(&mut self.rng));
            self.phase = Phase::Interference;
        } else {
            self.enter_question();
        }
    }

    fn enter_question(&mut self) {
        self.interference = None;
        self.question_remaining_secs = self.config.question_secs;
        self.question_shown_at = Some(Instant::now());
        self.phase = Phase::Question;
    }

    fn finish_question(&mut self, given: Answer) {
        let Some(trial) = self.trial.as_ref() else {
            return;
        };
        let correct = match given {
            Answer::Yes => trial.question.expected,
            Answer::No => !trial.question.expected,
            Answer::Timeout => false,
        };
        let reaction_ms = match given {
            Answer::Timeout => None,
            _ => self.question_shown_at.map(|t| t.elapsed().as_millis() as u64),
        };

        let asked_depth = self.board.depth;
        self.board
            .record(correct, reaction_ms, self.config.auto_progress);
        self.trial_log.push(TrialLogEntry {
            mode: trial.mode,
            depth: asked_depth,
            question: trial.question.text.clone(),
            expected: trial.question.expected,
            given,
            correct,
            reaction_ms,
            inverted: trial.modifiers.inverted,
        });
        self.last_feedback = Some(Feedback {
            correct,
            given,
            expected: trial.question.expected,
            inverted: trial.modifiers.inverted,
        });

        self.question_remaining_secs = None;
        self.question_shown_at = None;
        self.phase = Phase::Result;
    }

    fn finalize(&mut self) -> HistoryRecord {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        HistoryRecord {
            timestamp_ms,
            score: self.board.score,
            accuracy_pct: self.board.accuracy_pct(),
            answered: self.board.attempted,
            highest_depth: self.board.highest_depth,
            mean_reaction_ms: self.board.mean_reaction_ms(),
            per_depth_mean_ms: self.board.per_depth_mean_ms(),
            duration_secs: self.elapsed_secs,
            modes: self.config.modes.clone(),
            modifiers: self
                .config
                .active_modifier_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::Mode;

    fn untimed_linear() -> Config {
        Config {
            modes: vec![Mode::Linear],
            session_secs: None,
            question_secs: None,
            ..Config::default()
        }
    }

    fn answer_correctly(s: &mut SessionController) {
        let expected = s.trial.as_ref().unwrap().question.expected;
        s.answer(expected).unwrap();
    }

    #[test]
    fn rejects_start_without_enabled_modes() {
        let config = Config {
            modes: Vec::new(),
            ..Config::default()
        };
        let mut s = SessionController::new(config, 71);
        assert_eq!(s.start_session(), Err(SessionError::NoModeEnabled));
        assert_eq!(s.phase, Phase::Setup);
        assert!(s.trial.is_none());
    }

    #[test]
    fn ten_correct_answers_reach_depth_five() {
        let mut s = SessionController::new(untimed_linear(), 72);
        s.start_session().unwrap();
        for i in 1..=10 {
            assert_eq!(s.phase, Phase::Question);
            answer_correctly(&mut s);
            assert_eq!(s.phase, Phase::Result);
            if i == 9 {
                assert_eq!(s.board.depth, 5);
            }
            s.next_round().unwrap();
        }
        assert_eq!(s.board.depth, 5);
        assert_eq!(s.board.correct, 10);
        assert_eq!(s.trial_log.len(), 10);
    }

    #[test]
    fn question_timeout_scores_as_timeout() {
        let config = Config {
            question_secs: Some(2),
            session_secs: None,
            ..untimed_linear()
        };
        let mut s = SessionController::new(config, 73);
        s.start_session().unwrap();
        assert_eq!(s.question_remaining_secs, Some(2));
        s.question_tick();
        assert_eq!(s.phase, Phase::Question);
        s.question_tick();
        assert_eq!(s.phase, Phase::Result);
        let entry = s.trial_log.last().unwrap();
        assert_eq!(entry.given, Answer::Timeout);
        assert!(!entry.correct);
        assert_eq!(entry.reaction_ms, None);
        // A stale question tick after the transition must be ignored.
        s.question_tick();
        assert_eq!(s.phase, Phase::Result);
    }

    #[test]
    fn interference_gates_the_question_phase() {
        let config = Config {
            interference: true,
            ..untimed_linear()
        };
        let mut s = SessionController::new(config, 74);
        s.start_session().unwrap();
        assert_eq!(s.phase, Phase::Interference);

        // Wrong color: a miss, no transition.
        {
            let task = s.interference.as_mut().unwrap();
            task.current = (task.target + 1) % INTERFERENCE_COLORS.len() as u8;
        }
        assert_eq!(s.interference_ack(), Ok(false));
        assert_eq!(s.phase, Phase::Interference);
        assert_eq!(s.interference.as_ref().unwrap().misses, 1);

        // Matching color: a hit, then the next tick hands off.
        {
            let task = s.interference.as_mut().unwrap();
            task.current = task.target;
        }
        assert_eq!(s.interference_ack(), Ok(true));
        assert_eq!(s.phase, Phase::Interference);
        s.interference_tick();
        assert_eq!(s.phase, Phase::Question);
        assert!(s.interference.is_none());
    }

    #[test]
    fn session_countdown_routes_to_session_end() {
        let config = Config {
            session_secs: Some(2),
            ..untimed_linear()
        };
        let mut s = SessionController::new(config, 75);
        s.start_session().unwrap();
        s.session_tick();
        s.session_tick();
        assert_eq!(s.remaining_secs, Some(0));
        assert_eq!(s.elapsed_secs, 2);
        answer_correctly(&mut s);
        let record = s.next_round().unwrap().cloned();
        assert_eq!(s.phase, Phase::SessionEnd);
        let record = record.unwrap();
        assert_eq!(record.answered, 1);
        assert_eq!(record.duration_secs, 2);

        s.return_to_setup().unwrap();
        assert_eq!(s.phase, Phase::Setup);
    }

    #[test]
    fn elapsed_tracks_even_without_countdown() {
        let mut s = SessionController::new(untimed_linear(), 76);
        s.start_session().unwrap();
        for _ in 0..5 {
            s.session_tick();
        }
        assert_eq!(s.elapsed_secs, 5);
        assert_eq!(s.remaining_secs, None);
        answer_correctly(&mut s);
        // Countdown disabled: "next" always starts a new round.
        assert!(s.next_round().unwrap().is_none());
        assert_eq!(s.phase, Phase::Question);
    }

    #[test]
    fn abort_discards_the_round_and_returns_to_setup() {
        let mut s = SessionController::new(untimed_linear(), 77);
        s.start_session().unwrap();
        answer_correctly(&mut s);
        s.next_round().unwrap();
        assert_eq!(s.phase, Phase::Question);
        s.abort().unwrap();
        assert_eq!(s.phase, Phase::Setup);
        assert!(s.trial.is_none());
        assert!(s.finished.is_none());
        // Only the answered round is in the log; the aborted one is gone.
        assert_eq!(s.trial_log.len(), 1);
        assert_eq!(s.abort(), Err(SessionError::WrongPhase(Phase::Setup)));
    }

    #[test]
    fn blind_mode_waits_for_the_ready_signal() {
        let config = Config {
            blind: true,
            ..untimed_linear()
        };
        let mut s = SessionController::new(config, 78);
        s.start_session().unwrap();
        assert_eq!(s.phase, Phase::Memorize);
        // No timer leaves this phase; only the explicit signal does.
        s.session_tick();
        s.question_tick();
        s.interference_tick();
        assert_eq!(s.phase, Phase::Memorize);
        s.finish_memorization().unwrap();
        assert_eq!(s.phase, Phase::Question);
    }

    #[test]
    fn config_changes_are_rejected_mid_round() {
        let mut s = SessionController::new(untimed_linear(), 79);
        s.start_session().unwrap();
        assert_eq!(
            s.set_config(Config::default()),
            Err(SessionError::ConfigLocked)
        );
        answer_correctly(&mut s);
        // Between rounds (result screen) is fine.
        s.set_config(untimed_linear()).unwrap();
    }
}
