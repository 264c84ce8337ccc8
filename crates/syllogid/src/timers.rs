//! Per-phase timer bookkeeping.
//!
//! Exactly one cancellable token exists per timer category. Before any phase
//! transition the tokens that are invalid in the destination phase are
//! cancelled, and tick tasks re-check their token after acquiring the state
//! lock, so a stale tick can never act on a phase it no longer belongs to.

use tokio_util::sync::CancellationToken;

use syllogi::session::Phase;

#[derive(Debug, Default)]
pub struct PhaseTimers {
    pub session: Option<CancellationToken>,
    pub question: Option<CancellationToken>,
    pub interference: Option<CancellationToken>,
}

/// Which tickers the caller must (re)spawn after retiring invalid ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Needed {
    pub session: bool,
    pub question: bool,
    pub interference: bool,
}

impl PhaseTimers {
    fn cancel(slot: &mut Option<CancellationToken>) {
        if let Some(token) = slot.take() {
            token.cancel();
        }
    }

    pub fn cancel_all(&mut self) {
        Self::cancel(&mut self.session);
        Self::cancel(&mut self.question);
        Self::cancel(&mut self.interference);
    }

    /// Cancel every timer not valid in `phase`; report what must be spawned.
    pub fn retire_invalid(&mut self, phase: Phase, question_timer_enabled: bool) -> Needed {
        if !phase.in_session() {
            Self::cancel(&mut self.session);
        }
        if phase != Phase::Question || !question_timer_enabled {
            Self::cancel(&mut self.question);
        }
        if phase != Phase::Interference {
            Self::cancel(&mut self.interference);
        }

        Needed {
            session: phase.in_session() && self.session.is_none(),
            question: phase == Phase::Question
                && question_timer_enabled
                && self.question.is_none(),
            interference: phase == Phase::Interference && self.interference.is_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_timer_is_retired_on_leaving_the_phase() {
        let mut timers = PhaseTimers::default();
        let needed = timers.retire_invalid(Phase::Question, true);
        assert!(needed.session && needed.question && !needed.interference);
        timers.session = Some(CancellationToken::new());
        timers.question = Some(CancellationToken::new());

        let q = timers.question.clone().unwrap();
        let needed = timers.retire_invalid(Phase::Result, true);
        assert!(q.is_cancelled());
        assert!(timers.question.is_none());
        // Session timer keeps running across in-session phases.
        assert!(!needed.session && timers.session.is_some());
    }

    #[test]
    fn disabled_question_timer_is_never_requested() {
        let mut timers = PhaseTimers::default();
        let needed = timers.retire_invalid(Phase::Question, false);
        assert!(!needed.question);
    }

    #[test]
    fn everything_stops_outside_a_session() {
        let mut timers = PhaseTimers {
            session: Some(CancellationToken::new()),
            question: Some(CancellationToken::new()),
            interference: Some(CancellationToken::new()),
        };
        let s = timers.session.clone().unwrap();
        let needed = timers.retire_invalid(Phase::Setup, true);
        assert!(s.is_cancelled());
        assert_eq!(
            needed,
            Needed {
                session: false,
                question: false,
                interference: false
            }
        );
        assert!(timers.session.is_none() && timers.question.is_none());
    }

    #[test]
    fn interference_phase_requests_its_ticker() {
        let mut timers = PhaseTimers::default();
        let needed = timers.retire_invalid(Phase::Interference, true);
        assert!(needed.session && needed.interference && !needed.question);
    }
}
