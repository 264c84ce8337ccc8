//! # syllogi
//!
//! Trial generation and session engine for a relational-reasoning trainer.
//!
//! Each round presents chained relational premises over opaque symbols and a
//! yes/no question whose ground truth is fixed by construction, optionally
//! obfuscated by a substitution cipher, perspective/path-integration framings,
//! answer inversion, or a concurrent distractor. A timed, adaptive session
//! state machine drives rounds and scoring.
//!
//! ## Quick Start
//!
//! ```
//! use syllogi::config::Config;
//! use syllogi::session::{Phase, SessionController};
//!
//! let mut session = SessionController::new(Config::default(), 42);
//! session.start_session().unwrap();
//! assert_eq!(session.phase, Phase::Question);
//!
//! let expected = session.trial.as_ref().unwrap().question.expected;
//! session.answer(expected).unwrap();
//! assert_eq!(session.phase, Phase::Result);
//! assert!(session.last_feedback.unwrap().correct);
//! ```
//!
//! ## Modules
//!
//! - [`modes`]: the five reasoning-mode engines
//! - [`trial`]: per-round generation and the modifier pipeline
//! - [`session`]: phases, timers, and the trial log
//! - [`scoring`]: score/streak/adaptive-depth bookkeeping
//! - [`cipher`]: the session-scoped keyword substitution
//! - [`history`]: immutable session records and the trend series

pub mod cipher;
pub mod config;
pub mod history;
pub mod modes;
pub mod premise;
pub mod prng;
pub mod scoring;
pub mod session;
pub mod symbols;
pub mod trial;

pub use config::Config;
pub use history::{Answer, HistoryRecord, TrialLogEntry};
pub use modes::Mode;
pub use premise::{Item, Premise, Question, Relation};
pub use session::{Phase, SessionController};
pub use trial::Trial;
