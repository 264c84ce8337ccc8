//! Syllogi Daemon - Background relational-reasoning training service
//!
//! The daemon owns the session state machine and drives its clocks, exposing
//! a line-delimited JSON protocol over TCP for UI clients:
//! - Session lifecycle (start, answer, next round, abort)
//! - Configuration and persistence
//! - History and trend queries
//!
//! Storage locations:
//! - Linux: ~/.local/share/syllogi/
//! - Windows: %APPDATA%\syllogi\
//! - MacOS: ~/Library/Application Support/syllogi/

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use syllogi::config::Config;
use syllogi::history::{self, HistoryRecord, TrendPoint};
use syllogi::session::{Feedback, Phase, SessionController, INTERFERENCE_TICK_MS};

mod paths;
mod persist;
mod timers;

use paths::AppPaths;
use timers::PhaseTimers;

// ═══════════════════════════════════════════════════════════════════════════
// Protocol Messages
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Request {
    StartSession,
    FinishMemorization,
    InterferenceAck,
    Answer { yes: bool },
    NextRound,
    Abort,
    ReturnToSetup,
    GetView,
    GetConfig,
    SetConfig { config: Config },
    GetHistory,
    GetTrend { n: usize },
    Shutdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum Response {
    View(ViewSnapshot),
    Config { config: Config },
    History { records: Vec<HistoryRecord> },
    Trend { points: Vec<TrendPoint> },
    Ack { hit: bool },
    Success { message: String },
    Error { message: String },
}

/// Everything a client renders for the current phase. Premise and question
/// text already has any cipher substitution applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ViewSnapshot {
    phase: Phase,
    mode: Option<String>,
    depth: u32,
    premises: Vec<String>,
    question: Option<String>,
    cipher_entries: Vec<(String, String)>,
    key_changed: bool,
    interference: Option<InterferenceView>,
    elapsed_secs: u32,
    remaining_secs: Option<u32>,
    question_remaining_secs: Option<u32>,
    score: u32,
    streak: u32,
    attempted: u32,
    correct: u32,
    feedback: Option<Feedback>,
    finished: Option<HistoryRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct InterferenceView {
    target: String,
    current: String,
    hits: u32,
    misses: u32,
}

// ═══════════════════════════════════════════════════════════════════════════
// Daemon State
// ═══════════════════════════════════════════════════════════════════════════

struct Daemon {
    controller: SessionController,
    history: Vec<HistoryRecord>,
    paths: AppPaths,
    timers: PhaseTimers,
}

impl Daemon {
    fn new(paths: AppPaths) -> Self {
        let config = persist::load_settings(&paths);
        let history = persist::load_history(&paths);
        info!(
            "Loaded {} history record(s), starting depth {}",
            history.len(),
            config.depth
        );
        Self {
            controller: SessionController::new(config, wall_clock_seed()),
            history,
            paths,
            timers: PhaseTimers::default(),
        }
    }

    fn snapshot(&self) -> ViewSnapshot {
        let c = &self.controller;
        let trial = c.trial.as_ref();

        // Blind mode shows premises during memorization only.
        let premises_visible = match c.phase {
            Phase::Memorize => true,
            Phase::Interference | Phase::Question | Phase::Result => {
                !trial.map(|t| t.modifiers.blind).unwrap_or(false)
            }
            Phase::Setup | Phase::SessionEnd => false,
        };
        let premises = if premises_visible {
            trial
                .map(|t| t.premises.iter().map(|p| p.text.clone()).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        // The question is withheld until its phase is reached.
        let question = match c.phase {
            Phase::Question | Phase::Result => trial.map(|t| t.question.text.clone()),
            _ => None,
        };

        ViewSnapshot {
            phase: c.phase,
            mode: trial.map(|t| t.mode.name().to_string()),
            depth: c.board.depth,
            premises,
            question,
            cipher_entries: trial.map(|t| t.cipher_entries.clone()).unwrap_or_default(),
            key_changed: trial.map(|t| t.key_changed).unwrap_or(false),
            interference: c.interference.as_ref().map(|task| InterferenceView {
                target: task.target_color().to_string(),
                current: task.current_color().to_string(),
                hits: task.hits,
                misses: task.misses,
            }),
            elapsed_secs: c.elapsed_secs,
            remaining_secs: c.remaining_secs,
            question_remaining_secs: c.question_remaining_secs,
            score: c.board.score,
            streak: c.board.streak,
            attempted: c.board.attempted,
            correct: c.board.correct,
            feedback: c.last_feedback,
            finished: c.finished.clone(),
        }
    }

    fn save_all(&self) {
        if let Err(e) = persist::save_settings(&self.paths, self.controller.config()) {
            error!("Failed to save settings: {}", e);
        }
        if let Err(e) = persist::save_history(&self.paths, &self.history) {
            error!("Failed to save history: {}", e);
        }
    }

    /// Append the finalized record (if the controller just produced one) and
    /// persist history immediately so a crash cannot lose a session.
    fn record_finished_session(&mut self) {
        if let Some(record) = self.controller.finished.clone() {
            info!(
                "Session finished: score {}, accuracy {:.1}%",
                record.score, record.accuracy_pct
            );
            self.history.push(record);
            if let Err(e) = persist::save_history(&self.paths, &self.history) {
                error!("Failed to save history: {}", e);
            }
        }
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9E37_79B9_7F4A_7C15)
}

// ═══════════════════════════════════════════════════════════════════════════
// Timers
// ═══════════════════════════════════════════════════════════════════════════

// Reconcile running tickers with the controller's phase. Called with the
// write lock held, after every mutation that may have changed phase; the
// retired tokens are cancelled before new tickers start, so a stale tick
// that raced us drops out when it re-checks its token under the lock.
fn sync_timers(state: &Arc<RwLock<Daemon>>, d: &mut Daemon) {
    let phase = d.controller.phase;
    let question_enabled = d.controller.config().question_secs.is_some();
    let needed = d.timers.retire_invalid(phase, question_enabled);

    if needed.session {
        d.timers.session = Some(spawn_ticker(
            Arc::clone(state),
            Duration::from_secs(1),
            TickKind::Session,
        ));
    }
    if needed.question {
        d.timers.question = Some(spawn_ticker(
            Arc::clone(state),
            Duration::from_secs(1),
            TickKind::Question,
        ));
    }
    if needed.interference {
        d.timers.interference = Some(spawn_ticker(
            Arc::clone(state),
            Duration::from_millis(INTERFERENCE_TICK_MS),
            TickKind::Interference,
        ));
    }
}

#[derive(Debug, Clone, Copy)]
enum TickKind {
    Session,
    Question,
    Interference,
}

fn spawn_ticker(state: Arc<RwLock<Daemon>>, period: Duration, kind: TickKind) -> CancellationToken {
    let token = CancellationToken::new();
    let guard_token = token.clone();
    tokio::spawn(async move {
        let mut interval = time::interval(period);
        // The first interval tick completes immediately; consume it so the
        // first real tick lands one full period after the phase began.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = guard_token.cancelled() => break,
                _ = interval.tick() => {
                    let mut d = state.write().await;
                    if guard_token.is_cancelled() {
                        break;
                    }
                    match kind {
                        TickKind::Session => d.controller.session_tick(),
                        TickKind::Question => d.controller.question_tick(),
                        TickKind::Interference => d.controller.interference_tick(),
                    }
                    // A tick can move the phase (question timeout, interference
                    // hand-off), so reconcile before releasing the lock.
                    sync_timers(&state, &mut d);
                }
            }
        }
    });
    token
}

// ═══════════════════════════════════════════════════════════════════════════
// Client Handler
// ═══════════════════════════════════════════════════════════════════════════

async fn handle_client(
    stream: TcpStream,
    state: Arc<RwLock<Daemon>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let request: Request = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let resp = Response::Error {
                    message: format!("Invalid request: {}", e),
                };
                writer
                    .write_all(serde_json::to_string(&resp)?.as_bytes())
                    .await?;
                writer.write_all(b"\n").await?;
                continue;
            }
        };

        let response = match request {
            Request::StartSession => {
                let mut d = state.write().await;
                match d.controller.start_session() {
                    Ok(()) => {
                        sync_timers(&state, &mut d);
                        Response::View(d.snapshot())
                    }
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::FinishMemorization => {
                let mut d = state.write().await;
                match d.controller.finish_memorization() {
                    Ok(()) => {
                        sync_timers(&state, &mut d);
                        Response::View(d.snapshot())
                    }
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::InterferenceAck => {
                let mut d = state.write().await;
                // Resolution itself transitions on the next interference tick,
                // so no timer change happens here.
                match d.controller.interference_ack() {
                    Ok(hit) => Response::Ack { hit },
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::Answer { yes } => {
                let mut d = state.write().await;
                match d.controller.answer(yes) {
                    Ok(()) => {
                        sync_timers(&state, &mut d);
                        Response::View(d.snapshot())
                    }
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::NextRound => {
                let mut d = state.write().await;
                match d.controller.next_round() {
                    Ok(_) => {
                        d.record_finished_session();
                        sync_timers(&state, &mut d);
                        Response::View(d.snapshot())
                    }
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::Abort => {
                let mut d = state.write().await;
                match d.controller.abort() {
                    Ok(()) => {
                        sync_timers(&state, &mut d);
                        Response::View(d.snapshot())
                    }
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::ReturnToSetup => {
                let mut d = state.write().await;
                match d.controller.return_to_setup() {
                    Ok(()) => {
                        sync_timers(&state, &mut d);
                        Response::View(d.snapshot())
                    }
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::GetView => {
                let d = state.read().await;
                Response::View(d.snapshot())
            }
            Request::GetConfig => {
                let d = state.read().await;
                Response::Config {
                    config: d.controller.config().clone(),
                }
            }
            Request::SetConfig { config } => {
                let mut d = state.write().await;
                match d.controller.set_config(config) {
                    Ok(()) => {
                        if let Err(e) = persist::save_settings(&d.paths, d.controller.config()) {
                            error!("Failed to save settings: {}", e);
                        }
                        Response::Config {
                            config: d.controller.config().clone(),
                        }
                    }
                    Err(e) => Response::Error {
                        message: e.to_string(),
                    },
                }
            }
            Request::GetHistory => {
                let d = state.read().await;
                Response::History {
                    records: d.history.clone(),
                }
            }
            Request::GetTrend { n } => {
                let d = state.read().await;
                Response::Trend {
                    points: history::trend(&d.history, n),
                }
            }
            Request::Shutdown => {
                let mut d = state.write().await;
                d.timers.cancel_all();
                d.save_all();
                info!("Shutdown requested; state saved");
                tokio::spawn(async {
                    // Give the response a moment to flush before exiting.
                    time::sleep(Duration::from_millis(50)).await;
                    std::process::exit(0);
                });
                Response::Success {
                    message: "Shutting down".to_string(),
                }
            }
        };

        writer
            .write_all(serde_json::to_string(&response)?.as_bytes())
            .await?;
        writer.write_all(b"\n").await?;
    }

    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// Main
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Setup application paths
    let paths = AppPaths::new()?;
    info!("Data directory: {:?}", paths.data_dir());

    // Initialize daemon state from persisted settings/history
    let state = Arc::new(RwLock::new(Daemon::new(paths)));

    // Save on Ctrl-C so settings and history persist even if the daemon is
    // stopped abruptly. An in-flight round is discarded, matching abort.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let d = state.read().await;
                d.save_all();
                info!("Ctrl-C: state saved");
                std::process::exit(0);
            }
        });
    }

    // Start IPC server
    let listener = TcpListener::bind("127.0.0.1:9411").await?;
    info!("Syllogi daemon listening on 127.0.0.1:9411");

    // Accept client connections
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("Client connected: {}", addr);
        let state_clone = Arc::clone(&state);

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, state_clone).await {
                error!("Client handler error: {}", e);
            }
        });
    }
}
