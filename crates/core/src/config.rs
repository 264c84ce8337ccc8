//! Session configuration. Owned by the controller; mutated only between
//! rounds so in-flight trials never observe a change.

use serde::{Deserialize, Serialize};

use crate::modes::Mode;
use crate::symbols::SymbolStyle;

pub const MIN_DEPTH: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enabled reasoning modes. Must be non-empty before a round can start.
    pub modes: Vec<Mode>,
    /// Starting premise depth (premise count; items per trial = depth + 1).
    pub depth: u32,
    /// Adapt depth from streaks/misses.
    pub auto_progress: bool,
    /// Session countdown in seconds; `None` disables the countdown
    /// (elapsed time is still tracked).
    pub session_secs: Option<u32>,
    /// Per-question countdown in seconds; `None` disables it.
    pub question_secs: Option<u32>,
    pub cipher: bool,
    /// Blind mode: premises shown only during a memorization phase.
    pub blind: bool,
    pub deictic: bool,
    pub movement: bool,
    pub interference: bool,
    pub transformation: bool,
    pub symbols: SymbolStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            modes: vec![Mode::Linear],
            depth: MIN_DEPTH,
            auto_progress: true,
            session_secs: Some(300),
            question_secs: Some(30),
            cipher: false,
            blind: false,
            deictic: false,
            movement: false,
            interference: false,
            transformation: false,
            symbols: SymbolStyle::Letters,
        }
    }
}

impl Config {
    /// Clamp out-of-range values from untrusted (persisted) sources.
    pub fn normalized(mut self) -> Self {
        self.depth = self.depth.max(MIN_DEPTH);
        if self.session_secs == Some(0) {
            self.session_secs = None;
        }
        if self.question_secs == Some(0) {
            self.question_secs = None;
        }
        // Keep first occurrences only; duplicates anywhere in the list would
        // skew the uniform mode pick.
        let mut seen: Vec<Mode> = Vec::with_capacity(self.modes.len());
        self.modes.retain(|&m| {
            if seen.contains(&m) {
                false
            } else {
                seen.push(m);
                true
            }
        });
        self
    }

    /// Modifier names for history records, in a stable order.
    pub fn active_modifier_names(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.blind {
            out.push("blind");
        }
        if self.cipher {
            out.push("cipher");
        }
        if self.deictic {
            out.push("deictic");
        }
        if self.movement {
            out.push("movement");
        }
        if self.interference {
            out.push("interference");
        }
        if self.transformation {
            out.push("transformation");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_clamps_depth_and_zero_timers() {
        let cfg = Config {
            depth: 0,
            session_secs: Some(0),
            question_secs: Some(0),
            ..Config::default()
        }
        .normalized();
        assert_eq!(cfg.depth, MIN_DEPTH);
        assert_eq!(cfg.session_secs, None);
        assert_eq!(cfg.question_secs, None);
    }

    #[test]
    fn normalization_drops_nonadjacent_duplicate_modes() {
        let cfg = Config {
            modes: vec![Mode::Linear, Mode::Spatial2D, Mode::Linear, Mode::Spatial2D],
            ..Config::default()
        }
        .normalized();
        assert_eq!(cfg.modes, vec![Mode::Linear, Mode::Spatial2D]);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"depth": 4, "cipher": true}"#).unwrap();
        assert_eq!(cfg.depth, 4);
        assert!(cfg.cipher);
        assert_eq!(cfg.modes, vec![Mode::Linear]);
        assert_eq!(cfg.session_secs, Some(300));
    }
}
