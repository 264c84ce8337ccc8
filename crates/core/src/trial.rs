//! Per-round trial construction: mode dispatch plus the modifier pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cipher::{CipherMap, KEY_CHANGE_CHANCE};
use crate::config::Config;
use crate::modes::{self, Mode, SpatialGates};
use crate::premise::{Item, Premise, Question, Relation};
use crate::prng::Prng;
use crate::symbols;

/// Modifiers that actually applied to one generated trial.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActiveModifiers {
    pub cipher: bool,
    pub blind: bool,
    pub deictic: bool,
    pub movement: bool,
    pub interference: bool,
    pub inverted: bool,
}

/// One fully generated puzzle instance, immutable after construction.
#[derive(Debug, Clone)]
pub struct Trial {
    pub mode: Mode,
    pub depth: u32,
    pub items: Vec<Item>,
    pub premises: Vec<Premise>,
    pub question: Question,
    pub modifiers: ActiveModifiers,
    /// (keyword, nonsense token) pairs this trial's text actually uses.
    pub cipher_entries: Vec<(String, String)>,
    /// Route through a memorization phase before interference/question.
    pub needs_memorize: bool,
    pub key_changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenError {
    NoModeEnabled,
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::NoModeEnabled => write!(f, "no reasoning mode is enabled"),
        }
    }
}

impl std::error::Error for GenError {}

/// Generate one trial at the given depth.
///
/// The cipher map lives across rounds; this regenerates it with a small
/// probability (a "key change", which forces a memorization phase). The
/// Transformation inversion runs strictly last so it flips the final semantic
/// answer, never an intermediate one.
pub fn generate_trial(
    config: &Config,
    depth: u32,
    cipher: &mut Option<CipherMap>,
    rng: &mut Prng,
) -> Result<Trial, GenError> {
    if config.modes.is_empty() {
        return Err(GenError::NoModeEnabled);
    }
    let mode = *rng.pick(&config.modes);

    let mut key_changed = false;
    if config.cipher {
        if cipher.is_none() {
            *cipher = Some(CipherMap::generate(rng));
        } else if rng.chance(KEY_CHANGE_CHANCE) {
            *cipher = Some(CipherMap::generate(rng));
            key_changed = true;
        }
    } else {
        *cipher = None;
    }

    let items = symbols::draw(config.symbols, depth as usize + 1, rng);
    let gates = SpatialGates {
        movement: config.movement,
        deictic: config.deictic,
    };
    let mut out = modes::generate(mode, &items, rng, cipher.as_ref(), gates);

    let mut inverted = false;
    if config.transformation && rng.chance(0.5) {
        inverted = true;
        out.question.expected = !out.question.expected;
    }

    let cipher_entries = match cipher.as_ref() {
        Some(map) => {
            let mut used: Vec<Relation> = out.premises.iter().map(|p| p.relation).collect();
            used.push(out.question.relation);
            used.extend(out.extra_relations.iter().copied());
            map.entries(&used)
        }
        None => Vec::new(),
    };

    let modifiers = ActiveModifiers {
        cipher: config.cipher,
        blind: config.blind,
        deictic: out.used_deictic,
        movement: out.used_movement,
        interference: config.interference,
        inverted,
    };

    Ok(Trial {
        mode,
        depth,
        items,
        premises: out.premises,
        question: out.question,
        modifiers,
        cipher_entries,
        needs_memorize: config.blind || key_changed,
        key_changed,
    })
}
