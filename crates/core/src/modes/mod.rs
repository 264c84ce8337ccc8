//! One engine per reasoning mode. Each consumes the drawn items and emits a
//! consistent-by-construction premise chain plus one yes/no question with its
//! ground truth.

use serde::{Deserialize, Serialize};

use crate::cipher::CipherMap;
use crate::premise::{Item, Premise, Question};
use crate::prng::Prng;

pub mod distinction;
pub mod hierarchy;
pub mod linear;
pub mod spatial;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Linear,
    Distinction,
    Hierarchy,
    Spatial2D,
    Spatial3D,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Linear,
        Mode::Distinction,
        Mode::Hierarchy,
        Mode::Spatial2D,
        Mode::Spatial3D,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Linear => "linear",
            Mode::Distinction => "distinction",
            Mode::Hierarchy => "hierarchy",
            Mode::Spatial2D => "spatial_2d",
            Mode::Spatial3D => "spatial_3d",
        }
    }
}

/// Raw engine result before the modifier pipeline runs.
#[derive(Debug, Clone)]
pub struct ModeOutput {
    pub premises: Vec<Premise>,
    pub question: Question,
    /// Question styles picked inside spatial generation.
    pub used_movement: bool,
    pub used_deictic: bool,
    /// Relations that appear in the question narrative beyond the asked one
    /// (movement headings and turns); needed for the trial's cipher entries.
    pub extra_relations: Vec<crate::premise::Relation>,
}

impl ModeOutput {
    pub fn plain(premises: Vec<Premise>, question: Question) -> Self {
        Self {
            premises,
            question,
            used_movement: false,
            used_deictic: false,
            extra_relations: Vec::new(),
        }
    }
}

/// Spatial question-style gates, resolved from config before dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialGates {
    pub movement: bool,
    pub deictic: bool,
}

pub fn generate(
    mode: Mode,
    items: &[Item],
    rng: &mut Prng,
    cipher: Option<&CipherMap>,
    gates: SpatialGates,
) -> ModeOutput {
    match mode {
        Mode::Linear => linear::generate(items, rng, cipher),
        Mode::Distinction => distinction::generate(items, rng, cipher),
        Mode::Hierarchy => hierarchy::generate(items, rng, cipher),
        Mode::Spatial2D => spatial::generate(items, rng, cipher, false, gates),
        Mode::Spatial3D => spatial::generate(items, rng, cipher, true, gates),
    }
}
