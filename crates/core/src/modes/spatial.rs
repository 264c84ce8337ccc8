//! Spatial reasoning over an accumulated 2-D / 3-D unit grid.
//!
//! Items are laid out by unit steps in random cardinal (and, in 3D, vertical)
//! directions; each step becomes one premise. The question is then posed in
//! exactly one of three styles, tried in fixed precedence: path-integration
//! movement (2D), deictic observer framing (2D), or the default absolute
//! compass/vertical relation.

use crate::cipher::{keyword_for, CipherMap};
use crate::premise::{render_question, render_statement, Item, Premise, Question, Relation};
use crate::prng::Prng;

use super::{ModeOutput, SpatialGates};

/// Probability gate for each special question style once its toggle is on.
const MOVEMENT_CHANCE: f32 = 0.5;
const DEICTIC_CHANCE: f32 = 0.5;

/// Retry budget before a special style falls through to the default question.
const STYLE_TRIES: usize = 8;

const STEPS_2D: [Relation; 4] = [Relation::North, Relation::South, Relation::East, Relation::West];
const STEPS_3D: [Relation; 6] = [
    Relation::North,
    Relation::South,
    Relation::East,
    Relation::West,
    Relation::Above,
    Relation::Below,
];

const LOCALS: [Relation; 4] = [
    Relation::Front,
    Relation::Behind,
    Relation::Left,
    Relation::Right,
];

// x grows east, y grows north, z grows up.
fn step_delta(r: Relation) -> (i32, i32, i32) {
    match r {
        Relation::North => (0, 1, 0),
        Relation::South => (0, -1, 0),
        Relation::East => (1, 0, 0),
        Relation::West => (-1, 0, 0),
        Relation::Above => (0, 0, 1),
        Relation::Below => (0, 0, -1),
        _ => (0, 0, 0),
    }
}

fn compass(dx: i32, dy: i32) -> Option<Relation> {
    match (dx.signum(), dy.signum()) {
        (0, 1) => Some(Relation::North),
        (0, -1) => Some(Relation::South),
        (1, 0) => Some(Relation::East),
        (-1, 0) => Some(Relation::West),
        (1, 1) => Some(Relation::NorthEast),
        (-1, 1) => Some(Relation::NorthWest),
        (1, -1) => Some(Relation::SouthEast),
        (-1, -1) => Some(Relation::SouthWest),
        _ => None,
    }
}

/// True descriptors of `a` relative to `b` from the signed deltas;
/// `[Same]` when the positions coincide.
fn descriptors(d: (i32, i32, i32)) -> Vec<Relation> {
    let mut out = Vec::with_capacity(2);
    if let Some(c) = compass(d.0, d.1) {
        out.push(c);
    }
    if d.2 > 0 {
        out.push(Relation::Above);
    } else if d.2 < 0 {
        out.push(Relation::Below);
    }
    if out.is_empty() {
        out.push(Relation::Same);
    }
    out
}

pub fn generate(
    items: &[Item],
    rng: &mut Prng,
    cipher: Option<&CipherMap>,
    three_d: bool,
    gates: SpatialGates,
) -> ModeOutput {
    let n = items.len();
    let steps: &[Relation] = if three_d { &STEPS_3D } else { &STEPS_2D };

    let mut positions: Vec<(i32, i32, i32)> = Vec::with_capacity(n);
    positions.push((0, 0, 0));

    let mut premises = Vec::with_capacity(n - 1);
    for i in 1..n {
        let dir = *rng.pick(steps);
        let (dx, dy, dz) = step_delta(dir);
        let prev = positions[i - 1];
        positions.push((prev.0 + dx, prev.1 + dy, prev.2 + dz));

        // The new item sits one unit in `dir` from the previous one.
        let kw = keyword_for(dir, cipher);
        let text = render_statement(&items[i].token, dir, kw, &items[i - 1].token);
        premises.push(Premise {
            subject: i,
            relation: dir,
            object: i - 1,
            text,
        });
    }

    if !three_d && gates.movement && rng.chance(MOVEMENT_CHANCE) {
        if let Some((question, extra_relations)) =
            movement_question(items, &positions, rng, cipher)
        {
            return ModeOutput {
                premises,
                question,
                used_movement: true,
                used_deictic: false,
                extra_relations,
            };
        }
    }

    if !three_d && gates.deictic && rng.chance(DEICTIC_CHANCE) {
        if let Some(question) = deictic_question(items, &positions, rng, cipher) {
            return ModeOutput {
                premises,
                question,
                used_movement: false,
                used_deictic: true,
                extra_relations: Vec::new(),
            };
        }
    }

    let question = default_question(items, &positions, rng, cipher, three_d);
    ModeOutput::plain(premises, question)
}

// ─────────────────────────────────────────────────────────────────────────
// Movement: walk/turn path integration in the walker's local frame.
// ─────────────────────────────────────────────────────────────────────────

/// Target position relative to a walker pose, in the walker's local frame.
/// Lateral offsets win only when they strictly exceed the forward offset.
fn local_relation(heading: (i32, i32), rel: (i32, i32)) -> Option<Relation> {
    let forward = heading.0 * rel.0 + heading.1 * rel.1;
    let lateral = heading.0 * rel.1 - heading.1 * rel.0;
    if forward == 0 && lateral == 0 {
        return None;
    }
    if lateral.abs() > forward.abs() {
        Some(if lateral > 0 { Relation::Left } else { Relation::Right })
    } else {
        Some(if forward > 0 { Relation::Front } else { Relation::Behind })
    }
}

fn turn_left(h: (i32, i32)) -> (i32, i32) {
    (-h.1, h.0)
}

fn turn_right(h: (i32, i32)) -> (i32, i32) {
    (h.1, -h.0)
}

fn movement_question(
    items: &[Item],
    positions: &[(i32, i32, i32)],
    rng: &mut Prng,
    cipher: Option<&CipherMap>,
) -> Option<(Question, Vec<Relation>)> {
    let n = items.len();
    let start = rng.gen_range_usize(0, n);
    let start_heading = *rng.pick(&STEPS_2D);
    let (hx, hy, _) = step_delta(start_heading);

    let mut pos = (positions[start].0, positions[start].1);
    let mut heading = (hx, hy);

    let mut extras = vec![start_heading];
    let mut instructions: Vec<String> = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        if rng.chance(0.6) {
            pos = (pos.0 + heading.0, pos.1 + heading.1);
            instructions.push("walk one step".to_string());
        } else if rng.next_bool() {
            heading = turn_left(heading);
            instructions.push(format!("turn {}", keyword_for(Relation::Left, cipher)));
            extras.push(Relation::Left);
        } else {
            heading = turn_right(heading);
            instructions.push(format!("turn {}", keyword_for(Relation::Right, cipher)));
            extras.push(Relation::Right);
        }
    }

    // A target on the walker's own square has no local direction; re-pick.
    let mut target = None;
    for _ in 0..STYLE_TRIES {
        let t = rng.gen_range_usize(0, n);
        let rel = (positions[t].0 - pos.0, positions[t].1 - pos.1);
        if let Some(actual) = local_relation(heading, rel) {
            target = Some((t, actual));
            break;
        }
    }
    let (t, actual) = target?;

    let asked = if rng.next_bool() {
        actual
    } else {
        loop {
            let cand = *rng.pick(&LOCALS);
            if cand != actual {
                break cand;
            }
        }
    };

    let text = format!(
        "You stand at {} facing {}. {}. Is {} to your {}?",
        items[start].token,
        keyword_for(start_heading, cipher),
        instructions.join(", "),
        items[t].token,
        keyword_for(asked, cipher),
    );

    Some((
        Question {
            subject: t,
            relation: asked,
            object: start,
            text,
            expected: asked == actual,
        },
        extras,
    ))
}

// ─────────────────────────────────────────────────────────────────────────
// Deictic: left/right from an in-scene observer's perspective.
// ─────────────────────────────────────────────────────────────────────────

/// Cross-product sign decides left/right; a zero cross falls back to the dot
/// product for front/behind. Fully degenerate geometry yields `None`.
fn deictic_relation(facing: (i32, i32), query: (i32, i32)) -> Option<Relation> {
    if facing == (0, 0) {
        return None;
    }
    let cross = facing.0 * query.1 - facing.1 * query.0;
    if cross > 0 {
        return Some(Relation::Left);
    }
    if cross < 0 {
        return Some(Relation::Right);
    }
    let dot = facing.0 * query.0 + facing.1 * query.1;
    if dot > 0 {
        Some(Relation::Front)
    } else if dot < 0 {
        Some(Relation::Behind)
    } else {
        None
    }
}

fn deictic_question(
    items: &[Item],
    positions: &[(i32, i32, i32)],
    rng: &mut Prng,
    cipher: Option<&CipherMap>,
) -> Option<Question> {
    let n = items.len();
    if n < 3 {
        return None;
    }

    for _ in 0..STYLE_TRIES {
        let mut order: Vec<usize> = (0..n).collect();
        rng.shuffle(&mut order);
        let (o, f, q) = (order[0], order[1], order[2]);

        let facing = (
            positions[f].0 - positions[o].0,
            positions[f].1 - positions[o].1,
        );
        let query = (
            positions[q].0 - positions[o].0,
            positions[q].1 - positions[o].1,
        );
        let Some(actual) = deictic_relation(facing, query) else {
            continue;
        };

        let asked = if rng.next_bool() {
            Relation::Left
        } else {
            Relation::Right
        };
        let text = format!(
            "{} is looking at {}. From their point of view, is {} to the {}?",
            items[o].token,
            items[f].token,
            items[q].token,
            keyword_for(asked, cipher),
        );
        return Some(Question {
            subject: q,
            relation: asked,
            object: o,
            text,
            expected: asked == actual,
        });
    }

    None
}

// ─────────────────────────────────────────────────────────────────────────
// Default: absolute compass/vertical descriptor between two items.
// ─────────────────────────────────────────────────────────────────────────

fn default_question(
    items: &[Item],
    positions: &[(i32, i32, i32)],
    rng: &mut Prng,
    cipher: Option<&CipherMap>,
    three_d: bool,
) -> Question {
    let (a, b) = rng.pick_two_distinct(items.len());
    let d = (
        positions[a].0 - positions[b].0,
        positions[a].1 - positions[b].1,
        positions[a].2 - positions[b].2,
    );
    let truths = descriptors(d);

    let asked = if rng.chance(0.5) {
        *rng.pick(&truths)
    } else {
        // A distractor colliding with a true descriptor would make the
        // intended "no" answer wrong; redraw until distinct.
        let pool: &[Relation] = if three_d {
            &[
                Relation::North,
                Relation::South,
                Relation::East,
                Relation::West,
                Relation::NorthEast,
                Relation::NorthWest,
                Relation::SouthEast,
                Relation::SouthWest,
                Relation::Above,
                Relation::Below,
            ]
        } else {
            &[
                Relation::North,
                Relation::South,
                Relation::East,
                Relation::West,
                Relation::NorthEast,
                Relation::NorthWest,
                Relation::SouthEast,
                Relation::SouthWest,
            ]
        };
        loop {
            let cand = *rng.pick(pool);
            if !truths.contains(&cand) {
                break cand;
            }
        }
    };

    let expected = truths.contains(&asked);
    let kw = keyword_for(asked, cipher);
    let text = if asked == Relation::Same {
        format!(
            "Is {} at the {} location as {}?",
            items[a].token, kw, items[b].token
        )
    } else {
        render_question(&items[a].token, asked, kw, &items[b].token)
    };

    Question {
        subject: a,
        relation: asked,
        object: b,
        text,
        expected,
    }
}
