//! Structured content model for premises and questions.
//!
//! The core emits structured relations (subject index, relation keyword,
//! object index) plus a plain-text rendering. Presentation layers may
//! re-render from the structured form; the text here carries no markup.

use serde::{Deserialize, Serialize};

/// Closed vocabulary of relation keywords.
///
/// Ordering matters: the cipher assigns nonsense tokens cyclically over
/// `ALL`, so the six order/label/containment keywords sit first and the
/// fourteen spatial keywords fill exactly one pool cycle (see `cipher`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Greater,
    Less,
    Same,
    Opposite,
    Contains,
    Inside,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    Above,
    Below,
    Left,
    Right,
    Front,
    Behind,
}

impl Relation {
    pub const ALL: [Relation; 20] = [
        Relation::Greater,
        Relation::Less,
        Relation::Same,
        Relation::Opposite,
        Relation::Contains,
        Relation::Inside,
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
        Relation::Left,
        Relation::Right,
        Relation::Front,
        Relation::Behind,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Relation::Greater => "greater",
            Relation::Less => "less",
            Relation::Same => "same",
            Relation::Opposite => "opposite",
            Relation::Contains => "contains",
            Relation::Inside => "inside",
            Relation::North => "north",
            Relation::South => "south",
            Relation::East => "east",
            Relation::West => "west",
            Relation::NorthEast => "north-east",
            Relation::NorthWest => "north-west",
            Relation::SouthEast => "south-east",
            Relation::SouthWest => "south-west",
            Relation::Above => "above",
            Relation::Below => "below",
            Relation::Left => "left",
            Relation::Right => "right",
            Relation::Front => "front",
            Relation::Behind => "behind",
        }
    }

    /// Words surrounding the keyword in a rendered statement.
    fn connective(self) -> (&'static str, &'static str) {
        match self {
            Relation::Greater | Relation::Less => ("is", "than"),
            Relation::Same => ("is", "as"),
            Relation::Opposite => ("is", "of"),
            Relation::Contains => ("", ""),
            Relation::Inside => ("is", ""),
            Relation::Above | Relation::Below => ("is", ""),
            _ => ("is", "of"),
        }
    }

    /// The keyword naming the reversed direction, where one exists.
    pub fn mirrored(self) -> Relation {
        match self {
            Relation::Greater => Relation::Less,
            Relation::Less => Relation::Greater,
            Relation::Same => Relation::Same,
            Relation::Opposite => Relation::Opposite,
            Relation::Contains => Relation::Inside,
            Relation::Inside => Relation::Contains,
            Relation::North => Relation::South,
            Relation::South => Relation::North,
            Relation::East => Relation::West,
            Relation::West => Relation::East,
            Relation::NorthEast => Relation::SouthWest,
            Relation::NorthWest => Relation::SouthEast,
            Relation::SouthEast => Relation::NorthWest,
            Relation::SouthWest => Relation::NorthEast,
            Relation::Above => Relation::Below,
            Relation::Below => Relation::Above,
            Relation::Left => Relation::Right,
            Relation::Right => Relation::Left,
            Relation::Front => Relation::Behind,
            Relation::Behind => Relation::Front,
        }
    }
}

/// Opaque symbol with a stable index inside one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub index: usize,
    pub token: String,
}

/// One stated relation between two items, immutable once generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Premise {
    pub subject: usize,
    pub relation: Relation,
    pub object: usize,
    pub text: String,
}

/// The yes/no question attached to a trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub subject: usize,
    pub relation: Relation,
    pub object: usize,
    pub text: String,
    pub expected: bool,
}

/// "X is <kw> than Y" and friends. `kw` is the (possibly ciphered) keyword.
pub fn render_statement(subject: &str, relation: Relation, kw: &str, object: &str) -> String {
    let (pre, post) = relation.connective();
    match (pre.is_empty(), post.is_empty()) {
        (true, true) => format!("{subject} {kw} {object}"),
        (false, true) => format!("{subject} {pre} {kw} {object}"),
        _ => format!("{subject} {pre} {kw} {post} {object}"),
    }
}

/// "Is X <kw> than Y?" phrased from the same connectives as the statement.
pub fn render_question(subject: &str, relation: Relation, kw: &str, object: &str) -> String {
    let (pre, post) = relation.connective();
    let pre = if pre.is_empty() { "Does" } else { "Is" };
    match (relation, post.is_empty()) {
        (Relation::Contains, _) => {
            // "Does" takes the bare verb; cipher tokens pass through as-is.
            let verb = if kw == relation.keyword() { "contain" } else { kw };
            format!("Does {subject} {verb} {object}?")
        }
        (_, true) => format!("{pre} {subject} {kw} {object}?"),
        (_, false) => format!("{pre} {subject} {kw} {post} {object}?"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_has_twenty_distinct_keywords() {
        let mut kws: Vec<&str> = Relation::ALL.iter().map(|r| r.keyword()).collect();
        kws.sort_unstable();
        kws.dedup();
        assert_eq!(kws.len(), 20);
    }

    #[test]
    fn mirrored_is_an_involution() {
        for r in Relation::ALL {
            assert_eq!(r.mirrored().mirrored(), r);
        }
    }

    #[test]
    fn statement_rendering_uses_keyword_verbatim() {
        let s = render_statement("A", Relation::Greater, "zorp", "B");
        assert_eq!(s, "A is zorp than B");
    }

    #[test]
    fn containment_question_conjugates_the_plain_verb_only() {
        let q = render_question("A", Relation::Contains, "contains", "B");
        assert_eq!(q, "Does A contain B?");
        let q = render_question("A", Relation::Contains, "zorp", "B");
        assert_eq!(q, "Does A zorp B?");
    }
}
