//! Linear order: a chain of greater/less premises over a latent total order.
//!
//! The latent order is the item index itself (ascending: a lower index is
//! "less" than a higher one), so every random rephrasing of a chain link
//! describes the same order and consistency holds by construction.

use crate::cipher::{keyword_for, CipherMap};
use crate::premise::{render_question, render_statement, Item, Premise, Question, Relation};
use crate::prng::Prng;

use super::ModeOutput;

pub fn generate(items: &[Item], rng: &mut Prng, cipher: Option<&CipherMap>) -> ModeOutput {
    let n = items.len();

    let mut premises = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        // Either "items[i+1] greater than items[i]" or the mirrored phrasing.
        let (subject, relation, object) = if rng.next_bool() {
            (i + 1, Relation::Greater, i)
        } else {
            (i, Relation::Less, i + 1)
        };
        let kw = keyword_for(relation, cipher);
        let text = render_statement(&items[subject].token, relation, kw, &items[object].token);
        premises.push(Premise {
            subject,
            relation,
            object,
            text,
        });
    }

    let (a, b) = rng.pick_two_distinct(n);
    let asked = if rng.next_bool() {
        Relation::Greater
    } else {
        Relation::Less
    };
    let expected = match asked {
        Relation::Greater => a > b,
        _ => a < b,
    };
    let kw = keyword_for(asked, cipher);
    let text = render_question(&items[a].token, asked, kw, &items[b].token);

    ModeOutput::plain(
        premises,
        Question {
            subject: a,
            relation: asked,
            object: b,
            text,
            expected,
        },
    )
}
