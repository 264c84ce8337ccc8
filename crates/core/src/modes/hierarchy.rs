//! Hierarchy: a containment chain, item i contains item i+1.

use crate::cipher::{keyword_for, CipherMap};
use crate::premise::{render_question, render_statement, Item, Premise, Question, Relation};
use crate::prng::Prng;

use super::ModeOutput;

pub fn generate(items: &[Item], rng: &mut Prng, cipher: Option<&CipherMap>) -> ModeOutput {
    let n = items.len();

    let mut premises = Vec::with_capacity(n - 1);
    for i in 0..n - 1 {
        // "items[i] contains items[i+1]" or "items[i+1] is inside items[i]".
        let (subject, relation, object) = if rng.next_bool() {
            (i, Relation::Contains, i + 1)
        } else {
            (i + 1, Relation::Inside, i)
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
        Relation::Inside
    } else {
        Relation::Contains
    };
    let expected = match asked {
        Relation::Inside => a > b,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{self, SymbolStyle};

    #[test]
    fn nesting_follows_index_order() {
        let mut rng = Prng::new(41);
        for _ in 0..200 {
            let items = symbols::draw(SymbolStyle::Glyphs, 5, &mut rng);
            let out = generate(&items, &mut rng, None);
            let q = &out.question;
            let truth = match q.relation {
                Relation::Inside => q.subject > q.object,
                Relation::Contains => q.subject < q.object,
                _ => unreachable!("hierarchy asks only inside/contains"),
            };
            assert_eq!(q.expected, truth);
        }
    }

    #[test]
    fn chain_links_adjacent_items_outward_in() {
        let mut rng = Prng::new(42);
        let items = symbols::draw(SymbolStyle::Letters, 4, &mut rng);
        let out = generate(&items, &mut rng, None);
        for (i, p) in out.premises.iter().enumerate() {
            match p.relation {
                Relation::Contains => assert_eq!((p.subject, p.object), (i, i + 1)),
                Relation::Inside => assert_eq!((p.subject, p.object), (i + 1, i)),
                _ => panic!("unexpected relation {:?}", p.relation),
            }
        }
    }
}
