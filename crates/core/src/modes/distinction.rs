//! Distinction: same/opposite premises propagating a binary label from item 0.

use crate::cipher::{keyword_for, CipherMap};
use crate::premise::{render_question, render_statement, Item, Premise, Question, Relation};
use crate::prng::Prng;

use super::ModeOutput;

pub fn generate(items: &[Item], rng: &mut Prng, cipher: Option<&CipherMap>) -> ModeOutput {
    let n = items.len();

    let mut labels = vec![false; n];
    labels[0] = rng.next_bool();

    let mut premises = Vec::with_capacity(n - 1);
    for i in 1..n {
        let same = rng.next_bool();
        labels[i] = if same { labels[i - 1] } else { !labels[i - 1] };

        let relation = if same { Relation::Same } else { Relation::Opposite };
        // Premise direction is arbitrary; the relation is symmetric.
        let (subject, object) = if rng.next_bool() { (i - 1, i) } else { (i, i - 1) };
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
        Relation::Same
    } else {
        Relation::Opposite
    };
    let share = labels[a] == labels[b];
    let expected = match asked {
        Relation::Same => share,
        _ => !share,
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

    /// Re-derive labels by walking the chain, then check the answer.
    fn propagated(premises: &[Premise], n: usize) -> Vec<bool> {
        let mut labels = vec![false; n];
        for p in premises {
            let (from, to) = (p.subject.min(p.object), p.subject.max(p.object));
            labels[to] = match p.relation {
                Relation::Same => labels[from],
                _ => !labels[from],
            };
        }
        labels
    }

    #[test]
    fn answer_equals_propagated_parity() {
        let mut rng = Prng::new(31);
        for _ in 0..200 {
            let items = symbols::draw(SymbolStyle::Syllables, 6, &mut rng);
            let out = generate(&items, &mut rng, None);
            let labels = propagated(&out.premises, items.len());
            let q = &out.question;
            let share = labels[q.subject] == labels[q.object];
            let truth = match q.relation {
                Relation::Same => share,
                _ => !share,
            };
            assert_eq!(q.expected, truth);
        }
    }

    #[test]
    fn single_same_premise_means_shared_label() {
        // Items [A,B], premise SAME: "Is A same as B?" must be true.
        let mut rng = Prng::new(32);
        let items = symbols::draw(SymbolStyle::Letters, 2, &mut rng);
        for _ in 0..100 {
            let out = generate(&items, &mut rng, None);
            if out.premises[0].relation == Relation::Same {
                let expected_same = out.question.relation == Relation::Same;
                assert_eq!(out.question.expected, expected_same);
            }
        }
    }
}
