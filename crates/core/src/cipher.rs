//! Session-scoped substitution cipher over the relation vocabulary.
//!
//! Nonsense tokens come from a pool smaller than the vocabulary (14 over 20),
//! assigned cyclically after a shuffle. The `Relation::ALL` ordering makes
//! this safe per round: the six order/label/containment keywords occupy the
//! cycle positions that wrap onto the last six spatial keywords, and no mode
//! ever mixes those two groups inside a single round. Callers must not assume
//! injectivity beyond the keywords actually used in one round.

use hashbrown::HashMap;

use crate::premise::Relation;
use crate::prng::Prng;

/// Per-round probability of regenerating the key mid-session.
pub const KEY_CHANGE_CHANCE: f32 = 0.08;

const NONSENSE_POOL: [&str; 14] = [
    "zorp", "blix", "fendle", "crast", "murn", "quev", "splor", "drint", "vash", "glomp", "trell",
    "skive", "prund", "yelk",
];

#[derive(Debug, Clone)]
pub struct CipherMap {
    map: HashMap<Relation, &'static str>,
}

impl CipherMap {
    pub fn generate(rng: &mut Prng) -> Self {
        let mut pool = NONSENSE_POOL;
        rng.shuffle(&mut pool);

        let mut map = HashMap::with_capacity(Relation::ALL.len());
        for (i, r) in Relation::ALL.into_iter().enumerate() {
            map.insert(r, pool[i % pool.len()]);
        }
        Self { map }
    }

    /// Nonsense token for a keyword; unknown keywords pass through unchanged.
    pub fn encode(&self, relation: Relation) -> &str {
        self.map
            .get(&relation)
            .copied()
            .unwrap_or_else(|| relation.keyword())
    }

    /// (keyword, token) pairs for the relations a trial actually used,
    /// deduplicated, in vocabulary order.
    pub fn entries(&self, used: &[Relation]) -> Vec<(String, String)> {
        Relation::ALL
            .into_iter()
            .filter(|r| used.contains(r))
            .map(|r| (r.keyword().to_string(), self.encode(r).to_string()))
            .collect()
    }
}

/// Keyword text for a relation under an optional cipher.
pub fn keyword_for(relation: Relation, cipher: Option<&CipherMap>) -> &str {
    match cipher {
        Some(c) => c.encode(relation),
        None => relation.keyword(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_injective_over(map: &CipherMap, rels: &[Relation]) {
        let mut tokens: Vec<&str> = rels.iter().map(|&r| map.encode(r)).collect();
        tokens.sort_unstable();
        let before = tokens.len();
        tokens.dedup();
        assert_eq!(tokens.len(), before, "token collision within {rels:?}");
    }

    #[test]
    fn per_round_vocabularies_never_collide() {
        let mut rng = Prng::new(11);
        for _ in 0..50 {
            let map = CipherMap::generate(&mut rng);

            assert_injective_over(&map, &[Relation::Greater, Relation::Less]);
            assert_injective_over(&map, &[Relation::Same, Relation::Opposite]);
            assert_injective_over(&map, &[Relation::Contains, Relation::Inside]);
            // 2D spatial with movement/deictic locals: the 12 horizontal keywords.
            assert_injective_over(
                &map,
                &[
                    Relation::North,
                    Relation::South,
                    Relation::East,
                    Relation::West,
                    Relation::NorthEast,
                    Relation::NorthWest,
                    Relation::SouthEast,
                    Relation::SouthWest,
                    Relation::Left,
                    Relation::Right,
                    Relation::Front,
                    Relation::Behind,
                ],
            );
            // 3D spatial: compass plus the vertical pair.
            assert_injective_over(
                &map,
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
                ],
            );
            // Default spatial question may fall back to "same location".
            assert_injective_over(
                &map,
                &[
                    Relation::North,
                    Relation::South,
                    Relation::East,
                    Relation::West,
                    Relation::Same,
                ],
            );
        }
    }

    #[test]
    fn tokens_are_disjoint_from_keywords() {
        let mut rng = Prng::new(4);
        let map = CipherMap::generate(&mut rng);
        for r in Relation::ALL {
            assert_ne!(map.encode(r), r.keyword());
        }
    }

    #[test]
    fn entries_follow_vocabulary_order_and_dedup() {
        let mut rng = Prng::new(5);
        let map = CipherMap::generate(&mut rng);
        let used = [Relation::Less, Relation::Greater, Relation::Less];
        let entries = map.entries(&used);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "greater");
        assert_eq!(entries[1].0, "less");
    }
}
