//! Symbol provider: N distinct opaque tokens per trial.

use serde::{Deserialize, Serialize};

use crate::premise::Item;
use crate::prng::Prng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolStyle {
    Letters,
    Syllables,
    Glyphs,
}

impl SymbolStyle {
    pub fn name(self) -> &'static str {
        match self {
            SymbolStyle::Letters => "letters",
            SymbolStyle::Syllables => "syllables",
            SymbolStyle::Glyphs => "glyphs",
        }
    }
}

// Vowel-free so single letters never read as words.
const LETTER_POOL: &[&str] = &[
    "B", "C", "D", "F", "G", "H", "J", "K", "L", "M", "N", "P", "Q", "R", "S", "T", "V", "W", "X",
    "Z",
];

const SYLLABLE_POOL: &[&str] = &[
    "KO", "RA", "MU", "TE", "SI", "LO", "NA", "VU", "PE", "DA", "GI", "ZO", "FY", "BE", "HU",
    "WI", "XA", "QO", "JU", "CE",
];

const GLYPH_POOL: &[&str] = &[
    "▲", "●", "■", "◆", "★", "✚", "◐", "▽", "◇", "○", "□", "△", "✖", "◑", "☆", "✦", "◈", "▣",
    "⬟", "⬢",
];

fn pool(style: SymbolStyle) -> &'static [&'static str] {
    match style {
        SymbolStyle::Letters => LETTER_POOL,
        SymbolStyle::Syllables => SYLLABLE_POOL,
        SymbolStyle::Glyphs => GLYPH_POOL,
    }
}

/// Draw `n` distinct items. Identity only; index order is the latent ground
/// truth the mode engines build on. Requests beyond the pool size get
/// synthesized numbered tokens so deep trials never fail.
pub fn draw(style: SymbolStyle, n: usize, rng: &mut Prng) -> Vec<Item> {
    let pool = pool(style);
    let mut order: Vec<usize> = (0..pool.len()).collect();
    rng.shuffle(&mut order);

    (0..n)
        .map(|index| {
            let token = match order.get(index) {
                Some(&p) => pool[p].to_string(),
                None => format!("#{}", index + 1),
            };
            Item { index, token }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_distinct_and_indexed() {
        let mut rng = Prng::new(3);
        for style in [SymbolStyle::Letters, SymbolStyle::Syllables, SymbolStyle::Glyphs] {
            let items = draw(style, 8, &mut rng);
            assert_eq!(items.len(), 8);
            for (i, item) in items.iter().enumerate() {
                assert_eq!(item.index, i);
            }
            let mut tokens: Vec<&str> = items.iter().map(|i| i.token.as_str()).collect();
            tokens.sort_unstable();
            tokens.dedup();
            assert_eq!(tokens.len(), 8);
        }
    }

    #[test]
    fn overflow_beyond_pool_synthesizes_tokens() {
        let mut rng = Prng::new(3);
        let items = draw(SymbolStyle::Letters, 25, &mut rng);
        let mut tokens: Vec<&str> = items.iter().map(|i| i.token.as_str()).collect();
        tokens.sort_unstable();
        tokens.dedup();
        assert_eq!(tokens.len(), 25);
    }
}
