// Minimal seedable PRNG (no external crates).
//
// This is NOT cryptographically secure.
// It is used only for trial generation and must be deterministic under a
// fixed seed so generated puzzles are reproducible in tests.

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // Avoid a zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        // Marsaglia / Vigna family. Simple, fast, decent for simulation noise.
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline]
    pub fn next_f32_01(&mut self) -> f32 {
        // Convert to [0,1).
        let x = self.next_u32();
        (x as f32) / (u32::MAX as f32 + 1.0)
    }

    #[inline]
    pub fn next_bool(&mut self) -> bool {
        (self.next_u32() & 1) == 0
    }

    /// True with probability `p` (clamped to [0,1]).
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32_01() < p.clamp(0.0, 1.0)
    }

    #[inline]
    pub fn gen_range_usize(&mut self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        let span = (high - low) as u32;
        let v = self.next_u32() % span;
        low + v as usize
    }

    /// Two distinct indices in `0..n`. Requires `n >= 2`.
    pub fn pick_two_distinct(&mut self, n: usize) -> (usize, usize) {
        let a = self.gen_range_usize(0, n);
        let mut b = self.gen_range_usize(0, n - 1);
        if b >= a {
            b += 1;
        }
        (a, b)
    }

    pub fn pick<'a, T>(&mut self, xs: &'a [T]) -> &'a T {
        &xs[self.gen_range_usize(0, xs.len())]
    }

    /// Fisher-Yates in place.
    pub fn shuffle<T>(&mut self, xs: &mut [T]) {
        let n = xs.len();
        for i in (1..n).rev() {
            let j = self.gen_range_usize(0, i + 1);
            xs.swap(i, j);
        }
    }
}
