/// xorshift32 PRNG. Placement randomness only, nothing security sensitive.
#[derive(Clone, Copy, Debug)]
pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform-ish value in `0..max`. `max` must be non-zero.
    pub fn below(&mut self, max: u8) -> u8 {
        (self.next_u32() % max as u32) as u8
    }
}
