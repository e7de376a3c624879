use rand::{Rng, SeedableRng, rngs::StdRng};

/// The game's random number source.
///
/// A single `Roller` is created by whoever owns the game and lent to each die
/// as it rolls, so every die draws from the same seeded stream.
#[derive(Debug)]
pub struct Roller {
    rng: StdRng,
}

impl Roller {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let rng = StdRng::from_os_rng();
        Roller { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Roller { rng }
    }

    /// Uses the given seed if there is one, the OS otherwise.
    pub fn seeded(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed),
            None => Self::new(),
        }
    }

    /// Uniform draw in `[0, n)`. `n` must be non-zero.
    pub fn range(&mut self, n: u32) -> u32 {
        self.rng.random_range(0..n)
    }

    #[cfg(test)]
    pub fn test_rng() -> Self {
        Self::from_seed(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds() {
        let mut roller = Roller::test_rng();
        for _ in 0..10000 {
            assert!(roller.range(6) < 6);
        }
    }

    #[test]
    fn test_range_covers_every_value() {
        let mut roller = Roller::test_rng();
        let mut seen = [false; 20];
        for _ in 0..10000 {
            seen[roller.range(20) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Roller::from_seed(7);
        let mut b = Roller::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.range(1000), b.range(1000));
        }
    }

    #[test]
    fn test_seeded_uses_given_seed() {
        let mut a = Roller::seeded(Some(7));
        let mut b = Roller::from_seed(7);
        for _ in 0..100 {
            assert_eq!(a.range(1000), b.range(1000));
        }
    }
}
