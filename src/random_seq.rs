use crate::common::{Sequence, VALID_BASES};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;

///
/// generate random bases of given length from seed
///
pub fn generate(length: usize, seed: u64) -> Sequence {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    generate_with_rng(&mut rng, length)
}

///
/// generate random bases of given length using the rng
///
pub fn generate_with_rng<R: Rng>(rng: &mut R, length: usize) -> Sequence {
    (0..length)
        .map(|_| VALID_BASES[rng.gen_range(0..VALID_BASES.len())])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_seq() {
        let s = generate(50, 0);
        assert_eq!(s.len(), 50);
        assert!(s.iter().all(|b| VALID_BASES.contains(b)));
        // same seed, same sequence
        assert_eq!(s, generate(50, 0));
        assert_ne!(s, generate(50, 11));
    }
}
