use super::*;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};
use std::ops::Range;

pub trait RandomWeights: Sized {
    /// Generates a complete score graph on `n` nodes in which each of the `n(n-1)/2` scores is
    /// drawn independently and uniformly from `range`.
    fn random_uniform<R: Rng>(rng: &mut R, n: NumNodes, range: Range<Score>) -> Self;

    /// Same as [`RandomWeights::random_uniform`], but scores follow a normal distribution.
    /// With `mean` close to zero a good share of scores is negative.
    /// ** Panics if std_dev is negative or not finite **
    fn random_normal<R: Rng>(rng: &mut R, n: NumNodes, mean: Score, std_dev: Score) -> Self;
}

impl RandomWeights for WeightMatrix {
    fn random_uniform<R: Rng>(rng: &mut R, n: NumNodes, range: Range<Score>) -> Self {
        let distr = Uniform::from(range);
        Self::from_fn(n, |_, _| distr.sample(rng))
    }

    fn random_normal<R: Rng>(rng: &mut R, n: NumNodes, mean: Score, std_dev: Score) -> Self {
        let distr = Normal::new(mean, std_dev).unwrap();
        Self::from_fn(n, |_, _| distr.sample(rng))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::InvariantCheck;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn uniform() {
        let mut rng = Pcg64::seed_from_u64(0x1234);
        for n in [0, 1, 2, 7, 12] {
            let matrix = WeightMatrix::random_uniform(&mut rng, n, 0.0..1.0);
            assert_eq!(matrix.number_of_nodes(), n);
            assert!(matrix.is_correct().is_ok());
            assert!(matrix.edges().all(|e| (0.0..1.0).contains(&e.score())));
        }
    }

    #[test]
    fn normal_has_negative_scores() {
        let mut rng = Pcg64::seed_from_u64(0x4321);
        let matrix = WeightMatrix::random_normal(&mut rng, 16, 0.0, 1.0);
        assert!(matrix.is_correct().is_ok());
        assert!(!matrix.is_non_negative());
    }
}
