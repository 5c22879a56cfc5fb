///
/// probability calculation in log space
/// implements logaddexp
///
use crate::error::{PhmmError, Result};
use approx::AbsDiffEq;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;

///
/// Wrapper of f64 that represents probability `0 <= p <= 1`
/// stored as the natural log `log p`.
///
#[derive(Clone, Copy, Debug, SerializeDisplay, DeserializeFromStr)]
pub struct Prob(f64);

///
/// short-hand of `Prob::from_prob`
///
pub fn p(p: f64) -> Prob {
    Prob::from_prob(p)
}

///
/// short-hand of `Prob::from_log_prob`
///
pub fn lp(lp: f64) -> Prob {
    Prob::from_log_prob(lp)
}

impl Prob {
    ///
    /// `p=0` is mapped into `log p = -inf`.
    ///
    pub fn from_prob(value: f64) -> Prob {
        Prob(value.ln())
    }
    ///
    /// Checked version of `from_prob`.
    ///
    /// NaN, negative values and values above one are rejected
    /// instead of being silently turned into NaN or positive log.
    ///
    pub fn try_from_prob(value: f64) -> Result<Prob> {
        if value.is_nan() || value < 0.0 || value > 1.0 {
            Err(PhmmError::InvalidParameter(format!(
                "probability {} is not in [0, 1]",
                value
            )))
        } else {
            Ok(Prob::from_prob(value))
        }
    }
    ///
    ///
    pub fn from_log_prob(log_value: f64) -> Prob {
        Prob(log_value)
    }
    ///
    /// Get the probability (in `[0, 1]`)
    pub fn to_value(self) -> f64 {
        self.0.exp()
    }
    ///
    /// Get the log probability
    pub fn to_log_value(self) -> f64 {
        self.0
    }
    ///
    /// Is `p == 0` or not? (log p = -inf)
    ///
    pub fn is_zero(self) -> bool {
        self.0.is_infinite() && self.0.is_sign_negative()
    }
    ///
    /// Is `p == 1`? (log p = 0)
    ///
    pub fn is_one(self) -> bool {
        self.0 == 0.0
    }
    ///
    /// The log value is NaN
    ///
    pub fn is_nan(self) -> bool {
        self.0.is_nan()
    }
    ///
    /// prob=0.0
    ///
    pub fn zero() -> Prob {
        Prob(f64::NEG_INFINITY)
    }
    ///
    /// prob=1.0
    ///
    pub fn one() -> Prob {
        Prob(0.0)
    }
}

/// p=0 (Prob(-inf)) as a default value
impl Default for Prob {
    fn default() -> Self {
        Prob(f64::NEG_INFINITY)
    }
}

impl num_traits::One for Prob {
    fn one() -> Self {
        Prob::one()
    }
}

impl num_traits::Zero for Prob {
    fn zero() -> Self {
        Prob::zero()
    }
    fn is_zero(&self) -> bool {
        Prob::is_zero(*self)
    }
}

// display
impl std::fmt::Display for Prob {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({:.4})", self.0, self.to_value())
    }
}
impl FromStr for Prob {
    type Err = std::num::ParseFloatError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let front = match s.split_once('(') {
            Some((front, _)) => front,
            None => s,
        };
        front.parse::<f64>().map(Prob)
    }
}

/// Addition of two probabilities `px + py` in log space
///
/// If `px > py`:
///
/// ```text
/// log(exp(x) + exp(y))
///  = x + log(1 + exp(y-x))
/// ```
impl std::ops::Add for Prob {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let x = self.0;
        let y = other.0;
        let (x, y) = if x >= y { (x, y) } else { (y, x) };
        if y == f64::NEG_INFINITY {
            // x + 0 = x
            Prob(x)
        } else if x == y {
            // x + x = 2x
            Prob(x + 2f64.ln())
        } else {
            Prob(x + (y - x).exp().ln_1p())
        }
    }
}

/// Multiplication of two probabilities `px * py` in log space
///
/// ```text
/// log(px * py) = log(px) + log(py)
/// ```
impl std::ops::Mul for Prob {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Prob(self.0 + other.0)
    }
}

// assign
impl std::ops::AddAssign for Prob {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
impl std::ops::MulAssign for Prob {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}
// sum/prod
impl std::iter::Sum for Prob {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Prob::zero(), |a, b| a + b)
    }
}
impl<'a> std::iter::Sum<&'a Self> for Prob {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Prob::zero(), |a, b| a + *b)
    }
}
impl std::iter::Product for Prob {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Prob::one(), |a, b| a * b)
    }
}
impl<'a> std::iter::Product<&'a Self> for Prob {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Prob::one(), |a, b| a * *b)
    }
}

/// for approx `assert_abs_diff_eq`
impl AbsDiffEq for Prob {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        f64::abs_diff_eq(&self.0, &other.0, epsilon)
    }
}

/// Total order of the log values by `f64::total_cmp`
impl Ord for Prob {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
impl PartialOrd for Prob {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl PartialEq for Prob {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}
impl Eq for Prob {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prob_add_mul() {
        assert_eq!(p(0.0) + p(1.0), p(1.0));
        assert_eq!(p(0.0) * p(1.0), p(0.0));
        assert_abs_diff_eq!((p(0.3) + p(0.3)).0, p(0.6).0);
        assert_abs_diff_eq!((p(0.3) * p(0.3)).0, p(0.09).0);
        assert_abs_diff_eq!((p(0.5) + p(0.00001)).0, p(0.50001).0);
        assert_abs_diff_eq!((p(0.5) * p(0.00001)).0, p(0.000005).0);
    }
    #[test]
    fn prob_add_is_stable_for_tiny_values() {
        // exp(-1000) underflows to 0 in linear space
        let x = lp(-1000.0);
        let y = lp(-1000.0);
        assert_abs_diff_eq!((x + y).to_log_value(), -1000.0 + 2f64.ln(), epsilon = 1e-12);
        let z = lp(-1001.0);
        assert!((x + z).to_log_value() > -1000.0);
    }
    #[test]
    fn prob_sum_prod() {
        // sum/prod of zero element vec
        let xs: Vec<Prob> = vec![];
        let sum: Prob = xs.iter().sum();
        let product: Prob = xs.iter().product();
        assert_eq!(sum, p(0.0));
        assert_eq!(product, p(1.0));

        let xs = vec![p(0.1), p(0.1), p(0.1)];
        let sum: Prob = xs.iter().sum();
        let product: Prob = xs.iter().product();
        assert_relative_eq!(sum.to_value(), 0.3);
        assert_relative_eq!(product.to_value(), 0.001);
    }
    #[test]
    fn prob_zero_one() {
        assert_eq!(Prob::one(), Prob::from_prob(1.0));
        assert_eq!(Prob::zero(), Prob::from_prob(0.0));
        assert!(Prob::zero().is_zero());
        assert!(!p(0.00001).is_zero());
        assert!(Prob::one().is_one());
    }
    #[test]
    fn prob_try_from() {
        assert!(Prob::try_from_prob(0.5).is_ok());
        assert!(Prob::try_from_prob(0.0).unwrap().is_zero());
        assert!(Prob::try_from_prob(1.0).unwrap().is_one());
        assert!(Prob::try_from_prob(-0.1).is_err());
        assert!(Prob::try_from_prob(1.1).is_err());
        assert!(Prob::try_from_prob(f64::NAN).is_err());
    }
    #[test]
    fn prob_max_min() {
        let ps = vec![p(0.9), p(0.2), p(0.5), p(0.1), p(1.0), p(0.0)];
        assert_eq!(*ps.iter().max().unwrap(), p(1.0));
        assert_eq!(*ps.iter().min().unwrap(), p(0.0));
        assert!(p(0.1) > p(0.09999));
        assert!(p(0.0) < p(0.01));
    }
    #[test]
    fn prob_serialize() {
        let p1 = Prob::one();
        let p05 = Prob::from_prob(0.5);
        let p0 = Prob::zero();
        assert_eq!(Prob::from_str(&p1.to_string()).unwrap(), p1);
        assert_eq!(Prob::from_str(&p05.to_string()).unwrap(), p05);
        assert_eq!(Prob::from_str(&p0.to_string()).unwrap(), p0);
        assert_eq!(Prob::from_str("-1.5").unwrap(), lp(-1.5));

        let f = |p: Prob| -> Prob {
            let json = serde_json::to_string(&p).unwrap();
            serde_json::from_str(&json).unwrap()
        };
        assert_eq!(p1, f(p1));
        assert_eq!(p05, f(p05));
        assert_eq!(p0, f(p0));
    }
    #[test]
    fn prob_order_agrees_with_cmp() {
        let neg = lp(-0.0);
        let pos = lp(0.0);
        assert!(neg < pos);
        assert_ne!(neg, pos);
        assert_eq!(neg.cmp(&pos), std::cmp::Ordering::Less);
        assert_eq!(neg.partial_cmp(&pos), Some(neg.cmp(&pos)));
        assert_eq!(std::cmp::max(neg, pos).to_log_value().to_bits(), 0.0f64.to_bits());
        assert!(Prob::zero() < neg);
    }
}
