//! Prime integer factorization

use super::TypedProblem;

/// Factor a positive integer into primes, smallest first.
///
/// The instance `1` has the empty factorization; `0` has none.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimeFactorization;

/// Witnesses that make Miller-Rabin deterministic for every `u64`.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((a as u128 * b as u128) % m as u128) as u64
}

fn pow_mod(mut base: u64, mut exp: u64, m: u64) -> u64 {
    let mut acc = 1u64;
    base %= m;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = mul_mod(acc, base, m);
        }
        base = mul_mod(base, base, m);
        exp >>= 1;
    }
    acc
}

/// Primality in time logarithmic in `n`; remote solutions may carry
/// arbitrary 64-bit factors.
fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    for &p in &WITNESSES {
        if n % p == 0 {
            return n == p;
        }
    }

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    WITNESSES.iter().all(|&a| {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            return true;
        }
        for _ in 1..s {
            x = mul_mod(x, x, n);
            if x == n - 1 {
                return true;
            }
        }
        false
    })
}

impl TypedProblem for PrimeFactorization {
    type Parameters = u64;
    type Solution = Vec<u64>;

    const ID: &'static str = "prime-integer-factorization";

    fn solve(&self, mut n: u64) -> Result<Vec<u64>, String> {
        if n == 0 {
            return Err("zero has no prime factorization".to_string());
        }

        let mut factors = Vec::new();
        let mut d = 2u64;
        while d.checked_mul(d).map_or(false, |sq| sq <= n) {
            while n % d == 0 {
                factors.push(d);
                n /= d;
            }
            d += 1;
        }
        if n > 1 {
            factors.push(n);
        }
        Ok(factors)
    }

    fn check(&self, n: &u64, factors: &Vec<u64>) -> bool {
        if !factors.iter().all(|&f| is_prime(f)) {
            return false;
        }
        factors
            .iter()
            .try_fold(1u64, |product, &f| product.checked_mul(f))
            == Some(*n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TypedHandler;
    use proptest::prelude::*;
    use shared_types::ProblemHandler;

    #[test]
    fn test_solves_and_checks_242() {
        let handler = TypedHandler::new(PrimeFactorization);

        let solution = handler.solve(r#"{"o":242}"#).unwrap();
        assert_eq!(solution, r#"{"o":[2,11,11]}"#);
        assert!(handler.check(r#"{"o":242}"#, &solution));
    }

    #[test]
    fn test_rejects_wrong_factorizations() {
        let p = PrimeFactorization;

        assert!(!p.check(&242, &vec![2, 11]));
        assert!(!p.check(&242, &vec![2, 121]));
        assert!(!p.check(&12, &vec![1, 12]));
        assert!(!p.check(&12, &vec![4, 3]));
        assert!(p.check(&12, &vec![3, 2, 2]));
    }

    #[test]
    fn test_edge_instances() {
        let p = PrimeFactorization;

        assert_eq!(p.solve(1).unwrap(), Vec::<u64>::new());
        assert!(p.check(&1, &vec![]));
        assert!(p.solve(0).is_err());
        assert!(!p.check(&0, &vec![]));
        assert_eq!(p.solve(97).unwrap(), vec![97]);
        assert!(!p.check(&u64::MAX, &vec![u64::MAX, 2]));
    }

    #[test]
    fn test_large_prime_checks_quickly() {
        let p = PrimeFactorization;
        let started = std::time::Instant::now();

        assert!(p.check(&4_611_686_018_427_387_847, &vec![4_611_686_018_427_387_847]));
        assert!(p.check(&18_446_744_073_709_551_557, &vec![18_446_744_073_709_551_557]));
        // Strong pseudoprime to several small bases.
        assert!(!p.check(&3_215_031_751, &vec![3_215_031_751]));
        assert!(!p.check(&(u32::MAX as u64), &vec![u32::MAX as u64]));

        assert!(started.elapsed() < std::time::Duration::from_millis(100));
    }

    proptest! {
        #[test]
        fn solutions_always_check(n in 1u64..1_000_000) {
            let p = PrimeFactorization;
            let factors = p.solve(n).unwrap();
            prop_assert!(factors.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(p.check(&n, &factors));
        }

        #[test]
        fn primality_agrees_with_trial_division(n in 0u64..200_000) {
            let trial = n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0);
            prop_assert_eq!(is_prime(n), trial);
        }
    }
}
