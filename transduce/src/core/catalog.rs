//! Named `i64` functions that plans may reference by name.
//!
//! Arithmetic saturates at the `i64` bounds so every catalogue function is
//! total.

use serde::{Deserialize, Serialize};

/// Element transforms available to `map` stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapFn {
    Square,
    Incr,
    Double,
    Negate,
}

impl MapFn {
    pub fn apply(self, x: i64) -> i64 {
        match self {
            MapFn::Square => x.saturating_mul(x),
            MapFn::Incr => x.saturating_add(1),
            MapFn::Double => x.saturating_mul(2),
            MapFn::Negate => x.saturating_neg(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MapFn::Square => "square",
            MapFn::Incr => "incr",
            MapFn::Double => "double",
            MapFn::Negate => "negate",
        }
    }
}

/// Element tests available to `filter` stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    IsPrime,
    IsEven,
    IsOdd,
    IsPositive,
}

impl Predicate {
    pub fn test(self, x: &i64) -> bool {
        match self {
            Predicate::IsPrime => is_prime(*x),
            Predicate::IsEven => x % 2 == 0,
            Predicate::IsOdd => x % 2 != 0,
            Predicate::IsPositive => *x > 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Predicate::IsPrime => "is_prime",
            Predicate::IsEven => "is_even",
            Predicate::IsOdd => "is_odd",
            Predicate::IsPositive => "is_positive",
        }
    }
}

/// Trial division up to `sqrt(n)`; values below 2 are never prime.
pub fn is_prime(n: i64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    let mut divisor = 2_i64;
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_below_thirty() {
        let primes: Vec<i64> = (-3..30).filter(|n| is_prime(*n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn is_prime_handles_large_values() {
        assert!(is_prime(2_147_483_647));
        assert!(!is_prime(i64::MAX));
    }

    #[test]
    fn map_functions_saturate() {
        assert_eq!(MapFn::Square.apply(i64::MAX), i64::MAX);
        assert_eq!(MapFn::Incr.apply(i64::MAX), i64::MAX);
        assert_eq!(MapFn::Negate.apply(i64::MIN), i64::MAX);
        assert_eq!(MapFn::Double.apply(-4), -8);
    }

    #[test]
    fn names_match_serialized_form() {
        for function in [MapFn::Square, MapFn::Incr, MapFn::Double, MapFn::Negate] {
            let json = serde_json::to_string(&function).expect("serialize");
            assert_eq!(json, format!("\"{}\"", function.name()));
        }
        for predicate in [
            Predicate::IsPrime,
            Predicate::IsEven,
            Predicate::IsOdd,
            Predicate::IsPositive,
        ] {
            let json = serde_json::to_string(&predicate).expect("serialize");
            assert_eq!(json, format!("\"{}\"", predicate.name()));
        }
    }

    #[test]
    fn parity_predicates_handle_negatives() {
        assert!(Predicate::IsOdd.test(&-3));
        assert!(Predicate::IsEven.test(&-4));
        assert!(!Predicate::IsPositive.test(&0));
    }
}
