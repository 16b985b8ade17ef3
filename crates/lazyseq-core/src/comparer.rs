//! Pluggable equality and ordering capabilities.
//!
//! The `_with` operators take an [`EqRef`] / [`OrdRef`] and place no bound on
//! the key type beyond what the comparer handles. The plain operators supply
//! [`default_eq`] / [`default_ord`] and so require `Eq + Hash` / `Ord`.

use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Equality + hashing capability. `equals(a, b)` implies `hash(a) == hash(b)`.
pub trait EqualityComparer<T: ?Sized>: Send + Sync {
    fn equals(&self, a: &T, b: &T) -> bool;
    fn hash(&self, value: &T) -> u64;
}

/// Total ordering capability.
pub trait Comparer<T: ?Sized>: Send + Sync {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

pub type EqRef<T> = Arc<dyn EqualityComparer<T>>;
pub type OrdRef<T> = Arc<dyn Comparer<T>>;

/// Uses the type's own `Eq` + `Hash`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquality;

impl<T: Eq + Hash + ?Sized> EqualityComparer<T> for DefaultEquality {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    fn hash(&self, value: &T) -> u64 {
        let mut h = DefaultHasher::new();
        value.hash(&mut h);
        h.finish()
    }
}

/// Uses the type's own `Ord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultOrder;

impl<T: Ord + ?Sized> Comparer<T> for DefaultOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Case-insensitive comparison for strings (Unicode simple lowercase folding).
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitive;

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

impl EqualityComparer<str> for CaseInsensitive {
    fn equals(&self, a: &str, b: &str) -> bool {
        folded(a).eq(folded(b))
    }

    fn hash(&self, value: &str) -> u64 {
        let mut h = DefaultHasher::new();
        for c in folded(value) {
            c.hash(&mut h);
        }
        h.finish()
    }
}

impl EqualityComparer<String> for CaseInsensitive {
    fn equals(&self, a: &String, b: &String) -> bool {
        EqualityComparer::<str>::equals(self, a, b)
    }

    fn hash(&self, value: &String) -> u64 {
        EqualityComparer::<str>::hash(self, value)
    }
}

impl Comparer<str> for CaseInsensitive {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        folded(a).cmp(folded(b))
    }
}

impl Comparer<String> for CaseInsensitive {
    fn compare(&self, a: &String, b: &String) -> Ordering {
        Comparer::<str>::compare(self, a, b)
    }
}

/// Equality comparer backed by a pair of closures.
pub struct FnEquality<E, H> {
    eq: E,
    hash: H,
}

impl<E, H> FnEquality<E, H> {
    pub fn new(eq: E, hash: H) -> Self {
        Self { eq, hash }
    }
}

impl<T, E, H> EqualityComparer<T> for FnEquality<E, H>
where
    T: ?Sized,
    E: Fn(&T, &T) -> bool + Send + Sync,
    H: Fn(&T) -> u64 + Send + Sync,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.eq)(a, b)
    }

    fn hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }
}

/// Ordering comparer backed by a closure.
pub struct FnOrder<F>(pub F);

impl<T, F> Comparer<T> for FnOrder<F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }
}

pub fn default_eq<T: Eq + Hash + 'static>() -> EqRef<T> {
    Arc::new(DefaultEquality)
}

pub fn default_ord<T: Ord + 'static>() -> OrdRef<T> {
    Arc::new(DefaultOrder)
}

pub fn case_insensitive_eq() -> EqRef<String> {
    Arc::new(CaseInsensitive)
}

pub fn case_insensitive_ord() -> OrdRef<String> {
    Arc::new(CaseInsensitive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_equal_strings_hash_alike() {
        let c = CaseInsensitive;
        let a = "Hedlund, Magnus".to_string();
        let b = "HEDLUND, magnus".to_string();
        assert!(EqualityComparer::<String>::equals(&c, &a, &b));
        assert_eq!(
            EqualityComparer::<String>::hash(&c, &a),
            EqualityComparer::<String>::hash(&c, &b)
        );
        assert_eq!(Comparer::<String>::compare(&c, &a, &b), Ordering::Equal);
    }

    #[test]
    fn defaults_follow_the_type() {
        let eq = default_eq::<i32>();
        assert!(eq.equals(&3, &3));
        assert!(!eq.equals(&3, &4));
        let ord = default_ord::<i32>();
        assert_eq!(ord.compare(&1, &2), Ordering::Less);
    }

    #[test]
    fn closure_comparers() {
        let parity: EqRef<i32> = Arc::new(FnEquality::new(
            |a: &i32, b: &i32| a % 2 == b % 2,
            |v: &i32| (v % 2).unsigned_abs() as u64,
        ));
        assert!(parity.equals(&2, &8));
        assert!(!parity.equals(&2, &7));

        let reversed: OrdRef<i32> = Arc::new(FnOrder(|a: &i32, b: &i32| b.cmp(a)));
        assert_eq!(reversed.compare(&1, &2), Ordering::Greater);
    }
}
