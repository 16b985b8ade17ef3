//! Checked positional counters.
//!
//! Index-aware operators and counting reducers must report overflow instead of
//! wrapping once the result width is exhausted.

use crate::error::{Result, SeqError};

/// Running 32-bit element index for index-aware operators.
///
/// `next()` hands out 0, 1, 2, ... and fails once the next index would exceed
/// `i32::MAX`.
#[derive(Debug, Clone, Default)]
pub struct Position {
    next: i64,
}

impl Position {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    /// Start counting from `index`. Available to tests and under the
    /// `test-util` feature.
    #[cfg(any(test, feature = "test-util"))]
    pub fn starting_at(index: i32) -> Self {
        Self {
            next: i64::from(index),
        }
    }

    pub fn next(&mut self) -> Result<i32> {
        let idx = i32::try_from(self.next)
            .map_err(|_| SeqError::overflow("element index exceeds i32::MAX"))?;
        self.next += 1;
        Ok(idx)
    }
}

/// Element tally for `count` (32-bit) and `long_count` (64-bit).
#[derive(Debug, Clone, Copy)]
pub struct Tally {
    n: u64,
    max: u64,
    width: &'static str,
}

impl Tally {
    pub fn i32() -> Self {
        Self {
            n: 0,
            max: i32::MAX as u64,
            width: "i32",
        }
    }

    pub fn i64() -> Self {
        Self {
            n: 0,
            max: i64::MAX as u64,
            width: "i64",
        }
    }

    #[cfg(test)]
    fn with_start(mut self, n: u64) -> Self {
        self.n = n;
        self
    }

    pub fn bump(&mut self) -> Result<()> {
        if self.n >= self.max {
            return Err(self.overflow());
        }
        self.n += 1;
        Ok(())
    }

    /// Validate an externally known cardinality against this width.
    pub fn check_known(self, known: u64) -> Result<u64> {
        if known > self.max {
            return Err(self.overflow());
        }
        Ok(known)
    }

    pub fn get(&self) -> u64 {
        self.n
    }

    fn overflow(&self) -> SeqError {
        SeqError::overflow(format!("element count exceeds {}::MAX", self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_stops_at_i32_max() {
        let mut pos = Position::starting_at(i32::MAX - 1);
        assert_eq!(pos.next().unwrap(), i32::MAX - 1);
        assert_eq!(pos.next().unwrap(), i32::MAX);
        assert!(pos.next().unwrap_err().is_overflow());
    }

    #[test]
    fn tally_widths() {
        let mut t = Tally::i32().with_start(i32::MAX as u64 - 1);
        t.bump().unwrap();
        assert_eq!(t.get(), i32::MAX as u64);
        assert!(t.bump().unwrap_err().is_overflow());

        assert!(Tally::i32().check_known(1 << 31).is_err());
        assert_eq!(Tally::i64().check_known(1 << 31).unwrap(), 1 << 31);
        assert!(Tally::i64().check_known(u64::MAX).is_err());
    }
}
