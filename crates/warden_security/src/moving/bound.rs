//! Allowed/limit bound pairs returned by every analyzer.

/// An `(allowed, limit)` pair. The tick violates when `allowed > limit`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bound {
    /// Measured quantity (height, speed, allowance).
    pub allowed: f64,
    /// Largest legitimate value.
    pub limit: f64,
}

impl Bound {
    /// Never violates.
    pub const PERMISSIVE: Self = Self::new(f64::MIN_POSITIVE, f64::MAX);

    /// Both sides zero: never violates, but also grants nothing.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a bound.
    #[inline]
    #[must_use]
    pub const fn new(allowed: f64, limit: f64) -> Self {
        Self { allowed, limit }
    }

    /// Returns true if the measured value exceeds the limit.
    #[inline]
    #[must_use]
    pub fn exceeds(&self) -> bool {
        self.allowed > self.limit
    }

    /// Amount by which the limit is exceeded (0 when within bounds).
    #[inline]
    #[must_use]
    pub fn overshoot(&self) -> f64 {
        (self.allowed - self.limit).max(0.0)
    }

    /// Violation score contributed by this bound.
    #[inline]
    #[must_use]
    pub fn score(&self) -> f64 {
        if self.exceeds() {
            self.overshoot() * 10.0 + 1.1
        } else {
            0.0
        }
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::PERMISSIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_never_exceeds() {
        assert!(!Bound::PERMISSIVE.exceeds());
        assert!(!Bound::ZERO.exceeds());
        assert_eq!(Bound::PERMISSIVE.score(), 0.0);
    }

    #[test]
    fn test_score_formula() {
        let bound = Bound::new(1.5, 1.25);
        assert!((bound.score() - 3.6).abs() < 1e-9);
    }
}
