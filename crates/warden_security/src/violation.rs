//! # Violation Bookkeeping
//!
//! Every check category keeps one [`ViolationRecord`] per player:
//!
//! - a violation level that grows with overshoot and decays by
//!   [`DECAY_FACTOR`] every tick,
//! - small pre-violation counters that gate noisy detections behind several
//!   consecutive qualifying ticks,
//! - the corrective actions requested during the current tick.

use std::collections::HashMap;
use std::fmt;

use warden_core::Location;

/// Multiplicative decay applied to the level once per tick.
pub const DECAY_FACTOR: f64 = 0.998;

/// Check categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckType {
    /// Air, fall, fly and bunny-hop checks for survival players.
    SurvivalFly,
}

impl CheckType {
    /// Configuration name of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SurvivalFly => "survival_fly",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hysteresis counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PreViolation {
    /// Tiny-jump speed overshoot.
    TinyBunny,
    /// Generic bunny-hop speed overshoot.
    BadBunnyHop,
    /// Short hop while starving.
    ShortBunny,
}

/// Violation state of one player in one check category.
#[derive(Clone, Debug, Default)]
pub struct ViolationRecord {
    level: f64,
    pre_violations: HashMap<PreViolation, u32>,
    cancel: bool,
    lag_back: Option<Location>,
}

impl ViolationRecord {
    /// Creates a clean record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current violation level.
    #[inline]
    #[must_use]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Adds to the level. Non-positive or non-finite deltas are ignored.
    pub fn add(&mut self, delta: f64) {
        if delta.is_finite() && delta > 0.0 {
            self.level += delta;
        }
    }

    /// Multiplies the level by `factor`.
    pub fn decay(&mut self, factor: f64) {
        self.level *= factor;
    }

    /// Returns true if the level has reached `threshold`.
    #[inline]
    #[must_use]
    pub fn is_cheat(&self, threshold: f64) -> bool {
        self.level >= threshold
    }

    /// Increments a pre-violation counter and returns its new value.
    pub fn add_pre_vl(&mut self, tag: PreViolation) -> u32 {
        let count = self.pre_violations.entry(tag).or_insert(0);
        *count += 1;
        *count
    }

    /// Current value of a pre-violation counter.
    #[must_use]
    pub fn pre_vl(&self, tag: PreViolation) -> u32 {
        self.pre_violations.get(&tag).copied().unwrap_or(0)
    }

    /// Resets a pre-violation counter.
    pub fn clear_pre_vl(&mut self, tag: PreViolation) {
        self.pre_violations.remove(&tag);
    }

    /// Requests cancellation of the current packet.
    pub fn set_cancel(&mut self) {
        self.cancel = true;
    }

    /// Requests a lag-back to `location`.
    pub fn set_lag_back(&mut self, location: Location) {
        self.lag_back = Some(location);
    }

    /// Takes the pending cancel request.
    pub fn take_cancel(&mut self) -> bool {
        std::mem::take(&mut self.cancel)
    }

    /// Takes the pending lag-back target.
    pub fn take_lag_back(&mut self) -> Option<Location> {
        self.lag_back.take()
    }

    /// Clears level, counters and pending actions.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A player's violation records, one per check category.
#[derive(Clone, Debug, Default)]
pub struct ViolationBook {
    records: HashMap<CheckType, ViolationRecord>,
}

impl ViolationBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record of a category, created on first use.
    pub fn record_mut(&mut self, check: CheckType) -> &mut ViolationRecord {
        self.records.entry(check).or_default()
    }

    /// Level of a category (0 if it never fired).
    #[must_use]
    pub fn level(&self, check: CheckType) -> f64 {
        self.records.get(&check).map_or(0.0, ViolationRecord::level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_ignores_garbage() {
        let mut record = ViolationRecord::new();
        record.add(-1.0);
        record.add(f64::NAN);
        record.add(f64::INFINITY);
        assert_eq!(record.level(), 0.0);
        record.add(2.5);
        assert!((record.level() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_decay_converges() {
        let mut record = ViolationRecord::new();
        record.add(100.0);
        for _ in 0..5_000 {
            record.decay(DECAY_FACTOR);
        }
        assert!(record.level() < 0.01);
        assert!(record.level() >= 0.0);
    }

    #[test]
    fn test_pre_violation_counters() {
        let mut record = ViolationRecord::new();
        assert_eq!(record.add_pre_vl(PreViolation::TinyBunny), 1);
        assert_eq!(record.add_pre_vl(PreViolation::TinyBunny), 2);
        assert_eq!(record.pre_vl(PreViolation::BadBunnyHop), 0);
        record.clear_pre_vl(PreViolation::TinyBunny);
        assert_eq!(record.pre_vl(PreViolation::TinyBunny), 0);
    }

    #[test]
    fn test_pending_actions_are_taken_once() {
        let mut record = ViolationRecord::new();
        let target = Location::new(1.0, 64.0, 1.0);
        record.set_cancel();
        record.set_lag_back(target);
        assert!(record.take_cancel());
        assert!(!record.take_cancel());
        assert_eq!(record.take_lag_back(), Some(target));
        assert_eq!(record.take_lag_back(), None);
    }

    #[test]
    fn test_book_creates_records_lazily() {
        let mut book = ViolationBook::new();
        assert_eq!(book.level(CheckType::SurvivalFly), 0.0);
        book.record_mut(CheckType::SurvivalFly).add(3.0);
        assert!((book.level(CheckType::SurvivalFly) - 3.0).abs() < 1e-12);
        assert_eq!(CheckType::SurvivalFly.to_string(), "survival_fly");
    }
}
