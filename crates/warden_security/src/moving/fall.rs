//! # Free-Fall Validator
//!
//! Decides whether the recent vertical motion follows a real parabolic fall.
//!
//! ## Modes
//!
//! - **Stationary** (horizontal speed ≤ 0.3): speeds must never drop below
//!   their running max, and each vertical delta must match the drag-damped
//!   gravity recurrence `(prev − 0.08) × drag`.
//! - **Moving**: every recorded tick is compared against the analytic fall
//!   speed `sqrt(g·Δxz²/(2·Δy) + 2·g·Δy)` measured from the oldest recorded
//!   position.
//!
//! Each mismatch counts as one lag tick; a handful is tolerated to absorb
//! network jitter.

use super::data::{HistoryEntry, PlayerMotionState};

/// Horizontal speed at or below which the stationary mode applies.
pub const STATIONARY_SPEED_MAX: f64 = 0.3;

/// Gravity per tick.
const GRAVITY_STEP: f64 = 0.08;

/// Absolute tolerance of the recurrence check.
const RECURRENCE_TOLERANCE: f64 = 0.017;

/// Predictions smaller than this are too close to the apex to judge.
const PREDICTION_FLOOR: f64 = 0.005;

/// Trajectory gravity of the moving mode.
const TRAJECTORY_GRAVITY: f64 = -0.98;

/// Slack on the expected horizontal displacement.
const HORIZONTAL_SLACK: f64 = 1.5;

/// Lag ticks tolerated in stationary mode.
pub const STATIONARY_LAG_MAX: u32 = 8;

/// Lag ticks tolerated in moving mode.
pub const MOVING_LAG_MAX: u32 = 10;

/// Returns true if the recorded motion is a legitimate fall.
///
/// An ongoing jump is always accepted.
#[must_use]
pub fn is_free_fall(state: &PlayerMotionState, horizontal_speed: f64) -> bool {
    if state.is_jump {
        return true;
    }
    if horizontal_speed <= STATIONARY_SPEED_MAX {
        stationary_lag(state.history(), state.friction.vertical) <= STATIONARY_LAG_MAX
    } else {
        moving_lag(state.history()) <= MOVING_LAG_MAX
    }
}

/// Lag ticks of a near-vertical fall, oldest entry first.
#[must_use]
pub fn stationary_lag<'a, I>(entries: I, vertical_drag: f64) -> u32
where
    I: IntoIterator<Item = &'a HistoryEntry>,
    I::IntoIter: Clone,
{
    let entries = entries.into_iter();
    let mut lag = 0;

    let mut max_speed = 0.0_f64;
    for entry in entries.clone() {
        if entry.speed >= max_speed {
            max_speed = entry.speed;
        } else {
            lag += 1;
        }
    }

    let mut previous = 0.0;
    for entry in entries {
        let predicted = (previous - GRAVITY_STEP) * vertical_drag;
        if (entry.motion_y - predicted).abs() > RECURRENCE_TOLERANCE
            && predicted.abs() > PREDICTION_FLOOR
        {
            lag += 1;
        }
        previous = entry.motion_y;
    }
    lag
}

/// Lag ticks of a fall with horizontal motion, oldest entry first.
#[must_use]
pub fn moving_lag<'a, I>(entries: I) -> u32
where
    I: IntoIterator<Item = &'a HistoryEntry>,
    I::IntoIter: Clone,
{
    let entries = entries.into_iter();
    let mut head = entries.clone();
    let (Some(origin), Some(second)) = (head.next(), head.next()) else {
        return 0;
    };
    let origin = origin.location;
    let first_step = origin.horizontal_distance(second.location);

    let mut lag = 0;
    for (tick, entry) in entries.enumerate() {
        let dxz = origin.horizontal_distance(entry.location);
        let dy = entry.location.y - origin.y;
        #[allow(clippy::cast_precision_loss)]
        let expected_dxz = first_step * tick as f64 * HORIZONTAL_SLACK;

        let rising = dy > 0.0;
        let drifting = dxz > expected_dxz;
        let too_fast = dy != 0.0 && entry.speed > analytic_speed(dxz, dy);
        if rising || drifting || too_fast {
            lag += 1;
        }
    }
    lag
}

/// Launch speed of a projectile that covers `dxz` horizontally while
/// dropping `dy` (negative).
fn analytic_speed(dxz: f64, dy: f64) -> f64 {
    let g = TRAJECTORY_GRAVITY;
    (g * dxz * dxz / (2.0 * dy) + 2.0 * g * dy).sqrt()
}
