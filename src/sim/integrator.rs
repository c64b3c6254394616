//! Velocity integration
//!
//! Turns the held-key snapshot and last tick's velocity into this tick's
//! velocity: accelerate along the held direction, otherwise decay, then snap
//! to rest or clamp to the speed cap.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::input::{Direction, InputState};
use crate::consts::*;

/// Kinematic tuning, all per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// Speed added per tick along the held direction
    pub acceleration: f64,
    /// Fraction of velocity removed per tick with no direction, in [0, 1)
    pub deceleration: f64,
    /// Speed cap
    pub max_speed: f64,
    /// Speeds below this become exactly zero
    pub stop_threshold: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            max_speed: MAX_SPEED,
            stop_threshold: STOP_THRESHOLD,
        }
    }
}

/// Unit contribution of a single key.
///
/// Horizontal is camera-relative: Left pushes the world right (+x).
fn key_vector(dir: Direction) -> DVec2 {
    match dir {
        Direction::Up => DVec2::new(0.0, -1.0),
        Direction::Down => DVec2::new(0.0, 1.0),
        Direction::Left => DVec2::new(1.0, 0.0),
        Direction::Right => DVec2::new(-1.0, 0.0),
    }
}

/// Summed, unnormalized direction of every held key
pub fn direction_vector(input: &InputState) -> DVec2 {
    input.held().map(key_vector).sum()
}

/// Advance velocity by one tick
pub fn integrate(prev: DVec2, input: &InputState, params: &MotionParams) -> DVec2 {
    let direction = direction_vector(input);

    // Opposing keys cancel to zero and fall through to damping
    let mut vel = if direction != DVec2::ZERO {
        prev + direction.normalize() * params.acceleration
    } else {
        prev * (1.0 - params.deceleration)
    };

    let speed = vel.length();
    if speed < params.stop_threshold {
        vel = DVec2::ZERO;
    } else if speed > params.max_speed {
        vel *= params.max_speed / speed;
        // Rounding can leave the rescaled vector an ulp over the cap
        while vel.length() > params.max_speed {
            vel *= 1.0 - f64::EPSILON;
        }
    }

    vel
}
