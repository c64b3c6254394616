//! Map Dodge - steer a sprite over a map viewport, avoiding obstacles
//!
//! Core modules:
//! - `sim`: Deterministic motion core (velocity integration, obstacle contact, heading)
//! - `session`: Owns the simulation loop, input queue and render hand-off
//! - `settings`: Tuning and session configuration
//! - `platform`: Browser timer and keyboard plumbing

pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Frame, LogSink, RenderSink, Session};
pub use settings::{Settings, SettingsError};

use glam::DVec2;

/// Simulation configuration constants
pub mod consts {
    /// Reference tick cadence
    pub const TICK_RATE_HZ: u32 = 60;
    /// Interval between ticks in milliseconds (rounded for `setInterval`)
    pub const TICK_INTERVAL_MS: i32 = 1000 / TICK_RATE_HZ as i32;

    /// Velocity gained per tick while a direction is held (map degrees/tick²)
    pub const ACCELERATION: f64 = 0.0000025;
    /// Fraction of velocity lost per tick with no direction held
    pub const DECELERATION: f64 = 0.05;
    /// Speed cap (map degrees/tick)
    pub const MAX_SPEED: f64 = 0.00001;
    /// Below this speed the mover snaps to rest
    pub const STOP_THRESHOLD: f64 = 0.0000001;

    /// Obstacle hit distance (map degrees, roughly 10 m)
    pub const COLLISION_RADIUS: f64 = 0.0001;
    /// Obstacles per session
    pub const OBSTACLE_COUNT: usize = 10;
    /// Max per-axis obstacle offset from the start point
    pub const OBSTACLE_SPREAD: f64 = 0.005;
    /// Re-roll attempts before an obstacle is accepted regardless of clearance
    pub const SCATTER_ATTEMPTS: u32 = 16;
}

/// Display heading in degrees for a velocity, `None` at rest.
///
/// The `-vx` mirrors the `position - velocity` update: velocity is world
/// motion, the sprite travels the opposite way horizontally.
#[inline]
pub fn heading_degrees(velocity: DVec2) -> Option<f64> {
    if velocity == DVec2::ZERO {
        return None;
    }
    Some(velocity.y.atan2(-velocity.x).to_degrees())
}
