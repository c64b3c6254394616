//! World state and core simulation types

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::heading_degrees;

/// Whether the mover is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    /// Velocity exactly zero
    #[default]
    Idle,
    /// Any non-zero velocity
    Moving,
}

impl MotionState {
    pub fn of(velocity: DVec2) -> Self {
        if velocity == DVec2::ZERO {
            MotionState::Idle
        } else {
            MotionState::Moving
        }
    }
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionEvent {
    /// Idle -> Moving
    Started,
    /// Moving -> Idle by deceleration
    Stopped,
    /// Ran into an obstacle; the mover is now idle
    Collided { obstacle: u32 },
}

/// A static obstacle point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: DVec2,
}

impl Obstacle {
    pub fn new(id: u32, pos: DVec2) -> Self {
        Self { id, pos }
    }

    /// True if `point` is strictly within `radius`
    #[inline]
    pub fn touches(&self, point: DVec2, radius: f64) -> bool {
        self.pos.distance(point) < radius
    }
}

/// The steered sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Display rotation in degrees; kept while at rest
    pub heading: f64,
}

impl Mover {
    pub fn at(pos: DVec2) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            heading: 0.0,
        }
    }

    pub fn state(&self) -> MotionState {
        MotionState::of(self.vel)
    }

    /// Heading for a new velocity, falling back to the current one at rest
    pub fn next_heading(&self, vel: DVec2) -> f64 {
        heading_degrees(vel).unwrap_or(self.heading)
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub mover: Mover,
    /// Fixed for the session
    obstacles: Vec<Obstacle>,
    /// Ticks committed so far
    pub time_ticks: u64,
}

impl WorldState {
    /// Obstacles are sorted by id for stable iteration
    pub fn new(start: DVec2, mut obstacles: Vec<Obstacle>) -> Self {
        obstacles.sort_by_key(|o| o.id);
        Self {
            mover: Mover::at(start),
            obstacles,
            time_ticks: 0,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_state() {
        assert_eq!(MotionState::of(DVec2::ZERO), MotionState::Idle);
        assert_eq!(MotionState::of(DVec2::new(0.0, 1e-12)), MotionState::Moving);
    }

    #[test]
    fn test_heading_kept_at_rest() {
        let mut mover = Mover::at(DVec2::ZERO);
        mover.heading = 42.0;
        assert_eq!(mover.next_heading(DVec2::ZERO), 42.0);
        assert!((mover.next_heading(DVec2::new(0.0, -1.0)) + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_obstacles_sorted() {
        let world = WorldState::new(
            DVec2::ZERO,
            vec![
                Obstacle::new(2, DVec2::ONE),
                Obstacle::new(0, DVec2::ZERO),
                Obstacle::new(1, DVec2::X),
            ],
        );
        let ids: Vec<_> = world.obstacles().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_touches_is_strict() {
        let o = Obstacle::new(0, DVec2::ZERO);
        assert!(o.touches(DVec2::new(0.5, 0.0), 1.0));
        assert!(!o.touches(DVec2::new(1.0, 0.0), 1.0));
    }
}
