//! Fixed timestep simulation tick
//!
//! A tick is split in two: [`step`] computes everything from a read-only view
//! of the world, then [`WorldState::commit`] writes the result back in one go.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::resolve;
use super::input::InputState;
use super::integrator::{MotionParams, integrate};
use super::state::{MotionEvent, MotionState, Mover, WorldState};

/// What one tick produced, not yet applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Mover after integration, movement and contact
    pub mover: Mover,
    /// State transition or contact caused by this tick
    pub event: Option<MotionEvent>,
}

/// Per-tick hand-off to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub position: DVec2,
    /// Degrees
    pub heading: f64,
    pub state: MotionState,
}

/// Compute the next mover state without touching the world
pub fn step(
    world: &WorldState,
    input: &InputState,
    params: &MotionParams,
    collision_radius: f64,
) -> StepOutcome {
    let current = world.mover;

    let vel = integrate(current.vel, input, params);
    let res = resolve(current.pos, vel, world.obstacles(), collision_radius);

    let mover = Mover {
        pos: res.position,
        vel: res.velocity,
        heading: current.next_heading(res.velocity),
    };

    let event = match res.contact {
        // Only a contact that actually stopped something is reported
        Some(obstacle) if vel != DVec2::ZERO => Some(MotionEvent::Collided { obstacle }),
        _ => match (current.state(), mover.state()) {
            (MotionState::Idle, MotionState::Moving) => Some(MotionEvent::Started),
            (MotionState::Moving, MotionState::Idle) => Some(MotionEvent::Stopped),
            _ => None,
        },
    };

    StepOutcome { mover, event }
}

/// Advance the world by one tick and return the frame to render
pub fn tick(
    world: &mut WorldState,
    input: &InputState,
    params: &MotionParams,
    collision_radius: f64,
) -> (Frame, Option<MotionEvent>) {
    let outcome = step(world, input, params, collision_radius);
    let frame = world.commit(&outcome);
    (frame, outcome.event)
}

impl WorldState {
    /// Apply a step result. The only place the mover is written during play.
    pub fn commit(&mut self, outcome: &StepOutcome) -> Frame {
        self.mover = outcome.mover;
        self.time_ticks += 1;
        self.frame()
    }

    /// Frame for the current state
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.time_ticks,
            position: self.mover.pos,
            heading: self.mover.heading,
            state: self.mover.state(),
        }
    }
}
