//! Deterministic motion core
//!
//! All steering and contact logic lives here. This module must be pure:
//! - One fixed tick per update, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (obstacles by id)
//! - No rendering, platform or logging dependencies

pub mod collision;
pub mod input;
pub mod integrator;
pub mod obstacles;
pub mod state;
pub mod tick;

pub use collision::{Resolution, resolve};
pub use input::{Direction, InputEvent, InputState};
pub use integrator::{MotionParams, direction_vector, integrate};
pub use obstacles::scatter_obstacles;
pub use state::{MotionEvent, MotionState, Mover, Obstacle, WorldState};
pub use tick::{Frame, StepOutcome, step, tick};
