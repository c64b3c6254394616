//! One run of the toy: obstacles, mover, input queue and renderer
//!
//! Key handlers only enqueue [`InputEvent`]s. Each [`Session::tick`] drains
//! the queue into the held-key set, takes one snapshot, runs the simulation
//! on it and hands the resulting frame to the [`RenderSink`].

use std::collections::VecDeque;

use crate::settings::Settings;
use crate::sim::{
    Direction, InputEvent, InputState, MotionEvent, Obstacle, WorldState, scatter_obstacles, tick,
};

pub use crate::sim::Frame;

/// Consumer of per-tick frames (map camera, sprite rotation)
pub trait RenderSink {
    fn present(&mut self, frame: &Frame);
}

/// Renderer that only logs, every `every` ticks
#[derive(Debug, Clone)]
pub struct LogSink {
    pub every: u64,
}

impl Default for LogSink {
    fn default() -> Self {
        Self {
            every: crate::consts::TICK_RATE_HZ as u64,
        }
    }
}

impl RenderSink for LogSink {
    fn present(&mut self, frame: &Frame) {
        if self.every > 0 && frame.tick % self.every == 0 {
            log::info!(
                "tick {}: pos=({:.6}, {:.6}) heading={:.1} {:?}",
                frame.tick,
                frame.position.x,
                frame.position.y,
                frame.heading,
                frame.state
            );
        }
    }
}

/// Simulation loop owner
pub struct Session<R: RenderSink> {
    settings: Settings,
    world: WorldState,
    /// Held keys as of the last tick
    input: InputState,
    /// Events received since the last tick, in arrival order
    pending: VecDeque<InputEvent>,
    /// Obstacle the mover is still inside after its last contact
    touching: Option<u32>,
    /// Distinct contacts so far; creeping out of one obstacle counts once
    contacts: u32,
    renderer: R,
}

impl<R: RenderSink> Session<R> {
    /// Start a session over a fixed obstacle list
    pub fn new(settings: Settings, obstacles: Vec<Obstacle>, renderer: R) -> Self {
        let world = WorldState::new(settings.start, obstacles);
        log::info!(
            "Session started at ({:.6}, {:.6}) with {} obstacles",
            settings.start.x,
            settings.start.y,
            world.obstacles().len()
        );
        Self {
            settings,
            world,
            input: InputState::default(),
            pending: VecDeque::new(),
            touching: None,
            contacts: 0,
            renderer,
        }
    }

    /// Start a session with obstacles scattered around the start point
    pub fn scattered(settings: Settings, seed: u64, renderer: R) -> Self {
        let obstacles = scatter_obstacles(
            settings.start,
            settings.obstacle_count,
            settings.obstacle_spread,
            settings.start_clearance(),
            seed,
        );
        log::info!("Obstacle seed: {}", seed);
        Self::new(settings, obstacles, renderer)
    }

    /// Queue a key press. Returns false for keys that don't steer.
    pub fn on_key_down(&mut self, key: &str) -> bool {
        self.queue_key(key, InputEvent::KeyDown)
    }

    /// Queue a key release. Returns false for keys that don't steer.
    pub fn on_key_up(&mut self, key: &str) -> bool {
        self.queue_key(key, InputEvent::KeyUp)
    }

    fn queue_key(&mut self, key: &str, event: fn(Direction) -> InputEvent) -> bool {
        match Direction::from_key(key) {
            Some(dir) => {
                self.pending.push_back(event(dir));
                true
            }
            None => false,
        }
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.pending.push_back(event);
    }

    /// Release every key (window blur: key-ups would never arrive)
    pub fn release_all(&mut self) {
        self.pending
            .extend(Direction::ALL.into_iter().map(InputEvent::KeyUp));
    }

    /// Fold queued events into the held set and return the tick's snapshot
    fn take_input(&mut self) -> InputState {
        for event in self.pending.drain(..) {
            self.input.apply(event);
        }
        self.input
    }

    /// Run one simulation tick and present the result
    pub fn tick(&mut self) -> Frame {
        let input = self.take_input();
        let (frame, event) = tick(
            &mut self.world,
            &input,
            &self.settings.motion,
            self.settings.collision_radius,
        );

        match event {
            Some(MotionEvent::Collided { obstacle }) => self.record_contact(obstacle, &frame),
            Some(MotionEvent::Started) => log::debug!("Moving (tick {})", frame.tick),
            Some(MotionEvent::Stopped) => log::debug!("Idle (tick {})", frame.tick),
            None => {}
        }
        self.update_touching(&frame);

        self.renderer.present(&frame);
        frame
    }

    /// Every tick spent creeping out of an obstacle re-reports the contact;
    /// only the first one is news.
    fn record_contact(&mut self, obstacle: u32, frame: &Frame) {
        if self.touching == Some(obstacle) {
            log::debug!("Still inside obstacle {} (tick {})", obstacle, frame.tick);
            return;
        }
        self.touching = Some(obstacle);
        self.contacts += 1;
        log::info!(
            "Hit obstacle {} at ({:.6}, {:.6})",
            obstacle,
            frame.position.x,
            frame.position.y
        );
    }

    fn update_touching(&mut self, frame: &Frame) {
        let Some(id) = self.touching else {
            return;
        };
        let radius = self.settings.collision_radius;
        let inside = self
            .world
            .obstacles()
            .iter()
            .any(|o| o.id == id && o.touches(frame.position, radius));
        if !inside {
            log::debug!("Clear of obstacle {} (tick {})", id, frame.tick);
            self.touching = None;
        }
    }

    /// Distinct obstacle contacts this session
    pub fn contacts(&self) -> u32 {
        self.contacts
    }

    /// Frame for the current state, without ticking
    pub fn frame(&self) -> Frame {
        self.world.frame()
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Held keys as of the last tick
    pub fn input(&self) -> InputState {
        self.input
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.world.obstacles()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: RenderSink> Drop for Session<R> {
    fn drop(&mut self) {
        log::info!("Session ended after {} ticks", self.world.time_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::MotionState;
    use glam::DVec2;

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame>,
    }

    impl RenderSink for Recorder {
        fn present(&mut self, frame: &Frame) {
            self.frames.push(*frame);
        }
    }

    fn session(obstacles: Vec<Obstacle>) -> Session<Recorder> {
        Session::new(Settings::default(), obstacles, Recorder::default())
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut s = session(Vec::new());
        assert!(!s.on_key_down("a"));
        assert!(!s.on_key_down("Enter"));
        assert!(s.on_key_down("ArrowUp"));

        let frame = s.tick();
        assert!(s.input().is_held(Direction::Up));
        assert_eq!(s.input(), InputState::with(&[Direction::Up]));
        assert_eq!(frame.state, MotionState::Moving);
    }

    #[test]
    fn test_input_applied_only_at_tick() {
        let mut s = session(Vec::new());
        s.on_key_down("ArrowLeft");
        assert!(!s.input().any_held());

        s.tick();
        assert!(s.input().is_held(Direction::Left));
    }

    #[test]
    fn test_tap_between_ticks_is_dropped() {
        // Down and up before the tick fires nets out to nothing held
        let mut s = session(Vec::new());
        s.on_key_down("ArrowUp");
        s.on_key_up("ArrowUp");

        let frame = s.tick();
        assert!(!s.input().any_held());
        assert_eq!(frame.state, MotionState::Idle);
        assert_eq!(frame.position, Settings::default().start);
    }

    #[test]
    fn test_every_tick_is_presented() {
        let mut s = session(Vec::new());
        s.on_key_down("ArrowRight");
        for _ in 0..5 {
            s.tick();
        }
        let ticks: Vec<_> = s.renderer().frames.iter().map(|f| f.tick).collect();
        assert_eq!(ticks, vec![1, 2, 3, 4, 5]);
        assert_eq!(s.frame(), s.renderer().frames[4]);
    }

    #[test]
    fn test_release_all() {
        let mut s = session(Vec::new());
        s.on_key_down("ArrowUp");
        s.on_key_down("ArrowLeft");
        s.tick();
        s.release_all();
        s.tick();
        assert!(!s.input().any_held());
    }

    #[test]
    fn test_drives_into_obstacle() {
        let start = Settings::default().start;
        let target = start + DVec2::new(0.0, 0.0003);
        let mut s = session(vec![Obstacle::new(0, target)]);

        s.on_key_down("ArrowUp");
        let mut stopped_at = None;
        for _ in 0..120 {
            let frame = s.tick();
            if frame.state == MotionState::Idle {
                stopped_at = Some(frame.position);
                break;
            }
        }

        let pos = stopped_at.expect("mover should stop at the obstacle");
        assert!(pos.distance(target) < s.settings().collision_radius);
        assert_eq!(s.world().mover.vel, DVec2::ZERO);
    }

    #[test]
    fn test_creeping_out_counts_one_contact() {
        let start = Settings::default().start;
        let first = start + DVec2::new(0.0, 0.0003);
        let second = start + DVec2::new(0.0, 0.003);
        let mut s = session(vec![Obstacle::new(0, first), Obstacle::new(1, second)]);

        // Hold Up through the first obstacle and on into the second
        s.on_key_down("ArrowUp");
        let mut stuck_ticks = 0;
        let mut contacts_when_clear = None;
        for _ in 0..600 {
            let frame = s.tick();
            if frame.state == MotionState::Idle {
                stuck_ticks += 1;
            }
            let past_first = frame.position.y - first.y > s.settings().collision_radius;
            if past_first && contacts_when_clear.is_none() {
                contacts_when_clear = Some(s.contacts());
            }
        }

        // Every stuck tick is a contact event, but only two obstacles were hit
        assert!(stuck_ticks > 2);
        assert_eq!(contacts_when_clear, Some(1));
        assert_eq!(s.contacts(), 2);
    }

    #[test]
    fn test_scattered_session() {
        let s: Session<Recorder> =
            Session::scattered(Settings::default(), 42, Recorder::default());
        assert_eq!(s.obstacles().len(), 10);
        let clearance = s.settings().start_clearance();
        let start = s.settings().start;
        assert!(s.obstacles().iter().all(|o| o.pos.distance(start) >= clearance));
    }
}
