//! Platform abstraction layer
//!
//! Handles the browser side of a session:
//! - Fixed-interval tick timer
//! - Keyboard and focus listeners
//! - Frame hand-off to the page's map layer
//!
//! Every browser resource is held by a guard that releases it on drop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::session::{Frame, RenderSink, Session};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Shared "stop at the next opportunity" request.
///
/// Page script may ask to stop from inside a frame callback, which runs
/// under the timer's own closure. Tearing the timer down there would free
/// the closure mid-call, so the request is only recorded and the timer
/// skips every tick after it until the app is dropped.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Rc<Cell<bool>>);

impl StopFlag {
    pub fn request(&self) {
        self.0.set(true);
    }

    pub fn is_requested(&self) -> bool {
        self.0.get()
    }
}

/// Tick the session unless a stop has been requested
pub fn guarded_tick<R: RenderSink>(
    session: &RefCell<Session<R>>,
    stop: &StopFlag,
) -> Option<Frame> {
    if stop.is_requested() {
        return None;
    }
    Some(session.borrow_mut().tick())
}
