//! Browser timer, listeners and map hook

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent, Window};

use super::{StopFlag, guarded_tick};
use crate::consts::TICK_INTERVAL_MS;
use crate::session::{Frame, RenderSink, Session};
use crate::settings::Settings;

/// Element the page's map library renders into
pub const MAP_ELEMENT_ID: &str = "map";

// The map, camera and sprite live in page script; these forward to it
#[wasm_bindgen(inline_js = "
    export function present_frame(x, y, heading) {
        const hook = window.mapDodge && window.mapDodge.onFrame;
        if (hook) {
            hook(x, y, heading);
        }
    }

    export function show_message(text) {
        const hook = window.mapDodge && window.mapDodge.onError;
        if (hook) {
            hook(text);
        } else {
            console.error(text);
        }
    }
")]
extern "C" {
    fn present_frame(x: f64, y: f64, heading: f64);
    /// Surface a message to the user through the page
    pub fn show_message(text: &str);
}

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("No browser window")]
    NoWindow,

    #[error("Missing page element #{0}")]
    MissingElement(&'static str),

    #[error("Failed to register {what}: {message}")]
    Register { what: &'static str, message: String },
}

fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

/// Sends each frame to `window.mapDodge.onFrame(x, y, heading)`
#[derive(Debug, Default)]
pub struct PageHookSink;

impl RenderSink for PageHookSink {
    fn present(&mut self, frame: &Frame) {
        present_frame(frame.position.x, frame.position.y, frame.heading);
    }
}

/// `setInterval` registration, cleared on drop
pub struct IntervalTimer {
    window: Window,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl IntervalTimer {
    pub fn start(
        window: &Window,
        interval_ms: i32,
        callback: impl FnMut() + 'static,
    ) -> Result<Self, PlatformError> {
        let callback = Closure::<dyn FnMut()>::new(callback);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                interval_ms,
            )
            .map_err(|e| PlatformError::Register {
                what: "tick timer",
                message: js_message(&e),
            })?;

        Ok(Self {
            window: window.clone(),
            handle,
            _callback: callback,
        })
    }
}

impl Drop for IntervalTimer {
    fn drop(&mut self) {
        self.window.clear_interval_with_handle(self.handle);
    }
}

/// DOM event listener, removed on drop
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, PlatformError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| PlatformError::Register {
                what: event,
                message: js_message(&e),
            })?;

        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// A running session with its browser resources.
///
/// Dropping it stops the timer, detaches the listeners and ends the session.
pub struct WebApp {
    // Timer first: no tick may fire after the listeners are gone
    _timer: IntervalTimer,
    _listeners: Vec<Listener>,
    stop: StopFlag,
}

impl WebApp {
    pub fn start(settings: Settings, seed: u64) -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
        let document = window.document().ok_or(PlatformError::NoWindow)?;
        if document.get_element_by_id(MAP_ELEMENT_ID).is_none() {
            return Err(PlatformError::MissingElement(MAP_ELEMENT_ID));
        }

        let session = Rc::new(RefCell::new(Session::scattered(settings, seed, PageHookSink)));
        let target: &EventTarget = window.as_ref();

        let keydown = {
            let session = session.clone();
            Listener::new(target, "keydown", move |event: Event| {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                    // Keep arrow keys from scrolling the page
                    if session.borrow_mut().on_key_down(&key.key()) {
                        event.prevent_default();
                    }
                }
            })?
        };

        let keyup = {
            let session = session.clone();
            Listener::new(target, "keyup", move |event: Event| {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                    if session.borrow_mut().on_key_up(&key.key()) {
                        event.prevent_default();
                    }
                }
            })?
        };

        // Key-ups are lost while unfocused
        let blur = {
            let session = session.clone();
            Listener::new(target, "blur", move |_event: Event| {
                session.borrow_mut().release_all();
                log::debug!("Window blurred, keys released");
            })?
        };

        // Show the start position before the first tick
        let first = session.borrow().frame();
        PageHookSink.present(&first);

        let stop = StopFlag::default();
        let timer = {
            let stop = stop.clone();
            IntervalTimer::start(&window, TICK_INTERVAL_MS, move || {
                guarded_tick(&session, &stop);
            })?
        };

        log::info!("Ticking every {} ms", TICK_INTERVAL_MS);

        Ok(Self {
            _timer: timer,
            _listeners: vec![keydown, keyup, blur],
            stop,
        })
    }

    /// Stop ticking now; safe to call from inside a tick.
    ///
    /// Resources are only released when the app is dropped.
    pub fn request_stop(&self) {
        self.stop.request();
    }
}
