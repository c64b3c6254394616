//! Map Dodge entry point
//!
//! Web: wires the session to the page and keeps it running until `pagehide`.
//! Native: runs a scripted headless drive and logs the frames.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use map_dodge::Settings;
    use map_dodge::platform::web::{WebApp, show_message};

    thread_local! {
        static APP: RefCell<Option<WebApp>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Map Dodge starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        match WebApp::start(settings, seed) {
            Ok(app) => {
                APP.with(|slot| *slot.borrow_mut() = Some(app));
                install_pagehide();
                log::info!("Map Dodge running!");
            }
            Err(e) => {
                log::error!("Failed to start: {}", e);
                show_message(&format!("Map Dodge could not start: {}", e));
            }
        }
    }

    /// End the session from page script.
    ///
    /// May run inside the page's frame hook, i.e. within the timer callback,
    /// so ticking stops at once but the drop happens on a fresh task.
    pub fn stop() {
        let running = APP.with(|slot| match slot.borrow().as_ref() {
            Some(app) => {
                app.request_stop();
                true
            }
            None => false,
        });
        if !running {
            return;
        }

        let Some(window) = web_sys::window() else {
            log::warn!("No window to schedule teardown; ticks stay suspended");
            return;
        };
        let callback = Closure::once_into_js(teardown);
        if let Err(e) = window.set_timeout_with_callback(callback.unchecked_ref()) {
            log::warn!("Failed to schedule teardown: {:?}", e);
        }
    }

    /// Drop the app: clears the tick timer and detaches key listeners
    fn teardown() {
        let app = APP.with(|slot| slot.borrow_mut().take());
        if app.is_some() {
            drop(app);
            log::info!("Map Dodge stopped");
        }
    }

    fn install_pagehide() {
        let Some(window) = web_sys::window() else {
            return;
        };
        // Lives for the page; must not be owned by the app it tears down
        // Not inside a tick, so the app can be dropped right away
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| teardown());
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

/// Stop the running session (callable from page script)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop() {
    wasm_app::stop();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use map_dodge::sim::{Direction, InputEvent};
    use map_dodge::{LogSink, Session, Settings};

    env_logger::init();
    log::info!("Map Dodge (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the map version");

    let path = std::env::args().nth(1);
    let settings = Settings::load_or_default(path.as_deref());
    let seed = settings.seed.unwrap_or(1);

    let mut session = Session::scattered(settings, seed, LogSink::default());

    // (keys pressed, keys released, ticks to run afterwards)
    let script: [(&[Direction], &[Direction], u32); 5] = [
        (&[Direction::Up], &[], 90),
        (&[Direction::Left], &[], 60),
        (&[], &[Direction::Up, Direction::Left], 120),
        (&[Direction::Up, Direction::Down, Direction::Left, Direction::Right], &[], 30),
        (&[], &Direction::ALL, 60),
    ];

    for (press, release, ticks) in script {
        for &dir in press {
            session.push_event(InputEvent::KeyDown(dir));
        }
        for &dir in release {
            session.push_event(InputEvent::KeyUp(dir));
        }
        for _ in 0..ticks {
            session.tick();
        }
    }

    let frame = session.frame();
    println!(
        "Finished after {} ticks at ({:.6}, {:.6}), heading {:.1}, {:?}",
        frame.tick, frame.position.x, frame.position.y, frame.heading, frame.state
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
