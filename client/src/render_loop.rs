use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// Coalesces frame requests onto `requestAnimationFrame`.
///
/// `request()` may be called any number of times between frames; the frame
/// callback runs at most once per vsync with the rAF timestamp (ms). While the
/// callback returns `true` another frame is requested, which is how animations
/// keep themselves running.
pub struct FrameScheduler {
    inner: Rc<Inner>,
}

struct Inner {
    window: Option<web_sys::Window>,
    pending: Cell<bool>,
    raf_id: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Inner {
    fn schedule(&self) {
        if self.pending.get() {
            return;
        }
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let callback = self.callback.borrow();
        let Some(cb) = callback.as_ref() else {
            return;
        };
        match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => {
                self.pending.set(true);
                self.raf_id.set(Some(id));
            }
            Err(_) => self.pending.set(false),
        }
    }
}

impl FrameScheduler {
    pub fn new(frame_fn: impl Fn(f64) -> bool + 'static) -> Self {
        let inner = Rc::new(Inner {
            window: web_sys::window(),
            pending: Cell::new(false),
            raf_id: Cell::new(None),
            callback: RefCell::new(None),
        });

        // Weak so the closure stored in `inner` doesn't keep `inner` alive.
        let weak = Rc::downgrade(&inner);
        let cb = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            inner.pending.set(false);
            inner.raf_id.set(None);
            if frame_fn(timestamp) {
                inner.schedule();
            }
        });
        *inner.callback.borrow_mut() = Some(cb);

        Self { inner }
    }

    /// Ask for a frame. Cheap when one is already pending.
    pub fn request(&self) {
        self.inner.schedule();
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        if let Some(raf_id) = self.inner.raf_id.replace(None)
            && let Some(window) = self.inner.window.as_ref()
        {
            let _ = window.cancel_animation_frame(raf_id);
        }
        self.inner.pending.set(false);
        self.inner.callback.borrow_mut().take();
    }
}

/// Current `performance.now()` in milliseconds, falling back to the wall clock.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
