use std::cell::RefCell;
use std::rc::Rc;

use leptos::html::Div;
use leptos::prelude::*;

use happiness_shared::scroll::ScrollController;

use crate::render_loop::{FrameScheduler, now_ms};

/// Animates a container's `scrollTop` one frame at a time.
///
/// A new target replaces the scroll in flight, starting from wherever the
/// container currently is.
pub struct ScrollDriver {
    container: NodeRef<Div>,
    controller: Rc<RefCell<ScrollController>>,
    scheduler: FrameScheduler,
}

impl ScrollDriver {
    pub fn new(container: NodeRef<Div>) -> Self {
        let controller = Rc::new(RefCell::new(ScrollController::default()));
        let frame_controller = controller.clone();
        let scheduler = FrameScheduler::new(move |timestamp| {
            let Some(step) = frame_controller.borrow_mut().step(timestamp) else {
                return false;
            };
            let Some(el) = container.get_untracked() else {
                frame_controller.borrow_mut().cancel();
                return false;
            };
            el.set_scroll_top(step.offset.round() as i32);
            !step.done
        });
        Self {
            container,
            controller,
            scheduler,
        }
    }

    pub fn scroll_to(&self, offset: f64) {
        let Some(el) = self.container.get_untracked() else {
            return;
        };
        let from = el.scroll_top() as f64;
        self.controller.borrow_mut().start(from, offset, now_ms());
        self.scheduler.request();
    }

    /// Stop the scroll in flight, leaving the container where it is.
    pub fn cancel(&self) {
        self.controller.borrow_mut().cancel();
    }
}
