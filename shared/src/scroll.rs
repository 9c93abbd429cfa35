pub const SCROLL_DURATION_MS: f64 = 1000.0;

/// One animated scroll from `from` to `to` (pixels), started at `start_time` (ms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    pub from: f64,
    pub to: f64,
    pub start_time: f64,
    pub duration: f64,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, start_time: f64) -> Self {
        Self {
            from,
            to,
            start_time,
            duration: SCROLL_DURATION_MS,
        }
    }

    /// Interpolated offset at `now`; lands exactly on `to` once the duration has elapsed.
    pub fn offset_at(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((now - self.start_time) / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * cubic_in_out(t)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now - self.start_time >= self.duration
    }
}

/// Cubic ease-in-out.
fn cubic_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    pub offset: f64,
    pub done: bool,
}

/// Owns the single in-flight table scroll. Starting a new scroll replaces the
/// current one immediately; nothing is ever queued.
#[derive(Debug, Clone, Default)]
pub struct ScrollController {
    active: Option<ScrollAnimation>,
}

impl ScrollController {
    /// Start a scroll, or redirect the one in flight from `from`.
    pub fn start(&mut self, from: f64, to: f64, now: f64) {
        self.active = Some(ScrollAnimation::new(from, to, now));
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Advance to `now`. Returns `None` when nothing is animating.
    pub fn step(&mut self, now: f64) -> Option<ScrollStep> {
        let anim = self.active?;
        let offset = anim.offset_at(now);
        let done = anim.is_finished(now);
        if done {
            self.active = None;
        }
        Some(ScrollStep { offset, done })
    }
}

/// Scroll offset that brings `row` to the top of the container, clamped to the
/// scrollable range.
pub fn scroll_target(row: usize, row_height: f64, row_count: usize, viewport_height: f64) -> f64 {
    let content_height = row_count as f64 * row_height;
    let max_offset = (content_height - viewport_height).max(0.0);
    (row as f64 * row_height).clamp(0.0, max_offset)
}
