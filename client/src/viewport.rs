use happiness_shared::Bounds;
use happiness_shared::boundary::project;

/// Pan/zoom transform from projected world units to canvas pixels.
///
/// `scale` is pixels per world unit, so a scale of `2^z` matches slippy-map zoom `z`.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

const MIN_SCALE: f64 = 0.5;
const MAX_SCALE: f64 = 64.0;
const ZOOM_SENSITIVITY: f64 = 0.002;

pub const INITIAL_LAT: f64 = 40.0;
pub const INITIAL_LON: f64 = 0.0;
pub const INITIAL_ZOOM: i32 = 2;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 2f64.powi(INITIAL_ZOOM),
        }
    }
}

impl Viewport {
    /// The opening view: centred on 40°N 0°E at zoom 2.
    pub fn initial(canvas_w: f64, canvas_h: f64) -> Self {
        let mut vp = Self::default();
        let (wx, wy) = project(INITIAL_LON, INITIAL_LAT);
        vp.center_on(wx, wy, canvas_w, canvas_h);
        vp
    }

    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            wx * self.scale + self.offset_x,
            wy * self.scale + self.offset_y,
        )
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.offset_x) / self.scale,
            (sy - self.offset_y) / self.scale,
        )
    }

    /// Put a world point at the canvas centre, keeping the current scale.
    pub fn center_on(&mut self, wx: f64, wy: f64, canvas_w: f64, canvas_h: f64) {
        self.offset_x = canvas_w / 2.0 - wx * self.scale;
        self.offset_y = canvas_h / 2.0 - wy * self.scale;
    }

    /// Zoom toward a focus point (screen coordinates).
    pub fn zoom_at(&mut self, delta: f64, screen_x: f64, screen_y: f64) {
        let factor = (-delta * ZOOM_SENSITIVITY).exp();
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;

        // Keep the point under the cursor fixed
        self.offset_x = screen_x - (screen_x - self.offset_x) * ratio;
        self.offset_y = screen_y - (screen_y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Fit the viewport to world bounds with a little padding.
    pub fn fit_bounds(&mut self, bounds: &Bounds, canvas_w: f64, canvas_h: f64) {
        let world_w = bounds.max_x - bounds.min_x;
        let world_h = bounds.max_y - bounds.min_y;

        if world_w <= 0.0 || world_h <= 0.0 || canvas_w <= 0.0 || canvas_h <= 0.0 {
            return;
        }

        let padding = 0.05;
        let scale_x = canvas_w / (world_w * (1.0 + padding * 2.0));
        let scale_y = canvas_h / (world_h * (1.0 + padding * 2.0));
        self.scale = scale_x.min(scale_y).clamp(MIN_SCALE, MAX_SCALE);
        self.center_on(
            (bounds.min_x + bounds.max_x) / 2.0,
            (bounds.min_y + bounds.max_y) / 2.0,
            canvas_w,
            canvas_h,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn screen_and_world_round_trip() {
        let vp = Viewport {
            offset_x: 30.0,
            offset_y: -12.0,
            scale: 4.0,
        };
        let (sx, sy) = vp.world_to_screen(100.0, 80.0);
        let (wx, wy) = vp.screen_to_world(sx, sy);
        assert_close(wx, 100.0);
        assert_close(wy, 80.0);
    }

    #[test]
    fn initial_view_centres_on_forty_north() {
        let vp = Viewport::initial(800.0, 600.0);
        assert_close(vp.scale, 4.0);
        let (wx, wy) = project(INITIAL_LON, INITIAL_LAT);
        let (sx, sy) = vp.world_to_screen(wx, wy);
        assert_close(sx, 400.0);
        assert_close(sy, 300.0);
    }

    #[test]
    fn zoom_keeps_the_focus_point_fixed() {
        let mut vp = Viewport::initial(800.0, 600.0);
        let before = vp.screen_to_world(250.0, 140.0);
        vp.zoom_at(-120.0, 250.0, 140.0);
        assert!(vp.scale > 4.0);
        let after = vp.screen_to_world(250.0, 140.0);
        assert_close(before.0, after.0);
        assert_close(before.1, after.1);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_at(100_000.0, 0.0, 0.0);
        assert_close(vp.scale, MIN_SCALE);
        vp.zoom_at(-100_000.0, 0.0, 0.0);
        assert_close(vp.scale, MAX_SCALE);
    }

    #[test]
    fn fit_bounds_centres_the_box() {
        let mut vp = Viewport::default();
        let bounds = Bounds {
            min_x: 100.0,
            min_y: 50.0,
            max_x: 140.0,
            max_y: 70.0,
        };
        vp.fit_bounds(&bounds, 800.0, 600.0);
        let (sx, sy) = vp.world_to_screen(120.0, 60.0);
        assert_close(sx, 400.0);
        assert_close(sy, 300.0);

        let untouched = vp.clone();
        vp.fit_bounds(&Bounds::EMPTY, 800.0, 600.0);
        assert_eq!(vp, untouched);
    }
}
