use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, MouseEvent, PointerEvent, WheelEvent};

use happiness_shared::color_scale::{FILL_OPACITY, LEGEND_TITLE, legend_entries};
use happiness_shared::{AppState, HighlightSource, MapStyles};

use crate::app::Highlighter;
use crate::render_loop::FrameScheduler;
use crate::viewport::Viewport;

const BACKGROUND: &str = "#f4f6f8";
/// Pointer travel (px) past which a press counts as a drag rather than a hover.
const DRAG_THRESHOLD_PX: f64 = 3.0;

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(1.0)
}

/// Paint every boundary in stacking order with its current style.
fn draw_map(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    h: f64,
    vp: &Viewport,
    state: &AppState,
    styles: &MapStyles,
) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);
    ctx.set_line_join("round");

    for boundary in styles.draw_order(state.boundaries()) {
        let (x0, y0) = vp.world_to_screen(boundary.bounds.min_x, boundary.bounds.min_y);
        let (x1, y1) = vp.world_to_screen(boundary.bounds.max_x, boundary.bounds.max_y);
        if x1 < 0.0 || y1 < 0.0 || x0 > w || y0 > h {
            continue;
        }

        ctx.begin_path();
        for ring in &boundary.rings {
            let mut points = ring.iter().map(|&(wx, wy)| vp.world_to_screen(wx, wy));
            let Some((sx, sy)) = points.next() else {
                continue;
            };
            ctx.move_to(sx, sy);
            for (sx, sy) in points {
                ctx.line_to(sx, sy);
            }
            ctx.close_path();
        }

        let style = styles.style_of(boundary);
        ctx.set_fill_style_str(&style.fill.css_rgba(style.fill_opacity));
        ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
        ctx.set_stroke_style_str(&style.stroke.css_hex());
        ctx.set_line_width(style.weight);
        ctx.stroke();
    }
}

/// Canvas choropleth with hover hit-testing, drag-to-pan and wheel zoom.
#[component]
pub fn MapView() -> impl IntoView {
    let highlighter: Highlighter = expect_context();
    let styles = highlighter.styles;
    let active = highlighter.active;
    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let viewport: RwSignal<Viewport> = RwSignal::new(Viewport::default());

    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));

    let scheduler = {
        let state = highlighter.state.clone();
        let placed = Cell::new(false);
        FrameScheduler::new(move |_timestamp| {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return false;
            };
            let Some(parent) = canvas.parent_element() else {
                return false;
            };
            let w = parent.client_width() as f64;
            let h = parent.client_height() as f64;
            if w <= 0.0 || h <= 0.0 {
                return false;
            }

            if !placed.get() {
                placed.set(true);
                // The viewport effect requests the next frame.
                viewport.set(Viewport::initial(w, h));
                return false;
            }

            let dpr = device_pixel_ratio();
            let bw = (w * dpr).round() as u32;
            let bh = (h * dpr).round() as u32;
            if canvas.width() != bw || canvas.height() != bh {
                canvas.set_width(bw);
                canvas.set_height(bh);
                // Resizing resets the context state
                cached_ctx.borrow_mut().take();
            }

            let mut ctx_cache = cached_ctx.borrow_mut();
            if ctx_cache.is_none() {
                let Some(ctx) = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                else {
                    return false;
                };
                ctx.scale(dpr, dpr).ok();
                *ctx_cache = Some(ctx);
            }
            let Some(ctx) = ctx_cache.as_ref() else {
                return false;
            };

            viewport.with_untracked(|vp| {
                styles.with_untracked(|styles| draw_map(ctx, w, h, vp, &state, styles));
            });
            false
        })
    };
    let scheduler = Rc::new(scheduler);

    let sched_redraw = scheduler.clone();
    Effect::new(move || {
        viewport.track();
        styles.track();
        sched_redraw.request();
    });

    // --- Input handlers ---

    let is_dragging = Rc::new(Cell::new(false));
    let drag_moved = Rc::new(Cell::new(0.0f64));
    let last_pos = Rc::new(Cell::new((0.0f64, 0.0f64)));
    // Name last entered through the map, so leaves pair with their enters.
    let map_hover: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(None));

    let release_hover = {
        let highlighter = highlighter.clone();
        let map_hover = map_hover.clone();
        move || {
            if let Some(previous) = map_hover.borrow_mut().take() {
                highlighter.leave(&previous, HighlightSource::Map);
            }
        }
    };

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = e.delta_y();
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        viewport.update(|vp| vp.zoom_at(delta, x, y));
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let drag_moved = drag_moved.clone();
        let last_pos = last_pos.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            drag_moved.set(0.0);
            last_pos.set((e.client_x() as f64, e.client_y() as f64));
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let drag_moved = drag_moved.clone();
        let last_pos = last_pos.clone();
        let map_hover = map_hover.clone();
        let highlighter = highlighter.clone();
        let release_hover = release_hover.clone();
        move |e: PointerEvent| {
            let (cx, cy) = (e.client_x() as f64, e.client_y() as f64);
            if is_dragging.get() {
                let (lx, ly) = last_pos.get();
                last_pos.set((cx, cy));
                drag_moved.set(drag_moved.get() + (cx - lx).abs() + (cy - ly).abs());
                if drag_moved.get() > DRAG_THRESHOLD_PX {
                    release_hover();
                    viewport.update(|vp| vp.pan(cx - lx, cy - ly));
                    return;
                }
            }

            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let rect = canvas.get_bounding_client_rect();
            let (wx, wy) = viewport
                .with_untracked(|vp| vp.screen_to_world(cx - rect.left(), cy - rect.top()));
            let hit = highlighter.styles.with_untracked(|styles| {
                highlighter
                    .state
                    .boundary_at(wx, wy, styles.raised())
                    .map(|boundary| boundary.name.clone())
            });

            if *map_hover.borrow() == hit {
                return;
            }
            release_hover();
            if let Some(name) = hit {
                highlighter.enter(&name, HighlightSource::Map);
                *map_hover.borrow_mut() = Some(name);
            }
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        move |_: PointerEvent| {
            is_dragging.set(false);
        }
    };

    let on_pointer_leave = {
        let is_dragging = is_dragging.clone();
        let release_hover = release_hover.clone();
        move |_: PointerEvent| {
            is_dragging.set(false);
            release_hover();
        }
    };

    let on_double_click = {
        let state = highlighter.state.clone();
        move |e: MouseEvent| {
            e.prevent_default();
            let Some(bounds) = state.world_bounds() else {
                return;
            };
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let Some(parent) = canvas.parent_element() else {
                return;
            };
            let (w, h) = (parent.client_width() as f64, parent.client_height() as f64);
            viewport.update(|vp| vp.fit_bounds(&bounds, w, h));
        }
    };

    view! {
        <div
            style="position: absolute; inset: 0; overflow: hidden;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:dblclick=on_double_click
        >
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none;"
                style:cursor=move || if active.with(Option::is_some) { "pointer" } else { "grab" }
            />
            <InfoOverlay />
            <Legend />
        </div>
    }
}

/// Hovered country's name, score and rank (top-right).
#[component]
fn InfoOverlay() -> impl IntoView {
    let highlighter: Highlighter = expect_context();
    let info = highlighter.info;

    view! {
        <div style="position: absolute; top: 10px; right: 10px; padding: 6px 10px; min-width: 160px; background: rgba(255,255,255,0.9); border-radius: 5px; box-shadow: 0 0 15px rgba(0,0,0,0.2); pointer-events: none;">
            <div style="font-weight: bold; margin-bottom: 4px;">{move || info.with(|i| i.name_text())}</div>
            <div>"Score: " <b>{move || info.with(|i| i.score_text())}</b></div>
            <div>"Rank: " <b>{move || info.with(|i| i.rank_text())}</b></div>
        </div>
    }
}

/// Static score legend (bottom-left).
#[component]
fn Legend() -> impl IntoView {
    let entries = legend_entries();

    view! {
        <div style="position: absolute; bottom: 20px; left: 10px; padding: 6px 8px; background: rgba(255,255,255,0.9); border-radius: 5px; box-shadow: 0 0 15px rgba(0,0,0,0.2); line-height: 18px; pointer-events: none;">
            <div style="font-weight: bold; margin-bottom: 4px;">{LEGEND_TITLE}</div>
            {entries
                .into_iter()
                .map(|entry| {
                    view! {
                        <div style="display: flex; align-items: center; gap: 6px;">
                            <span style=format!(
                                "display: inline-block; width: 18px; height: 18px; background: {};",
                                entry.color.css_rgba(FILL_OPACITY),
                            ) />
                            <span>{entry.label}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
