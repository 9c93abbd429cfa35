use std::rc::Rc;

use leptos::prelude::*;

use happiness_shared::color_scale::FACTOR_COLORS;
use happiness_shared::scroll::scroll_target;
use happiness_shared::table::{NAME_WIDTH, ROW_HEIGHT, SCORE_WIDTH, TableModel, TableRow};
use happiness_shared::{HighlightSource, SubFactor};

use crate::app::Highlighter;
use crate::scroll_driver::ScrollDriver;

const ROW_HIGHLIGHT: &str = "#e8eef2";

/// Keys that scroll a focused container.
const SCROLL_KEYS: [&str; 7] = ["ArrowUp", "ArrowDown", "PageUp", "PageDown", "Home", "End", " "];

fn is_scroll_key(key: &str) -> bool {
    SCROLL_KEYS.contains(&key)
}

/// Score table: one row per country in rank order with a stacked factor bar.
#[component]
pub fn TableView() -> impl IntoView {
    let highlighter: Highlighter = expect_context();
    let scroll_to = highlighter.scroll_to;
    let container_ref = NodeRef::<leptos::html::Div>::new();
    let model: RwSignal<TableModel> = RwSignal::new(TableModel::default());

    // Width is read once, when the container mounts.
    let state = highlighter.state.clone();
    Effect::new(move || {
        let Some(el) = container_ref.get() else {
            return;
        };
        let width = el.client_width() as f64;
        model.update(|m| m.render(state.scores(), width));
    });

    let driver = Rc::new(ScrollDriver::new(container_ref));
    let row_count = highlighter.state.scores().len();
    let scroll_driver = driver.clone();
    Effect::new(move || {
        let Some(row) = scroll_to.get() else {
            return;
        };
        let Some(el) = container_ref.get_untracked() else {
            return;
        };
        let target = scroll_target(row, ROW_HEIGHT, row_count, el.client_height() as f64);
        scroll_driver.scroll_to(target);
    });

    // Any manual scroll takes over from the animation in flight. A pointer
    // press covers scrollbar drags.
    let on_wheel = {
        let driver = driver.clone();
        move |_: web_sys::WheelEvent| driver.cancel()
    };
    let on_pointer_down = {
        let driver = driver.clone();
        move |_: web_sys::PointerEvent| driver.cancel()
    };
    let on_key_down = move |e: web_sys::KeyboardEvent| {
        if is_scroll_key(&e.key()) {
            driver.cancel();
        }
    };

    view! {
        <TableHeader />
        <div
            node_ref=container_ref
            tabindex="0"
            style="position: relative; flex: 1 1 auto; overflow-y: scroll; overflow-x: hidden; outline: none;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:keydown=on_key_down
        >
            <For
                each=move || model.with(|m| m.rows().to_vec())
                key=|row| row.index
                children=move |row| view! { <Row row=row /> }
            />
        </div>
    }
}

#[component]
fn TableHeader() -> impl IntoView {
    view! {
        <div style="flex: 0 0 auto; display: flex; align-items: center; gap: 0; padding: 6px 0; border-bottom: 1px solid #ccc; font-weight: bold; white-space: nowrap;">
            <div style=format!("flex: 0 0 {NAME_WIDTH}px; padding-left: 6px; box-sizing: border-box;")>"Country"</div>
            <div style=format!("flex: 0 0 {SCORE_WIDTH}px; text-align: right; padding-right: 6px; box-sizing: border-box;")>"Score"</div>
            <div style="flex: 1 1 auto; display: flex; flex-wrap: wrap; gap: 4px 8px; font-weight: normal; font-size: 11px;">
                {SubFactor::ALL
                    .iter()
                    .map(|&factor| {
                        let color = FACTOR_COLORS[factor.index()].css_hex();
                        view! {
                            <span title=factor.column() style="display: inline-flex; align-items: center; gap: 3px;">
                                <span style=format!("display: inline-block; width: 10px; height: 10px; background: {color};") />
                                {factor.label()}
                            </span>
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn Row(row: TableRow) -> impl IntoView {
    let highlighter: Highlighter = expect_context();
    let active = highlighter.active;

    let name = row.name.clone();
    let is_active = {
        let name = name.clone();
        move || active.with(|a| a.as_deref() == Some(name.as_str()))
    };
    let on_enter = {
        let highlighter = highlighter.clone();
        let name = name.clone();
        move |_: web_sys::MouseEvent| highlighter.enter(&name, HighlightSource::Table)
    };
    let on_leave = {
        let name = name.clone();
        move |_: web_sys::MouseEvent| highlighter.leave(&name, HighlightSource::Table)
    };
    let title = format!("#{} {}", row.rank, row.name);

    view! {
        <div
            title=title
            style=format!("display: flex; align-items: center; height: {ROW_HEIGHT}px; white-space: nowrap; cursor: default;")
            style:background=move || if is_active() { ROW_HIGHLIGHT } else { "transparent" }
            on:mouseenter=on_enter
            on:mouseleave=on_leave
        >
            <div style=format!("flex: 0 0 {NAME_WIDTH}px; padding-left: 6px; overflow: hidden; text-overflow: ellipsis; box-sizing: border-box;")>
                {name}
            </div>
            <div style=format!("flex: 0 0 {SCORE_WIDTH}px; text-align: right; padding-right: 6px; box-sizing: border-box; font-variant-numeric: tabular-nums;")>
                {row.score_text}
            </div>
            <div style="position: relative; flex: 1 1 auto; height: 14px;">
                {row
                    .segments
                    .into_iter()
                    .filter(|segment| segment.width > 0.0)
                    .map(|segment| {
                        view! {
                            <div
                                title=segment.factor.column()
                                style=format!(
                                    "position: absolute; top: 0; bottom: 0; left: {:.2}px; width: {:.2}px; background: {};",
                                    segment.x,
                                    segment.width,
                                    segment.color.css_hex(),
                                )
                            />
                        }
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
