use std::sync::Arc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use happiness_shared::{AppState, HighlightSource, HoverEvent, HoverMachine, InfoPanel, MapStyles};

use crate::engine::RenderEngine;
use crate::loader;
use crate::map_view::MapView;
use crate::table_view::TableView;

pub(crate) const TABLE_WIDTH: f64 = 560.0;

#[derive(Clone)]
pub(crate) enum LoadState {
    Loading,
    Ready(Arc<AppState>),
    Failed(String),
}

/// Routes hover events from both views through one hover machine and
/// publishes the resulting view updates as signals.
#[derive(Clone)]
pub(crate) struct Highlighter {
    pub state: Arc<AppState>,
    machine: StoredValue<HoverMachine>,
    pub styles: RwSignal<MapStyles>,
    pub info: RwSignal<InfoPanel>,
    /// Last table row a map hover asked to bring into view.
    pub scroll_to: RwSignal<Option<usize>>,
    /// Currently highlighted country, from either view.
    pub active: RwSignal<Option<String>>,
    supports_raise: bool,
}

impl Highlighter {
    pub fn new(state: Arc<AppState>, supports_raise: bool) -> Self {
        Self {
            state,
            machine: StoredValue::new(HoverMachine::default()),
            styles: RwSignal::new(MapStyles::default()),
            info: RwSignal::new(InfoPanel::Placeholder),
            scroll_to: RwSignal::new(None),
            active: RwSignal::new(None),
            supports_raise,
        }
    }

    pub fn dispatch(&self, event: HoverEvent, source: HighlightSource) {
        let mut machine = self.machine.get_value();
        let outcome = machine.apply(&self.state, event, source, self.supports_raise);
        let active = machine.active().map(str::to_string);
        self.machine.set_value(machine);

        if !outcome.map.is_empty() {
            self.styles.update(|styles| styles.apply(&outcome.map));
        }
        let Some(highlight) = outcome.highlight else {
            return;
        };
        self.info.set(highlight.info);
        if let Some(row) = highlight.scroll_to_row {
            self.scroll_to.set(Some(row));
        }
        if self.active.get_untracked() != active {
            self.active.set(active);
        }
    }

    pub fn enter(&self, name: &str, source: HighlightSource) {
        self.dispatch(HoverEvent::Enter(name.to_string()), source);
    }

    pub fn leave(&self, name: &str, source: HighlightSource) {
        self.dispatch(HoverEvent::Leave(name.to_string()), source);
    }
}

/// Root application component. Loads both documents, then hands the joined
/// state to the dashboard.
#[component]
pub fn App() -> impl IntoView {
    let load_state: RwSignal<LoadState> = RwSignal::new(LoadState::Loading);

    spawn_local(async move {
        match loader::load_app_state().await {
            Ok(state) => load_state.set(LoadState::Ready(Arc::new(state))),
            Err(e) => {
                web_sys::console::warn_1(&format!("Data load failed: {e}").into());
                load_state.set(LoadState::Failed(e.to_string()));
            }
        }
    });

    view! {
        {move || match load_state.get() {
            LoadState::Loading => view! {
                <div style="padding: 24px; font-family: sans-serif; color: #555;">"Loading map data\u{2026}"</div>
            }
            .into_any(),
            LoadState::Failed(message) => view! {
                <div
                    role="alert"
                    style="margin: 24px; padding: 16px 20px; max-width: 640px; font-family: sans-serif; border: 1px solid #d0587e; border-radius: 4px; background: #fdf1f4; color: #6b1f36;"
                >
                    <div style="font-weight: bold; margin-bottom: 6px;">"Could not load the happiness data"</div>
                    <div style="font-family: monospace; font-size: 0.85rem;">{message}</div>
                </div>
            }
            .into_any(),
            LoadState::Ready(state) => view! { <Dashboard state=state /> }.into_any(),
        }}
    }
}

#[component]
fn Dashboard(state: Arc<AppState>) -> impl IntoView {
    let highlighter = Highlighter::new(state, RenderEngine::detect().supports_raise());
    provide_context(highlighter);

    view! {
        <div style="display: flex; width: 100vw; height: 100vh; font-family: sans-serif; font-size: 13px;">
            <div style="position: relative; flex: 1 1 auto; min-width: 0;">
                <MapView />
            </div>
            <div style=format!("flex: 0 0 {TABLE_WIDTH}px; display: flex; flex-direction: column; border-left: 1px solid #ddd;")>
                <TableView />
            </div>
        </div>
    }
}
