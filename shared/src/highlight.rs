//! Hover handling for the map and table, expressed as pure transitions that
//! return the view updates to apply instead of touching any view directly.

use std::collections::HashMap;

use crate::boundary::JoinedBoundary;
use crate::color_scale::{Color, FILL_OPACITY};
use crate::score::format_score;
use crate::state::AppState;

pub const BASE_STROKE: Color = Color::from_hex(0xffffff);
pub const HIGHLIGHT_STROKE: Color = Color::from_hex(0x666666);
pub const BASE_WEIGHT: f64 = 1.0;
pub const HIGHLIGHT_WEIGHT: f64 = 2.0;

pub const PLACEHOLDER_NAME: &str = "Hover over a country";
pub const PLACEHOLDER_VALUE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryState {
    Idle,
    Highlighted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryStyle {
    pub fill: Color,
    pub fill_opacity: f64,
    pub stroke: Color,
    pub weight: f64,
}

impl BoundaryStyle {
    pub fn base(fill: Color) -> Self {
        Self {
            fill,
            fill_opacity: FILL_OPACITY,
            stroke: BASE_STROKE,
            weight: BASE_WEIGHT,
        }
    }

    pub fn highlighted(fill: Color) -> Self {
        Self {
            stroke: HIGHLIGHT_STROKE,
            weight: HIGHLIGHT_WEIGHT,
            ..Self::base(fill)
        }
    }

    pub fn for_state(fill: Color, state: BoundaryState) -> Self {
        match state {
            BoundaryState::Idle => Self::base(fill),
            BoundaryState::Highlighted => Self::highlighted(fill),
        }
    }
}

/// Where a hover came from. Only map hovers scroll the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightSource {
    Map,
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HoverEvent {
    Enter(String),
    Leave(String),
}

/// Info overlay contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InfoPanel {
    #[default]
    Placeholder,
    Country {
        name: String,
        score: f64,
        rank: usize,
    },
}

impl InfoPanel {
    pub fn name_text(&self) -> String {
        match self {
            InfoPanel::Placeholder => PLACEHOLDER_NAME.to_string(),
            InfoPanel::Country { name, .. } => name.clone(),
        }
    }

    pub fn score_text(&self) -> String {
        match self {
            InfoPanel::Placeholder => PLACEHOLDER_VALUE.to_string(),
            InfoPanel::Country { score, .. } => format_score(*score),
        }
    }

    pub fn rank_text(&self) -> String {
        match self {
            InfoPanel::Placeholder => PLACEHOLDER_VALUE.to_string(),
            InfoPanel::Country { rank, .. } => rank.to_string(),
        }
    }
}

/// Info panel and table updates for one highlight change.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightUpdate {
    pub info: InfoPanel,
    /// Table row to scroll into view, if any.
    pub scroll_to_row: Option<usize>,
}

/// Cross-highlight for a hovered country name, or `None` when nothing is hovered.
///
/// A name with no table row leaves the table where it is and shows the placeholder.
pub fn on_highlight(state: &AppState, name: Option<&str>) -> HighlightUpdate {
    let Some(name) = name else {
        return HighlightUpdate {
            info: InfoPanel::Placeholder,
            scroll_to_row: None,
        };
    };

    let Some(row) = state.row_of(name) else {
        return HighlightUpdate {
            info: InfoPanel::Placeholder,
            scroll_to_row: None,
        };
    };

    let record = &state.scores()[row];
    HighlightUpdate {
        info: InfoPanel::Country {
            name: record.name.clone(),
            score: record.score,
            rank: record.rank,
        },
        scroll_to_row: Some(row),
    }
}

/// Map style changes for one hover transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapUpdate {
    pub restyle: Vec<(String, BoundaryStyle)>,
    /// Boundary to draw above its siblings.
    pub raise: Option<String>,
    /// Clear any previous raise.
    pub lower: bool,
}

impl MapUpdate {
    pub fn is_empty(&self) -> bool {
        self.restyle.is_empty() && self.raise.is_none() && !self.lower
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HoverOutcome {
    pub map: MapUpdate,
    pub highlight: Option<HighlightUpdate>,
}

/// Tracks the single hovered country. A boundary is `Highlighted` only while it
/// is the hovered name and has a score; every other boundary is `Idle`.
#[derive(Debug, Clone, Default)]
pub struct HoverMachine {
    active: Option<String>,
}

impl HoverMachine {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn state_of(&self, boundary: &JoinedBoundary) -> BoundaryState {
        if boundary.is_interactive() && self.active.as_deref() == Some(boundary.name.as_str()) {
            BoundaryState::Highlighted
        } else {
            BoundaryState::Idle
        }
    }

    /// Apply a hover event and describe the resulting view updates.
    ///
    /// Entering a new country while another is active releases the old one first.
    /// A leave for a name that is not active is stale and ignored. Map hovers on
    /// boundaries without a score are ignored entirely.
    pub fn apply(
        &mut self,
        state: &AppState,
        event: HoverEvent,
        source: HighlightSource,
        supports_raise: bool,
    ) -> HoverOutcome {
        match event {
            HoverEvent::Enter(name) => {
                let boundary = state.boundary(&name).filter(|b| b.is_interactive());
                if source == HighlightSource::Map && boundary.is_none() {
                    return HoverOutcome::default();
                }
                if self.active.as_deref() == Some(name.as_str()) {
                    return HoverOutcome::default();
                }

                let mut map = self.release(state);
                let mut highlight = on_highlight(state, Some(&name));
                if source == HighlightSource::Table {
                    highlight.scroll_to_row = None;
                }
                self.active = Some(name);

                if let Some(boundary) = boundary {
                    map.restyle.push(self.restyle(boundary));
                    if supports_raise {
                        map.raise = Some(boundary.name.clone());
                        map.lower = false;
                    }
                }
                HoverOutcome {
                    map,
                    highlight: Some(highlight),
                }
            }
            HoverEvent::Leave(name) => {
                if self.active.as_deref() != Some(name.as_str()) {
                    return HoverOutcome::default();
                }
                let map = self.release(state);
                HoverOutcome {
                    map,
                    highlight: Some(on_highlight(state, None)),
                }
            }
        }
    }

    fn release(&mut self, state: &AppState) -> MapUpdate {
        let mut map = MapUpdate::default();
        let Some(previous) = self.active.take() else {
            return map;
        };
        if let Some(boundary) = state.boundary(&previous).filter(|b| b.is_interactive()) {
            map.restyle.push(self.restyle(boundary));
            map.lower = true;
        }
        map
    }

    fn restyle(&self, boundary: &JoinedBoundary) -> (String, BoundaryStyle) {
        let style = BoundaryStyle::for_state(boundary.fill, self.state_of(boundary));
        (boundary.name.clone(), style)
    }
}

/// Style overrides and stacking the map renderer draws with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapStyles {
    overrides: HashMap<String, BoundaryStyle>,
    raised: Option<String>,
}

impl MapStyles {
    pub fn apply(&mut self, update: &MapUpdate) {
        if update.lower {
            self.raised = None;
        }
        for (name, style) in &update.restyle {
            self.overrides.insert(name.clone(), *style);
        }
        if let Some(name) = &update.raise {
            self.raised = Some(name.clone());
        }
    }

    pub fn style_of(&self, boundary: &JoinedBoundary) -> BoundaryStyle {
        self.overrides
            .get(&boundary.name)
            .copied()
            .unwrap_or_else(|| BoundaryStyle::base(boundary.fill))
    }

    pub fn raised(&self) -> Option<&str> {
        self.raised.as_deref()
    }

    /// Boundaries in paint order: document order, with the raised one last.
    pub fn draw_order<'a>(
        &'a self,
        boundaries: &'a [JoinedBoundary],
    ) -> impl Iterator<Item = &'a JoinedBoundary> + 'a {
        let raised = self.raised.as_deref();
        boundaries
            .iter()
            .filter(move |b| Some(b.name.as_str()) != raised)
            .chain(
                boundaries
                    .iter()
                    .filter(move |b| Some(b.name.as_str()) == raised),
            )
    }
}
