use std::collections::HashMap;

use crate::boundary::{Bounds, CountryBoundary, JoinedBoundary, parse_boundaries};
use crate::error::LoadError;
use crate::index::ScoreIndex;
use crate::score::{ScoreRecord, parse_scores};
use crate::spatial::SpatialGrid;

/// Everything the views and the highlight coordinator read after load.
///
/// Built exactly once, after both documents arrive and before any rendering,
/// then shared read-only for the rest of the session.
pub struct AppState {
    scores: Vec<ScoreRecord>,
    index: ScoreIndex,
    boundaries: Vec<JoinedBoundary>,
    boundary_positions: HashMap<String, usize>,
    grid: SpatialGrid,
    world_bounds: Option<Bounds>,
}

/// How many boundaries found a score record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSummary {
    pub matched: usize,
    pub unmatched: Vec<String>,
}

impl AppState {
    pub fn new(scores: Vec<ScoreRecord>, boundaries: &[CountryBoundary]) -> Self {
        let index = ScoreIndex::build(&scores);
        let boundaries: Vec<JoinedBoundary> = boundaries
            .iter()
            .map(|boundary| {
                let record = index.position(&boundary.name);
                let score = record.map(|pos| scores[pos].score);
                JoinedBoundary::new(boundary, record, score)
            })
            .collect();

        let mut boundary_positions = HashMap::with_capacity(boundaries.len());
        let mut world = Bounds::EMPTY;
        for (pos, boundary) in boundaries.iter().enumerate() {
            boundary_positions.entry(boundary.name.clone()).or_insert(pos);
            world.union(&boundary.bounds);
        }
        let grid = SpatialGrid::build(&boundaries);

        Self {
            scores,
            index,
            boundaries,
            boundary_positions,
            grid,
            world_bounds: (!world.is_empty()).then_some(world),
        }
    }

    /// Parse both documents and join them.
    pub fn from_sources(geojson: &str, csv: &str) -> Result<Self, LoadError> {
        let boundaries = parse_boundaries(geojson)?;
        let scores = parse_scores(csv)?;
        Ok(Self::new(scores, &boundaries))
    }

    /// Score records in load (rank) order.
    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    /// The stored record for a country name.
    pub fn score(&self, name: &str) -> Option<&ScoreRecord> {
        self.index.position(name).map(|pos| &self.scores[pos])
    }

    pub fn index(&self) -> &ScoreIndex {
        &self.index
    }

    pub fn boundaries(&self) -> &[JoinedBoundary] {
        &self.boundaries
    }

    pub fn boundary(&self, name: &str) -> Option<&JoinedBoundary> {
        self.boundary_positions
            .get(name)
            .map(|&pos| &self.boundaries[pos])
    }

    /// Table row for a country: first exact match in score order.
    pub fn row_of(&self, name: &str) -> Option<usize> {
        self.scores.iter().position(|record| record.name == name)
    }

    /// Interactive boundary under a world coordinate, preferring the `raised` one.
    pub fn boundary_at(&self, wx: f64, wy: f64, raised: Option<&str>) -> Option<&JoinedBoundary> {
        self.grid
            .find_at(&self.boundaries, wx, wy, raised)
            .map(|idx| &self.boundaries[idx])
    }

    pub fn world_bounds(&self) -> Option<Bounds> {
        self.world_bounds
    }

    pub fn join_summary(&self) -> JoinSummary {
        let unmatched: Vec<String> = self
            .boundaries
            .iter()
            .filter(|b| !b.is_interactive())
            .map(|b| b.name.clone())
            .collect();
        JoinSummary {
            matched: self.boundaries.len() - unmatched.len(),
            unmatched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use crate::boundary::{CountryBoundary, project};
    use crate::color_scale::{NEUTRAL_COLOR, SCORE_COLORS};
    use crate::highlight::{HighlightSource, HoverEvent, HoverMachine, on_highlight};
    use crate::score::ScoreRecord;

    const FIXTURE_BOUNDARIES: &str = include_str!("../fixtures/countries.json");
    const FIXTURE_SCORES: &str = include_str!("../fixtures/whr2018scores.csv");

    fn fixture_state() -> AppState {
        AppState::from_sources(FIXTURE_BOUNDARIES, FIXTURE_SCORES).expect("fixtures load")
    }

    fn record(name: &str, score: f64, rank: usize) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            score,
            rank,
            factors: [1.0; 7],
        }
    }

    fn square(name: &str, lon: f64, lat: f64) -> CountryBoundary {
        CountryBoundary {
            name: name.to_string(),
            polygons: vec![vec![vec![
                (lon, lat),
                (lon + 4.0, lat),
                (lon + 4.0, lat + 4.0),
                (lon, lat + 4.0),
                (lon, lat),
            ]]],
        }
    }

    fn nordic() -> AppState {
        AppState::new(
            vec![
                record("Finland", 7.632, 1),
                record("Norway", 7.594, 2),
                record("Nowhere", f64::NAN, 3),
            ],
            &[
                square("Finland", 24.0, 61.0),
                square("Norway", 8.0, 60.0),
                square("Atlantis", -30.0, 20.0),
                square("Nowhere", 100.0, 0.0),
            ],
        )
    }

    #[test]
    fn index_returns_the_stored_record() {
        let state = nordic();
        for record in state.scores() {
            let found = state.score(&record.name).expect("every record is indexed");
            assert!(std::ptr::eq(found, record));
        }
    }

    #[test]
    fn join_annotates_scores_and_fills() {
        let state = nordic();
        let finland = state.boundary("Finland").expect("Finland boundary");
        assert_eq!(finland.score, Some(7.632));
        assert_eq!(finland.fill, SCORE_COLORS[4]);
        assert!(finland.is_interactive());

        let atlantis = state.boundary("Atlantis").expect("Atlantis boundary");
        assert_eq!(atlantis.score, None);
        assert_eq!(atlantis.fill, NEUTRAL_COLOR);
        assert!(!atlantis.is_interactive());
    }

    #[test]
    fn nan_score_joins_but_renders_neutral() {
        let state = nordic();
        let nowhere = state.boundary("Nowhere").expect("Nowhere boundary");
        assert!(nowhere.is_interactive());
        assert_eq!(nowhere.fill, NEUTRAL_COLOR);
    }

    #[test]
    fn row_lookup_is_score_order() {
        let state = nordic();
        assert_eq!(state.row_of("Finland"), Some(0));
        assert_eq!(state.row_of("Norway"), Some(1));
        assert_eq!(state.row_of("Atlantis"), None);
    }

    #[test]
    fn join_summary_lists_unmatched_boundaries() {
        let summary = nordic().join_summary();
        assert_eq!(summary.matched, 3);
        assert_eq!(summary.unmatched, vec!["Atlantis".to_string()]);
    }

    #[test]
    fn world_bounds_cover_every_boundary() {
        let state = nordic();
        let bounds = state.world_bounds().expect("non-empty state has bounds");
        for boundary in state.boundaries() {
            assert!(bounds.contains(boundary.bounds.min_x, boundary.bounds.min_y));
            assert!(bounds.contains(boundary.bounds.max_x, boundary.bounds.max_y));
        }
    }

    #[test]
    fn fixture_documents_join_by_exact_name() {
        let state = fixture_state();
        let ranks: Vec<usize> = state.scores().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);

        for name in ["Finland", "Norway"] {
            let boundary = state.boundary(name).expect("nordic boundary");
            assert_ne!(boundary.fill, NEUTRAL_COLOR, "{name}");
            assert!(boundary.is_interactive());
        }
        assert_eq!(state.boundary("Burundi").map(|b| b.fill), Some(SCORE_COLORS[0]));

        // Iceland has a score row but no boundary; it is still a table row.
        assert!(state.boundary("Iceland").is_none());
        assert_eq!(state.row_of("Iceland"), Some(3));
    }

    #[test]
    fn fixture_hover_on_norway_scrolls_to_its_row() {
        let state = fixture_state();
        let norway = state.boundary("Norway").expect("Norway boundary");
        let (x, y) = project(10.0, 60.0);
        assert_eq!(state.boundary_at(x, y, None).map(|b| b.name.as_str()), Some("Norway"));

        let mut machine = HoverMachine::default();
        let outcome = machine.apply(
            &state,
            HoverEvent::Enter(norway.name.clone()),
            HighlightSource::Map,
            true,
        );
        let update = outcome.highlight.expect("hover updates the info panel");
        assert_eq!(update, on_highlight(&state, Some("Norway")));
        assert_eq!(update.scroll_to_row, Some(1));
        assert_eq!(update.info.name_text(), "Norway");
        assert_eq!(update.info.score_text(), "7.594");
        assert_eq!(update.info.rank_text(), "2");
    }

    #[test]
    fn fixture_non_numeric_score_renders_neutral() {
        let state = fixture_state();
        let kosovo = state.score("Kosovo").expect("Kosovo row");
        assert!(kosovo.score.is_nan());
        assert!(kosovo.factors[6].is_nan());

        let boundary = state.boundary("Kosovo").expect("Kosovo boundary");
        assert_eq!(boundary.fill, NEUTRAL_COLOR);
        assert!(boundary.is_interactive());
    }

    #[test]
    fn fixture_unmatched_boundary_is_inert() {
        let state = fixture_state();
        let atlantis = state.boundary("Atlantis").expect("Atlantis boundary");
        assert_eq!(atlantis.fill, NEUTRAL_COLOR);

        let (x, y) = project(-30.0, 24.0);
        assert!(atlantis.contains(x, y));
        assert!(state.boundary_at(x, y, None).is_none());

        let mut machine = HoverMachine::default();
        let outcome = machine.apply(
            &state,
            HoverEvent::Enter("Atlantis".to_string()),
            HighlightSource::Map,
            true,
        );
        assert!(outcome.map.is_empty());
        assert!(outcome.highlight.is_none());
    }
}
