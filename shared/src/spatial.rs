use crate::boundary::{Bounds, JoinedBoundary};

const GRID_COLS: usize = 64;
const GRID_ROWS: usize = 64;

/// A flat 2D grid over world space bucketing boundary bounding boxes, so a hover
/// only runs point-in-polygon tests against a handful of candidates.
/// Only interactive boundaries are indexed.
pub struct SpatialGrid {
    cells: Vec<Vec<usize>>,
    bounds: Bounds,
    cell_w: f64,
    cell_h: f64,
}

impl SpatialGrid {
    pub fn build(boundaries: &[JoinedBoundary]) -> Self {
        let mut bounds = Bounds::EMPTY;
        for boundary in boundaries.iter().filter(|b| b.is_interactive()) {
            bounds.union(&boundary.bounds);
        }
        if bounds.is_empty() {
            return Self {
                cells: Vec::new(),
                bounds,
                cell_w: 1.0,
                cell_h: 1.0,
            };
        }

        // Pad so points on the outer edge still land inside the grid
        bounds.min_x -= 1e-6;
        bounds.min_y -= 1e-6;
        bounds.max_x += 1e-6;
        bounds.max_y += 1e-6;

        let cell_w = (bounds.max_x - bounds.min_x) / GRID_COLS as f64;
        let cell_h = (bounds.max_y - bounds.min_y) / GRID_ROWS as f64;
        let mut cells = vec![Vec::new(); GRID_COLS * GRID_ROWS];

        for (idx, boundary) in boundaries.iter().enumerate() {
            if !boundary.is_interactive() || boundary.bounds.is_empty() {
                continue;
            }
            let b = &boundary.bounds;
            let col_start = ((b.min_x - bounds.min_x) / cell_w).floor().max(0.0) as usize;
            let col_end = ((b.max_x - bounds.min_x) / cell_w)
                .ceil()
                .min(GRID_COLS as f64) as usize;
            let row_start = ((b.min_y - bounds.min_y) / cell_h).floor().max(0.0) as usize;
            let row_end = ((b.max_y - bounds.min_y) / cell_h)
                .ceil()
                .min(GRID_ROWS as f64) as usize;

            for row in row_start..row_end.max(row_start + 1).min(GRID_ROWS) {
                for col in col_start..col_end.max(col_start + 1).min(GRID_COLS) {
                    cells[row * GRID_COLS + col].push(idx);
                }
            }
        }

        Self {
            cells,
            bounds,
            cell_w,
            cell_h,
        }
    }

    /// Index of the interactive boundary under a world coordinate. Where shapes
    /// overlap, the `raised` one wins since it is painted on top.
    pub fn find_at(
        &self,
        boundaries: &[JoinedBoundary],
        wx: f64,
        wy: f64,
        raised: Option<&str>,
    ) -> Option<usize> {
        if self.cells.is_empty() {
            return None;
        }

        let col = ((wx - self.bounds.min_x) / self.cell_w).floor() as isize;
        let row = ((wy - self.bounds.min_y) / self.cell_h).floor() as isize;
        if col < 0 || row < 0 || col >= GRID_COLS as isize || row >= GRID_ROWS as isize {
            return None;
        }

        let mut hits = self.cells[row as usize * GRID_COLS + col as usize]
            .iter()
            .copied()
            .filter(|&idx| boundaries.get(idx).is_some_and(|b| b.contains(wx, wy)));
        let first = hits.next()?;
        match raised {
            Some(name) if boundaries[first].name != name => {
                Some(hits.find(|&idx| boundaries[idx].name == name).unwrap_or(first))
            }
            _ => Some(first),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SpatialGrid;
    use crate::boundary::{CountryBoundary, JoinedBoundary, project};

    fn square(name: &str, lon: f64, lat: f64, size: f64, matched: bool) -> JoinedBoundary {
        let boundary = CountryBoundary {
            name: name.to_string(),
            polygons: vec![vec![vec![
                (lon, lat),
                (lon + size, lat),
                (lon + size, lat + size),
                (lon, lat + size),
                (lon, lat),
            ]]],
        };
        let (record, score) = if matched { (Some(0), Some(6.0)) } else { (None, None) };
        JoinedBoundary::new(&boundary, record, score)
    }

    #[test]
    fn finds_the_boundary_under_a_point() {
        let boundaries = vec![
            square("West", -20.0, 0.0, 10.0, true),
            square("East", 20.0, 0.0, 10.0, true),
        ];
        let grid = SpatialGrid::build(&boundaries);

        let (x, y) = project(25.0, 5.0);
        assert_eq!(grid.find_at(&boundaries, x, y, None), Some(1));
        let (x, y) = project(-15.0, 5.0);
        assert_eq!(grid.find_at(&boundaries, x, y, None), Some(0));
        let (x, y) = project(5.0, 5.0);
        assert_eq!(grid.find_at(&boundaries, x, y, None), None);
    }

    #[test]
    fn unmatched_boundaries_are_never_hit() {
        let boundaries = vec![
            square("Atlantis", -30.0, 20.0, 5.0, false),
            square("Norway", 5.0, 58.0, 10.0, true),
        ];
        let grid = SpatialGrid::build(&boundaries);
        let (x, y) = project(-28.0, 22.0);
        assert_eq!(grid.find_at(&boundaries, x, y, None), None);
    }

    #[test]
    fn grid_without_interactive_boundaries_finds_nothing() {
        let boundaries = vec![square("Atlantis", 0.0, 0.0, 1.0, false)];
        let grid = SpatialGrid::build(&boundaries);
        assert_eq!(grid.find_at(&boundaries, 128.0, 128.0, None), None);
    }

    #[test]
    fn raised_boundary_wins_where_shapes_overlap() {
        let boundaries = vec![
            square("Sweden", 10.0, 55.0, 10.0, true),
            square("Norway", 15.0, 58.0, 10.0, true),
        ];
        let grid = SpatialGrid::build(&boundaries);
        let (x, y) = project(17.0, 60.0);

        assert_eq!(grid.find_at(&boundaries, x, y, None), Some(0));
        assert_eq!(grid.find_at(&boundaries, x, y, Some("Norway")), Some(1));
        assert_eq!(grid.find_at(&boundaries, x, y, Some("Sweden")), Some(0));
        // A raised name elsewhere on the map does not change the hit.
        assert_eq!(grid.find_at(&boundaries, x, y, Some("Finland")), Some(0));
    }
}
