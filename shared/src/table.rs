use crate::color_scale::{Color, FACTOR_COLORS};
use crate::score::{ScoreRecord, SubFactor};

pub const NAME_WIDTH: f64 = 140.0;
pub const SCORE_WIDTH: f64 = 50.0;
pub const ROW_HEIGHT: f64 = 22.0;
/// Sub-factor value that spans the whole bar column.
pub const FACTOR_SCALE_MAX: f64 = 8.0;

/// Column widths, measured once when the table is rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub name_width: f64,
    pub score_width: f64,
    pub bar_width: f64,
    pub row_height: f64,
}

impl TableLayout {
    /// The bar column takes whatever the two fixed columns leave over.
    pub fn for_container(container_width: f64) -> Self {
        Self {
            name_width: NAME_WIDTH,
            score_width: SCORE_WIDTH,
            bar_width: (container_width - NAME_WIDTH - SCORE_WIDTH).max(0.0),
            row_height: ROW_HEIGHT,
        }
    }

    /// Pixel width for a factor value on the fixed 0..8 scale. NaN and negatives are empty.
    pub fn segment_width(&self, value: f64) -> f64 {
        if value.is_nan() || value <= 0.0 {
            return 0.0;
        }
        value / FACTOR_SCALE_MAX * self.bar_width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub factor: SubFactor,
    pub x: f64,
    pub width: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub index: usize,
    pub name: String,
    pub rank: usize,
    pub score_text: String,
    pub segments: Vec<BarSegment>,
}

/// Stack the seven factor segments left to right.
pub fn bar_segments(record: &ScoreRecord, layout: &TableLayout) -> Vec<BarSegment> {
    let mut x = 0.0;
    SubFactor::ALL
        .iter()
        .map(|&factor| {
            let width = layout.segment_width(record.factor(factor));
            let segment = BarSegment {
                factor,
                x,
                width,
                color: FACTOR_COLORS[factor.index()],
            };
            x += width;
            segment
        })
        .collect()
}

fn score_cell(score: f64) -> String {
    if score.is_nan() {
        String::new()
    } else {
        format!("{score:.2}")
    }
}

/// Row models for the table view, one per record in load order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableModel {
    rows: Vec<TableRow>,
}

impl TableModel {
    /// Replace every row. Rendering the same records twice leaves exactly one row per record.
    pub fn render(&mut self, records: &[ScoreRecord], container_width: f64) {
        let layout = TableLayout::for_container(container_width);
        self.rows.clear();
        self.rows.extend(records.iter().enumerate().map(|(index, record)| TableRow {
            index,
            name: record.name.clone(),
            rank: record.rank,
            score_text: score_cell(record.score),
            segments: bar_segments(record, &layout),
        }));
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}
