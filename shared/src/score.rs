use crate::error::LoadError;

pub const NAME_COLUMN: &str = "Country";
pub const SCORE_COLUMN: &str = "Happiness score";

/// The seven contributions the survey breaks each overall score into,
/// in the order they are stacked in the table bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubFactor {
    GdpPerCapita,
    SocialSupport,
    HealthyLifeExpectancy,
    Freedom,
    Generosity,
    Corruption,
    DystopiaResidual,
}

impl SubFactor {
    pub const ALL: [SubFactor; 7] = [
        SubFactor::GdpPerCapita,
        SubFactor::SocialSupport,
        SubFactor::HealthyLifeExpectancy,
        SubFactor::Freedom,
        SubFactor::Generosity,
        SubFactor::Corruption,
        SubFactor::DystopiaResidual,
    ];

    /// Header name in the score CSV.
    pub fn column(self) -> &'static str {
        match self {
            SubFactor::GdpPerCapita => "GDP per capita",
            SubFactor::SocialSupport => "Social support",
            SubFactor::HealthyLifeExpectancy => "Healthy life expectancy",
            SubFactor::Freedom => "Freedom to make life choices",
            SubFactor::Generosity => "Generosity",
            SubFactor::Corruption => "Perceptions of corruption",
            SubFactor::DystopiaResidual => "Dystopia + residual",
        }
    }

    /// Short label for the table's color key.
    pub fn label(self) -> &'static str {
        match self {
            SubFactor::GdpPerCapita => "GDP",
            SubFactor::SocialSupport => "Social",
            SubFactor::HealthyLifeExpectancy => "Health",
            SubFactor::Freedom => "Freedom",
            SubFactor::Generosity => "Generosity",
            SubFactor::Corruption => "Trust",
            SubFactor::DystopiaResidual => "Residual",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One country's row from the score CSV. Created once at load, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub name: String,
    /// Overall score; NaN when the CSV text was not numeric.
    pub score: f64,
    /// 1-based position in the input order.
    pub rank: usize,
    pub factors: [f64; 7],
}

impl ScoreRecord {
    pub fn factor(&self, factor: SubFactor) -> f64 {
        self.factors[factor.index()]
    }

    /// The score, or `None` when coercion produced NaN.
    pub fn known_score(&self) -> Option<f64> {
        (!self.score.is_nan()).then_some(self.score)
    }
}

/// Coerce CSV text to a number. Empty, malformed or non-finite text becomes NaN.
pub fn coerce_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(f64::NAN)
}

/// Format a score the way the info panel and table show it (`-` for NaN).
pub fn format_score(score: f64) -> String {
    if score.is_nan() {
        "-".to_string()
    } else {
        format!("{score}")
    }
}

fn column_position(headers: &csv::StringRecord, name: &str) -> Result<usize, LoadError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

/// Parse the score CSV. Rows keep their input order and are ranked 1..=N by it;
/// the input is expected to be pre-sorted by descending score.
pub fn parse_scores(text: &str) -> Result<Vec<ScoreRecord>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let name_col = column_position(&headers, NAME_COLUMN)?;
    let score_col = column_position(&headers, SCORE_COLUMN)?;
    let mut factor_cols = [0usize; 7];
    for (slot, factor) in factor_cols.iter_mut().zip(SubFactor::ALL) {
        *slot = column_position(&headers, factor.column())?;
    }

    let mut records = Vec::new();
    for (position, row) in reader.records().enumerate() {
        let row = row?;
        let number_at = |col: usize| row.get(col).map(coerce_number).unwrap_or(f64::NAN);

        let mut factors = [f64::NAN; 7];
        for (value, col) in factors.iter_mut().zip(factor_cols) {
            *value = number_at(col);
        }

        records.push(ScoreRecord {
            name: row.get(name_col).unwrap_or_default().to_string(),
            score: number_at(score_col),
            rank: position + 1,
            factors,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::{LoadError, SubFactor, coerce_number, format_score, parse_scores};
    use crate::color_scale::{NEUTRAL_COLOR, color_for};

    const HEADER: &str = "Country,Happiness score,GDP per capita,Social support,Healthy life expectancy,Freedom to make life choices,Generosity,Perceptions of corruption,Dystopia + residual";

    #[test]
    fn coerces_numbers_and_malformed_text() {
        assert_eq!(coerce_number("7.632"), 7.632);
        assert_eq!(coerce_number(" 1.5 "), 1.5);
        assert!(coerce_number("N/A").is_nan());
        assert!(coerce_number("").is_nan());
        assert!(coerce_number("   ").is_nan());
    }

    #[test]
    fn infinity_and_nan_words_are_not_numbers() {
        for word in ["inf", "-inf", "infinity", "Infinity", "NaN", "nan"] {
            assert!(coerce_number(word).is_nan(), "{word} should coerce to NaN");
        }
        assert_eq!(color_for(Some(coerce_number("inf"))), NEUTRAL_COLOR);
    }

    #[test]
    fn ranks_follow_input_order() {
        let csv = format!(
            "{HEADER}\nFinland,7.632,1.305,1.592,0.874,0.681,0.202,0.393,2.585\nNorway,7.594,1.456,1.582,0.861,0.686,0.286,0.340,2.383\nDenmark,7.555,1.351,1.590,0.868,0.683,0.284,0.408,2.370\n"
        );
        let records = parse_scores(&csv).expect("scores should parse");
        let ranks: Vec<usize> = records.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(records[1].name, "Norway");
        assert_eq!(records[1].score, 7.594);
        assert_eq!(records[0].factor(SubFactor::DystopiaResidual), 2.585);
    }

    #[test]
    fn malformed_score_becomes_nan_without_failing_the_load() {
        let csv = format!("{HEADER}\nAtlantis,N/A,1,1,1,1,1,1,\n");
        let records = parse_scores(&csv).expect("malformed numbers must not fail");
        assert!(records[0].score.is_nan());
        assert_eq!(records[0].known_score(), None);
        assert!(records[0].factor(SubFactor::DystopiaResidual).is_nan());
    }

    #[test]
    fn short_rows_fill_missing_fields_with_nan() {
        let csv = format!("{HEADER}\nNowhere,5.1\n");
        let records = parse_scores(&csv).expect("short rows are tolerated");
        assert_eq!(records[0].score, 5.1);
        assert!(records[0].factors.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn missing_required_column_is_reported() {
        let csv = "Country,Happiness score\nFinland,7.632\n";
        let err = parse_scores(csv).expect_err("factor columns are required");
        assert!(matches!(err, LoadError::MissingColumn(ref col) if col == "GDP per capita"));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let csv = format!("{HEADER},Whisker-high\nFinland,7.632,1,1,1,1,1,1,1,7.7\n");
        let records = parse_scores(&csv).expect("extra columns are fine");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].score, 7.632);
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(7.594), "7.594");
        assert_eq!(format_score(f64::NAN), "-");
    }
}
