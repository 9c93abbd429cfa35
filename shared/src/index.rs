use std::collections::HashMap;

use crate::score::ScoreRecord;

/// Country name -> position in the loaded score list.
#[derive(Debug, Clone, Default)]
pub struct ScoreIndex {
    positions: HashMap<String, usize>,
    duplicates: Vec<String>,
}

impl ScoreIndex {
    /// Build the index once. A repeated name keeps its first record.
    pub fn build(records: &[ScoreRecord]) -> Self {
        let mut positions = HashMap::with_capacity(records.len());
        let mut duplicates = Vec::new();
        for (position, record) in records.iter().enumerate() {
            if positions.contains_key(&record.name) {
                duplicates.push(record.name.clone());
                continue;
            }
            positions.insert(record.name.clone(), position);
        }
        Self {
            positions,
            duplicates,
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Names that appeared more than once in the input.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::ScoreIndex;
    use crate::score::ScoreRecord;

    fn record(name: &str, rank: usize) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            score: 8.0 - rank as f64,
            rank,
            factors: [0.0; 7],
        }
    }

    #[test]
    fn every_name_maps_to_its_position() {
        let records = vec![record("Finland", 1), record("Norway", 2)];
        let index = ScoreIndex::build(&records);
        assert_eq!(index.position("Finland"), Some(0));
        assert_eq!(index.position("Norway"), Some(1));
        assert_eq!(index.position("Atlantis"), None);
    }

    #[test]
    fn lookups_are_exact() {
        let records = vec![record("Norway", 1)];
        let index = ScoreIndex::build(&records);
        assert_eq!(index.position("norway"), None);
        assert_eq!(index.position("Norway "), None);
    }

    #[test]
    fn duplicate_names_keep_the_first_record() {
        let records = vec![record("Chad", 1), record("Chad", 2)];
        let index = ScoreIndex::build(&records);
        assert_eq!(index.position("Chad"), Some(0));
        assert_eq!(index.duplicates(), ["Chad".to_string()]);
    }
}
