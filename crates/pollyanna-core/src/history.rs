//! Assignment history and the exclusion index derived from it.
//!
//! History is append-only from the draw's point of view: a run reads it,
//! folds the recent window into per-category exclusion sets, and only the
//! caller records the new year afterwards (in memory via
//! [`History::with_year`], on disk through the store).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::model::{Category, Year, YearRecord};

static EMPTY: BTreeSet<String> = BTreeSet::new();

/// Every recorded draw, keyed by year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    years: BTreeMap<Year, YearRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(&self, year: Year) -> Option<&YearRecord> {
        self.years.get(&year)
    }

    /// Recorded years, oldest first.
    pub fn years(&self) -> impl Iterator<Item = (Year, &YearRecord)> {
        self.years.iter().map(|(y, r)| (*y, r))
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Add or overwrite one year's record.
    pub fn insert_year(&mut self, year: Year, record: YearRecord) -> Option<YearRecord> {
        self.years.insert(year, record)
    }

    /// Copy of this history with `year` added or overwritten.
    pub fn with_year(&self, year: Year, record: YearRecord) -> Self {
        let mut next = self.clone();
        next.insert_year(year, record);
        next
    }
}

impl FromIterator<(Year, YearRecord)> for History {
    fn from_iter<I: IntoIterator<Item = (Year, YearRecord)>>(iter: I) -> Self {
        Self {
            years: iter.into_iter().collect(),
        }
    }
}

/// Lookup from participant to the recipients they may not draw this run.
pub trait ExclusionLookup {
    /// Excluded recipients for `participant`. Unknown participants get the empty set.
    fn excluded(&self, participant: &str) -> &BTreeSet<String>;
}

/// Exclusions for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryExclusions {
    by_giver: HashMap<String, BTreeSet<String>>,
}

impl CategoryExclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, giver: &str, recipient: &str) {
        self.by_giver
            .entry(giver.to_string())
            .or_default()
            .insert(recipient.to_string());
    }

    pub fn is_excluded(&self, giver: &str, recipient: &str) -> bool {
        self.excluded(giver).contains(recipient)
    }

    /// Number of givers carrying at least one exclusion.
    pub fn len(&self) -> usize {
        self.by_giver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_giver.is_empty()
    }
}

impl ExclusionLookup for CategoryExclusions {
    fn excluded(&self, participant: &str) -> &BTreeSet<String> {
        self.by_giver.get(participant).unwrap_or(&EMPTY)
    }
}

/// Per-category exclusion sets for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionIndex {
    regular: CategoryExclusions,
    gag: CategoryExclusions,
}

impl ExclusionIndex {
    pub fn for_category(&self, category: Category) -> &CategoryExclusions {
        match category {
            Category::Regular => &self.regular,
            Category::Gag => &self.gag,
        }
    }

    fn for_category_mut(&mut self, category: Category) -> &mut CategoryExclusions {
        match category {
            Category::Regular => &mut self.regular,
            Category::Gag => &mut self.gag,
        }
    }

    pub fn excluded(&self, category: Category, participant: &str) -> &BTreeSet<String> {
        self.for_category(category).excluded(participant)
    }
}

/// Years consulted for `current_year`: the `memory_length` years before it.
///
/// The lower bound saturates, so an oversized memory length simply covers
/// every earlier year.
pub fn memory_window(current_year: Year, memory_length: usize) -> Range<Year> {
    let back = Year::try_from(memory_length).unwrap_or(Year::MAX);
    current_year.saturating_sub(back)..current_year
}

/// Fold the recent window of `history` into per-category exclusion sets.
///
/// Years absent from history are skipped. Exclusions never cross categories:
/// last year's gag recipient only blocks this year's gag draw.
pub fn build_exclusion_index(
    history: &History,
    memory_length: usize,
    current_year: Year,
) -> ExclusionIndex {
    history
        .years
        .range(memory_window(current_year, memory_length))
        .map(|(_, record)| record)
        .fold(ExclusionIndex::default(), |mut index, record| {
            for category in Category::ALL {
                let exclusions = index.for_category_mut(category);
                for (giver, recipient) in record.assignment(category).iter() {
                    exclusions.add(giver, recipient);
                }
            }
            index
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::YearlyAssignment;

    fn record(regular: &[(&str, &str)], gag: &[(&str, &str)]) -> YearRecord {
        let to_assignment = |pairs: &[(&str, &str)]| -> YearlyAssignment {
            pairs
                .iter()
                .map(|(g, r)| (g.to_string(), r.to_string()))
                .collect()
        };
        YearRecord {
            regular: to_assignment(regular),
            gag: to_assignment(gag),
        }
    }

    fn sample_history() -> History {
        [
            (2021, record(&[("A", "D")], &[("A", "E")])),
            (2022, record(&[("A", "C")], &[("A", "D")])),
            (2023, record(&[("A", "B"), ("B", "A")], &[("A", "C")])),
        ]
        .into_iter()
        .collect()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn window_covers_previous_years_only() {
        let years: Vec<Year> = memory_window(2024, 3).collect();
        assert_eq!(years, vec![2021, 2022, 2023]);
        assert!(memory_window(2024, 0).is_empty());
    }

    #[test]
    fn oversized_memory_length_saturates() {
        assert_eq!(memory_window(2024, usize::MAX), Year::MIN..2024);
        assert_eq!(memory_window(2024, usize::MAX / 2).start, Year::MIN);

        let index = build_exclusion_index(&sample_history(), usize::MAX, 2024);
        assert_eq!(index.excluded(Category::Regular, "A"), &set(&["B", "C", "D"]));
        assert_eq!(index.excluded(Category::Gag, "A"), &set(&["C", "D", "E"]));
    }

    #[test]
    fn index_respects_memory_length() {
        let history = sample_history();

        let one = build_exclusion_index(&history, 1, 2024);
        assert_eq!(one.excluded(Category::Regular, "A"), &set(&["B"]));
        assert_eq!(one.excluded(Category::Gag, "A"), &set(&["C"]));

        let three = build_exclusion_index(&history, 3, 2024);
        assert_eq!(three.excluded(Category::Regular, "A"), &set(&["B", "C", "D"]));
        assert_eq!(three.excluded(Category::Gag, "A"), &set(&["C", "D", "E"]));
    }

    #[test]
    fn missing_years_are_skipped() {
        let history: History = [(2020, record(&[("A", "B")], &[]))].into_iter().collect();
        let index = build_exclusion_index(&history, 3, 2024);
        assert!(index.for_category(Category::Regular).is_empty());
        assert!(index.for_category(Category::Gag).is_empty());
    }

    #[test]
    fn current_year_is_not_consulted() {
        let history: History = [(2024, record(&[("A", "B")], &[]))].into_iter().collect();
        let index = build_exclusion_index(&history, 3, 2024);
        assert!(index.excluded(Category::Regular, "A").is_empty());
    }

    #[test]
    fn unknown_participant_gets_empty_set() {
        let index = build_exclusion_index(&sample_history(), 3, 2024);
        assert!(index.excluded(Category::Regular, "Zed").is_empty());
        assert!(index.excluded(Category::Gag, "Zed").is_empty());
    }

    #[test]
    fn categories_do_not_leak() {
        let history: History = [(2023, record(&[("A", "B")], &[]))].into_iter().collect();
        let index = build_exclusion_index(&history, 1, 2024);
        assert!(index.for_category(Category::Regular).is_excluded("A", "B"));
        assert!(!index.for_category(Category::Gag).is_excluded("A", "B"));
    }

    #[test]
    fn derivation_is_idempotent() {
        let history = sample_history();
        let snapshot = history.clone();
        let first = build_exclusion_index(&history, 3, 2024);
        let second = build_exclusion_index(&history, 3, 2024);
        assert_eq!(first, second);
        assert_eq!(history, snapshot);
    }

    #[test]
    fn with_year_leaves_source_untouched() {
        let history = sample_history();
        let amended = history.with_year(2024, record(&[("A", "E")], &[("A", "B")]));
        assert_eq!(history.len(), 3);
        assert_eq!(amended.len(), 4);
        assert_eq!(amended.year(2024).unwrap().regular.recipient("A"), Some("E"));
    }

    #[test]
    fn history_serializes_with_string_year_keys() {
        let history: History = [(2023, record(&[("A", "B")], &[("A", "C")]))]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["2023"]["regular"]["A"], "B");
        assert_eq!(json["2023"]["gag"]["A"], "C");

        let back: History = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
