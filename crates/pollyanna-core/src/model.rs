//! Draw data model: categories, per-year assignments and pairing results.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Calendar year a draw belongs to.
pub type Year = i32;

/// Gift category. Every participant gives exactly one gift per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Genuine gift
    Regular,
    /// Gag gift
    Gag,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Regular, Category::Gag];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Regular => "regular",
            Category::Gag => "gag",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Giver -> recipient mapping for one category in one year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyAssignment(BTreeMap<String, String>);

impl YearlyAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, giver: impl Into<String>, recipient: impl Into<String>) {
        self.0.insert(giver.into(), recipient.into());
    }

    pub fn recipient(&self, giver: &str) -> Option<&str> {
        self.0.get(giver).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(g, r)| (g.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when every participant gives exactly once, receives exactly once,
    /// and nobody is mapped to themselves.
    pub fn is_derangement_of(&self, participants: &[String]) -> bool {
        if self.0.len() != participants.len() {
            return false;
        }
        let mut received: Vec<&str> = Vec::with_capacity(participants.len());
        for name in participants {
            match self.recipient(name) {
                Some(recipient) if recipient != name.as_str() => received.push(recipient),
                _ => return false,
            }
        }
        received.sort_unstable();
        let mut expected: Vec<&str> = participants.iter().map(String::as_str).collect();
        expected.sort_unstable();
        received == expected
    }
}

impl FromIterator<(String, String)> for YearlyAssignment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Both category assignments recorded for one year.
///
/// A category missing from stored data deserializes as empty so a partial
/// year still contributes whatever it does record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRecord {
    #[serde(default)]
    pub regular: YearlyAssignment,
    #[serde(default)]
    pub gag: YearlyAssignment,
}

impl YearRecord {
    pub fn assignment(&self, category: Category) -> &YearlyAssignment {
        match category {
            Category::Regular => &self.regular,
            Category::Gag => &self.gag,
        }
    }
}

/// The two recipients one participant drew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub regular: String,
    pub gag: String,
}

impl Pair {
    pub fn recipient(&self, category: Category) -> &str {
        match category {
            Category::Regular => &self.regular,
            Category::Gag => &self.gag,
        }
    }
}

/// Final draw: participant -> (genuine recipient, gag recipient).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairingResult(BTreeMap<String, Pair>);

impl PairingResult {
    /// Zip two category assignments together. `None` if they cover different givers.
    pub fn combine(regular: &YearlyAssignment, gag: &YearlyAssignment) -> Option<Self> {
        if regular.len() != gag.len() {
            return None;
        }
        regular
            .iter()
            .map(|(giver, genuine)| {
                gag.recipient(giver).map(|gag_recipient| {
                    (
                        giver.to_string(),
                        Pair {
                            regular: genuine.to_string(),
                            gag: gag_recipient.to_string(),
                        },
                    )
                })
            })
            .collect::<Option<BTreeMap<_, _>>>()
            .map(Self)
    }

    pub fn get(&self, giver: &str) -> Option<&Pair> {
        self.0.get(giver)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pair)> {
        self.0.iter().map(|(g, p)| (g.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Project one category back out as a yearly assignment.
    pub fn assignment(&self, category: Category) -> YearlyAssignment {
        self.0
            .iter()
            .map(|(giver, pair)| (giver.clone(), pair.recipient(category).to_string()))
            .collect()
    }

    /// Shape stored in history for the year this draw belongs to.
    pub fn to_year_record(&self) -> YearRecord {
        YearRecord {
            regular: self.assignment(Category::Regular),
            gag: self.assignment(Category::Gag),
        }
    }
}

impl FromIterator<(String, Pair)> for PairingResult {
    fn from_iter<I: IntoIterator<Item = (String, Pair)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn assignment(pairs: &[(&str, &str)]) -> YearlyAssignment {
        pairs
            .iter()
            .map(|(g, r)| (g.to_string(), r.to_string()))
            .collect()
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Regular).unwrap(), "\"regular\"");
        assert_eq!(serde_json::to_string(&Category::Gag).unwrap(), "\"gag\"");
        assert_eq!(Category::Gag.to_string(), "gag");
    }

    #[test]
    fn derangement_check_accepts_cycle() {
        let a = assignment(&[("A", "B"), ("B", "C"), ("C", "A")]);
        assert!(a.is_derangement_of(&names(&["A", "B", "C"])));
    }

    #[test]
    fn derangement_check_rejects_fixed_point_and_duplicates() {
        let fixed = assignment(&[("A", "A"), ("B", "C"), ("C", "B")]);
        assert!(!fixed.is_derangement_of(&names(&["A", "B", "C"])));

        let dup = assignment(&[("A", "B"), ("B", "A"), ("C", "A")]);
        assert!(!dup.is_derangement_of(&names(&["A", "B", "C"])));

        let partial = assignment(&[("A", "B"), ("B", "A")]);
        assert!(!partial.is_derangement_of(&names(&["A", "B", "C"])));
    }

    #[test]
    fn combine_zips_by_giver() {
        let regular = assignment(&[("A", "B"), ("B", "C"), ("C", "A")]);
        let gag = assignment(&[("A", "C"), ("B", "A"), ("C", "B")]);
        let result = PairingResult::combine(&regular, &gag).unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(
            result.get("A"),
            Some(&Pair {
                regular: "B".into(),
                gag: "C".into()
            })
        );
        assert_eq!(result.assignment(Category::Regular), regular);
        assert_eq!(result.to_year_record().gag, gag);
    }

    #[test]
    fn combine_rejects_mismatched_givers() {
        let regular = assignment(&[("A", "B"), ("B", "A")]);
        let gag = assignment(&[("A", "B"), ("C", "A")]);
        assert!(PairingResult::combine(&regular, &gag).is_none());
    }

    #[test]
    fn year_record_tolerates_missing_category() {
        let record: YearRecord = serde_json::from_str(r#"{"regular": {"A": "B"}}"#).unwrap();
        assert_eq!(record.regular.recipient("A"), Some("B"));
        assert!(record.gag.is_empty());
    }
}
