use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entry::{Fingerprint, RecentEntry};
use crate::kind::ContentKind;

/// Ordered, deduplicated, capped list of recent entries for one kind.
///
/// Always fully sorted by `(year desc, external_id desc)` and free of
/// duplicate fingerprints before it is exposed or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    pub kind: ContentKind,
    pub entries: Vec<RecentEntry>,
}

impl ResultSnapshot {
    pub fn empty(kind: ContentKind) -> Self {
        ResultSnapshot {
            kind,
            entries: Vec::new(),
        }
    }

    /// Filter, deduplicate, rank and cap enriched entries.
    ///
    /// A `min_year` of 0 disables the year floor; with a floor active,
    /// unknown years (0) are excluded as well. Duplicate fingerprints keep
    /// the last occurrence.
    pub fn assemble(
        kind: ContentKind,
        entries: Vec<RecentEntry>,
        min_year: u32,
        max_results: usize,
    ) -> Self {
        let mut kept: Vec<RecentEntry> = Vec::with_capacity(entries.len());
        let mut seen: HashMap<Fingerprint, usize> = HashMap::new();
        for entry in entries {
            if min_year > 0 && entry.year < min_year {
                continue;
            }
            match seen.get(&entry.fingerprint()) {
                Some(&slot) => kept[slot] = entry,
                None => {
                    seen.insert(entry.fingerprint(), kept.len());
                    kept.push(entry);
                }
            }
        }
        kept.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| b.external_id.cmp(&a.external_id))
        });
        kept.truncate(max_results);
        ResultSnapshot { kind, entries: kept }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, year: u32) -> RecentEntry {
        RecentEntry {
            external_id: id,
            kind: ContentKind::Movie,
            title: format!("title-{id}"),
            poster_url: String::new(),
            year,
            extension: "mp4".to_string(),
        }
    }

    #[test]
    fn sorts_by_year_then_id_descending() {
        let snapshot = ResultSnapshot::assemble(
            ContentKind::Movie,
            vec![entry(1, 2022), entry(3, 2024), entry(2, 2024)],
            0,
            10,
        );
        let ids: Vec<u32> = snapshot.entries.iter().map(|e| e.external_id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn caps_at_max_results() {
        let entries = (1..=30).map(|i| entry(i, 2000 + i)).collect();
        let snapshot = ResultSnapshot::assemble(ContentKind::Movie, entries, 0, 20);
        assert_eq!(snapshot.len(), 20);
        assert_eq!(snapshot.entries[0].year, 2030);
    }

    #[test]
    fn year_floor_excludes_unknown_years() {
        let snapshot = ResultSnapshot::assemble(
            ContentKind::Movie,
            vec![entry(1, 2024), entry(2, 0), entry(3, 2023)],
            2024,
            10,
        );
        let ids: Vec<u32> = snapshot.entries.iter().map(|e| e.external_id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn zero_min_year_disables_the_floor() {
        let snapshot =
            ResultSnapshot::assemble(ContentKind::Movie, vec![entry(1, 0)], 0, 10);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn duplicate_fingerprints_keep_the_last_occurrence() {
        let mut newer = entry(1, 2024);
        newer.title = "newer".to_string();
        let snapshot = ResultSnapshot::assemble(
            ContentKind::Movie,
            vec![entry(1, 2022), entry(2, 2023), newer],
            0,
            10,
        );
        assert_eq!(snapshot.len(), 2);
        let kept = snapshot
            .entries
            .iter()
            .find(|e| e.external_id == 1)
            .unwrap();
        assert_eq!(kept.title, "newer");
        assert_eq!(kept.year, 2024);
    }

    #[test]
    fn snapshot_serde_round_trip_preserves_order() {
        let snapshot = ResultSnapshot::assemble(
            ContentKind::Series,
            vec![entry(5, 2021), entry(9, 2025), entry(7, 2023)],
            0,
            10,
        );
        let json = serde_json::to_vec(&snapshot).unwrap();
        let back: ResultSnapshot = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
