//! Diff calculation for new-item alerts.
//!
//! Computes which of a source's current records were not present in the
//! previous snapshot. Removals and attribute changes are not reported.

use std::collections::HashSet;

use crate::models::ItemRecord;

/// New records found on one source.
#[derive(Debug, Clone, Default)]
pub struct SourceDiff<'a> {
    /// Distinct ids currently listed
    pub current_ids: HashSet<&'a str>,
    /// Records whose id was not previously known, in listing order,
    /// first occurrence per id
    pub added: Vec<&'a ItemRecord>,
}

impl SourceDiff<'_> {
    pub fn has_new(&self) -> bool {
        !self.added.is_empty()
    }
}

/// Diff the current records of one source against its previous id set.
///
/// `previous` is `None` for a source never seen before.
pub fn diff_source<'a>(
    previous: Option<&HashSet<String>>,
    current: &'a [ItemRecord],
) -> SourceDiff<'a> {
    let mut current_ids = HashSet::new();
    let mut added = Vec::new();

    for record in current {
        // Duplicate ids collapse into the first occurrence.
        if !current_ids.insert(record.id.as_str()) {
            continue;
        }
        let known = previous.is_some_and(|ids| ids.contains(&record.id));
        if !known {
            added.push(record);
        }
    }

    SourceDiff { current_ids, added }
}
