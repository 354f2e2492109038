//! The report aggregate: a three-level tree of tracked seconds.
//!
//! A [`Summary`] is fetched from the remote reports endpoint already grouped
//! (by project, client or entry) and sub-grouped. Once fetched it is treated
//! as immutable: the cache may hand the same aggregate to several in-flight
//! query evaluations, so a live running entry is only ever merged into a
//! deep clone ([`Summary`] derives `Clone` all the way down to the leaves),
//! never into the cached original.
//!
//! Totals are always recomputed from the leaves. Storing them redundantly
//! would let a merge desynchronise the levels.

use std::collections::BTreeMap;

/// Key of a top-level group.
///
/// Entries without a project (or client) land in the dedicated
/// [`GroupKey::None`] bucket rather than under a sentinel id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// "No project" / "no client" bucket.
    None,
    /// A concrete grouping entity.
    Id(i64),
}

/// Key of a sub-group within one group.
///
/// The owning group id is implicit in the map the sub-group lives in. Two
/// untitled-id sub-groups with the same title collide intentionally: they
/// are the same description bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubKey {
    /// Keyed by a sub-entity id (e.g. a project under a client group).
    Id(i64),
    /// Keyed by the raw sub-entry title (e.g. an entry description).
    Title(String),
}

/// Leaf of the aggregate: one bucket of tracked seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubGroup {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub seconds: i64,
}

/// One grouping bucket with its breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub id: Option<i64>,
    pub sub_groups: BTreeMap<SubKey, SubGroup>,
}

impl Group {
    /// Tracked seconds in this group, recomputed from the leaves.
    pub fn seconds(&self) -> i64 {
        self.sub_groups.values().map(|s| s.seconds).sum()
    }
}

/// A full report aggregate over one date range and grouping.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    groups: BTreeMap<GroupKey, Group>,
}

impl Summary {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total tracked seconds, recomputed from the leaves.
    pub fn seconds(&self) -> i64 {
        self.groups.values().map(Group::seconds).sum()
    }

    /// All groups, ordered by key.
    pub fn groups(&self) -> &BTreeMap<GroupKey, Group> {
        &self.groups
    }

    /// Look up one group.
    pub fn group(&self, key: &GroupKey) -> Option<&Group> {
        self.groups.get(key)
    }

    /// Add tracked seconds to a bucket, creating the group and sub-group if
    /// they do not exist yet.
    ///
    /// This is the only mutation the aggregate supports; callers merging a
    /// running entry invoke it on a clone of the cached value.
    pub fn add_seconds(
        &mut self,
        group_key: GroupKey,
        sub_key: SubKey,
        sub_title: Option<&str>,
        seconds: i64,
    ) {
        let group = self.groups.entry(group_key).or_insert_with(|| Group {
            id: match group_key {
                GroupKey::Id(id) => Some(id),
                GroupKey::None => None,
            },
            sub_groups: BTreeMap::new(),
        });

        let sub = group.sub_groups.entry(sub_key.clone()).or_insert_with(|| SubGroup {
            id: match &sub_key {
                SubKey::Id(id) => Some(*id),
                SubKey::Title(_) => None,
            },
            title: match &sub_key {
                SubKey::Title(title) => Some(title.clone()),
                SubKey::Id(_) => sub_title.map(str::to_string),
            },
            seconds: 0,
        });
        sub.seconds += seconds;
    }

    /// Insert a fully-built group, used when converting a remote response.
    pub fn insert_group(&mut self, key: GroupKey, group: Group) {
        self.groups.insert(key, group);
    }

    /// Whether the aggregate holds any tracked time at all.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Summary {
        let mut summary = Summary::new();
        summary.add_seconds(GroupKey::Id(100), SubKey::Title("docs".to_string()), None, 3600);
        summary.add_seconds(GroupKey::Id(100), SubKey::Title("review".to_string()), None, 1800);
        summary.add_seconds(GroupKey::None, SubKey::Title("untracked".to_string()), None, 600);
        summary
    }

    #[test]
    fn totals_are_recomputed_from_leaves() {
        let summary = sample();
        let group_total: i64 = summary.groups().values().map(Group::seconds).sum();
        assert_eq!(summary.seconds(), 6000);
        assert_eq!(summary.seconds(), group_total);
    }

    #[test]
    fn same_title_sub_groups_collide() {
        let mut summary = Summary::new();
        summary.add_seconds(GroupKey::Id(1), SubKey::Title("docs".to_string()), None, 100);
        summary.add_seconds(GroupKey::Id(1), SubKey::Title("docs".to_string()), None, 50);

        let group = summary.group(&GroupKey::Id(1)).map(Group::seconds);
        assert_eq!(group, Some(150));
        let subs = summary.group(&GroupKey::Id(1)).map(|g| g.sub_groups.len());
        assert_eq!(subs, Some(1));
    }

    #[test]
    fn merge_into_clone_leaves_original_untouched() {
        let original = sample();
        let mut clone = original.clone();
        clone.add_seconds(GroupKey::Id(100), SubKey::Title("docs".to_string()), None, 900);

        assert_eq!(original.seconds(), 6000);
        assert_eq!(clone.seconds(), 6900);

        // The nested collections must have been copied, not shared.
        let original_docs = original
            .group(&GroupKey::Id(100))
            .and_then(|g| g.sub_groups.get(&SubKey::Title("docs".to_string())))
            .map(|s| s.seconds);
        assert_eq!(original_docs, Some(3600));
    }

    #[test]
    fn add_seconds_creates_missing_nodes() {
        let mut summary = Summary::new();
        summary.add_seconds(GroupKey::Id(7), SubKey::Id(9), Some("Website"), 30);

        let sub = summary
            .group(&GroupKey::Id(7))
            .and_then(|g| g.sub_groups.get(&SubKey::Id(9)))
            .cloned();
        assert_eq!(
            sub,
            Some(SubGroup { id: Some(9), title: Some("Website".to_string()), seconds: 30 })
        );
    }
}
