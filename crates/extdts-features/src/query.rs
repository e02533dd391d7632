//! Resolved feature values.
//!
//! [`FeatureQuery`] is the fully populated availability of one symbol.
//! [`FeatureDiff`] is the sparse form stored on model nodes: only the fields
//! that differ from the parent's canonical feature are present, which is
//! what keeps documentation tags from repeating what the parent implies.

use std::collections::BTreeSet;

use crate::channel::Channel;
use crate::raw::RawSet;

/// A set of allowed values, or the sentinel "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowSet {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl AllowSet {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = BTreeSet::new();
        for item in items {
            if item == "all" {
                return AllowSet::All;
            }
            set.insert(item.to_string());
        }
        AllowSet::Only(set)
    }

    pub fn from_raw(raw: &RawSet) -> Self {
        Self::from_items(raw.items())
    }

    /// Narrow by another restriction. `All` is the identity.
    pub fn intersect(&self, other: &AllowSet) -> AllowSet {
        match (self, other) {
            (AllowSet::All, x) | (x, AllowSet::All) => x.clone(),
            (AllowSet::Only(a), AllowSet::Only(b)) => {
                AllowSet::Only(a.intersection(b).cloned().collect())
            }
        }
    }

    /// Widen by another set. `All` absorbs.
    pub fn union(&self, other: &AllowSet) -> AllowSet {
        match (self, other) {
            (AllowSet::All, _) | (_, AllowSet::All) => AllowSet::All,
            (AllowSet::Only(a), AllowSet::Only(b)) => AllowSet::Only(a.union(b).cloned().collect()),
        }
    }

    /// An explicit set with no members: nothing is allowed.
    pub fn is_empty(&self) -> bool {
        matches!(self, AllowSet::Only(set) if set.is_empty())
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            AllowSet::All => true,
            AllowSet::Only(set) => set.contains(value),
        }
    }

    pub fn items(&self) -> Option<&BTreeSet<String>> {
        match self {
            AllowSet::All => None,
            AllowSet::Only(set) => Some(set),
        }
    }
}

/// First release a symbol shipped in, from the historic symbol map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    Version(u32),
    /// Known to the history but not yet released to stable.
    Pending,
}

/// Fully resolved availability of one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureQuery {
    pub channel: Channel,
    pub permissions: BTreeSet<String>,
    pub manifest_keys: BTreeSet<String>,
    pub platforms: AllowSet,
    pub contexts: AllowSet,
    pub extension_types: AllowSet,
    pub min_manifest_version: Option<u32>,
    pub max_manifest_version: Option<u32>,
    pub location: Option<String>,
    pub disallow_for_service_workers: bool,
    pub since: Option<Since>,
    pub deprecated_since_version: Option<u32>,
    /// Set when no historic symbol map was supplied.
    pub unknown_version: bool,
}

impl FeatureQuery {
    /// Sparse diff of this feature against `parent`.
    ///
    /// Without a parent every non-default field is reported.
    pub fn diff(&self, parent: Option<&FeatureQuery>) -> FeatureDiff {
        let base = FeatureQuery::default();
        let parent = parent.unwrap_or(&base);

        fn changed<T: PartialEq + Clone>(mine: &T, theirs: &T) -> Option<T> {
            (mine != theirs).then(|| mine.clone())
        }

        FeatureDiff {
            channel: changed(&self.channel, &parent.channel),
            permissions: changed(&self.permissions, &parent.permissions)
                .map(|set| set.difference(&parent.permissions).cloned().collect())
                .filter(|set: &BTreeSet<String>| !set.is_empty()),
            manifest_keys: changed(&self.manifest_keys, &parent.manifest_keys)
                .map(|set| set.difference(&parent.manifest_keys).cloned().collect())
                .filter(|set: &BTreeSet<String>| !set.is_empty()),
            platforms: changed(&self.platforms, &parent.platforms),
            min_manifest_version: changed(&self.min_manifest_version, &parent.min_manifest_version)
                .flatten(),
            max_manifest_version: changed(&self.max_manifest_version, &parent.max_manifest_version)
                .flatten(),
            location: changed(&self.location, &parent.location).flatten(),
            disallow_for_service_workers: changed(
                &self.disallow_for_service_workers,
                &parent.disallow_for_service_workers,
            ),
            since: changed(&self.since, &parent.since).flatten(),
            deprecated_since_version: changed(
                &self.deprecated_since_version,
                &parent.deprecated_since_version,
            )
            .flatten(),
        }
    }
}

/// Sparse feature annotation: only fields that differ from the parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureDiff {
    pub channel: Option<Channel>,
    pub permissions: Option<BTreeSet<String>>,
    pub manifest_keys: Option<BTreeSet<String>>,
    pub platforms: Option<AllowSet>,
    pub min_manifest_version: Option<u32>,
    pub max_manifest_version: Option<u32>,
    pub location: Option<String>,
    pub disallow_for_service_workers: Option<bool>,
    pub since: Option<Since>,
    pub deprecated_since_version: Option<u32>,
}

impl FeatureDiff {
    pub fn is_empty(&self) -> bool {
        *self == FeatureDiff::default()
    }
}
