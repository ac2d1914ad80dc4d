use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::error;

use crate::{OverlapGroup, RegionStyle};

/// Current and future conflicts are independent layer namespaces; one
/// registry per namespace, and removals never cross between them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Namespace {
    Current,
    Future,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Current => "conflict-current-",
            Namespace::Future => "conflict-future-",
        }
    }

    pub fn area_id(self, key: &str) -> String {
        format!("{}{}", self.prefix(), key)
    }

    pub fn style(self) -> RegionStyle {
        match self {
            Namespace::Current => RegionStyle {
                fill: "#d03030",
                opacity: 0.45,
                outline: "#801010",
            },
            Namespace::Future => RegionStyle {
                fill: "#e0a020",
                opacity: 0.35,
                outline: "#906010",
            },
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Namespace::Current => write!(f, "current"),
            Namespace::Future => write!(f, "future"),
        }
    }
}

/// One drawn overlap region, as recorded after a successful surface call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnRegion {
    pub area_id: String,
    pub content_hash: u64,
}

/// What should happen to bring the drawn set in line with a new snapshot.
/// Keys only; the caller looks the groups back up when drawing.
#[derive(Debug, Default, PartialEq)]
pub struct ReconcilePlan {
    pub to_add: Vec<String>,
    pub to_update: Vec<String>,
    pub to_remove: Vec<String>,
    pub skipped: Vec<String>,
}

/// Bookkeeping of what's currently drawn for one namespace. Owned by the
/// view's engine, written only through the commit methods below; no ambient
/// global state.
pub struct DrawnLayerRegistry {
    namespace: Namespace,
    entries: BTreeMap<String, DrawnRegion>,
}

impl DrawnLayerRegistry {
    pub fn new(namespace: Namespace) -> DrawnLayerRegistry {
        DrawnLayerRegistry {
            namespace,
            entries: BTreeMap::new(),
        }
    }

    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn area_id_of(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|entry| entry.area_id.as_str())
    }

    /// Decides add/update/remove/skip against the current snapshot. Pure: the
    /// decision is made atomically before any drawable mutation, and the
    /// caller commits each step only after its surface call succeeds.
    ///
    /// A group already drawn and flagged `is_unchanged` is skipped outright;
    /// the flag is a contract, not a hint. An absent flag means recompute.
    pub fn plan(&self, groups: &[OverlapGroup]) -> ReconcilePlan {
        let mut plan = ReconcilePlan::default();
        let mut seen = BTreeSet::new();
        for group in groups {
            let key = group.key();
            if !seen.insert(key.clone()) {
                // Duplicate key within one snapshot; first one wins.
                continue;
            }
            if !self.entries.contains_key(&key) {
                plan.to_add.push(key);
            } else if group.is_unchanged == Some(true) {
                plan.skipped.push(key);
            } else {
                plan.to_update.push(key);
            }
        }
        for key in self.entries.keys() {
            if !seen.contains(key) {
                plan.to_remove.push(key.clone());
            }
        }
        plan
    }

    /// Whether this registry may remove the given drawable. Ids from another
    /// namespace mean some bookkeeping went wrong; refuse loudly and leave
    /// the drawable alone.
    pub fn removal_allowed(&self, area_id: &str) -> bool {
        if area_id.starts_with(self.namespace.prefix()) {
            true
        } else {
            error!(
                "refusing to remove {} via the {} namespace",
                area_id, self.namespace
            );
            false
        }
    }

    /// Records a successful draw for this key.
    pub fn commit_drawn(&mut self, key: &str, content_hash: u64) {
        self.entries.insert(
            key.to_string(),
            DrawnRegion {
                area_id: self.namespace.area_id(key),
                content_hash,
            },
        );
    }

    /// Records a successful removal.
    pub fn commit_removed(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
