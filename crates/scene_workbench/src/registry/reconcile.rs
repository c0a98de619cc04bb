//! Reconciliation of a group list against the asset index
//!
//! Two passes over the authoritative set of identifiers:
//!
//! 1. Walk every user group, dropping entries whose identifier no longer
//!    resolves and claiming the ones that do.
//! 2. Rebuild the default group from whatever was not claimed.
//!
//! User groups keep their membership and order; the default group is always
//! rebuilt, never merged. Running it twice with no external change yields the
//! same registry.

use std::collections::{HashMap, HashSet};

use crate::identity::{display_name_from_path, AssetId, IdentityResolver};
use super::entry::RegistryEntry;
use super::group::{GroupList, DEFAULT_GROUP};

/// Outcome of one reconciliation pass over a registry kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Entries created for identifiers that were not registered before
    pub added: Vec<AssetId>,
    /// Entries pruned because their identifier stopped resolving
    pub removed: Vec<AssetId>,
    /// Names of user groups removed because pruning emptied them
    pub groups_removed: Vec<String>,
    /// Discovered identifiers skipped because they have no path
    pub unresolved: usize,
}

impl ReconcileReport {
    /// Whether the pass added or removed anything
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.groups_removed.is_empty()
    }
}

impl<T: RegistryEntry> GroupList<T> {
    /// Synchronize this list with the resolver's current inventory
    pub fn reconcile(&mut self, resolver: &dyn IdentityResolver) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        // Authoritative pool: identifier → resolved path, plus discovery order
        let mut discovery_order = Vec::new();
        let mut pool: HashMap<AssetId, String> = HashMap::new();
        for id in resolver.discover(T::KIND) {
            match resolver.resolved_path(&id) {
                Some(path) => {
                    if pool.insert(id.clone(), path).is_none() {
                        discovery_order.push(id);
                    }
                }
                None => {
                    log::debug!("Skipping {:?} asset {} with no resolvable path", T::KIND, id);
                    report.unresolved += 1;
                }
            }
        }

        // Pass 1: user groups claim their identifiers
        let mut index = DEFAULT_GROUP + 1;
        while index < self.groups.len() {
            let group = &mut self.groups[index];
            let group_name = group.name.clone();
            group.entries.retain_mut(|entry| {
                if let Some(path) = pool.remove(entry.id()) {
                    entry.set_display_name(display_name_from_path(&path));
                    true
                } else {
                    log::debug!("Pruning unresolvable entry {} from group '{}'", entry.id(), group_name);
                    report.removed.push(entry.id().clone());
                    false
                }
            });

            if group.entries.is_empty() {
                let group = self.groups.remove(index);
                log::debug!("Removing group '{}' emptied by reconciliation", group.name);
                report.groups_removed.push(group.name);
                continue;
            }
            index += 1;
        }

        // Pass 2: unclaimed identifiers replace the default group
        let previous_default = std::mem::take(&mut self.groups[DEFAULT_GROUP].entries);
        let previous_ids: HashSet<&AssetId> = previous_default.iter().map(RegistryEntry::id).collect();
        let mut default_entries = Vec::new();
        for id in discovery_order {
            if let Some(path) = pool.remove(&id) {
                if !previous_ids.contains(&id) {
                    report.added.push(id.clone());
                }
                default_entries.push(T::new(id, display_name_from_path(&path)));
            }
        }

        // Pruned default entries, in their previous order
        let kept: HashSet<&AssetId> = default_entries.iter().map(RegistryEntry::id).collect();
        for entry in &previous_default {
            if !kept.contains(entry.id()) {
                log::debug!("Pruning unresolvable entry {} from the default group", entry.id());
                report.removed.push(entry.id().clone());
            }
        }
        self.groups[DEFAULT_GROUP].entries = default_entries;
        self.dirty = true;

        report
    }
}
