//! Groups and group lists
//!
//! A [`GroupList`] is one registry kind: an ordered list of groups where
//! index 0 is the permanent default group. Every mutation keeps the two
//! registry invariants intact:
//!
//! - an identifier appears at most once across the list
//! - a non-default group that becomes empty is removed

use crate::core::config::SortPolicy;
use crate::identity::AssetId;
use super::entry::RegistryEntry;
use super::RegistryError;

/// Index of the permanent default group
pub const DEFAULT_GROUP: usize = 0;

/// A user-named, ordered container of entries of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<T> {
    /// User-editable name
    pub name: String,
    /// Ordered entries
    pub entries: Vec<T>,
    /// Search-filter result
    pub is_visible: bool,
}

impl<T: RegistryEntry> Group<T> {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_entries(name, Vec::new())
    }

    /// Create a group holding the given entries
    pub fn with_entries(name: impl Into<String>, entries: Vec<T>) -> Self {
        Self {
            name: name.into(),
            entries,
            is_visible: true,
        }
    }

    /// Position of an entry within this group
    pub fn position(&self, id: &AssetId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == id)
    }

    /// Whether this group holds the identifier
    pub fn contains(&self, id: &AssetId) -> bool {
        self.position(id).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the group has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered groups of one registry kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupList<T> {
    pub(super) groups: Vec<Group<T>>,
    pub(super) dirty: bool,
}

impl<T: RegistryEntry> GroupList<T> {
    /// Create a list holding only the default group
    pub fn new(default_group_name: impl Into<String>) -> Self {
        Self {
            groups: vec![Group::new(default_group_name)],
            dirty: false,
        }
    }

    /// Build a list from stored groups
    ///
    /// The first group becomes the default group. Duplicate identifiers keep
    /// their first occurrence, and empty non-default groups are dropped.
    pub fn from_groups(default_group_name: impl Into<String>, groups: Vec<Group<T>>) -> Self {
        let mut list = Self::new(default_group_name);
        let mut seen = std::collections::HashSet::new();

        for (index, mut group) in groups.into_iter().enumerate() {
            let group_name = group.name.clone();
            group.entries.retain(|entry| {
                let fresh = seen.insert(entry.id().clone());
                if !fresh {
                    log::warn!("Dropping duplicate registry entry {} in group '{}'", entry.id(), group_name);
                }
                fresh
            });

            if index == DEFAULT_GROUP {
                list.groups[DEFAULT_GROUP] = group;
            } else if !group.is_empty() {
                list.groups.push(group);
            }
        }

        list
    }

    /// All groups, default first
    pub fn groups(&self) -> &[Group<T>] {
        &self.groups
    }

    /// Mutable access to a group's transient state and entry order
    pub fn group_mut(&mut self, index: usize) -> Option<&mut Group<T>> {
        self.groups.get_mut(index)
    }

    /// Group at `index`
    pub fn get(&self, index: usize) -> Option<&Group<T>> {
        self.groups.get(index)
    }

    /// The permanent default group
    pub fn default_group(&self) -> &Group<T> {
        &self.groups[DEFAULT_GROUP]
    }

    /// Number of groups, including the default group
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false: the default group cannot be removed
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Index of the first group with the given name
    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|group| group.name == name)
    }

    /// Locate an entry as `(group index, entry index)`
    pub fn find(&self, id: &AssetId) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(group_index, group)| group.position(id).map(|entry_index| (group_index, entry_index)))
    }

    /// Entry by identifier
    pub fn entry(&self, id: &AssetId) -> Option<&T> {
        self.find(id).map(|(group, entry)| &self.groups[group].entries[entry])
    }

    /// All entries across all groups, in group order
    pub fn entries(&self) -> impl Iterator<Item = &T> {
        self.groups.iter().flat_map(|group| group.entries.iter())
    }

    /// Mutable iteration over all entries, for transient state updates
    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.groups.iter_mut().flat_map(|group| group.entries.iter_mut())
    }

    /// Whether the list changed since the dirty flag was last cleared
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Append a new, empty group and return its index
    ///
    /// The group is removed by the next reconciliation pass unless entries are
    /// moved into it first.
    pub fn add_group(&mut self, name: &str) -> Result<usize, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyGroupName);
        }

        self.groups.push(Group::new(name));
        self.dirty = true;
        log::debug!("Added group '{}' at index {}", name, self.groups.len() - 1);
        Ok(self.groups.len() - 1)
    }

    /// Rename a group
    pub fn rename_group(&mut self, index: usize, name: &str) -> Result<(), RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyGroupName);
        }

        let group = self.group_at(index)?;
        group.name = name.to_string();
        self.dirty = true;
        Ok(())
    }

    /// Delete a non-default group, moving its entries into the default group
    ///
    /// Returns the identifiers that were moved.
    pub fn delete_group(&mut self, index: usize) -> Result<Vec<AssetId>, RegistryError> {
        self.check_movable(index)?;

        let group = self.groups.remove(index);
        let moved: Vec<AssetId> = group.entries.iter().map(|entry| entry.id().clone()).collect();
        self.groups[DEFAULT_GROUP].entries.extend(group.entries);
        self.dirty = true;

        log::debug!("Deleted group '{}', {} entries moved to default", group.name, moved.len());
        Ok(moved)
    }

    /// Reorder a non-default group; the default group stays at index 0
    pub fn move_group(&mut self, from: usize, to: usize) -> Result<(), RegistryError> {
        self.check_movable(from)?;
        self.check_movable(to)?;

        if from != to {
            let group = self.groups.remove(from);
            self.groups.insert(to, group);
            self.dirty = true;
        }
        Ok(())
    }

    /// Transfer an entry from one group to another (appended at the end)
    ///
    /// If the source group is a non-default group and becomes empty, it is
    /// removed; group indices after it shift down by one.
    pub fn move_entry(&mut self, id: &AssetId, from: usize, to: usize) -> Result<(), RegistryError> {
        self.group_at(to)?;
        let position = self
            .group_at(from)?
            .position(id)
            .ok_or_else(|| RegistryError::EntryNotFound(id.clone()))?;

        if from == to {
            return Ok(());
        }

        let entry = self.groups[from].entries.remove(position);
        self.groups[to].entries.push(entry);
        self.remove_if_emptied(from);
        self.dirty = true;
        Ok(())
    }

    /// Register a new entry in the default group
    ///
    /// Returns `false` if the identifier is already registered.
    pub fn add_entry(&mut self, entry: T) -> bool {
        if self.find(entry.id()).is_some() {
            return false;
        }

        self.groups[DEFAULT_GROUP].entries.push(entry);
        self.dirty = true;
        true
    }

    /// Remove an entry wherever it lives
    pub fn remove_entry(&mut self, id: &AssetId) -> Option<T> {
        let (group_index, entry_index) = self.find(id)?;
        let entry = self.groups[group_index].entries.remove(entry_index);
        self.remove_if_emptied(group_index);
        self.dirty = true;
        Some(entry)
    }

    /// Sort every group's entries by display name (ordinal comparison)
    ///
    /// With [`SortPolicy::MultipleGroupsOnly`] a lone default group keeps its
    /// discovery order.
    pub fn sort(&mut self, policy: SortPolicy) {
        if policy == SortPolicy::MultipleGroupsOnly && self.groups.len() <= 1 {
            return;
        }

        for group in &mut self.groups {
            let sorted = group
                .entries
                .windows(2)
                .all(|pair| pair[0].display_name() <= pair[1].display_name());
            if !sorted {
                group.entries.sort_by(|a, b| a.display_name().cmp(b.display_name()));
                self.dirty = true;
            }
        }
    }

    /// Update visibility flags for a search query
    ///
    /// Entries match on a case-insensitive substring of their display name.
    /// A group is visible when its name matches or any entry is visible. An
    /// empty query shows everything.
    pub fn apply_filter(&mut self, query: &str) {
        let query = query.trim().to_lowercase();

        for group in &mut self.groups {
            let group_matches = query.is_empty() || group.name.to_lowercase().contains(&query);
            let mut any_visible = false;

            for entry in &mut group.entries {
                let visible = group_matches || entry.display_name().to_lowercase().contains(&query);
                entry.set_visible(visible);
                any_visible |= visible;
            }

            group.is_visible = group_matches || any_visible;
        }
    }

    /// Clear the dirty flag
    pub(super) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn group_at(&mut self, index: usize) -> Result<&mut Group<T>, RegistryError> {
        let count = self.groups.len();
        self.groups
            .get_mut(index)
            .ok_or(RegistryError::GroupOutOfRange { index, count })
    }

    fn check_movable(&self, index: usize) -> Result<(), RegistryError> {
        if index == DEFAULT_GROUP {
            return Err(RegistryError::DefaultGroupLocked);
        }
        if index >= self.groups.len() {
            return Err(RegistryError::GroupOutOfRange { index, count: self.groups.len() });
        }
        Ok(())
    }

    fn remove_if_emptied(&mut self, index: usize) {
        if index != DEFAULT_GROUP && self.groups[index].is_empty() {
            let group = self.groups.remove(index);
            log::debug!("Removed emptied group '{}'", group.name);
        }
    }
}
