//! Owner of every live group and of the window to group index.

use slotmap::{SlotMap, new_key_type};
use tracing::{debug, trace};

use super::error::GroupError;
use super::group::{Group, GroupId, GroupMember};
use super::tab_bar::RemovedTab;
use crate::common::collections::{HashMap, HashSet};
use crate::sys::host::WindowId;

new_key_type! {
    pub struct GroupKey;
}

/// What leaving a group took with it.
#[derive(Debug)]
pub struct RemovedMember {
    pub group: GroupKey,
    pub member: GroupMember,
    /// The window's slot, if the group was tabbed.
    pub tab: Option<RemovedTab>,
    /// The group itself, when the window was its last member.
    pub destroyed: Option<Group>,
}

#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: SlotMap<GroupKey, Group>,
    by_window: HashMap<WindowId, GroupKey>,
}

impl GroupRegistry {
    pub fn new() -> Self { Self::default() }

    /// Registers a new empty group. The requested id is used when it is
    /// free, otherwise the lowest unused id is picked.
    pub fn create_group(
        &mut self,
        requested: Option<GroupId>,
        color: [u16; 4],
    ) -> Result<GroupKey, GroupError> {
        let used: HashSet<u32> = self.groups.values().map(|g| g.id.get()).collect();
        let id = match requested {
            Some(id) if id.get() != 0 && !used.contains(&id.get()) => id,
            _ => (1..=u32::MAX)
                .find(|id| !used.contains(id))
                .map(GroupId::new)
                .ok_or(GroupError::IdSpaceExhausted)?,
        };
        let key = self.groups.insert(Group::new(id, color));
        debug!(%id, ?key, "created group");
        Ok(key)
    }

    pub fn group_of(&self, window: WindowId) -> Option<GroupKey> {
        self.by_window.get(&window).copied()
    }

    pub fn get(&self, key: GroupKey) -> Option<&Group> { self.groups.get(key) }

    pub fn get_mut(&mut self, key: GroupKey) -> Option<&mut Group> { self.groups.get_mut(key) }

    pub fn find_by_id(&self, id: GroupId) -> Option<GroupKey> {
        self.groups.iter().find(|(_, g)| g.id == id).map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupKey, &Group)> { self.groups.iter() }

    pub fn keys(&self) -> Vec<GroupKey> { self.groups.keys().collect() }

    pub fn len(&self) -> usize { self.groups.len() }

    pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    /// Makes room for `additional` new members of the group.
    pub fn reserve(&mut self, key: GroupKey, additional: usize) -> Result<(), GroupError> {
        let group = self.groups.get_mut(key).ok_or(GroupError::GroupNotFound(key))?;
        group.reserve_members(additional)?;
        self.by_window.try_reserve(additional)?;
        Ok(())
    }

    /// Adds `window` to the group, taking it out of any other group first.
    /// Nothing changes if room for the new member cannot be allocated.
    pub fn add_window(
        &mut self,
        key: GroupKey,
        window: WindowId,
    ) -> Result<Option<RemovedMember>, GroupError> {
        let previous = self.group_of(window);
        if previous == Some(key) {
            return Ok(None);
        }
        let group = self.groups.get_mut(key).ok_or(GroupError::GroupNotFound(key))?;
        group.reserve_members(1)?;
        self.by_window.try_reserve(1)?;

        let left = match previous {
            Some(_) => self.remove_window(window),
            None => None,
        };

        if let Some(group) = self.groups.get_mut(key) {
            group.push_member(window);
            self.by_window.insert(window, key);
            trace!(?window, id = %group.id, "added window to group");
        }
        Ok(left)
    }

    /// Takes `window` out of its group, removing its slot from the tab bar.
    /// A group left without members is destroyed.
    pub fn remove_window(&mut self, window: WindowId) -> Option<RemovedMember> {
        let key = self.by_window.remove(&window)?;
        let group = self.groups.get_mut(key)?;
        let member = group.remove_member(window)?;
        let tab = group.tab_bar.as_mut().and_then(|bar| bar.remove_tab(window, false));
        if tab.as_ref().is_some_and(|t| t.emptied) {
            group.tab_bar = None;
        }
        trace!(?window, id = %group.id, "removed window from group");

        let destroyed = if group.is_empty() { self.groups.remove(key) } else { None };
        if let Some(group) = &destroyed {
            debug!(id = %group.id, "destroyed empty group");
        }
        Some(RemovedMember { group: key, member, tab, destroyed })
    }

    /// Drops the group and the membership of all its windows.
    pub fn remove_group(&mut self, key: GroupKey) -> Option<Group> {
        let group = self.groups.remove(key)?;
        for window in group.windows() {
            self.by_window.remove(&window);
        }
        debug!(id = %group.id, "destroyed group");
        Some(group)
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        for (key, group) in &self.groups {
            for window in group.windows() {
                assert_eq!(self.group_of(window), Some(key), "{window} not indexed");
            }
            if let Some(bar) = &group.tab_bar {
                let mut seen = HashSet::default();
                for tab in bar.tabs() {
                    assert!(seen.insert(tab.window), "{} has two tabs", tab.window);
                    assert!(group.contains(tab.window), "{} tabbed but not a member", tab.window);
                }
                if let Some(top) = bar.top {
                    assert!(bar.contains(top), "top tab {top} is not in the bar");
                }
            }
        }
        for (window, key) in &self.by_window {
            let group = self.groups.get(*key).expect("index points at a dead group");
            assert!(group.contains(*window), "{window} indexed but not a member");
        }
    }
}
