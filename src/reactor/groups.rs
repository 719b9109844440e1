//! Group membership changes that need the host: grouping, detaching and
//! dissolving.

use tracing::{debug, warn};

use super::Reactor;
use super::animation::centered_on;
use crate::model::tab_bar::InsertAt;
use crate::model::{GroupError, GroupKey, Tab, TabbingState, UngroupState};
use crate::sys::host::{Host, WindowId};

impl<H: Host> Reactor<H> {
    /// Dissolves a group. A tabbed group is untabbed first unless
    /// `immediate` is set, the group goes away once that animation is over.
    pub fn destroy_group(&mut self, key: GroupKey, immediate: bool) {
        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        if !immediate && group.is_tabbed() {
            group.ungroup = UngroupState::All;
            if group.is_animating() {
                debug!(id = %group.id, "group busy, ungroup deferred");
                group.untab_pending = true;
            } else if !self.untab_group(key) {
                self.destroy_group(key, true);
            }
            return;
        }

        let Some(group) = self.registry.remove_group(key) else {
            return;
        };
        for wid in group.windows() {
            self.set_hidden(wid, false);
        }
        if self.drag.as_ref().is_some_and(|drag| drag.group == key) {
            self.drag = None;
        }
        debug!(id = %group.id, "ungrouped");
        for wid in group.windows() {
            self.autotab_window(wid);
        }
    }

    /// With `autotab_create`, puts an ungrouped window into a tabbed group
    /// of its own.
    pub(super) fn autotab_window(&mut self, wid: WindowId) -> Option<GroupKey> {
        if !self.settings().autotab_create || self.registry.group_of(wid).is_some() {
            return None;
        }
        if !self.window(wid).is_some_and(|info| !info.is_special()) {
            return None;
        }
        let color = self.random_color();
        let key = match self.registry.create_group(None, color) {
            Ok(key) => key,
            Err(err) => {
                warn!(%err, ?wid, "could not wrap window");
                return None;
            }
        };
        if let Err(err) = self.registry.add_window(key, wid) {
            warn!(%err, ?wid, "could not wrap window");
            self.registry.remove_group(key);
            return None;
        }
        self.tab_group(key, wid);
        debug!(?wid, "wrapped window into a group of its own");
        Some(key)
    }

    /// Takes a window out of its group right away. The bar hands the top to
    /// a neighbour if needed.
    pub(super) fn detach_window(&mut self, wid: WindowId, auto_ungroup: bool) -> Option<GroupKey> {
        let removed = self.registry.remove_window(wid)?;
        let key = removed.group;
        self.set_hidden(wid, false);
        let destroyed = removed.destroyed.is_some();
        if self
            .drag
            .as_ref()
            .is_some_and(|drag| drag.window == wid || (destroyed && drag.group == key))
        {
            self.drag = None;
        }
        if destroyed {
            debug!(?wid, "last window left its group");
            return Some(key);
        }

        if let Some((successor, change)) = removed.tab.as_ref().and_then(|tab| tab.successor) {
            self.apply_tab_change(key, successor, Some(wid), change);
            if self.settings().untab_on_close {
                self.request_untab(key);
            }
        }
        if auto_ungroup {
            self.check_auto_ungroup(key);
        }
        debug!(?wid, "window left its group");
        Some(key)
    }

    /// Takes a window out of its group, animating it out of the tab stack
    /// when the group is tabbed.
    pub fn remove_window_from_group(&mut self, wid: WindowId) {
        let Some(key) = self.registry.group_of(wid) else {
            return;
        };
        let tabbed = self.registry.get(key).is_some_and(|group| group.is_tabbed());
        if !(tabbed && self.start_single_untab(key, wid)) {
            self.detach_window(wid, true);
            self.autotab_window(wid);
        }
    }

    /// A window left alone in its group stays there when every window gets
    /// a group of its own anyway.
    fn check_auto_ungroup(&mut self, key: GroupKey) {
        if !self.settings().auto_ungroup || self.settings().autotab_create {
            return;
        }
        if self.registry.get(key).is_some_and(|group| group.len() == 1) {
            debug!("single window left, ungrouping");
            self.destroy_group(key, false);
        }
    }

    /// Puts `windows` into one group. A single tabbed group among their
    /// groups is joined, as is the only group when none is tabbed. Anything
    /// else gets a new group.
    pub fn group_windows(&mut self, windows: Vec<WindowId>) -> Result<Option<GroupKey>, GroupError> {
        let mut candidates: Vec<WindowId> = Vec::with_capacity(windows.len());
        for wid in windows {
            let usable = self.window(wid).is_some_and(|info| !info.is_special());
            if usable && !candidates.contains(&wid) {
                candidates.push(wid);
            }
        }
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut groups: Vec<GroupKey> = Vec::new();
        for &wid in &candidates {
            if let Some(key) = self.registry.group_of(wid)
                && !groups.contains(&key)
            {
                groups.push(key);
            }
        }
        let tabbed: Vec<GroupKey> = groups
            .iter()
            .copied()
            .filter(|key| self.registry.get(*key).is_some_and(|g| g.is_tabbed()))
            .collect();
        let reuse = match (tabbed.as_slice(), groups.as_slice()) {
            ([only], _) | ([], [only]) => Some(*only),
            _ => None,
        };
        if let Some(key) = reuse
            && self.registry.get(key).is_some_and(|g| g.tabbing != TabbingState::NoTabbing)
        {
            debug!("target group is animating, not grouping");
            return Ok(None);
        }

        let key = match reuse {
            Some(key) => key,
            None => {
                let color = self.random_color();
                self.registry.create_group(None, color)?
            }
        };
        let joining: Vec<WindowId> = candidates
            .iter()
            .copied()
            .filter(|wid| self.registry.group_of(*wid) != Some(key))
            .collect();
        if let Err(err) = self.registry.reserve(key, joining.len()) {
            if reuse.is_none() {
                self.registry.remove_group(key);
            }
            return Err(err);
        }

        let mut left = Vec::new();
        for &wid in &joining {
            if let Some(old) = self.detach_window(wid, false) {
                left.push(old);
            }
            self.registry.add_window(key, wid)?;
            self.join_tabbed(key, wid);
        }
        for old in left {
            self.check_auto_ungroup(old);
        }

        if let Some(group) = self.registry.get(key) {
            debug!(id = %group.id, members = group.len(), "grouped windows");
        }
        Ok(Some(key))
    }

    /// Stacks a window that just joined a tabbed group onto the top tab.
    fn join_tabbed(&mut self, key: GroupKey, wid: WindowId) {
        let Some(top) = self.registry.get(key).and_then(|g| g.top_tab()) else {
            return;
        };
        let (Some(top_info), Some(info)) = (self.window(top), self.window(wid)) else {
            return;
        };
        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        if let Some(bar) = group.tab_bar.as_mut()
            && let Err(err) = bar.insert(Tab::new(wid), InsertAt::End)
        {
            warn!(%err, ?wid, "could not add a tab");
            return;
        }

        let destination = centered_on(top_info.frame.center(), info.frame);
        if let Some(member) = group.member_mut(wid) {
            member.anim.main_tab_offset = info.frame.origin - destination;
            member.anim.start(info.frame.origin, destination);
        }
        group.tabbing = TabbingState::Tabbing;
        self.recalc_bar(key, None);
    }
}
