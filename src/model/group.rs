use serde::{Deserialize, Serialize};

use super::animation::TabAnimation;
use super::error::GroupError;
use super::tab_bar::TabBar;
use crate::sys::host::WindowId;

/// User-visible group number. Stable for the group's lifetime and never
/// shared by two live groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u32);

impl GroupId {
    pub const fn new(id: u32) -> Self { GroupId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "#{}", self.0) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TabbingState {
    #[default]
    NoTabbing,
    Tabbing,
    Untabbing,
}

/// Teardown requested while an animation was running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UngroupState {
    #[default]
    None,
    /// Destroy the whole group once the untab settles.
    All,
    /// Detach the members marked as ungrouping once the untab settles.
    Single,
}

#[derive(Clone, Debug)]
pub struct GroupMember {
    pub window: WindowId,
    pub anim: TabAnimation,
    pub ungrouping: bool,
}

impl GroupMember {
    pub fn new(window: WindowId) -> Self {
        GroupMember {
            window,
            anim: TabAnimation::default(),
            ungrouping: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Group {
    pub id: GroupId,
    /// RGBA, opaque to everything but the renderer.
    pub color: [u16; 4],
    members: Vec<GroupMember>,
    pub tab_bar: Option<TabBar>,
    pub tabbing: TabbingState,
    pub ungroup: UngroupState,
    /// An untab of the whole group waits for the running animation.
    pub untab_pending: bool,
    /// Member currently grabbed by the user for a move.
    pub grab: Option<WindowId>,
}

impl Group {
    pub fn new(id: GroupId, color: [u16; 4]) -> Self {
        Group {
            id,
            color,
            members: Vec::new(),
            tab_bar: None,
            tabbing: TabbingState::NoTabbing,
            ungroup: UngroupState::None,
            untab_pending: false,
            grab: None,
        }
    }

    /// Members in insertion order.
    pub fn members(&self) -> &[GroupMember] { &self.members }

    pub fn members_mut(&mut self) -> &mut [GroupMember] { &mut self.members }

    pub fn windows(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.members.iter().map(|m| m.window)
    }

    pub fn len(&self) -> usize { self.members.len() }

    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    pub fn contains(&self, window: WindowId) -> bool { self.member(window).is_some() }

    pub fn member(&self, window: WindowId) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.window == window)
    }

    pub fn member_mut(&mut self, window: WindowId) -> Option<&mut GroupMember> {
        self.members.iter_mut().find(|m| m.window == window)
    }

    pub fn is_tabbed(&self) -> bool { self.tab_bar.is_some() }

    pub fn top_tab(&self) -> Option<WindowId> { self.tab_bar.as_ref().and_then(|bar| bar.top) }

    /// True while a tabbing or tab change animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.tabbing != TabbingState::NoTabbing
            || self.tab_bar.as_ref().is_some_and(TabBar::is_changing)
    }

    pub(super) fn reserve_members(&mut self, additional: usize) -> Result<(), GroupError> {
        self.members.try_reserve(additional)?;
        Ok(())
    }

    pub(super) fn push_member(&mut self, window: WindowId) {
        self.members.push(GroupMember::new(window));
    }

    pub(super) fn remove_member(&mut self, window: WindowId) -> Option<GroupMember> {
        let idx = self.members.iter().position(|m| m.window == window)?;
        if self.grab == Some(window) {
            self.grab = None;
        }
        Some(self.members.remove(idx))
    }
}
