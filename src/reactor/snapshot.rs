//! A serializable view of everything a renderer draws for one frame.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use super::Reactor;
use crate::model::animation::Constraints;
use crate::model::{ChangeState, Direction, Group, GroupId, TabBar, TabbingState, UngroupState};
use crate::sys::geometry::{Point, Rect};
use crate::sys::host::{Host, WindowId};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub groups: Vec<GroupSnapshot>,
    /// The rubber band of an active selection.
    pub selection: Option<Rect>,
    /// Screen areas to repaint after the last selection change.
    pub damage: Vec<Rect>,
}

#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub color: [u16; 4],
    pub tabbing: TabbingState,
    pub ungroup: UngroupState,
    pub top_tab: Option<WindowId>,
    pub bar: Option<BarSnapshot>,
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub windows: BTreeMap<WindowId, WindowSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarSnapshot {
    pub region: Rect,
    pub tabs: Vec<TabSnapshot>,
    pub change_state: ChangeState,
    pub progress: f32,
    pub direction: Direction,
    pub dragged: Option<WindowId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TabSnapshot {
    pub window: WindowId,
    pub slot: Rect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct WindowSnapshot {
    /// Where the window is drawn, which differs from its frame while it
    /// is animating.
    pub position: Point,
    pub animated: bool,
    pub constraints: Constraints,
    pub hidden: bool,
}

impl From<&TabBar> for BarSnapshot {
    fn from(bar: &TabBar) -> Self {
        BarSnapshot {
            region: bar.region,
            tabs: bar
                .tabs()
                .iter()
                .map(|tab| TabSnapshot { window: tab.window, slot: tab.region })
                .collect(),
            change_state: bar.change_state,
            progress: bar.change_progress(),
            direction: bar.direction,
            dragged: bar.dragged,
        }
    }
}

fn group_snapshot<H: Host>(host: &H, group: &Group) -> GroupSnapshot {
    let windows = group
        .members()
        .iter()
        .filter_map(|member| {
            let info = host.window(member.window)?;
            let animated = member.anim.is_animated();
            let position = if animated { member.anim.current_pos() } else { info.frame.origin };
            Some((member.window, WindowSnapshot {
                position,
                animated,
                constraints: member.anim.constraints(),
                hidden: info.is_hidden(),
            }))
        })
        .collect();
    GroupSnapshot {
        id: group.id,
        color: group.color,
        tabbing: group.tabbing,
        ungroup: group.ungroup,
        top_tab: group.top_tab(),
        bar: group.tab_bar.as_ref().map(BarSnapshot::from),
        windows,
    }
}

pub(super) fn take<H: Host>(reactor: &Reactor<H>) -> FrameSnapshot {
    let mut groups: Vec<GroupSnapshot> = reactor
        .registry
        .iter()
        .map(|(_, group)| group_snapshot(&reactor.host, group))
        .collect();
    groups.sort_by_key(|group| group.id);
    FrameSnapshot {
        groups,
        selection: reactor.selection.rect(),
        damage: reactor.selection.damage().to_vec(),
    }
}
