//! Tab changes and the tabbing/untabbing animation of whole groups.

use tracing::{debug, trace, warn};

use super::Reactor;
use crate::layout_engine::ConstraintTarget;
use crate::model::tab_bar::{ChangeEvent, InsertAt};
use crate::model::{Direction, GroupKey, Tab, TabBar, TabChange, TabbingState, UngroupState};
use crate::sys::geometry::{Insets, Point, Rect};
use crate::sys::host::{Host, WindowId};

/// Origin that centers `frame` on `center`.
pub(super) fn centered_on(center: Point, frame: Rect) -> Point {
    Point::new(
        center.x - frame.size.width / 2,
        center.y - frame.size.height / 2,
    )
}

impl<H: Host> Reactor<H> {
    /// Brings `target` to the top of its tab bar.
    pub fn change_tab(&mut self, key: GroupKey, target: WindowId, direction: Direction) -> TabChange {
        let Some(group) = self.registry.get_mut(key) else {
            return TabChange::Ignored;
        };
        if group.tabbing != TabbingState::NoTabbing {
            return TabChange::Ignored;
        }
        let Some(bar) = group.tab_bar.as_mut() else {
            return TabChange::Ignored;
        };
        let old_top = bar.top;
        let change = bar.change_tab(target, direction);
        self.apply_tab_change(key, target, old_top, change);
        change
    }

    /// Host side of a tab change: the new top tab becomes visible and takes
    /// the place of the old one.
    pub(super) fn apply_tab_change(
        &mut self,
        key: GroupKey,
        target: WindowId,
        old_top: Option<WindowId>,
        change: TabChange,
    ) {
        if !matches!(change, TabChange::Started { .. } | TabChange::Immediate) {
            return;
        }
        debug!(?target, ?change, "changing tab");
        self.set_hidden(target, false);

        if let Some(old) = old_top.filter(|old| *old != target)
            && let (Some(from), Some(to)) = (self.window(old), self.window(target))
        {
            let (a, b) = (from.frame.center(), to.frame.center());
            self.move_window(target, a.x - b.x, a.y - b.y, false);
        }

        if change == TabChange::Immediate {
            self.host.activate(target);
            self.recalc_bar(key, None);
        }
    }

    /// Lays the bar out along the top window. Without `middle` the bar stays
    /// centered where it is.
    pub(super) fn recalc_bar(&mut self, key: GroupKey, middle: Option<i32>) {
        let Some(bar) = self.registry.get(key).and_then(|g| g.tab_bar.as_ref()) else {
            return;
        };
        let Some(top) = bar.top.and_then(|top| self.host.window(top)) else {
            return;
        };
        let middle = middle.unwrap_or(bar.region.center().x);
        if let Some(bar) = self.registry.get_mut(key).and_then(|g| g.tab_bar.as_mut()) {
            bar.recalc_positions(
                middle,
                top.frame.min_x(),
                top.frame.max_x(),
                top.outer_frame().min_y(),
            );
        }
    }

    pub(super) fn advance_tab_change(&mut self, key: GroupKey, ms: i32) {
        let events = match self.registry.get_mut(key).and_then(|g| g.tab_bar.as_mut()) {
            Some(bar) => bar.tick_change(ms),
            None => return,
        };
        for event in events {
            trace!(?event, "tab change");
            match event {
                ChangeEvent::NewInStarted { top } => {
                    self.recalc_bar(key, None);
                    self.host.activate(top);
                }
                ChangeEvent::Finished { hide } => {
                    if let Some(wid) = hide {
                        self.set_hidden(wid, true);
                    }
                }
                ChangeEvent::StartQueued { target, direction, leftover } => {
                    let change = self.change_tab(key, target, direction);
                    if let TabChange::Started { .. } = change
                        && let Some(bar) =
                            self.registry.get_mut(key).and_then(|g| g.tab_bar.as_mut())
                    {
                        bar.change_time = bar.change_time.saturating_add(leftover);
                    }
                }
            }
        }
    }

    /// Stacks every member of the group onto `main` and gives the group a
    /// tab bar.
    pub fn tab_group(&mut self, key: GroupKey, main: WindowId) -> bool {
        let Some(group) = self.registry.get(key) else {
            return false;
        };
        if group.is_tabbed() || group.tabbing != TabbingState::NoTabbing || !group.contains(main) {
            return false;
        }
        let Some(main_info) = self.window(main) else {
            return false;
        };
        let members: Vec<WindowId> = group.windows().collect();

        let mut bar = TabBar::new(&self.config.settings);
        for &wid in &members {
            if let Err(err) = bar.insert(Tab::new(wid), InsertAt::End) {
                warn!(%err, "could not build the tab bar");
                return false;
            }
        }
        let change = bar.change_tab(main, Direction::Uncertain);
        if let Some(group) = self.registry.get_mut(key) {
            group.tab_bar = Some(bar);
        }
        self.apply_tab_change(key, main, None, change);
        self.recalc_bar(key, Some(main_info.frame.center().x));

        let center = main_info.frame.center();
        let frames: Vec<(WindowId, Rect)> = members
            .iter()
            .filter_map(|&wid| self.window(wid).map(|info| (wid, info.frame)))
            .collect();
        let Some(group) = self.registry.get_mut(key) else {
            return false;
        };
        for (wid, frame) in frames {
            let Some(member) = group.member_mut(wid) else { continue };
            let destination = centered_on(center, frame);
            member.anim.main_tab_offset = frame.origin - destination;
            member.anim.start(frame.origin, destination);
        }
        group.tabbing = TabbingState::Tabbing;
        debug!(id = %group.id, ?main, "tabbing group");
        true
    }

    /// Spreads the group back out to where its windows were before tabbing,
    /// kept inside the usable screen area.
    pub fn untab_group(&mut self, key: GroupKey) -> bool {
        let Some(group) = self.registry.get_mut(key) else {
            return false;
        };
        if group.tabbing != TabbingState::NoTabbing {
            return false;
        }
        let Some(bar) = group.tab_bar.as_ref() else {
            return false;
        };
        if bar.is_changing() {
            return false;
        }
        let Some(top) = bar.top else {
            return false;
        };
        let anchor = bar.prev_top.unwrap_or(top);
        let members: Vec<WindowId> = group.windows().collect();

        group.tabbing = TabbingState::Untabbing;
        debug!(id = %group.id, ?anchor, "untabbing group");
        self.start_untab(key, anchor, &members, None);
        true
    }

    /// Animates a single window out of its tabbed group. It is detached once
    /// it has settled.
    pub(super) fn start_single_untab(&mut self, key: GroupKey, wid: WindowId) -> bool {
        let Some(group) = self.registry.get_mut(key) else {
            return false;
        };
        if group.is_animating() || group.len() < 2 {
            return false;
        }
        let Some(anchor) = group.top_tab() else {
            return false;
        };
        let Some(member) = group.member_mut(wid) else {
            return false;
        };
        member.ungrouping = true;
        group.ungroup = UngroupState::Single;
        group.tabbing = TabbingState::Untabbing;
        debug!(id = %group.id, ?wid, "untabbing single window");
        self.start_untab(key, anchor, &[wid], Some(wid));
        true
    }

    fn start_untab(
        &mut self,
        key: GroupKey,
        anchor: WindowId,
        members: &[WindowId],
        trigger: Option<WindowId>,
    ) {
        let center = match self.window(anchor) {
            Some(info) => info.frame.center(),
            None => return,
        };

        let mut targets: Vec<(ConstraintTarget, Insets)> = Vec::new();
        for &wid in members {
            let Some(info) = self.window(wid) else { continue };
            self.set_hidden(wid, false);
            let Some(member) =
                self.registry.get_mut(key).and_then(|group| group.member_mut(wid))
            else {
                continue;
            };
            let orig = centered_on(center, info.frame);
            let destination = orig + member.anim.main_tab_offset;
            member.anim.start(orig, destination);

            let input = info.input;
            let outer = info.frame.with_origin(orig).outset(input);
            let outer_destination = destination.offset(-input.left, -input.top);
            targets.push((ConstraintTarget::new(wid, outer, outer_destination), input));
        }

        let solver = self.constraint_solver();
        let mut solved: Vec<ConstraintTarget> = targets.iter().map(|(t, _)| t.clone()).collect();
        solver.solve(&mut solved, trigger);

        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        for (target, (_, input)) in solved.into_iter().zip(targets) {
            let Some(member) = group.member_mut(target.window) else { continue };
            member.anim.destination = target.destination().offset(input.left, input.top);
            member.anim.set_constraints(target.constraints);
        }
    }

    pub(super) fn advance_tabbing(&mut self, key: GroupKey, ms: i32) {
        let speed = self.config.settings.tabbing_speed;
        let timestep = self.config.settings.tabbing_timestep;
        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        if group.tabbing == TabbingState::NoTabbing {
            return;
        }

        let amount = ms as f32 * 0.05 * speed;
        let steps = ((amount / (0.5 * timestep)) as i32).max(1);
        let chunk = amount / steps as f32;

        let mut settled = false;
        for _ in 0..steps {
            let mut moving = false;
            for member in group.members_mut() {
                if !member.anim.is_moving() {
                    continue;
                }
                if !member.anim.adjust_velocity() {
                    member.anim.finish();
                }
                member.anim.step(chunk);
                moving |= member.anim.is_moving();
            }
            if !moving {
                settled = true;
                break;
            }
        }

        if settled {
            self.finish_tabbing(key);
        }
    }

    fn finish_tabbing(&mut self, key: GroupKey) {
        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        let state = std::mem::replace(&mut group.tabbing, TabbingState::NoTabbing);
        let top = group.top_tab();
        let (changing, prev_top) = match &group.tab_bar {
            Some(bar) => (bar.is_changing(), bar.prev_top),
            None => (false, None),
        };

        let mut moves = Vec::new();
        let mut hide = Vec::new();
        let mut ungrouping = Vec::new();
        for member in group.members_mut() {
            if member.anim.is_animated() {
                moves.push((member.window, member.anim.destination));
            }
            member.anim.reset();
            if member.ungrouping {
                ungrouping.push(member.window);
            } else if state == TabbingState::Tabbing
                && Some(member.window) != top
                && !(changing && Some(member.window) == prev_top)
            {
                hide.push(member.window);
            }
        }
        if state == TabbingState::Tabbing
            && !changing
            && let Some(bar) = group.tab_bar.as_mut()
        {
            bar.prev_top = bar.top;
        }
        debug!(id = %group.id, %state, "tabbing animation finished");

        for (wid, destination) in moves {
            if let Some(info) = self.window(wid) {
                let origin = info.frame.origin;
                self.move_window(wid, destination.x - origin.x, destination.y - origin.y, true);
            }
        }
        for wid in hide {
            self.set_hidden(wid, true);
        }

        if state != TabbingState::Untabbing {
            return;
        }
        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        if !ungrouping.is_empty() {
            match group.ungroup {
                UngroupState::All => group.untab_pending = true,
                _ => group.ungroup = UngroupState::None,
            }
            for wid in ungrouping {
                self.detach_window(wid, true);
                self.autotab_window(wid);
            }
        } else if group.ungroup == UngroupState::All {
            self.destroy_group(key, true);
        } else {
            group.tab_bar = None;
            group.ungroup = UngroupState::None;
        }
    }

    /// Untabs the group now, or once its current animation is over.
    pub(super) fn request_untab(&mut self, key: GroupKey) {
        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        if group.is_animating() {
            group.untab_pending = true;
        } else {
            self.untab_group(key);
        }
    }

    pub(super) fn run_pending_untab(&mut self, key: GroupKey) {
        let Some(group) = self.registry.get_mut(key) else {
            return;
        };
        if !group.untab_pending || group.is_animating() {
            return;
        }
        group.untab_pending = false;
        let destroy = group.ungroup == UngroupState::All;
        if group.is_tabbed() && self.untab_group(key) {
            return;
        }
        if destroy {
            self.destroy_group(key, true);
        }
    }
}
