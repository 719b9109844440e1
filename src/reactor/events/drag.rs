//! Pointer handling over the tab bars: clicking and dragging slots, and the
//! scroll wheel.

use tracing::{debug, trace, warn};

use crate::model::{Direction, GroupKey, TabbingState};
use crate::reactor::Reactor;
use crate::sys::geometry::{Point, RectExt};
use crate::sys::host::{Host, WindowId};

/// Distance the pointer has to travel before a press becomes a drag.
const DRAG_RADIUS: i32 = 5;

const BUTTON_PRIMARY: u32 = 1;
const WHEEL_UP: u32 = 4;
const WHEEL_DOWN: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Hover {
    target: (GroupKey, WindowId),
    elapsed: u32,
    fired: bool,
}

impl Hover {
    fn new(target: (GroupKey, WindowId)) -> Self { Hover { target, elapsed: 0, fired: false } }
}

/// A press on a slot, which turns into a drag once the pointer moves far
/// enough.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabDrag {
    pub group: GroupKey,
    pub window: WindowId,
    pub press: Point,
    /// Pointer position relative to the slot origin.
    pub grab_offset: Point,
    pub dragging: bool,
    hover: Option<Hover>,
}

pub struct DragEventHandler;

impl DragEventHandler {
    pub fn handle_button_down<H: Host>(reactor: &mut Reactor<H>, button: u32, at: Point) {
        match button {
            BUTTON_PRIMARY => {
                let Some((group, window)) = Self::slot_at(reactor, at) else {
                    return;
                };
                let Some(slot) = reactor
                    .registry
                    .get(group)
                    .and_then(|g| g.tab_bar.as_ref())
                    .and_then(|bar| bar.tab(window))
                    .map(|tab| tab.region)
                else {
                    return;
                };
                trace!(?window, "pressed tab");
                reactor.drag = Some(TabDrag {
                    group,
                    window,
                    press: at,
                    grab_offset: at - slot.origin,
                    dragging: false,
                    hover: None,
                });
            }
            WHEEL_UP | WHEEL_DOWN => Self::scroll(reactor, button == WHEEL_UP, at),
            _ => {}
        }
    }

    pub fn handle_pointer_moved<H: Host>(reactor: &mut Reactor<H>, at: Point) {
        let hovered = Self::slot_at(reactor, at);
        let Some(drag) = reactor.drag.as_mut() else {
            return;
        };
        let Some(bar) = reactor.registry.get_mut(drag.group).and_then(|g| g.tab_bar.as_mut())
        else {
            return;
        };

        if !drag.dragging {
            let (dx, dy) = (at.x - drag.press.x, at.y - drag.press.y);
            if dx * dx + dy * dy <= DRAG_RADIUS * DRAG_RADIUS {
                return;
            }
            debug!(window = ?drag.window, "dragging tab");
            drag.dragging = true;
            bar.dragged = Some(drag.window);
            bar.recalc_around_midpoint();
        }
        if let Some(tab) = bar.tab_mut(drag.window) {
            tab.region = tab.region.with_origin(at - drag.grab_offset);
        }

        let hovered = hovered.filter(|(_, window)| *window != drag.window);
        if drag.hover.map(|h| h.target) != hovered {
            drag.hover = hovered.map(Hover::new);
        }
    }

    pub fn handle_button_up<H: Host>(reactor: &mut Reactor<H>, button: u32, at: Point) {
        if button != BUTTON_PRIMARY {
            return;
        }
        let Some(drag) = reactor.drag.take() else {
            return;
        };
        if !drag.dragging {
            reactor.change_tab(drag.group, drag.window, Direction::Uncertain);
            return;
        }

        let Some(bar) = reactor.registry.get_mut(drag.group).and_then(|g| g.tab_bar.as_mut())
        else {
            return;
        };
        let Some(tab) = bar.tab_mut(drag.window) else {
            return;
        };
        tab.region = tab.region.with_origin(at - drag.grab_offset);
        let dropped = tab.region;
        let position = bar.drop_position(dropped);
        bar.dragged = None;

        if let Some(position) = position {
            if let Some(removed) = bar.remove_tab(drag.window, true)
                && let Err(err) = bar.insert(removed.tab, position)
            {
                warn!(%err, "could not move the tab");
            }
            debug!(window = ?drag.window, ?position, "dropped tab");
            return;
        }

        bar.recalc_around_midpoint();
        let outside = !reactor.registry.iter().any(|(_, group)| {
            group.tab_bar.as_ref().is_some_and(|bar| bar.region.intersects(&dropped))
        });
        if outside && reactor.settings().dnd_ungroup_window {
            debug!(window = ?drag.window, "tab dropped off its bar");
            reactor.remove_window_from_group(drag.window);
        }
    }

    /// Counts down the hover over another slot while dragging, which brings
    /// that slot's window up once.
    pub fn advance_hover<H: Host>(reactor: &mut Reactor<H>, ms: i32) {
        let hover_ms = reactor.settings().drag_hover_ms();
        let Some(hover) = reactor.drag.as_mut().and_then(|drag| drag.hover.as_mut()) else {
            return;
        };
        if hover.fired {
            return;
        }
        hover.elapsed = hover.elapsed.saturating_add(ms.max(0) as u32);
        if hover.elapsed < hover_ms {
            return;
        }
        hover.fired = true;
        let (group, window) = hover.target;
        trace!(?window, "hovered long enough");
        reactor.change_tab(group, window, Direction::Uncertain);
    }

    fn scroll<H: Host>(reactor: &mut Reactor<H>, up: bool, at: Point) {
        let Some((key, bar)) = reactor.registry.iter().find_map(|(key, group)| {
            group.tab_bar.as_ref().filter(|bar| bar.region.contains(at)).map(|bar| (key, bar))
        }) else {
            return;
        };
        let Some(top) = bar.top else {
            return;
        };
        let (target, direction) = if up {
            (bar.prev_of(top), Direction::Left)
        } else {
            (bar.next_of(top), Direction::Right)
        };
        if let Some(target) = target {
            reactor.change_tab(key, target, direction);
        }
    }

    /// The slot under `at` on any bar that is not animating.
    fn slot_at<H: Host>(reactor: &Reactor<H>, at: Point) -> Option<(GroupKey, WindowId)> {
        reactor.registry.iter().find_map(|(key, group)| {
            if group.tabbing != TabbingState::NoTabbing {
                return None;
            }
            group.tab_bar.as_ref()?.tab_at(at).map(|window| (key, window))
        })
    }
}
