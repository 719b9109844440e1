use tracing::{debug, trace};

use crate::model::{Direction, TabbingState};
use crate::reactor::Reactor;
use crate::reactor::queue::Replay;
use crate::sys::host::{Host, WindowId};

pub struct WindowEventHandler;

impl WindowEventHandler {
    pub fn handle_window_created<H: Host>(reactor: &mut Reactor<H>, wid: WindowId) {
        match reactor.window(wid) {
            Some(info) if info.is_special() => trace!(?wid, "ignoring special window"),
            Some(info) if info.is_minimized() || info.is_shaded() => {
                debug!(?wid, "window available for grouping")
            }
            Some(_) => {
                if reactor.autotab_window(wid).is_none() {
                    debug!(?wid, "window available for grouping");
                }
            }
            None => trace!(?wid, "created window already gone"),
        }
    }

    pub fn handle_window_destroyed<H: Host>(reactor: &mut Reactor<H>, wid: WindowId) {
        reactor.selection.forget(wid);
        reactor.queue.forget(wid);
        reactor.detach_window(wid, true);
    }

    pub fn handle_window_moved<H: Host>(reactor: &mut Reactor<H>, wid: WindowId, dx: i32, dy: i32) {
        if reactor.queue.expects_echo(wid) {
            trace!(?wid, dx, dy, "deferring move notification");
            reactor.queue.defer(wid, dx, dy);
            return;
        }
        Self::process_user_move(reactor, wid, dx, dy);
    }

    /// A move the user made. The bar follows its top window, and with
    /// `move_all` the rest of the group follows the grabbed one.
    pub fn process_user_move<H: Host>(reactor: &mut Reactor<H>, wid: WindowId, dx: i32, dy: i32) {
        let Some(key) = reactor.registry.group_of(wid) else {
            return;
        };
        let move_all = reactor.settings().move_all && !reactor.selection.is_active();
        let Some(group) = reactor.registry.get_mut(key) else {
            return;
        };
        if let Some(bar) = group.tab_bar.as_mut()
            && bar.top == Some(wid)
        {
            bar.translate(dx, dy);
        }

        if !move_all || group.tabbing != TabbingState::NoTabbing || group.grab != Some(wid) {
            return;
        }
        trace!(?wid, dx, dy, "moving the rest of the group");
        for other in group.windows().filter(|w| *w != wid) {
            reactor.queue.enqueue_move(other, dx, dy);
        }
    }

    pub fn handle_window_activated<H: Host>(reactor: &mut Reactor<H>, wid: WindowId) {
        let Some(key) = reactor.registry.group_of(wid) else {
            return;
        };
        let Some(group) = reactor.registry.get(key) else {
            return;
        };

        if let Some(bar) = &group.tab_bar {
            if bar.top != Some(wid) && group.tabbing == TabbingState::NoTabbing {
                reactor.change_tab(key, wid, Direction::Uncertain);
            }
            return;
        }

        if !reactor.settings().raise_all || reactor.selection.is_active() {
            return;
        }
        let others: Vec<WindowId> = group.windows().filter(|w| *w != wid).collect();
        let mut below = wid;
        for other in others {
            reactor.host.raise(other, Some(below));
            below = other;
        }
    }

    pub fn handle_window_minimized<H: Host>(reactor: &mut Reactor<H>, wid: WindowId, minimized: bool) {
        let replay = if minimized { Replay::Minimize } else { Replay::Restore };
        if reactor.queue.take_replay(wid, replay) || !reactor.settings().minimize_all {
            return;
        }
        for other in Self::other_members(reactor, wid) {
            if reactor.window(other).is_some_and(|info| info.is_minimized() != minimized) {
                reactor.queue.expect_replay(other, replay);
                reactor.host.set_minimized(other, minimized);
            }
        }
    }

    pub fn handle_window_shaded<H: Host>(reactor: &mut Reactor<H>, wid: WindowId, shaded: bool) {
        let replay = if shaded { Replay::Shade } else { Replay::Unshade };
        if reactor.queue.take_replay(wid, replay) || !reactor.settings().shade_all {
            return;
        }
        for other in Self::other_members(reactor, wid) {
            if reactor.window(other).is_some_and(|info| info.is_shaded() != shaded) {
                reactor.queue.expect_replay(other, replay);
                reactor.host.set_shaded(other, shaded);
            }
        }
    }

    /// The bar is laid out again along a resized top tab. With `resize_all`
    /// the other members take the same size change.
    pub fn handle_window_resized<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
        dw: i32,
        dh: i32,
    ) {
        if reactor.queue.take_replay(wid, Replay::Resize) {
            return;
        }
        let Some(key) = reactor.registry.group_of(wid) else {
            return;
        };
        let Some(group) = reactor.registry.get(key) else {
            return;
        };
        let idle = group.tabbing == TabbingState::NoTabbing;
        if group.top_tab() == Some(wid) {
            reactor.recalc_bar(key, None);
        }

        if !reactor.settings().resize_all || reactor.selection.is_active() || !idle {
            return;
        }
        trace!(?wid, dw, dh, "resizing the rest of the group");
        for other in Self::other_members(reactor, wid) {
            let Some(info) = reactor.window(other) else { continue };
            if info.is_maximized() {
                continue;
            }
            let dw = dw.max(1 - info.frame.size.width);
            let dh = dh.max(1 - info.frame.size.height);
            if dw == 0 && dh == 0 {
                continue;
            }
            reactor.queue.expect_replay(other, Replay::Resize);
            reactor.host.resize_window(other, dw, dh);
        }
    }

    pub fn handle_window_maximized<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
        maximized: bool,
    ) {
        let replay = if maximized { Replay::Maximize } else { Replay::Unmaximize };
        if reactor.queue.take_replay(wid, replay)
            || !reactor.settings().maximize_unmaximize_all
            || reactor.selection.is_active()
        {
            return;
        }
        for other in Self::other_members(reactor, wid) {
            if reactor.window(other).is_some_and(|info| info.is_maximized() != maximized) {
                reactor.queue.expect_replay(other, replay);
                reactor.host.set_maximized(other, maximized);
            }
        }
    }

    /// Keeps the hidden tabs stacked right below their top tab.
    pub fn handle_window_restacked<H: Host>(reactor: &mut Reactor<H>, wid: WindowId) {
        let Some(group) = reactor.registry.group_of(wid).and_then(|key| reactor.registry.get(key))
        else {
            return;
        };
        if group.top_tab() != Some(wid) || group.tabbing != TabbingState::NoTabbing {
            return;
        }
        let others: Vec<WindowId> = group.windows().filter(|w| *w != wid).collect();
        let mut below = wid;
        for other in others {
            reactor.host.raise(other, Some(below));
            below = other;
        }
    }

    pub fn handle_window_grabbed<H: Host>(reactor: &mut Reactor<H>, wid: WindowId) {
        if let Some(group) =
            reactor.registry.group_of(wid).and_then(|key| reactor.registry.get_mut(key))
        {
            group.grab = Some(wid);
        }
    }

    pub fn handle_window_ungrabbed<H: Host>(reactor: &mut Reactor<H>, wid: WindowId) {
        if let Some(group) =
            reactor.registry.group_of(wid).and_then(|key| reactor.registry.get_mut(key))
            && group.grab == Some(wid)
        {
            group.grab = None;
        }
        if reactor.queue.has_moves() {
            reactor.flush_group_moves();
        }
    }

    fn other_members<H: Host>(reactor: &Reactor<H>, wid: WindowId) -> Vec<WindowId> {
        reactor
            .registry
            .group_of(wid)
            .and_then(|key| reactor.registry.get(key))
            .map(|group| group.windows().filter(|w| *w != wid).collect())
            .unwrap_or_default()
    }
}
