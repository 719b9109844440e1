use tracing::{debug, trace, warn};

use crate::model::Direction;
use crate::reactor::{Command, Reactor};
use crate::sys::host::{Host, WindowId, WindowInfo};

pub struct CommandEventHandler;

impl CommandEventHandler {
    pub fn handle_command<H: Host>(reactor: &mut Reactor<H>, cmd: Command) {
        match cmd {
            Command::BeginSelection(at) => reactor.selection.begin(at),
            Command::UpdateSelection(at) => {
                let damage = reactor.selection.update(at);
                trace!(?damage, "selection changed");
            }
            Command::CommitSelection => Self::commit_selection(reactor),
            Command::SelectWindow(wid) => {
                if reactor.window(wid).is_some_and(|info| !info.is_special()) {
                    let selected = reactor.selection.toggle(wid);
                    trace!(?wid, selected, "toggled selection");
                }
            }
            Command::GroupSelected => Self::group_selected(reactor),
            Command::Ungroup(wid) => {
                if let Some(key) = reactor.registry.group_of(wid) {
                    reactor.destroy_group(key, false);
                }
            }
            Command::RemoveWindow(wid) => reactor.remove_window_from_group(wid),
            Command::ToggleTab(wid) => {
                let Some(key) = reactor.registry.group_of(wid) else {
                    return;
                };
                let tabbed = reactor.registry.get(key).is_some_and(|group| group.is_tabbed());
                if tabbed {
                    reactor.untab_group(key);
                } else {
                    reactor.tab_group(key, wid);
                }
            }
            Command::ChangeTabLeft(wid) => Self::step_tab(reactor, wid, Direction::Left),
            Command::ChangeTabRight(wid) => Self::step_tab(reactor, wid, Direction::Right),
            Command::ChangeColor(wid) => {
                if let Some(key) = reactor.registry.group_of(wid) {
                    reactor.change_color(key);
                }
            }
        }
    }

    fn commit_selection<H: Host>(reactor: &mut Reactor<H>) {
        let include_shaded = reactor.config.selection.include_shaded;
        let precision = reactor.config.selection.precision;
        let windows: Vec<WindowInfo> = reactor
            .host
            .stacking_order()
            .into_iter()
            .filter_map(|wid| reactor.window(wid))
            .collect();
        let picked = reactor.selection.commit(precision, windows, |info| {
            !info.is_hidden() && !info.is_minimized() && (include_shaded || !info.is_shaded())
        });
        debug!(?picked, "selection committed");
        if reactor.config.selection.auto_group {
            Self::group_selected(reactor);
        }
    }

    fn group_selected<H: Host>(reactor: &mut Reactor<H>) {
        let windows = reactor.selection.take_selected();
        match reactor.group_windows(windows) {
            Ok(Some(key)) => trace!(?key, "selection grouped"),
            Ok(None) => debug!("nothing to group"),
            Err(err) => warn!(%err, "grouping failed"),
        }
    }

    /// Moves the top of the bar one slot over.
    fn step_tab<H: Host>(reactor: &mut Reactor<H>, wid: WindowId, direction: Direction) {
        let Some(key) = reactor.registry.group_of(wid) else {
            return;
        };
        let Some(bar) = reactor.registry.get(key).and_then(|group| group.tab_bar.as_ref()) else {
            return;
        };
        let Some(top) = bar.top else {
            return;
        };
        let target = match direction {
            Direction::Right => bar.next_of(top),
            _ => bar.prev_of(top),
        };
        if let Some(target) = target {
            reactor.change_tab(key, target, direction);
        }
    }
}
