//! The reactor owns all group state and reacts to host notifications and
//! frame ticks.
//!
//! Every mutation happens synchronously inside [`Reactor::handle_event`] or
//! [`Reactor::tick`]. Moves we request are echoed back by the host, those
//! echoes go through the [`queue::NotificationQueue`] instead of being
//! handled inline.

mod animation;
mod events;
mod groups;
mod queue;
mod snapshot;

#[cfg(test)]
mod tests;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use self::events::command::CommandEventHandler;
use self::events::drag::{DragEventHandler, TabDrag};
use self::events::window::WindowEventHandler;
use self::queue::NotificationQueue;
pub use self::snapshot::{BarSnapshot, FrameSnapshot, GroupSnapshot, TabSnapshot, WindowSnapshot};
use crate::common::config::{Config, GroupSettings};
use crate::layout_engine::{ConstraintSolver, SlotPhysics, allowed_region};
use crate::model::{GroupKey, GroupRegistry, SelectionSet};
use crate::sys::geometry::{Point, Rect};
use crate::sys::host::{Host, WindowId, WindowInfo};

/// Commands issued by the user through bindings or the CLI.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    BeginSelection(Point),
    UpdateSelection(Point),
    CommitSelection,
    /// Adds or removes a single window from the selection.
    SelectWindow(WindowId),
    /// Groups the selected windows.
    GroupSelected,
    /// Dissolves the group of the window.
    Ungroup(WindowId),
    /// Takes the window out of its group.
    RemoveWindow(WindowId),
    ToggleTab(WindowId),
    ChangeTabLeft(WindowId),
    ChangeTabRight(WindowId),
    ChangeColor(WindowId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    WindowCreated(WindowId),
    WindowDestroyed(WindowId),
    WindowMoved { wid: WindowId, dx: i32, dy: i32 },
    /// The window's size changed by a delta, its top left corner stayed.
    WindowResized { wid: WindowId, dw: i32, dh: i32 },
    WindowActivated(WindowId),
    WindowMinimized(WindowId),
    WindowRestored(WindowId),
    WindowShaded(WindowId),
    WindowUnshaded(WindowId),
    WindowMaximized(WindowId),
    WindowUnmaximized(WindowId),
    WindowRestacked(WindowId),
    WindowGrabbed(WindowId),
    WindowUngrabbed(WindowId),
    ButtonDown { button: u32, at: Point },
    PointerMoved(Point),
    ButtonUp { button: u32, at: Point },
    Command(Command),
}

/// Receives the host's frame clock.
pub trait TickReceiver {
    /// Advances every animation by `ms` milliseconds.
    fn tick(&mut self, ms: i32);
}

/// Receives the host's window and pointer notifications.
pub trait WindowEventReceiver {
    fn handle_event(&mut self, event: Event);

    fn handle_events(&mut self, events: Vec<Event>) {
        for event in events {
            self.handle_event(event);
        }
    }
}

pub struct Reactor<H: Host> {
    host: H,
    config: Config,
    physics: SlotPhysics,
    registry: GroupRegistry,
    selection: SelectionSet,
    queue: NotificationQueue,
    drag: Option<TabDrag>,
    rng: StdRng,
}

impl<H: Host> Reactor<H> {
    pub fn new(host: H, config: Config) -> Self { Self::with_rng(host, config, StdRng::from_entropy()) }

    /// A reactor whose group colors are reproducible.
    pub fn with_seed(host: H, config: Config, seed: u64) -> Self {
        Self::with_rng(host, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(host: H, config: Config, rng: StdRng) -> Self {
        Reactor {
            physics: SlotPhysics::from(&config.settings),
            host,
            config,
            registry: GroupRegistry::new(),
            selection: SelectionSet::new(),
            queue: NotificationQueue::default(),
            drag: None,
            rng,
        }
    }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn registry(&self) -> &GroupRegistry { &self.registry }

    pub fn selection(&self) -> &SelectionSet { &self.selection }

    pub fn config(&self) -> &Config { &self.config }

    fn settings(&self) -> &GroupSettings { &self.config.settings }

    #[instrument(name = "reactor::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::WindowCreated(wid) => WindowEventHandler::handle_window_created(self, wid),
            Event::WindowDestroyed(wid) => WindowEventHandler::handle_window_destroyed(self, wid),
            Event::WindowMoved { wid, dx, dy } => {
                WindowEventHandler::handle_window_moved(self, wid, dx, dy)
            }
            Event::WindowResized { wid, dw, dh } => {
                WindowEventHandler::handle_window_resized(self, wid, dw, dh)
            }
            Event::WindowActivated(wid) => WindowEventHandler::handle_window_activated(self, wid),
            Event::WindowMinimized(wid) => {
                WindowEventHandler::handle_window_minimized(self, wid, true)
            }
            Event::WindowRestored(wid) => {
                WindowEventHandler::handle_window_minimized(self, wid, false)
            }
            Event::WindowShaded(wid) => WindowEventHandler::handle_window_shaded(self, wid, true),
            Event::WindowUnshaded(wid) => {
                WindowEventHandler::handle_window_shaded(self, wid, false)
            }
            Event::WindowMaximized(wid) => {
                WindowEventHandler::handle_window_maximized(self, wid, true)
            }
            Event::WindowUnmaximized(wid) => {
                WindowEventHandler::handle_window_maximized(self, wid, false)
            }
            Event::WindowRestacked(wid) => WindowEventHandler::handle_window_restacked(self, wid),
            Event::WindowGrabbed(wid) => WindowEventHandler::handle_window_grabbed(self, wid),
            Event::WindowUngrabbed(wid) => WindowEventHandler::handle_window_ungrabbed(self, wid),
            Event::ButtonDown { button, at } => {
                DragEventHandler::handle_button_down(self, button, at)
            }
            Event::PointerMoved(at) => DragEventHandler::handle_pointer_moved(self, at),
            Event::ButtonUp { button, at } => DragEventHandler::handle_button_up(self, button, at),
            Event::Command(cmd) => CommandEventHandler::handle_command(self, cmd),
        }
    }

    pub fn handle_events(&mut self, events: Vec<Event>) {
        for event in events {
            self.handle_event(event);
        }
    }

    #[instrument(name = "reactor::tick", skip(self), level = "trace")]
    pub fn tick(&mut self, ms: i32) {
        for pending in self.queue.take_user_moves() {
            WindowEventHandler::process_user_move(self, pending.wid, pending.dx, pending.dy);
        }
        self.flush_group_moves();

        let dragged = self.drag.as_ref().and_then(|drag| self.dragged_rect(drag));
        for key in self.registry.keys() {
            let pushing = dragged.filter(|(group, _)| *group == key).map(|(_, rect)| rect);
            if let Some(bar) = self.registry.get_mut(key).and_then(|g| g.tab_bar.as_mut()) {
                self.physics.tick(bar, pushing, ms);
            }
            self.advance_tab_change(key, ms);
            self.advance_tabbing(key, ms);
            self.run_pending_untab(key);
        }
        DragEventHandler::advance_hover(self, ms);
    }

    /// Applies the moves queued for the other members of moved groups.
    fn flush_group_moves(&mut self) {
        for pending in self.queue.take_moves() {
            if self.host.window(pending.wid).is_some() {
                self.move_window(pending.wid, pending.dx, pending.dy, false);
            }
        }
    }

    fn dragged_rect(&self, drag: &TabDrag) -> Option<(GroupKey, Rect)> {
        if !drag.dragging {
            return None;
        }
        let bar = self.registry.get(drag.group)?.tab_bar.as_ref()?;
        bar.tab(drag.window).map(|tab| (drag.group, tab.region))
    }

    fn window(&self, wid: WindowId) -> Option<WindowInfo> { self.host.window(wid) }

    /// Moves a window and remembers the move so its notification is ignored.
    fn move_window(&mut self, wid: WindowId, dx: i32, dy: i32, immediate: bool) {
        if dx == 0 && dy == 0 {
            return;
        }
        trace!(?wid, dx, dy, immediate, "moving window");
        self.queue.record_echo(wid, dx, dy);
        self.host.move_window(wid, dx, dy, immediate);
    }

    fn set_hidden(&mut self, wid: WindowId, hidden: bool) {
        match self.window(wid) {
            Some(info) if info.is_hidden() != hidden => self.host.set_hidden(wid, hidden),
            _ => {}
        }
    }

    fn random_color(&mut self) -> [u16; 4] {
        [
            self.rng.gen_range(0..=u16::MAX),
            self.rng.gen_range(0..=u16::MAX),
            self.rng.gen_range(0..=u16::MAX),
            0xffff,
        ]
    }

    pub fn change_color(&mut self, key: GroupKey) {
        let color = self.random_color();
        if let Some(group) = self.registry.get_mut(key) {
            debug!(id = %group.id, ?color, "new group color");
            group.color = color;
        }
    }

    fn constraint_solver(&self) -> ConstraintSolver {
        ConstraintSolver::new(allowed_region(&self.host.outputs(), &self.host.struts()))
    }

    pub fn snapshot(&self) -> FrameSnapshot { snapshot::take(self) }
}

impl<H: Host> TickReceiver for Reactor<H> {
    fn tick(&mut self, ms: i32) { Reactor::tick(self, ms) }
}

impl<H: Host> WindowEventReceiver for Reactor<H> {
    fn handle_event(&mut self, event: Event) { Reactor::handle_event(self, event) }
}
