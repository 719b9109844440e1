use serde::Serialize;
use tracing::{debug, trace};

use super::error::GroupError;
use crate::common::config::GroupSettings;
use crate::sys::geometry::{Point, Rect, RectExt};
use crate::sys::host::WindowId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChangeState {
    #[default]
    NoChange,
    /// The previous top tab is fading out.
    OldOut,
    /// The new top tab is fading in.
    NewIn,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Left,
    Right,
    /// Take the shorter way around the tab order.
    Uncertain,
}

impl Direction {
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Uncertain => Direction::Uncertain,
        }
    }
}

/// Spring state of one horizontally moving element of the bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Spring {
    /// Resting x coordinate.
    pub target: i32,
    pub speed: i32,
    pub ms_since_last_move: i32,
}

impl Spring {
    pub fn at(target: i32) -> Spring { Spring { target, speed: 0, ms_since_last_move: 0 } }

    pub fn translate(&mut self, dx: i32) { self.target += dx; }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    pub window: WindowId,
    pub region: Rect,
    pub spring: Spring,
}

impl Tab {
    pub fn new(window: WindowId) -> Tab {
        Tab {
            window,
            region: Rect::default(),
            spring: Spring::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotMetrics {
    pub thumb_size: i32,
    pub thumb_space: i32,
}

impl From<&GroupSettings> for SlotMetrics {
    fn from(settings: &GroupSettings) -> Self {
        SlotMetrics {
            thumb_size: settings.thumb_size,
            thumb_space: settings.thumb_space,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertAt {
    End,
    Before(WindowId),
    After(WindowId),
}

/// What a call to [`TabBar::change_tab`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabChange {
    Ignored,
    /// A change is in flight, the target runs next.
    Queued,
    /// The in-flight change now runs back to the previous top tab.
    Reversed,
    /// The target is the new top tab and `from` starts fading out.
    Started { from: WindowId },
    /// There was nothing to fade out, the target is on top right away.
    Immediate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The old top tab faded out, the new top tab should be activated.
    NewInStarted { top: WindowId },
    /// The change finished and `hide` is no longer needed on screen.
    Finished { hide: Option<WindowId> },
    /// A queued change has to be started now. A negative `leftover` is time
    /// the previous change overran and is taken off the new one.
    StartQueued {
        target: WindowId,
        direction: Direction,
        leftover: i32,
    },
}

#[derive(Debug)]
pub struct RemovedTab {
    pub tab: Tab,
    /// The tab that took over the top, with what that change did.
    pub successor: Option<(WindowId, TabChange)>,
    pub emptied: bool,
}

#[derive(Clone, Debug)]
pub struct TabBar {
    tabs: Vec<Tab>,
    pub top: Option<WindowId>,
    pub prev_top: Option<WindowId>,
    pub next_top: Option<WindowId>,
    pub region: Rect,
    pub left: Spring,
    pub right: Spring,
    pub change_state: ChangeState,
    /// Milliseconds left in the current change phase.
    pub change_time: i32,
    pub direction: Direction,
    next_direction: Direction,
    /// Slot following the pointer. It keeps its order position but takes
    /// no space in the layout.
    pub dragged: Option<WindowId>,
    metrics: SlotMetrics,
    phase_ms: i32,
}

impl TabBar {
    pub fn new(settings: &GroupSettings) -> TabBar {
        TabBar {
            tabs: Vec::new(),
            top: None,
            prev_top: None,
            next_top: None,
            region: Rect::default(),
            left: Spring::default(),
            right: Spring::default(),
            change_state: ChangeState::NoChange,
            change_time: 0,
            direction: Direction::Left,
            next_direction: Direction::Left,
            dragged: None,
            metrics: SlotMetrics::from(settings),
            phase_ms: settings.change_phase_ms(),
        }
    }

    pub fn tabs(&self) -> &[Tab] { &self.tabs }

    pub(crate) fn tabs_mut(&mut self) -> &mut [Tab] { &mut self.tabs }

    pub fn len(&self) -> usize { self.tabs.len() }

    pub fn is_empty(&self) -> bool { self.tabs.is_empty() }

    pub fn metrics(&self) -> SlotMetrics { self.metrics }

    pub fn phase_ms(&self) -> i32 { self.phase_ms }

    pub fn position(&self, window: WindowId) -> Option<usize> {
        self.tabs.iter().position(|t| t.window == window)
    }

    pub fn contains(&self, window: WindowId) -> bool { self.position(window).is_some() }

    pub fn tab(&self, window: WindowId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.window == window)
    }

    pub(crate) fn tab_mut(&mut self, window: WindowId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.window == window)
    }

    /// Tab following `window` in order, wrapping around.
    pub fn next_of(&self, window: WindowId) -> Option<WindowId> {
        let idx = self.position(window)?;
        Some(self.tabs[(idx + 1) % self.tabs.len()].window)
    }

    /// Tab preceding `window` in order, wrapping around.
    pub fn prev_of(&self, window: WindowId) -> Option<WindowId> {
        let idx = self.position(window)?;
        Some(self.tabs[(idx + self.tabs.len() - 1) % self.tabs.len()].window)
    }

    pub fn is_changing(&self) -> bool { self.change_state != ChangeState::NoChange }

    pub fn insert(&mut self, tab: Tab, at: InsertAt) -> Result<(), GroupError> {
        if self.contains(tab.window) {
            trace!(wid = ?tab.window, "tab already in bar");
            return Ok(());
        }
        let idx = match at {
            InsertAt::End => self.tabs.len(),
            InsertAt::Before(next) => {
                self.position(next).ok_or(GroupError::WindowNotFound(next))?
            }
            InsertAt::After(prev) => {
                self.position(prev).ok_or(GroupError::WindowNotFound(prev))? + 1
            }
        };
        self.tabs.try_reserve(1)?;
        self.tabs.insert(idx, tab);
        self.recalc_around_midpoint();
        Ok(())
    }

    /// Unhooks the tab of `window`. A temporary removal leaves the top tab
    /// bookkeeping alone, it is used to move a tab within the bar.
    pub fn remove_tab(&mut self, window: WindowId, temporary: bool) -> Option<RemovedTab> {
        let idx = self.position(window)?;
        let tab = self.tabs.remove(idx);
        let mut successor = None;

        if !temporary {
            if self.dragged == Some(window) {
                self.dragged = None;
            }
            if self.prev_top == Some(window) {
                self.prev_top = None;
            }
            if self.next_top == Some(window) {
                self.next_top = None;
            }
            if self.top == Some(window) {
                self.top = None;
                let candidate = match self.tabs.get(idx) {
                    Some(next) => Some((next.window, Direction::Right)),
                    None if idx > 0 => Some((self.tabs[idx - 1].window, Direction::Left)),
                    None => None,
                };
                if let Some((next, direction)) = candidate {
                    successor = Some((next, self.change_tab(next, direction)));
                }
            }
        }

        self.recalc_around_midpoint();
        Some(RemovedTab {
            tab,
            successor,
            emptied: self.tabs.is_empty(),
        })
    }

    pub fn change_tab(&mut self, target: WindowId, direction: Direction) -> TabChange {
        if !self.contains(target) {
            return TabChange::Ignored;
        }
        if !self.is_changing() && self.top == Some(target) {
            return TabChange::Ignored;
        }
        if self.is_changing() && self.next_top == Some(target) {
            return TabChange::Ignored;
        }

        if self.is_changing() {
            if self.prev_top == Some(target) {
                std::mem::swap(&mut self.top, &mut self.prev_top);
                self.direction = self.direction.reversed();
                self.change_time = self.phase_ms - self.change_time;
                self.change_state = match self.change_state {
                    ChangeState::OldOut => ChangeState::NewIn,
                    _ => ChangeState::OldOut,
                };
                self.next_top = None;
                debug!(?target, state = %self.change_state, "reversed tab change");
                return TabChange::Reversed;
            }
            self.next_top = Some(target);
            self.next_direction = direction;
            return TabChange::Queued;
        }

        self.direction = self.resolve_direction(target, direction);
        self.top = Some(target);

        match self.prev_top {
            Some(from) => {
                self.change_time = self.phase_ms;
                self.change_state = ChangeState::OldOut;
                debug!(?from, ?target, direction = ?self.direction, "starting tab change");
                TabChange::Started { from }
            }
            None => {
                self.prev_top = self.top;
                TabChange::Immediate
            }
        }
    }

    fn resolve_direction(&self, target: WindowId, direction: Direction) -> Direction {
        if direction != Direction::Uncertain {
            return direction;
        }
        let len = self.tabs.len() as i32;
        let old = self.top.and_then(|w| self.position(w)).unwrap_or(0) as i32;
        let new = self.position(target).unwrap_or(0) as i32;
        let right = (new - old).rem_euclid(len);
        let left = (old - new).rem_euclid(len);
        // Ties go left.
        if right < left { Direction::Right } else { Direction::Left }
    }

    /// Advances the change animation by `dt` milliseconds.
    pub fn tick_change(&mut self, dt: i32) -> Vec<ChangeEvent> {
        let mut events = Vec::new();
        if !self.is_changing() {
            return events;
        }

        self.change_time = self.change_time.saturating_sub(dt);
        if self.change_time > 0 {
            return events;
        }

        if self.change_state == ChangeState::OldOut {
            self.change_time = self.change_time.saturating_add(self.phase_ms).max(0);
            self.change_state = ChangeState::NewIn;
            if let Some(top) = self.top {
                events.push(ChangeEvent::NewInStarted { top });
            }
        }

        if self.change_state == ChangeState::NewIn && self.change_time <= 0 {
            let leftover = self.change_time;
            let hide = self.prev_top.filter(|prev| Some(*prev) != self.top);
            self.prev_top = self.top;
            self.change_state = ChangeState::NoChange;
            self.change_time = 0;
            events.push(ChangeEvent::Finished { hide });

            if let Some(target) = self.next_top.take() {
                events.push(ChangeEvent::StartQueued {
                    target,
                    direction: self.next_direction,
                    leftover,
                });
            }
        }

        events
    }

    /// Fraction of the running change animation that has elapsed.
    pub fn change_progress(&self) -> f32 {
        if self.phase_ms <= 0 {
            return 1.0;
        }
        let phase = self.phase_ms as f32;
        let done = ((phase - self.change_time as f32) / phase).clamp(0.0, 1.0);
        match self.change_state {
            ChangeState::NoChange => 0.0,
            ChangeState::OldOut => done / 2.0,
            ChangeState::NewIn => 0.5 + done / 2.0,
        }
    }

    pub fn recalc_around_midpoint(&mut self) {
        let region = self.region;
        self.recalc_positions(
            region.center().x,
            region.min_x(),
            region.max_x(),
            region.min_y(),
        );
    }

    /// Lays the bar out around `middle_x`, keeping it between `min_x1` and
    /// `max_x2` where it fits, and puts every slot at rest.
    pub fn recalc_positions(&mut self, middle_x: i32, min_x1: i32, max_x2: i32, top_y: i32) {
        let SlotMetrics { thumb_size: thumb, thumb_space: space } = self.metrics;
        let slots = self.tabs.iter().filter(|t| Some(t.window) != self.dragged).count() as i32;
        let width = space * (slots + 1) + thumb * slots;

        let x = if max_x2 - min_x1 < width {
            (max_x2 + min_x1) / 2 - width / 2
        } else if middle_x - width / 2 < min_x1 {
            min_x1
        } else if middle_x + width / 2 > max_x2 {
            max_x2 - width
        } else {
            middle_x - width / 2
        };
        self.region = Rect::new(x, top_y, width, 2 * space + thumb);

        let mut slot = 0;
        for tab in self.tabs.iter_mut() {
            if Some(tab.window) == self.dragged {
                continue;
            }
            tab.region = Rect::new(x + space + (thumb + space) * slot, top_y + space, thumb, thumb);
            tab.spring = Spring::at(tab.region.center().x);
            slot += 1;
        }

        self.left = Spring::at(self.region.min_x());
        self.right = Spring::at(self.region.max_x());
        trace!(region = ?self.region, slots, "recalculated tab bar");
    }

    /// Moves the bar with its top window.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.region = self.region.translate(dx, dy);
        self.left.translate(dx);
        self.right.translate(dx);
        for tab in &mut self.tabs {
            tab.region = tab.region.translate(dx, dy);
            tab.spring.translate(dx);
        }
    }

    /// The slot under `point`, ignoring the dragged one.
    pub fn tab_at(&self, point: Point) -> Option<WindowId> {
        self.tabs
            .iter()
            .filter(|t| Some(t.window) != self.dragged)
            .find(|t| t.region.contains(point))
            .map(|t| t.window)
    }

    /// Where a slot dropped at `dropped` would be inserted. Each slot
    /// claims the space up to its neighbours so the gaps count as well.
    pub fn drop_position(&self, dropped: Rect) -> Option<InsertAt> {
        if !self.region.intersects(&dropped) {
            return None;
        }
        let slots: Vec<&Tab> =
            self.tabs.iter().filter(|t| Some(t.window) != self.dragged).collect();
        for (i, tab) in slots.iter().enumerate() {
            let x1 = if i == 0 { self.region.min_x() } else { slots[i - 1].region.max_x() };
            let x2 = match slots.get(i + 1) {
                Some(next) => next.region.min_x(),
                None => self.region.max_x(),
            };
            let claim = Rect::new(x1, tab.region.min_y(), x2 - x1, tab.region.size.height);
            if !claim.intersects(&dropped) {
                continue;
            }
            return Some(if dropped.center().x > tab.region.center().x {
                InsertAt::After(tab.window)
            } else {
                InsertAt::Before(tab.window)
            });
        }
        None
    }
}
