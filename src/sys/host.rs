//! The boundary to the compositor hosting the group subsystem.
//!
//! The host owns the windows. This crate only refers to them by [`WindowId`]
//! and asks the host to move, raise, activate and hide them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::geometry::{Insets, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(u32);

impl WindowId {
    pub const fn new(id: u32) -> Self { WindowId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct WindowFlags: u32 {
        const OVERRIDE_REDIRECT = 1 << 0;
        const DESKTOP           = 1 << 1;
        const INVISIBLE         = 1 << 2;

        const MINIMIZED         = 1 << 8;
        const SHADED            = 1 << 9;
        /// Visibility suppressed by us, the window stays mapped.
        const HIDDEN            = 1 << 10;
        const MAXIMIZED         = 1 << 11;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,
    /// Client area in screen coordinates.
    pub frame: Rect,
    /// Decoration extents around `frame`.
    pub input: Insets,
    pub flags: WindowFlags,
}

impl WindowInfo {
    /// The frame including decorations.
    pub fn outer_frame(&self) -> Rect { self.frame.outset(self.input) }

    /// Windows the user can never select or group.
    pub fn is_special(&self) -> bool {
        self.flags.intersects(
            WindowFlags::OVERRIDE_REDIRECT | WindowFlags::DESKTOP | WindowFlags::INVISIBLE,
        )
    }

    pub fn is_minimized(&self) -> bool { self.flags.contains(WindowFlags::MINIMIZED) }
    pub fn is_shaded(&self) -> bool { self.flags.contains(WindowFlags::SHADED) }
    pub fn is_hidden(&self) -> bool { self.flags.contains(WindowFlags::HIDDEN) }
    pub fn is_maximized(&self) -> bool { self.flags.contains(WindowFlags::MAXIMIZED) }
}

/// Window primitives provided by the host.
pub trait WindowHost {
    fn window(&self, wid: WindowId) -> Option<WindowInfo>;

    /// All managed windows, top-most first.
    fn stacking_order(&self) -> Vec<WindowId>;

    /// Moves a window by a delta. The host may report the move back as a
    /// regular move notification.
    fn move_window(&mut self, wid: WindowId, dx: i32, dy: i32, immediate: bool);

    fn activate(&mut self, wid: WindowId);

    /// Restacks `wid` directly below `below_of`, or to the top when `None`.
    fn raise(&mut self, wid: WindowId, below_of: Option<WindowId>);

    /// Suppresses painting and input of a window without unmapping it.
    fn set_hidden(&mut self, wid: WindowId, hidden: bool);

    fn set_minimized(&mut self, wid: WindowId, minimized: bool);

    fn set_shaded(&mut self, wid: WindowId, shaded: bool);

    /// Grows or shrinks a window by a delta, keeping its top left corner.
    fn resize_window(&mut self, wid: WindowId, dw: i32, dh: i32);

    fn set_maximized(&mut self, wid: WindowId, maximized: bool);
}

/// Screen layout provided by the host.
pub trait ScreenGeometryProvider {
    fn outputs(&self) -> Vec<Rect>;

    /// Edge reservations declared by panels and docks.
    fn struts(&self) -> Vec<Rect>;
}

pub trait Host: WindowHost + ScreenGeometryProvider {}

impl<T: WindowHost + ScreenGeometryProvider> Host for T {}
