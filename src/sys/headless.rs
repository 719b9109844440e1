//! An in-memory host. It applies every request to its own window table and
//! keeps a log of what was asked, which is all the CLI demo and the tests
//! need from a compositor.

use tracing::trace;

use super::geometry::{Insets, Rect};
use super::host::{ScreenGeometryProvider, WindowFlags, WindowHost, WindowId, WindowInfo};
use crate::common::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostRequest {
    Move {
        wid: WindowId,
        dx: i32,
        dy: i32,
        immediate: bool,
    },
    Activate(WindowId),
    Raise {
        wid: WindowId,
        below_of: Option<WindowId>,
    },
    SetHidden(WindowId, bool),
    SetMinimized(WindowId, bool),
    SetShaded(WindowId, bool),
    Resize {
        wid: WindowId,
        dw: i32,
        dh: i32,
    },
    SetMaximized(WindowId, bool),
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    windows: HashMap<WindowId, WindowInfo>,
    stacking: Vec<WindowId>,
    outputs: Vec<Rect>,
    struts: Vec<Rect>,
    requests: Vec<HostRequest>,
    next_id: u32,
}

impl HeadlessHost {
    pub fn new(outputs: Vec<Rect>) -> Self {
        HeadlessHost {
            outputs,
            next_id: 1,
            ..Default::default()
        }
    }

    pub fn with_struts(mut self, struts: Vec<Rect>) -> Self {
        self.struts = struts;
        self
    }

    /// Maps a new undecorated window on top of the stack.
    pub fn add_window(&mut self, frame: Rect) -> WindowId {
        self.add_decorated_window(frame, Insets::default())
    }

    pub fn add_decorated_window(&mut self, frame: Rect, input: Insets) -> WindowId {
        let id = WindowId::new(self.next_id);
        self.next_id += 1;
        self.windows.insert(id, WindowInfo {
            id,
            frame,
            input,
            flags: WindowFlags::empty(),
        });
        self.stacking.insert(0, id);
        id
    }

    pub fn remove_window(&mut self, wid: WindowId) {
        self.windows.remove(&wid);
        self.stacking.retain(|w| *w != wid);
    }

    pub fn set_flags(&mut self, wid: WindowId, flags: WindowFlags) {
        if let Some(info) = self.windows.get_mut(&wid) {
            info.flags = flags;
        }
    }

    /// Moves a window the way a user drag would, without logging a request.
    pub fn user_move(&mut self, wid: WindowId, dx: i32, dy: i32) {
        if let Some(info) = self.windows.get_mut(&wid) {
            info.frame = info.frame.translate(dx, dy);
        }
    }

    /// Resizes a window the way a user would, without logging a request.
    pub fn user_resize(&mut self, wid: WindowId, dw: i32, dh: i32) {
        if let Some(info) = self.windows.get_mut(&wid) {
            info.frame = resized(info.frame, dw, dh);
        }
    }

    pub fn frame(&self, wid: WindowId) -> Option<Rect> { self.windows.get(&wid).map(|w| w.frame) }

    pub fn is_hidden(&self, wid: WindowId) -> bool {
        self.windows.get(&wid).is_some_and(WindowInfo::is_hidden)
    }

    pub fn requests(&self) -> &[HostRequest] { &self.requests }

    pub fn take_requests(&mut self) -> Vec<HostRequest> { std::mem::take(&mut self.requests) }

    fn update(&mut self, wid: WindowId, f: impl FnOnce(&mut WindowInfo)) {
        match self.windows.get_mut(&wid) {
            Some(info) => f(info),
            None => trace!(?wid, "request for unknown window"),
        }
    }
}

impl WindowHost for HeadlessHost {
    fn window(&self, wid: WindowId) -> Option<WindowInfo> { self.windows.get(&wid).copied() }

    fn stacking_order(&self) -> Vec<WindowId> { self.stacking.clone() }

    fn move_window(&mut self, wid: WindowId, dx: i32, dy: i32, immediate: bool) {
        self.requests.push(HostRequest::Move { wid, dx, dy, immediate });
        self.update(wid, |info| info.frame = info.frame.translate(dx, dy));
    }

    fn activate(&mut self, wid: WindowId) {
        self.requests.push(HostRequest::Activate(wid));
        self.raise_to(wid, None);
    }

    fn raise(&mut self, wid: WindowId, below_of: Option<WindowId>) {
        self.requests.push(HostRequest::Raise { wid, below_of });
        self.raise_to(wid, below_of);
    }

    fn set_hidden(&mut self, wid: WindowId, hidden: bool) {
        self.requests.push(HostRequest::SetHidden(wid, hidden));
        self.update(wid, |info| info.flags.set(WindowFlags::HIDDEN, hidden));
    }

    fn set_minimized(&mut self, wid: WindowId, minimized: bool) {
        self.requests.push(HostRequest::SetMinimized(wid, minimized));
        self.update(wid, |info| info.flags.set(WindowFlags::MINIMIZED, minimized));
    }

    fn set_shaded(&mut self, wid: WindowId, shaded: bool) {
        self.requests.push(HostRequest::SetShaded(wid, shaded));
        self.update(wid, |info| info.flags.set(WindowFlags::SHADED, shaded));
    }

    fn resize_window(&mut self, wid: WindowId, dw: i32, dh: i32) {
        self.requests.push(HostRequest::Resize { wid, dw, dh });
        self.update(wid, |info| info.frame = resized(info.frame, dw, dh));
    }

    fn set_maximized(&mut self, wid: WindowId, maximized: bool) {
        self.requests.push(HostRequest::SetMaximized(wid, maximized));
        self.update(wid, |info| info.flags.set(WindowFlags::MAXIMIZED, maximized));
    }
}

fn resized(frame: Rect, dw: i32, dh: i32) -> Rect {
    Rect::new(
        frame.min_x(),
        frame.min_y(),
        (frame.size.width + dw).max(1),
        (frame.size.height + dh).max(1),
    )
}

impl HeadlessHost {
    fn raise_to(&mut self, wid: WindowId, below_of: Option<WindowId>) {
        if !self.windows.contains_key(&wid) {
            return;
        }
        self.stacking.retain(|w| *w != wid);
        let pos = below_of
            .and_then(|sibling| self.stacking.iter().position(|w| *w == sibling))
            .map_or(0, |idx| idx + 1);
        self.stacking.insert(pos, wid);
    }
}

impl ScreenGeometryProvider for HeadlessHost {
    fn outputs(&self) -> Vec<Rect> { self.outputs.clone() }

    fn struts(&self) -> Vec<Rect> { self.struts.clone() }
}
