//! Move and state notifications that must not be handled inline.
//!
//! Our own requests to the host come back as ordinary notifications. Those
//! are parked here and reconciled with what we asked for at the start of
//! the next tick, so an animation never reacts to its own moves.

use tracing::trace;

use crate::common::collections::{HashMap, HashSet, VecDeque};
use crate::sys::host::WindowId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Replay {
    Minimize,
    Restore,
    Shade,
    Unshade,
    Resize,
    Maximize,
    Unmaximize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMove {
    pub wid: WindowId,
    pub dx: i32,
    pub dy: i32,
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    deferred: VecDeque<PendingMove>,
    echoes: HashMap<WindowId, (i32, i32)>,
    moves: VecDeque<PendingMove>,
    replays: HashSet<(WindowId, Replay)>,
}

impl NotificationQueue {
    /// Remembers a move we requested so its notification can be recognized.
    pub fn record_echo(&mut self, wid: WindowId, dx: i32, dy: i32) {
        let echo = self.echoes.entry(wid).or_default();
        echo.0 += dx;
        echo.1 += dy;
    }

    pub fn expects_echo(&self, wid: WindowId) -> bool { self.echoes.contains_key(&wid) }

    pub fn defer(&mut self, wid: WindowId, dx: i32, dy: i32) {
        self.deferred.push_back(PendingMove { wid, dx, dy });
    }

    /// Coalesces the deferred notifications per window, in arrival order,
    /// and returns what is left after taking our own moves out. All echo
    /// bookkeeping is reset.
    pub fn take_user_moves(&mut self) -> Vec<PendingMove> {
        let mut coalesced: Vec<PendingMove> = Vec::new();
        for pending in self.deferred.drain(..) {
            match coalesced.iter_mut().find(|m| m.wid == pending.wid) {
                Some(m) => {
                    m.dx += pending.dx;
                    m.dy += pending.dy;
                }
                None => coalesced.push(pending),
            }
        }

        let echoes = std::mem::take(&mut self.echoes);
        coalesced
            .into_iter()
            .filter_map(|mut m| {
                if let Some((ex, ey)) = echoes.get(&m.wid) {
                    m.dx -= ex;
                    m.dy -= ey;
                }
                if m.dx == 0 && m.dy == 0 {
                    trace!(wid = ?m.wid, "dropped echo of our own move");
                    return None;
                }
                Some(m)
            })
            .collect()
    }

    pub fn enqueue_move(&mut self, wid: WindowId, dx: i32, dy: i32) {
        self.moves.push_back(PendingMove { wid, dx, dy });
    }

    pub fn has_moves(&self) -> bool { !self.moves.is_empty() }

    pub fn take_moves(&mut self) -> Vec<PendingMove> { self.moves.drain(..).collect() }

    pub fn expect_replay(&mut self, wid: WindowId, replay: Replay) {
        self.replays.insert((wid, replay));
    }

    /// True if the notification is the host confirming one of our replays.
    pub fn take_replay(&mut self, wid: WindowId, replay: Replay) -> bool {
        self.replays.remove(&(wid, replay))
    }

    pub fn forget(&mut self, wid: WindowId) {
        self.deferred.retain(|m| m.wid != wid);
        self.moves.retain(|m| m.wid != wid);
        self.echoes.remove(&wid);
        self.replays.retain(|(w, _)| *w != wid);
    }
}
