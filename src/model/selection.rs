use tracing::trace;

use crate::sys::geometry::{Point, Rect, RectExt};
use crate::sys::host::{WindowId, WindowInfo};

/// Margin repainted around the selection rectangle when it changes.
const DAMAGE_MARGIN: i32 = 5;
/// Padding applied to the rectangle before testing window overlap.
const HIT_PADDING: i32 = 2;

/// Rubber-band window picker. The rectangle only exists while the gesture
/// runs, the picked windows stay until they are taken.
#[derive(Debug, Default)]
pub struct SelectionSet {
    origin: Option<Point>,
    rect: Rect,
    selected: Vec<WindowId>,
    damage: Vec<Rect>,
}

impl SelectionSet {
    pub fn new() -> Self { Self::default() }

    pub fn is_active(&self) -> bool { self.origin.is_some() }

    pub fn rect(&self) -> Option<Rect> { self.origin.map(|_| self.rect) }

    pub fn selected(&self) -> &[WindowId] { &self.selected }

    /// Areas touched by the last change of the rectangle.
    pub fn damage(&self) -> &[Rect] { &self.damage }

    pub fn is_selected(&self, window: WindowId) -> bool { self.selected.contains(&window) }

    pub fn begin(&mut self, origin: Point) {
        self.origin = Some(origin);
        self.rect = Rect::from_corners(origin, origin);
        self.damage.clear();
    }

    /// Stretches the rectangle to `current` and returns the areas that
    /// need repainting.
    pub fn update(&mut self, current: Point) -> Vec<Rect> {
        let Some(origin) = self.origin else {
            return Vec::new();
        };
        let old = self.rect;
        self.rect = Rect::from_corners(origin, current);
        self.damage = if old == self.rect {
            Vec::new()
        } else {
            vec![old.inflate(DAMAGE_MARGIN), self.rect.inflate(DAMAGE_MARGIN)]
        };
        self.damage.clone()
    }

    /// Ends the gesture and adds every window the rectangle covers by at
    /// least `precision` of its area. `windows` comes in stacking order and
    /// `groupable` filters out windows the caller cannot group.
    pub fn commit(
        &mut self,
        precision: f32,
        windows: impl IntoIterator<Item = WindowInfo>,
        groupable: impl Fn(&WindowInfo) -> bool,
    ) -> Vec<WindowId> {
        if self.origin.take().is_none() {
            return Vec::new();
        }
        let rect = std::mem::take(&mut self.rect);
        self.damage = vec![rect.inflate(DAMAGE_MARGIN)];
        if rect.is_empty() {
            return Vec::new();
        }

        let padded = rect.inflate(HIT_PADDING);
        let mut picked = Vec::new();
        for info in windows {
            if info.is_special() || !groupable(&info) {
                continue;
            }
            let frame = info.outer_frame();
            let covered = padded.intersection(&frame).area() as f64;
            if covered >= precision as f64 * frame.area() as f64 && frame.area() > 0 {
                picked.push(info.id);
            }
        }
        trace!(?rect, ?picked, "selection committed");

        for &window in &picked {
            if !self.selected.contains(&window) {
                self.selected.push(window);
            }
        }
        picked
    }

    /// Adds or removes a single window.
    pub fn toggle(&mut self, window: WindowId) -> bool {
        match self.selected.iter().position(|w| *w == window) {
            Some(idx) => {
                self.selected.remove(idx);
                false
            }
            None => {
                self.selected.push(window);
                true
            }
        }
    }

    pub fn forget(&mut self, window: WindowId) { self.selected.retain(|w| *w != window); }

    pub fn take_selected(&mut self) -> Vec<WindowId> { std::mem::take(&mut self.selected) }
}
