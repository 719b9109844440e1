//! Keeps untabbing windows inside the usable screen area.
//!
//! Each target asks to be displaced by `(dx, dy)`. A displacement that would
//! leave the allowed region is shortened until the window fits, and the
//! shortening is handed on to the other windows so the group keeps its
//! shape. Clipped axes are final for the rest of the solve.

use tracing::{debug, trace, warn};

use crate::model::animation::Constraints;
use crate::sys::geometry::{Point, Rect};
use crate::sys::host::WindowId;
use crate::sys::region::Region;

/// Passes over all targets before giving up on a fixed point.
const MAX_PASSES: usize = 16;

#[derive(Clone, Debug, PartialEq)]
pub struct ConstraintTarget {
    pub window: WindowId,
    /// Outer frame where the animation starts.
    pub frame: Rect,
    pub dx: i32,
    pub dy: i32,
    pub constraints: Constraints,
}

impl ConstraintTarget {
    pub fn new(window: WindowId, frame: Rect, destination: Point) -> Self {
        ConstraintTarget {
            window,
            frame,
            dx: destination.x - frame.min_x(),
            dy: destination.y - frame.min_y(),
            constraints: Constraints::default(),
        }
    }

    pub fn destination(&self) -> Point { self.frame.origin.offset(self.dx, self.dy) }

    fn landing(&self, dx: i32, dy: i32) -> Rect { self.frame.translate(dx, dy) }
}

/// All outputs minus the struts reserved on them.
pub fn allowed_region(outputs: &[Rect], struts: &[Rect]) -> Region {
    let mut region = Region::from_rects(outputs.iter().copied());
    for strut in struts {
        region.subtract_rect(*strut);
    }
    region
}

#[derive(Clone, Debug)]
pub struct ConstraintSolver {
    region: Region,
}

impl ConstraintSolver {
    pub fn new(region: Region) -> Self { ConstraintSolver { region } }

    pub fn region(&self) -> &Region { &self.region }

    /// Clips the displacement of every target. `trigger` is solved first.
    pub fn solve(&self, targets: &mut [ConstraintTarget], trigger: Option<WindowId>) {
        if self.region.is_empty() {
            debug!("no usable screen area, leaving windows unconstrained");
            for target in targets.iter_mut() {
                target.constraints.dont_constrain = true;
            }
            return;
        }

        let natural: Vec<(i32, i32)> = targets.iter().map(|t| (t.dx, t.dy)).collect();
        let mut order: Vec<usize> = (0..targets.len()).collect();
        if let Some(first) = trigger.and_then(|w| targets.iter().position(|t| t.window == w)) {
            order.retain(|&i| i != first);
            order.insert(0, first);
        }

        for pass in 0..MAX_PASSES {
            let mut changed = false;
            for &i in &order {
                changed |= self.constrain_one(targets, i, natural[i]);
            }
            if !changed {
                trace!(pass, "constraints settled");
                return;
            }
        }

        warn!("constraints did not settle after {MAX_PASSES} passes");
        for (target, &(dx, dy)) in targets.iter_mut().zip(&natural) {
            let c = target.constraints;
            if !c.dont_constrain && !self.region.contains_rect(target.landing(target.dx, target.dy))
            {
                target.constraints.dont_constrain = true;
                (target.dx, target.dy) = (dx, dy);
            }
        }
    }

    /// Returns true if target `i` or any other target changed.
    fn constrain_one(&self, targets: &mut [ConstraintTarget], i: usize, natural: (i32, i32)) -> bool {
        let target = &targets[i];
        let c = target.constraints;
        if c.dont_constrain || (c.x && c.y) {
            return false;
        }

        let (dx, dy) = self.clip(target);
        if !self.region.contains_rect(target.landing(dx, dy)) {
            debug!(window = ?target.window, "window cannot be kept on screen");
            let target = &mut targets[i];
            target.constraints.dont_constrain = true;
            (target.dx, target.dy) = natural;
            return true;
        }

        let moved_x = dx != target.dx;
        let moved_y = dy != target.dy;
        if !moved_x && !moved_y {
            return false;
        }

        let delta = (dx - target.dx, dy - target.dy);
        {
            let target = &mut targets[i];
            trace!(window = ?target.window, ?delta, "clipped displacement");
            target.dx = dx;
            target.dy = dy;
            target.constraints.x |= moved_x;
            target.constraints.y |= moved_y;
        }

        for (j, other) in targets.iter_mut().enumerate() {
            if j == i || other.constraints.dont_constrain {
                continue;
            }
            if moved_x && !other.constraints.x {
                other.dx += delta.0;
            }
            if moved_y && !other.constraints.y {
                other.dy += delta.1;
            }
        }
        true
    }

    /// Shortens each free axis of the displacement one pixel at a time until
    /// the window fits, x first.
    fn clip(&self, target: &ConstraintTarget) -> (i32, i32) {
        let c = target.constraints;
        let mut dx = target.dx;
        let mut dy = target.dy;

        if !c.x {
            let probe_dy = if c.y { dy } else { 0 };
            while dx != 0 && !self.region.contains_rect(target.landing(dx, probe_dy)) {
                dx -= dx.signum();
            }
        }
        if !c.y {
            while dy != 0 && !self.region.contains_rect(target.landing(dx, dy)) {
                dy -= dy.signum();
            }
        }
        (dx, dy)
    }
}
