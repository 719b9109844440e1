//! Spring, friction and speed limit integration of tab bar slots.
//!
//! Every slot and both bar edges are pulled towards their resting x by a
//! spring. A dragged slot additionally pushes the other slots away so the
//! bar opens a gap under it. The integrator only looks at the `dt` it is
//! given, so identical tick sequences give identical layouts.

use std::f32::consts::PI;

use tracing::trace;

use crate::common::config::GroupSettings;
use crate::model::tab_bar::{Spring, TabBar};
use crate::sys::geometry::{Point, Rect};

/// Longest time an element integrates over in one step. A host that
/// stalled for longer, e.g. across a suspend, moves by this much.
const MAX_STEP_MS: i32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotPhysics {
    pub spring_k: f32,
    pub friction: i32,
    pub speed_limit: i32,
    pub y_distance: i32,
}

impl From<&GroupSettings> for SlotPhysics {
    fn from(settings: &GroupSettings) -> Self {
        SlotPhysics {
            spring_k: settings.drag_spring_k,
            friction: settings.drag_friction,
            speed_limit: settings.drag_speed_limit,
            y_distance: settings.drag_y_distance,
        }
    }
}

impl SlotPhysics {
    fn spring_force(&self, current: i32, spring: &Spring) -> i32 {
        (-self.spring_k * (current - spring.target) as f32) as i32
    }

    /// Push exerted by a dragged slot on something `dx` to its right and
    /// `dy` away vertically.
    fn drag_force(&self, bar: &TabBar, dx: i32, dy: i32) -> i32 {
        let metrics = bar.metrics();
        let reach = (metrics.thumb_size + metrics.thumb_space) as f32;
        let mut a = self.spring_k * reach / 2.0;
        let b = PI / (2.0 * reach);

        if dy < self.y_distance && self.y_distance > 0 {
            a *= 1.0 - dy as f32 / self.y_distance as f32;
        } else {
            a = 0.0;
        }

        if (dx.abs() as f32) < 2.0 * reach {
            (a * (b * dx as f32).sin()) as i32
        } else {
            0
        }
    }

    fn damp(&self, speed: i32) -> i32 {
        let speed = if speed.abs() < self.friction {
            0
        } else {
            speed - self.friction * speed.signum()
        };
        speed.clamp(-self.speed_limit, self.speed_limit)
    }

    /// Accumulates this tick's forces into the speeds of the slots and the
    /// bar edges. `dragged` is the rectangle of a slot being dragged,
    /// possibly one that belongs to another bar.
    pub fn apply_forces(&self, bar: &mut TabBar, dragged: Option<Rect>) {
        let region = bar.region;
        let excluded = bar.dragged;

        let left_force = self.spring_force(region.min_x(), &bar.left);
        let right_force = self.spring_force(region.max_x(), &bar.right);
        bar.left.speed += left_force;
        bar.right.speed += right_force;
        for tab in bar.tabs_mut() {
            if Some(tab.window) == excluded {
                continue;
            }
            tab.spring.speed += self.spring_force(tab.region.center().x, &tab.spring);
        }

        if let Some(dragged) = dragged {
            self.apply_drag_forces(bar, dragged.center());
        }

        bar.left.speed = self.damp(bar.left.speed);
        bar.right.speed = self.damp(bar.right.speed);
        for tab in bar.tabs_mut() {
            tab.spring.speed = self.damp(tab.spring.speed);
        }
    }

    fn apply_drag_forces(&self, bar: &mut TabBar, center: Point) {
        let region = bar.region;
        let half = bar.metrics().thumb_size / 2;
        let bar_dy = (region.center().y - center.y).abs();

        let left_force = self.drag_force(bar, region.min_x() - half - center.x, bar_dy);
        let right_force = self.drag_force(bar, region.max_x() + half - center.x, bar_dy);
        if left_force < 0 {
            bar.left.speed += left_force;
        }
        if right_force > 0 {
            bar.right.speed += right_force;
        }

        let excluded = bar.dragged;
        let forces: Vec<i32> = bar
            .tabs()
            .iter()
            .map(|tab| {
                if Some(tab.window) == excluded {
                    return 0;
                }
                let slot = tab.region.center();
                self.drag_force(bar, slot.x - center.x, (slot.y - center.y).abs())
            })
            .collect();

        // A pushed slot drags its neighbours on the same side along.
        for (i, &force) in forces.iter().enumerate() {
            if force == 0 {
                continue;
            }
            let tabs = bar.tabs_mut();
            let affected = if force < 0 { 0..i + 1 } else { i..tabs.len() };
            for tab in &mut tabs[affected] {
                if Some(tab.window) != excluded {
                    tab.spring.speed += force;
                }
            }
            if force < 0 {
                bar.left.speed += force;
            } else {
                bar.right.speed += force;
            }
        }
    }

    /// Moves every element by its speed over the time elapsed since it last
    /// moved.
    pub fn apply_speeds(&self, bar: &mut TabBar, dt: i32) {
        let region = bar.region;
        let mut x1 = region.min_x();
        let mut x2 = region.max_x();
        self.advance(&mut bar.left, &mut x1, dt);
        self.advance(&mut bar.right, &mut x2, dt);
        if (x1, x2) != (region.min_x(), region.max_x()) {
            bar.region = Rect::new(x1, region.min_y(), x2 - x1, region.size.height);
        }

        let excluded = bar.dragged;
        for tab in bar.tabs_mut() {
            if Some(tab.window) == excluded {
                continue;
            }
            let before = tab.region.center().x;
            let mut center = before;
            self.advance(&mut tab.spring, &mut center, dt);
            if center != before {
                tab.region = tab.region.translate(center - before, 0);
            }
        }
        trace!(region = ?bar.region, "advanced tab bar");
    }

    fn advance(&self, spring: &mut Spring, x: &mut i32, dt: i32) {
        spring.ms_since_last_move =
            spring.ms_since_last_move.saturating_add(dt.max(0)).min(MAX_STEP_MS);
        let step = i64::from(spring.speed) * i64::from(spring.ms_since_last_move) / 1000;
        if step != 0 {
            *x = x.saturating_add(i32::try_from(step).unwrap_or(i32::MAX));
            spring.ms_since_last_move = 0;
        } else if spring.speed == 0 {
            // Too close for the spring to beat friction.
            if *x != spring.target
                && self.spring_k * ((*x - spring.target).abs() as f32) < self.friction as f32
            {
                *x = spring.target;
            }
            spring.ms_since_last_move = 0;
        }
    }

    /// True once nothing in the bar moves any more.
    pub fn is_at_rest(&self, bar: &TabBar) -> bool {
        let edges_rest = bar.left.speed == 0
            && bar.right.speed == 0
            && bar.region.min_x() == bar.left.target
            && bar.region.max_x() == bar.right.target;
        edges_rest
            && bar.tabs().iter().all(|tab| {
                Some(tab.window) == bar.dragged
                    || (tab.spring.speed == 0 && tab.region.center().x == tab.spring.target)
            })
    }

    /// Runs forces and speeds for one frame.
    pub fn tick(&self, bar: &mut TabBar, dragged: Option<Rect>, dt: i32) {
        self.apply_forces(bar, dragged);
        self.apply_speeds(bar, dt);
    }
}
