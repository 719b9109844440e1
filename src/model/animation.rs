use serde::Serialize;

use crate::sys::geometry::{IsWithin, Point};

/// Which axes of an animated window's destination are final.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Constraints {
    pub x: bool,
    pub y: bool,
    /// The window is off the usable area along its whole path and animates
    /// to its natural destination unclipped.
    pub dont_constrain: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AnimationPhase {
    #[default]
    Idle,
    Animated(Constraints),
    /// Settled at its destination, waiting for the rest of the group.
    Finished(Constraints),
}

/// Per-window tabbing state, carried on the group membership record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabAnimation {
    /// Where the animation starts, in client coordinates.
    pub orig_pos: Point,
    pub destination: Point,
    /// Position relative to the top tab, kept across tab/untab cycles.
    pub main_tab_offset: Point,
    pub tx: f32,
    pub ty: f32,
    pub x_velocity: f32,
    pub y_velocity: f32,
    pub phase: AnimationPhase,
}

impl TabAnimation {
    /// Starts animating from `orig` to `destination`.
    pub fn start(&mut self, orig: Point, destination: Point) {
        self.orig_pos = orig;
        self.destination = destination;
        self.tx = 0.0;
        self.ty = 0.0;
        self.x_velocity = 0.0;
        self.y_velocity = 0.0;
        self.phase = AnimationPhase::Animated(Constraints::default());
    }

    pub fn is_animated(&self) -> bool { !matches!(self.phase, AnimationPhase::Idle) }

    pub fn is_moving(&self) -> bool { matches!(self.phase, AnimationPhase::Animated(_)) }

    pub fn constraints(&self) -> Constraints {
        match self.phase {
            AnimationPhase::Idle => Constraints::default(),
            AnimationPhase::Animated(c) | AnimationPhase::Finished(c) => c,
        }
    }

    pub fn set_constraints(&mut self, constraints: Constraints) {
        match &mut self.phase {
            AnimationPhase::Idle => {}
            AnimationPhase::Animated(c) | AnimationPhase::Finished(c) => *c = constraints,
        }
    }

    pub fn finish(&mut self) {
        if let AnimationPhase::Animated(c) = self.phase {
            self.phase = AnimationPhase::Finished(c);
        }
    }

    /// Current animated position, rounded to whole pixels.
    pub fn current_pos(&self) -> Point {
        self.orig_pos.offset(self.tx.round() as i32, self.ty.round() as i32)
    }

    pub fn step(&mut self, chunk: f32) {
        self.tx += self.x_velocity * chunk;
        self.ty += self.y_velocity * chunk;
    }

    /// Pulls the velocity towards the destination, damped by the distance left.
    /// Returns false once the window has settled, in which case it is pinned
    /// exactly onto its destination.
    pub fn adjust_velocity(&mut self) -> bool {
        let dx = (self.destination.x - self.orig_pos.x) as f32 - self.tx;
        let dy = (self.destination.y - self.orig_pos.y) as f32 - self.ty;

        self.x_velocity = pursue(self.x_velocity, dx);
        self.y_velocity = pursue(self.y_velocity, dy);

        if dx.is_within(0.1, 0.0)
            && self.x_velocity.is_within(0.2, 0.0)
            && dy.is_within(0.1, 0.0)
            && self.y_velocity.is_within(0.2, 0.0)
        {
            self.x_velocity = 0.0;
            self.y_velocity = 0.0;
            self.tx = (self.destination.x - self.orig_pos.x) as f32;
            self.ty = (self.destination.y - self.orig_pos.y) as f32;
            return false;
        }

        true
    }

    pub fn reset(&mut self) {
        self.tx = 0.0;
        self.ty = 0.0;
        self.x_velocity = 0.0;
        self.y_velocity = 0.0;
        self.phase = AnimationPhase::Idle;
    }
}

fn pursue(velocity: f32, distance: f32) -> f32 {
    let adjust = distance * 0.15;
    let amount = (distance.abs() * 1.5).clamp(0.5, 5.0);
    (amount * velocity + adjust) / (amount + 1.0)
}
