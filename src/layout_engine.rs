//! Geometry solvers driven by the reactor: the tab bar slot integrator and
//! the untab constraint solver.

pub mod constraint;
pub mod physics;

pub use constraint::{ConstraintSolver, ConstraintTarget, allowed_region};
pub use physics::SlotPhysics;
