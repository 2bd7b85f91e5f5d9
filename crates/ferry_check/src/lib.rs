//! Consistency checks over a fully planned compilation unit
//!
//! These run after every member of the unit has a plan:
//! - override chains must keep the binding shape of the overridden member
//! - explicit target names must not collide within one emitted scope

mod shape;
mod consistency;
mod duplicates;

pub use shape::{BindingShape, ExplicitBinding, PlanLookup};
pub use consistency::{ConsistencyChecker, ConsistencyViolation};
pub use duplicates::check_duplicate_names;
