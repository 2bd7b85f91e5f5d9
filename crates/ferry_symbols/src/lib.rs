//! Symbol model for binding resolution
//!
//! The front end produces types and members with their binding attributes
//! already parsed into tagged values. Everything downstream reads this model
//! through ids and never mutates it.

mod model;
mod builder;
mod diagnostic;

pub use model::*;
pub use builder::ModelBuilder;
pub use diagnostic::{BindingError, Diagnostic, MemberRef, Severity};
