//! Binding plans
//!
//! Turns each member of a symbol model into the instruction the translator
//! follows at its call sites:
//! 1. Suppressed (ignored members)
//! 2. A target name, explicit or derived by convention
//! 3. A validated template, expanded per call site
//!
//! Plans are built once per member per unit version and shared as `Arc`s.

mod builder;
mod plan;
mod unit;

pub use builder::{PlanBuilder, PlanResult};
pub use plan::{BindingPlan, CallSite, CallSiteError, EmitModifiers, NameBinding, TemplateBinding};
pub use unit::{CompilationUnit, UnitReport, compile_unit};
