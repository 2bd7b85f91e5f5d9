//! Attribute resolution
//!
//! Decides, for each member, which single binding strategy wins:
//!
//! ```text
//! Ignored > Template > ExplicitName > ConventionMode > AsDeclared
//! ```
//!
//! Namespace overrides and external visibility ride along with the winner.

mod options;
mod resolve;

pub use options::{NameStrictness, ResolveOptions};
pub use resolve::{AttributeResolver, NameSource, Resolution, ResolutionStrategy};
