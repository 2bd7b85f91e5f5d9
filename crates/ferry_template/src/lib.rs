//! Call templates for external members
//!
//! A template is a target-language expression with placeholders:
//!
//! ```text
//! {this}        receiver expression (instance members only)
//! {0} .. {n-1}  positional arguments
//! {name}        argument by parameter name
//! {@}           the member's own resolved name
//! {{ and }}     literal braces
//! ```
//!
//! Patterns are validated against the member signature once, when the
//! binding is resolved, and expanded at every call site.

mod lexer;
mod template;

pub use lexer::{LexError, Lexer, SpannedToken, Token};
pub use template::{ExpandError, Expr, Segment, Template, TemplateContext, TemplateError};
