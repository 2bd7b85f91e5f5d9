//! Binding shapes and the view of plans the checks need

use ferry_symbols::{AccessorKind, MemberId};
use std::fmt;

/// Structural category of a binding plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingShape {
    Suppressed,
    Name { is_static: bool, accessor: AccessorKind },
    Template { arity: usize },
}

impl fmt::Display for BindingShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingShape::Suppressed => write!(f, "nothing (ignored)"),
            BindingShape::Name { is_static, accessor } => {
                let scope = if *is_static { "a static" } else { "an instance" };
                match accessor {
                    AccessorKind::None => write!(f, "{} name", scope),
                    kind => write!(f, "{} {} accessor name", scope, kind),
                }
            }
            BindingShape::Template { arity } => write!(f, "a template of arity {}", arity),
        }
    }
}

/// An explicit target name and the namespace it is emitted under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitBinding {
    pub name: String,
    pub namespace: Option<String>,
}

/// Read access to built plans
pub trait PlanLookup {
    /// `None` when the member has no plan (its resolution failed)
    fn shape(&self, member: MemberId) -> Option<BindingShape>;

    /// Set only for name bindings forced by `ExplicitName`
    fn explicit_binding(&self, member: MemberId) -> Option<ExplicitBinding>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_display() {
        let getter = BindingShape::Name { is_static: false, accessor: AccessorKind::Get };
        assert_eq!(getter.to_string(), "an instance get accessor name");
        let method = BindingShape::Name { is_static: true, accessor: AccessorKind::None };
        assert_eq!(method.to_string(), "a static name");
        assert_eq!(BindingShape::Template { arity: 2 }.to_string(), "a template of arity 2");
    }
}
