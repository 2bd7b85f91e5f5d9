//! Binding plans: what the translator emits for a member

use ferry_check::{BindingShape, ExplicitBinding};
use ferry_symbols::{AccessorKind, MemberId};
use ferry_template::{ExpandError, Expr, Template};
use std::fmt;
use thiserror::Error;

/// Modifiers that ride along with whichever strategy won
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EmitModifiers {
    pub namespace: Option<String>,
    pub externally_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameBinding {
    pub member: MemberId,
    pub target_name: String,
    pub is_static: bool,
    pub accessor_kind: AccessorKind,
    /// Forced by `ExplicitName` rather than derived by convention
    pub explicit: bool,
    pub modifiers: EmitModifiers,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateBinding {
    pub member: MemberId,
    pub template: Template,
    pub placeholder_count: usize,
    pub is_static: bool,
    /// Name substituted for `{@}`; resolved only when the template uses it
    pub resolved_name: Option<String>,
    pub modifiers: EmitModifiers,
}

/// The resolved emission instruction for one member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingPlan {
    /// The member has no call-site representation
    Suppressed,
    Name(NameBinding),
    Template(TemplateBinding),
}

/// What the translator splices in at a call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSite<'p> {
    /// Member access by name; the translator picks the syntax
    Name {
        name: &'p str,
        is_static: bool,
        accessor_kind: AccessorKind,
        namespace: Option<&'p str>,
    },
    /// A complete expression produced from a template
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallSiteError {
    #[error("member is ignored and must not be referenced from generated code")]
    Suppressed,
    #[error(transparent)]
    Expand(#[from] ExpandError),
}

impl BindingPlan {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, BindingPlan::Suppressed)
    }

    pub fn target_name(&self) -> Option<&str> {
        match self {
            BindingPlan::Name(binding) => Some(&binding.target_name),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Option<&EmitModifiers> {
        match self {
            BindingPlan::Suppressed => None,
            BindingPlan::Name(binding) => Some(&binding.modifiers),
            BindingPlan::Template(binding) => Some(&binding.modifiers),
        }
    }

    pub fn shape(&self) -> BindingShape {
        match self {
            BindingPlan::Suppressed => BindingShape::Suppressed,
            BindingPlan::Name(binding) => BindingShape::Name {
                is_static: binding.is_static,
                accessor: binding.accessor_kind,
            },
            BindingPlan::Template(binding) => BindingShape::Template {
                arity: binding.placeholder_count,
            },
        }
    }

    pub fn explicit_binding(&self) -> Option<ExplicitBinding> {
        match self {
            BindingPlan::Name(binding) if binding.explicit => Some(ExplicitBinding {
                name: binding.target_name.clone(),
                namespace: binding.modifiers.namespace.clone(),
            }),
            _ => None,
        }
    }

    /// Produce the call-site form for given receiver and argument expressions
    pub fn expand(
        &self,
        receiver: Option<&Expr>,
        args: &[Expr],
    ) -> Result<CallSite<'_>, CallSiteError> {
        match self {
            BindingPlan::Suppressed => Err(CallSiteError::Suppressed),
            BindingPlan::Name(binding) => Ok(CallSite::Name {
                name: &binding.target_name,
                is_static: binding.is_static,
                accessor_kind: binding.accessor_kind,
                namespace: binding.modifiers.namespace.as_deref(),
            }),
            BindingPlan::Template(binding) => {
                let name = binding.resolved_name.as_deref().unwrap_or_default();
                Ok(CallSite::Expression(binding.template.expand(receiver, args, name)?))
            }
        }
    }
}

impl fmt::Display for BindingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = match self {
            BindingPlan::Suppressed => return write!(f, "<suppressed>"),
            BindingPlan::Name(b) => {
                let scope = if b.is_static { "static" } else { "instance" };
                let origin = if b.explicit { "explicit" } else { "convention" };
                write!(f, "name `{}` ({}, {}", b.target_name, scope, origin)?;
                if b.accessor_kind != AccessorKind::None {
                    write!(f, ", {}", b.accessor_kind)?;
                }
                write!(f, ")")?;
                &b.modifiers
            }
            BindingPlan::Template(b) => {
                write!(f, "template `{}` (arity {})", b.template, b.placeholder_count)?;
                &b.modifiers
            }
        };
        if let Some(ns) = &modifiers.namespace {
            write!(f, " in {}", ns)?;
        }
        if !modifiers.externally_visible {
            write!(f, " [hidden]")?;
        }
        Ok(())
    }
}
