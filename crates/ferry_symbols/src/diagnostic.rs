//! Diagnostics produced while resolving bindings

use crate::model::{AttributeTag, MemberId, SourceLocation, Span, SymbolModel};
use std::fmt;
use thiserror::Error;

/// A member as it appears in a diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberRef {
    pub id: MemberId,
    pub display: String,
    pub location: Option<SourceLocation>,
}

impl MemberRef {
    pub fn of(model: &SymbolModel, id: MemberId) -> Self {
        Self {
            id,
            display: model.display_member(id),
            location: model.member(id).and_then(|m| m.location.clone()),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Every way resolution of a member can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("invalid identifier `{name}` on {member}: {reason}")]
    InvalidIdentifier {
        member: MemberRef,
        name: String,
        reason: String,
    },

    #[error("malformed template `{pattern}` on {member}: {reason}")]
    MalformedTemplate {
        member: MemberRef,
        pattern: String,
        reason: String,
        /// Offending range inside the pattern
        span: Span,
    },

    #[error("conflicting {tag} bindings on {member}: `{first}` and `{second}`")]
    AmbiguousBinding {
        member: MemberRef,
        tag: AttributeTag,
        first: String,
        second: String,
        first_location: Option<SourceLocation>,
        second_location: Option<SourceLocation>,
    },

    #[error("{member} binds as {shape} but overrides {base}, which binds as {base_shape}")]
    OverrideBindingConflict {
        member: MemberRef,
        base: MemberRef,
        shape: String,
        base_shape: String,
    },

    #[error("{second} reuses target name `{name}` already bound by {first}")]
    DuplicateBinding {
        name: String,
        first: MemberRef,
        second: MemberRef,
        cross_type: bool,
    },
}

impl BindingError {
    /// The member the diagnostic is reported against
    pub fn member(&self) -> &MemberRef {
        match self {
            BindingError::InvalidIdentifier { member, .. }
            | BindingError::MalformedTemplate { member, .. }
            | BindingError::AmbiguousBinding { member, .. }
            | BindingError::OverrideBindingConflict { member, .. } => member,
            BindingError::DuplicateBinding { second, .. } => second,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            BindingError::InvalidIdentifier { .. } => "B0001",
            BindingError::MalformedTemplate { .. } => "B0002",
            BindingError::AmbiguousBinding { .. } => "B0003",
            BindingError::OverrideBindingConflict { .. } => "B0004",
            BindingError::DuplicateBinding { .. } => "B0005",
        }
    }

    /// Secondary locations with a note each, in addition to the member's own location
    pub fn notes(&self) -> Vec<(Option<SourceLocation>, String)> {
        match self {
            BindingError::AmbiguousBinding {
                first,
                second,
                first_location,
                second_location,
                ..
            } => vec![
                (first_location.clone(), format!("`{}` declared here", first)),
                (second_location.clone(), format!("`{}` declared here", second)),
            ],
            BindingError::OverrideBindingConflict { base, base_shape, .. } => {
                vec![(base.location.clone(), format!("overridden member binds as {}", base_shape))]
            }
            BindingError::DuplicateBinding { first, name, .. } => {
                vec![(first.location.clone(), format!("`{}` first bound here", name))]
            }
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: BindingError,
}

impl Diagnostic {
    pub fn error(error: BindingError) -> Self {
        Self { severity: Severity::Error, error }
    }

    pub fn warning(error: BindingError) -> Self {
        Self { severity: Severity::Warning, error }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.error.code(), self.error)
    }
}
