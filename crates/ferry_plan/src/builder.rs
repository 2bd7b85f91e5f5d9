//! Memoised plan construction

use crate::plan::{BindingPlan, EmitModifiers, NameBinding, TemplateBinding};
use dashmap::DashMap;
use ferry_naming::{NamingError, derive_name};
use ferry_resolve::{
    AttributeResolver, NameSource, Resolution, ResolutionStrategy, ResolveOptions,
};
use ferry_symbols::*;
use ferry_template::{Template, TemplateContext};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::debug;

/// A built plan or the error that stopped it. Both are cached.
pub type PlanResult = Result<Arc<BindingPlan>, BindingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PlanKey {
    member: MemberId,
    version: u64,
}

/// Builds and caches the plan of each member for one compilation unit
pub struct PlanBuilder<'a> {
    resolver: AttributeResolver<'a>,
    version: u64,
    cache: DashMap<PlanKey, Arc<OnceCell<PlanResult>>>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(model: &'a SymbolModel, options: &'a ResolveOptions) -> Self {
        Self {
            resolver: AttributeResolver::new(model, options),
            version: 0,
            cache: DashMap::new(),
        }
    }

    pub fn model(&self) -> &'a SymbolModel {
        self.resolver.model()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of members with a cached result
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// The plan of `id`, computed at most once per unit version.
    ///
    /// Concurrent callers for the same member block on one computation and
    /// all receive the same `Arc`.
    pub fn build_plan(&self, id: MemberId) -> PlanResult {
        let key = PlanKey {
            member: id,
            version: self.version,
        };
        // the shard lock is released before computing; accessors recurse into their property
        let cell = self.cache.entry(key).or_default().value().clone();
        cell.get_or_init(|| self.compute(id)).clone()
    }

    /// Drop every cached plan and start a new unit version
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.version += 1;
        debug!(version = self.version, "plan cache invalidated");
    }

    fn compute(&self, id: MemberId) -> PlanResult {
        let model = self.model();
        let Resolution {
            strategy,
            namespace,
            externally_visible,
        } = self.resolver.resolve(id)?;
        let member = model.member(id).ok_or_else(|| {
            invalid(model, id, id.to_string(), "member is not part of the symbol model")
        })?;
        let modifiers = EmitModifiers {
            namespace,
            externally_visible,
        };

        let plan = match strategy {
            ResolutionStrategy::Ignore => BindingPlan::Suppressed,
            ResolutionStrategy::UseName(source) => {
                let (target_name, explicit) = self.name_for(member, &source)?;
                BindingPlan::Name(NameBinding {
                    member: id,
                    target_name,
                    is_static: member.is_static(),
                    accessor_kind: member.kind.accessor_kind(),
                    explicit,
                    modifiers,
                })
            }
            ResolutionStrategy::UseTemplate(pattern) => {
                BindingPlan::Template(self.template_for(member, &pattern, modifiers)?)
            }
        };

        debug!(member = %id, %plan, "built binding plan");
        Ok(Arc::new(plan))
    }

    /// Target name and whether it was forced
    fn name_for(
        &self,
        member: &MemberDeclaration,
        source: &NameSource,
    ) -> Result<(String, bool), BindingError> {
        let model = self.model();
        match source {
            NameSource::Explicit(name) => {
                if name.is_empty() {
                    return Err(invalid(model, member.id, name.clone(), "explicit name is empty"));
                }
                if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
                    let reason = "explicit name contains whitespace";
                    return Err(invalid(model, member.id, name.clone(), reason));
                }
                Ok((name.clone(), true))
            }
            NameSource::Convention(mode) => {
                if let Some(name) = self.property_name(member) {
                    return Ok((name, false));
                }
                let derived = derive_name(&member.name, member.kind, *mode).map_err(|e| match e {
                    NamingError::InvalidIdentifier { name, reason } => {
                        invalid(model, member.id, name, reason)
                    }
                })?;
                Ok((derived, false))
            }
        }
    }

    /// Convention-named accessors always share the property's name
    fn property_name(&self, member: &MemberDeclaration) -> Option<String> {
        if !member.kind.is_accessor() {
            return None;
        }
        let plan = self.build_plan(member.property?).ok()?;
        plan.target_name().map(str::to_string)
    }

    fn template_for(
        &self,
        member: &MemberDeclaration,
        pattern: &str,
        modifiers: EmitModifiers,
    ) -> Result<TemplateBinding, BindingError> {
        let model = self.model();
        let ctx = TemplateContext {
            parameter_names: member.signature.parameter_names(),
            is_static: member.is_static(),
        };
        let template = Template::parse(pattern, &ctx).map_err(|e| BindingError::MalformedTemplate {
            member: MemberRef::of(model, member.id),
            pattern: pattern.to_string(),
            reason: e.reason,
            span: e.span,
        })?;

        let resolved_name = if template.uses_resolved_name() {
            let source = self.resolver.name_source(member.id)?;
            Some(self.name_for(member, &source)?.0)
        } else {
            None
        };

        Ok(TemplateBinding {
            member: member.id,
            placeholder_count: template.arity(),
            template,
            is_static: member.is_static(),
            resolved_name,
            modifiers,
        })
    }
}

fn invalid(model: &SymbolModel, id: MemberId, name: String, reason: &str) -> BindingError {
    BindingError::InvalidIdentifier {
        member: MemberRef::of(model, id),
        name,
        reason: reason.to_string(),
    }
}
