//! Override consistency checking

use crate::shape::{BindingShape, PlanLookup};
use ferry_symbols::{BindingError, MemberId, MemberRef, SymbolModel, TypeId};
use tracing::debug;

/// An override whose binding shape differs from the member it overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyViolation {
    pub member: MemberId,
    pub base: MemberId,
    pub shape: BindingShape,
    pub base_shape: BindingShape,
}

impl ConsistencyViolation {
    pub fn into_error(self, model: &SymbolModel) -> BindingError {
        BindingError::OverrideBindingConflict {
            member: MemberRef::of(model, self.member),
            base: MemberRef::of(model, self.base),
            shape: self.shape.to_string(),
            base_shape: self.base_shape.to_string(),
        }
    }
}

/// The override checker
pub struct ConsistencyChecker<'a, P: PlanLookup> {
    model: &'a SymbolModel,
    plans: &'a P,
}

impl<'a, P: PlanLookup> ConsistencyChecker<'a, P> {
    pub fn new(model: &'a SymbolModel, plans: &'a P) -> Self {
        Self { model, plans }
    }

    /// Check every override declared on `ty`. All violations are returned, not just the first.
    pub fn check_type(&self, ty: TypeId) -> Vec<ConsistencyViolation> {
        let mut violations = Vec::new();

        for &id in self.model.members_of(ty) {
            let Some(member) = self.model.member(id) else {
                continue;
            };
            let Some(base) = member.overrides else {
                continue;
            };
            // A member without a plan already has its own diagnostic
            let (Some(shape), Some(base_shape)) = (self.plans.shape(id), self.plans.shape(base))
            else {
                continue;
            };
            if shape != base_shape {
                debug!(
                    member = %id,
                    base = %base,
                    %shape,
                    %base_shape,
                    "override changes binding shape"
                );
                violations.push(ConsistencyViolation {
                    member: id,
                    base,
                    shape,
                    base_shape,
                });
            }
        }

        violations
    }

    /// Check every type of the model
    pub fn check(&self) -> Result<(), Vec<ConsistencyViolation>> {
        let violations: Vec<_> = self
            .model
            .types()
            .iter()
            .flat_map(|t| self.check_type(t.id))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ExplicitBinding;
    use ferry_symbols::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Shapes(HashMap<MemberId, BindingShape>);

    impl PlanLookup for Shapes {
        fn shape(&self, member: MemberId) -> Option<BindingShape> {
            self.0.get(&member).copied()
        }

        fn explicit_binding(&self, _member: MemberId) -> Option<ExplicitBinding> {
            None
        }
    }

    const INSTANCE_GET: BindingShape = BindingShape::Name {
        is_static: false,
        accessor: AccessorKind::Get,
    };
    const STATIC_GET: BindingShape = BindingShape::Name {
        is_static: true,
        accessor: AccessorKind::Get,
    };

    #[test]
    fn test_static_override_of_instance_getter() {
        let mut b = ModelBuilder::new("Test");
        let base_ty = b.add_type(TypeDeclaration::new("Base"));
        let derived_ty = b.add_type(TypeDeclaration::new("Derived").extending(base_ty));
        let base = b.add_member(
            MemberDeclaration::new(base_ty, "TextInfo", MemberKind::PropertyGet).virtual_member(),
        );
        let derived = b.add_member(
            MemberDeclaration::new(derived_ty, "TextInfo", MemberKind::PropertyGet)
                .overriding(base),
        );
        let model = b.finish().unwrap();

        let mut shapes = Shapes::default();
        shapes.0.insert(base, INSTANCE_GET);
        shapes.0.insert(derived, STATIC_GET);

        let checker = ConsistencyChecker::new(&model, &shapes);
        let violations = checker.check_type(derived_ty);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].member, derived);
        assert_eq!(violations[0].base, base);

        match violations[0].clone().into_error(&model) {
            BindingError::OverrideBindingConflict { member, base: base_ref, .. } => {
                assert_eq!(member.id, derived);
                assert_eq!(base_ref.id, base);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(checker.check_type(base_ty).is_empty());
    }

    #[test]
    fn test_collects_all_violations_and_skips_failed_plans() {
        let mut b = ModelBuilder::new("Test");
        let base_ty = b.add_type(TypeDeclaration::new("Base"));
        let derived_ty = b.add_type(TypeDeclaration::new("Derived").extending(base_ty));
        let virtual_method =
            |name| MemberDeclaration::new(base_ty, name, MemberKind::Method).virtual_member();
        let override_of = |name, base| {
            MemberDeclaration::new(derived_ty, name, MemberKind::Method).overriding(base)
        };
        let a = b.add_member(virtual_method("A"));
        let c = b.add_member(virtual_method("C"));
        let d = b.add_member(virtual_method("D"));
        let e = b.add_member(virtual_method("E"));
        let a2 = b.add_member(override_of("A", a));
        let c2 = b.add_member(override_of("C", c));
        let d2 = b.add_member(override_of("D", d));
        let _e2 = b.add_member(override_of("E", e));
        let model = b.finish().unwrap();

        let name = BindingShape::Name { is_static: false, accessor: AccessorKind::None };
        let mut shapes = Shapes::default();
        shapes.0.insert(a, name);
        shapes.0.insert(a2, BindingShape::Template { arity: 0 });
        shapes.0.insert(c, BindingShape::Template { arity: 1 });
        shapes.0.insert(c2, BindingShape::Template { arity: 2 });
        shapes.0.insert(d, name);
        shapes.0.insert(d2, name);
        // the override of E failed to build and has no shape
        shapes.0.insert(e, name);

        let checker = ConsistencyChecker::new(&model, &shapes);
        let violations = checker.check().unwrap_err();
        let members: Vec<_> = violations.iter().map(|v| v.member).collect();
        assert_eq!(members, vec![a2, c2]);
    }
}
