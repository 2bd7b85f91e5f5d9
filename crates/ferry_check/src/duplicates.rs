//! Explicit target name collisions

use crate::shape::PlanLookup;
use ferry_resolve::{NameStrictness, ResolveOptions};
use ferry_symbols::*;
use std::collections::HashMap;
use tracing::warn;

/// Where a member lands in the generated program
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Scope {
    namespace: String,
    type_name: String,
    is_static: bool,
}

struct Bound<'m> {
    member: &'m MemberDeclaration,
    scope: Scope,
}

impl Bound<'_> {
    /// A property and its accessors bind one name together
    fn family(&self) -> MemberId {
        match self.member.property {
            Some(property) if self.member.kind.is_accessor() => property,
            _ => self.member.id,
        }
    }

    fn compatible_with(&self, other: &Bound<'_>) -> bool {
        if self.family() == other.family() {
            return true;
        }
        // Same kind and arity: both spellings alias one runtime function
        self.member.kind == other.member.kind
            && self.member.signature.arity() == other.member.signature.arity()
    }
}

/// Report explicit names that collide within an emitted scope, and across
/// unrelated types according to [`ResolveOptions::cross_type_names`]
pub fn check_duplicate_names<P: PlanLookup>(
    model: &SymbolModel,
    plans: &P,
    options: &ResolveOptions,
) -> Vec<Diagnostic> {
    let mut by_name: HashMap<String, Vec<Bound<'_>>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for member in model.members() {
        let Some(binding) = plans.explicit_binding(member.id) else {
            continue;
        };
        let Some(owner) = model.type_decl(member.declaring_type) else {
            continue;
        };
        let scope = Scope {
            namespace: binding
                .namespace
                .or_else(|| owner.namespace.clone())
                .unwrap_or_default(),
            type_name: owner.name.clone(),
            is_static: member.is_static(),
        };
        if !by_name.contains_key(&binding.name) {
            order.push(binding.name.clone());
        }
        by_name.entry(binding.name).or_default().push(Bound { member, scope });
    }

    let mut diagnostics = Vec::new();
    for name in order {
        let bound = &by_name[&name];

        // Same scope: every member must be compatible with the first one there
        let mut firsts: Vec<&Bound<'_>> = Vec::new();
        for b in bound {
            match firsts.iter().find(|f| f.scope == b.scope) {
                Some(first) if !first.compatible_with(b) => {
                    diagnostics.push(Diagnostic::error(duplicate(model, &name, first, b, false)));
                }
                Some(_) => {}
                None => firsts.push(b),
            }
        }

        if options.cross_type_names == NameStrictness::Allow {
            continue;
        }
        // Each scope is reported once, against the earliest stranger of the same static-ness
        for (i, other) in firsts.iter().enumerate() {
            let stranger = firsts[..i].iter().find(|earlier| {
                earlier.scope.is_static == other.scope.is_static
                    && !related(model, earlier.member, other.member)
            });
            let Some(first) = stranger else {
                continue;
            };
            let error = duplicate(model, &name, first, other, true);
            match options.cross_type_names {
                NameStrictness::Deny => diagnostics.push(Diagnostic::error(error)),
                _ => {
                    warn!(
                        name = %name,
                        first = %first.member.id,
                        second = %other.member.id,
                        "explicit name shared across types"
                    );
                    diagnostics.push(Diagnostic::warning(error));
                }
            }
        }
    }

    diagnostics
}

fn duplicate(
    model: &SymbolModel,
    name: &str,
    first: &Bound<'_>,
    second: &Bound<'_>,
    cross_type: bool,
) -> BindingError {
    BindingError::DuplicateBinding {
        name: name.to_string(),
        first: MemberRef::of(model, first.member.id),
        second: MemberRef::of(model, second.member.id),
        cross_type,
    }
}

/// Members of one type, or of types in one inheritance line, are not strangers
fn related(model: &SymbolModel, a: &MemberDeclaration, b: &MemberDeclaration) -> bool {
    a.declaring_type == b.declaring_type
        || is_ancestor(model, a.declaring_type, b.declaring_type)
        || is_ancestor(model, b.declaring_type, a.declaring_type)
}

fn is_ancestor(model: &SymbolModel, ancestor: TypeId, ty: TypeId) -> bool {
    let mut current = model.type_decl(ty).and_then(|t| t.base);
    let mut steps = 0;
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        // a cyclic base chain is the front end's bug, stop rather than spin
        steps += 1;
        if steps > model.types().len() {
            return false;
        }
        current = model.type_decl(id).and_then(|t| t.base);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{BindingShape, ExplicitBinding};

    struct Explicit(HashMap<MemberId, &'static str>);

    impl PlanLookup for Explicit {
        fn shape(&self, _member: MemberId) -> Option<BindingShape> {
            None
        }

        fn explicit_binding(&self, member: MemberId) -> Option<ExplicitBinding> {
            self.0.get(&member).map(|name| ExplicitBinding {
                name: name.to_string(),
                namespace: None,
            })
        }
    }

    #[test]
    fn test_aliases_with_same_shape_are_compatible() {
        let mut b = ModelBuilder::new("Bridge");
        let ty =
            b.add_type(TypeDeclaration::new("CultureInfo").in_namespace("System.Globalization"));
        let get = b.add_member(
            MemberDeclaration::new(ty, "GetCultureInfo", MemberKind::Method)
                .static_member()
                .with_param("name", "string"),
        );
        let create = b.add_member(
            MemberDeclaration::new(ty, "CreateSpecificCulture", MemberKind::Method)
                .static_member()
                .with_param("name", "string"),
        );
        let model = b.finish().unwrap();
        let plans = Explicit(HashMap::from([(get, "getCultureInfo"), (create, "getCultureInfo")]));

        assert!(check_duplicate_names(&model, &plans, &ResolveOptions::default()).is_empty());
    }

    #[test]
    fn test_incompatible_reuse_in_one_scope() {
        let mut b = ModelBuilder::new("Test");
        let ty = b.add_type(TypeDeclaration::new("A"));
        let one = b.add_member(
            MemberDeclaration::new(ty, "Format", MemberKind::Method).with_param("a", "string"),
        );
        let two = b.add_member(
            MemberDeclaration::new(ty, "FormatWith", MemberKind::Method)
                .with_param("a", "string")
                .with_param("b", "object"),
        );
        let model = b.finish().unwrap();
        let plans = Explicit(HashMap::from([(one, "format"), (two, "format")]));

        let diagnostics = check_duplicate_names(&model, &plans, &ResolveOptions::default());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_error());
        match &diagnostics[0].error {
            BindingError::DuplicateBinding { first, second, cross_type, .. } => {
                assert_eq!((first.id, second.id), (one, two));
                assert!(!cross_type);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_static_and_instance_scopes_are_separate() {
        let mut b = ModelBuilder::new("Test");
        let ty = b.add_type(TypeDeclaration::new("A"));
        let s = b.add_member(
            MemberDeclaration::new(ty, "Parse", MemberKind::Method)
                .static_member()
                .with_param("s", "string"),
        );
        let i = b.add_member(MemberDeclaration::new(ty, "Parse", MemberKind::Method));
        let model = b.finish().unwrap();
        let plans = Explicit(HashMap::from([(s, "parse"), (i, "parse")]));

        assert!(check_duplicate_names(&model, &plans, &ResolveOptions::default()).is_empty());
    }

    #[test]
    fn test_cross_type_strictness() {
        let mut b = ModelBuilder::new("Test");
        let a = b.add_type(TypeDeclaration::new("A"));
        let c = b.add_type(TypeDeclaration::new("C"));
        let derived = b.add_type(TypeDeclaration::new("D").extending(a));
        let m1 = b.add_member(MemberDeclaration::new(a, "Hash", MemberKind::Method));
        let m2 = b.add_member(MemberDeclaration::new(c, "Hash", MemberKind::Method));
        let m3 = b.add_member(MemberDeclaration::new(derived, "Hash", MemberKind::Method));
        let model = b.finish().unwrap();
        let plans = Explicit(HashMap::from([(m1, "$hash"), (m2, "$hash"), (m3, "$hash")]));

        let allow = ResolveOptions {
            cross_type_names: NameStrictness::Allow,
            ..Default::default()
        };
        assert!(check_duplicate_names(&model, &plans, &allow).is_empty());

        // D derives from A but is a stranger to C
        let warn = check_duplicate_names(&model, &plans, &ResolveOptions::default());
        assert_eq!(warn.len(), 2);
        assert!(warn.iter().all(|d| d.severity == Severity::Warning));
        let pairs: Vec<_> = warn
            .iter()
            .map(|d| match &d.error {
                BindingError::DuplicateBinding { first, second, .. } => (first.id, second.id),
                other => panic!("unexpected error {:?}", other),
            })
            .collect();
        assert_eq!(pairs, vec![(m1, m2), (m2, m3)]);

        let deny = ResolveOptions { cross_type_names: NameStrictness::Deny, ..Default::default() };
        let denied = check_duplicate_names(&model, &plans, &deny);
        assert_eq!(denied.len(), 2);
        assert!(denied.iter().all(Diagnostic::is_error));
    }

    #[test]
    fn test_strangers_after_a_different_static_scope() {
        let mut b = ModelBuilder::new("Test");
        let a = b.add_type(TypeDeclaration::new("A"));
        let bt = b.add_type(TypeDeclaration::new("B"));
        let c = b.add_type(TypeDeclaration::new("C"));
        let ax = b.add_member(MemberDeclaration::new(a, "X", MemberKind::Method).static_member());
        let bx = b.add_member(MemberDeclaration::new(bt, "X", MemberKind::Method));
        let cx = b.add_member(MemberDeclaration::new(c, "X", MemberKind::Method));
        let model = b.finish().unwrap();
        let plans = Explicit(HashMap::from([(ax, "$x"), (bx, "$x"), (cx, "$x")]));

        let deny = ResolveOptions { cross_type_names: NameStrictness::Deny, ..Default::default() };
        let denied = check_duplicate_names(&model, &plans, &deny);
        assert_eq!(denied.len(), 1);
        match &denied[0].error {
            BindingError::DuplicateBinding { first, second, cross_type, .. } => {
                assert_eq!((first.id, second.id), (bx, cx));
                assert!(cross_type);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
