//! Incremental construction of a [`SymbolModel`]

use crate::model::*;

/// Assigns ids in declaration order and validates on [`ModelBuilder::finish`]
pub struct ModelBuilder {
    assembly: Assembly,
    types: Vec<TypeDeclaration>,
    members: Vec<MemberDeclaration>,
    next_type: u32,
    next_member: u32,
}

impl ModelBuilder {
    pub fn new(assembly: impl Into<String>) -> Self {
        Self {
            assembly: Assembly {
                name: assembly.into(),
                convention: None,
            },
            types: Vec::new(),
            members: Vec::new(),
            next_type: 0,
            next_member: 0,
        }
    }

    pub fn assembly_convention(mut self, mode: ConventionMode) -> Self {
        self.assembly.convention = Some(mode);
        self
    }

    pub fn add_type(&mut self, mut decl: TypeDeclaration) -> TypeId {
        let id = TypeId::new(self.next_type);
        self.next_type += 1;
        decl.id = id;
        self.types.push(decl);
        id
    }

    pub fn add_member(&mut self, mut decl: MemberDeclaration) -> MemberId {
        let id = MemberId::new(self.next_member);
        self.next_member += 1;
        decl.id = id;
        self.members.push(decl);
        id
    }

    /// Add a property together with the accessors named in `accessors`
    pub fn add_property(
        &mut self,
        property: MemberDeclaration,
        accessors: &[MemberKind],
    ) -> (MemberId, Vec<MemberId>) {
        let declaring_type = property.declaring_type;
        let name = property.name.clone();
        let is_static = property.is_static();
        let property_id = self.add_member(property);
        let accessor_ids = accessors
            .iter()
            .map(|&kind| {
                let mut accessor = MemberDeclaration::new(declaring_type, name.clone(), kind)
                    .accessor_of(property_id);
                accessor.modifiers.is_static = is_static;
                self.add_member(accessor)
            })
            .collect();
        (property_id, accessor_ids)
    }

    /// Mutable access to a member added earlier, for attaching accessor attributes
    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut MemberDeclaration> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    pub fn finish(self) -> Result<SymbolModel, ModelError> {
        SymbolModel::from_parts(self.assembly, self.types, self.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_assigns_ids_and_indexes_members() {
        let mut b = ModelBuilder::new("Bridge");
        let ty =
            b.add_type(TypeDeclaration::new("CultureInfo").in_namespace("System.Globalization"));
        let m = b.add_member(
            MemberDeclaration::new(ty, "GetCultureInfo", MemberKind::Method)
                .with_param("name", "string"),
        );
        let (p, accessors) = b.add_property(
            MemberDeclaration::new(ty, "Name", MemberKind::Property),
            &[MemberKind::PropertyGet],
        );
        let model = b.finish().unwrap();

        assert_eq!(model.members_of(ty), &[m, p, accessors[0]]);
        assert_eq!(model.member(accessors[0]).unwrap().property, Some(p));
        assert_eq!(
            model.display_member(m),
            "System.Globalization.CultureInfo.GetCultureInfo(string)"
        );
        assert_eq!(model.find_member("CultureInfo.GetCultureInfo").unwrap().id, m);
        assert_eq!(model.find_member("System.Globalization.CultureInfo.Name").unwrap().id, p);
    }

    #[test]
    fn test_unknown_override_target_is_rejected() {
        let mut b = ModelBuilder::new("Test");
        let ty = b.add_type(TypeDeclaration::new("A"));
        let bogus = b.add_member(
            MemberDeclaration::new(ty, "X", MemberKind::Method).overriding(MemberId::new(42)),
        );
        assert_eq!(
            b.finish().unwrap_err(),
            ModelError::UnknownMember { referrer: bogus, target: MemberId::new(42) }
        );
    }

    #[test]
    fn test_accessor_must_link_to_property() {
        let mut b = ModelBuilder::new("Test");
        let ty = b.add_type(TypeDeclaration::new("A"));
        let method = b.add_member(MemberDeclaration::new(ty, "M", MemberKind::Method));
        let getter = b.add_member(
            MemberDeclaration::new(ty, "M", MemberKind::PropertyGet).accessor_of(method),
        );
        assert_eq!(
            b.finish().unwrap_err(),
            ModelError::NotAProperty { accessor: getter, property: method }
        );
    }

    #[test]
    fn test_model_deserializes_from_json() {
        let json = r#"{
            "assembly": { "name": "Bridge", "convention": "LowerCamelCase" },
            "types": [ {
                "id": 0, "name": "IEnumerable", "namespace": "System.Collections.Generic",
                "attributes": [ { "attribute": "Ignored" },
                                { "attribute": { "NamespaceOverride": "Bridge" } } ]
            } ],
            "members": [ {
                "id": 7, "declaring_type": 0, "name": "GetEnumerator", "kind": "Method",
                "location": { "file": "IEnumerable.cs", "span": { "start": 10, "end": 24 } }
            } ]
        }"#;
        let model: SymbolModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.assembly.convention, Some(ConventionMode::LowerCamelCase));
        let ty = model.type_decl(TypeId::new(0)).unwrap();
        assert_eq!(
            ty.attributes[1].attribute,
            BindingAttribute::NamespaceOverride("Bridge".into())
        );
        let m = model.member(MemberId::new(7)).unwrap();
        assert_eq!(m.location.as_ref().unwrap().to_string(), "IEnumerable.cs:10..24");
    }

    #[test]
    fn test_json_with_dangling_type_fails() {
        let json =
            r#"{ "members": [ { "id": 0, "declaring_type": 3, "name": "X", "kind": "Field" } ] }"#;
        let err = serde_json::from_str::<SymbolModel>(json).unwrap_err();
        assert!(err.to_string().contains("unknown type"));
    }
}
