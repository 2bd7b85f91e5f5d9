//! Types, members and binding attributes

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Unique identifier for a member declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl MemberId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Unique identifier for a type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl TypeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Span in source code (byte offsets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Where the front end saw a declaration or attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub span: Span,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            file: file.into(),
            span: Span::new(start, end),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}..{}", self.file, self.span.start, self.span.end)
    }
}

/// Kind of member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemberKind {
    Method,
    /// The property itself. Carries attributes shared by its accessors.
    Property,
    PropertyGet,
    PropertySet,
    Field,
    Constructor,
    Event,
    Indexer,
}

impl MemberKind {
    pub fn is_accessor(self) -> bool {
        matches!(self, MemberKind::PropertyGet | MemberKind::PropertySet)
    }

    pub fn accessor_kind(self) -> AccessorKind {
        match self {
            MemberKind::PropertyGet => AccessorKind::Get,
            MemberKind::PropertySet => AccessorKind::Set,
            _ => AccessorKind::None,
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberKind::Method => "method",
            MemberKind::Property => "property",
            MemberKind::PropertyGet => "property getter",
            MemberKind::PropertySet => "property setter",
            MemberKind::Field => "field",
            MemberKind::Constructor => "constructor",
            MemberKind::Event => "event",
            MemberKind::Indexer => "indexer",
        };
        f.write_str(s)
    }
}

/// Which half of a property a binding stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccessorKind {
    #[default]
    None,
    Get,
    Set,
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessorKind::None => f.write_str("plain"),
            AccessorKind::Get => f.write_str("get"),
            AccessorKind::Set => f.write_str("set"),
        }
    }
}

/// Naming transformation applied when no explicit target name is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConventionMode {
    #[default]
    AsDeclared,
    LowerCamelCase,
    UpperCamelCase,
}

/// Member category a type-level convention applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConventionTarget {
    #[default]
    All,
    Method,
    Property,
    Field,
    Event,
    Constructor,
}

impl ConventionTarget {
    pub fn matches(self, kind: MemberKind) -> bool {
        match self {
            ConventionTarget::All => true,
            ConventionTarget::Method => matches!(kind, MemberKind::Method | MemberKind::Indexer),
            ConventionTarget::Property => matches!(
                kind,
                MemberKind::Property | MemberKind::PropertyGet | MemberKind::PropertySet
            ),
            ConventionTarget::Field => kind == MemberKind::Field,
            ConventionTarget::Event => kind == MemberKind::Event,
            ConventionTarget::Constructor => kind == MemberKind::Constructor,
        }
    }
}

/// A convention declared on a type, optionally limited to one member category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionRule {
    pub mode: ConventionMode,
    #[serde(default)]
    pub target: ConventionTarget,
}

/// Binding metadata attached to a member or type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingAttribute {
    ExplicitName(String),
    ConventionMode(ConventionMode),
    Template(String),
    Ignored,
    NotExternallyVisible,
    NamespaceOverride(String),
}

impl BindingAttribute {
    pub fn tag(&self) -> AttributeTag {
        match self {
            BindingAttribute::ExplicitName(_) => AttributeTag::ExplicitName,
            BindingAttribute::ConventionMode(_) => AttributeTag::ConventionMode,
            BindingAttribute::Template(_) => AttributeTag::Template,
            BindingAttribute::Ignored => AttributeTag::Ignored,
            BindingAttribute::NotExternallyVisible => AttributeTag::NotExternallyVisible,
            BindingAttribute::NamespaceOverride(_) => AttributeTag::NamespaceOverride,
        }
    }
}

impl fmt::Display for BindingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingAttribute::ExplicitName(name) => write!(f, "Name(\"{}\")", name),
            BindingAttribute::ConventionMode(mode) => write!(f, "Convention({:?})", mode),
            BindingAttribute::Template(pattern) => write!(f, "Template(\"{}\")", pattern),
            BindingAttribute::Ignored => f.write_str("Ignore"),
            BindingAttribute::NotExternallyVisible => f.write_str("NotExternallyVisible"),
            BindingAttribute::NamespaceOverride(ns) => write!(f, "Namespace(\"{}\")", ns),
        }
    }
}

/// Discriminant of a [`BindingAttribute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeTag {
    ExplicitName,
    ConventionMode,
    Template,
    Ignored,
    NotExternallyVisible,
    NamespaceOverride,
}

impl fmt::Display for AttributeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttributeTag::ExplicitName => "explicit name",
            AttributeTag::ConventionMode => "convention",
            AttributeTag::Template => "template",
            AttributeTag::Ignored => "ignore",
            AttributeTag::NotExternallyVisible => "visibility",
            AttributeTag::NamespaceOverride => "namespace",
        };
        f.write_str(s)
    }
}

/// An attribute together with the place it was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeEntry {
    pub attribute: BindingAttribute,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl From<BindingAttribute> for AttributeEntry {
    fn from(attribute: BindingAttribute) -> Self {
        Self { attribute, location: None }
    }
}

/// Find every entry carrying `tag`, in declaration order
pub fn entries_with_tag(
    entries: &[AttributeEntry],
    tag: AttributeTag,
) -> impl Iterator<Item = &AttributeEntry> {
    entries.iter().filter(move |e| e.attribute.tag() == tag)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

impl Signature {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }
}

/// A member as produced by the front end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub id: MemberId,
    pub declaring_type: TypeId,
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub signature: Signature,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
    /// Owning property, for accessors
    #[serde(default)]
    pub property: Option<MemberId>,
    /// Member this one overrides. Identity lookup only.
    #[serde(default)]
    pub overrides: Option<MemberId>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl MemberDeclaration {
    /// New member with no attributes. The id is assigned by [`crate::ModelBuilder`].
    pub fn new(declaring_type: TypeId, name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            id: MemberId::new(0),
            declaring_type,
            name: name.into(),
            kind,
            signature: Signature::default(),
            modifiers: Modifiers::default(),
            attributes: Vec::new(),
            property: None,
            overrides: None,
            location: None,
        }
    }

    pub fn with_attribute(mut self, attribute: BindingAttribute) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_located_attribute(
        mut self,
        attribute: BindingAttribute,
        location: SourceLocation,
    ) -> Self {
        self.attributes.push(AttributeEntry { attribute, location: Some(location) });
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.signature.parameters.push(Parameter { name: name.into(), ty: ty.into() });
        self
    }

    pub fn returning(mut self, ty: impl Into<String>) -> Self {
        self.signature.return_type = Some(ty.into());
        self
    }

    pub fn static_member(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    pub fn virtual_member(mut self) -> Self {
        self.modifiers.is_virtual = true;
        self
    }

    pub fn overriding(mut self, base: MemberId) -> Self {
        self.modifiers.is_override = true;
        self.overrides = Some(base);
        self
    }

    pub fn accessor_of(mut self, property: MemberId) -> Self {
        self.property = Some(property);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    pub fn has_attribute(&self, tag: AttributeTag) -> bool {
        entries_with_tag(&self.attributes, tag).next().is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub id: TypeId,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub base: Option<TypeId>,
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
    #[serde(default)]
    pub conventions: Vec<ConventionRule>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

impl TypeDeclaration {
    /// New type with no attributes. The id is assigned by [`crate::ModelBuilder`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TypeId::new(0),
            name: name.into(),
            namespace: None,
            base: None,
            attributes: Vec::new(),
            conventions: Vec::new(),
            location: None,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn extending(mut self, base: TypeId) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_attribute(mut self, attribute: BindingAttribute) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_convention(mut self, mode: ConventionMode, target: ConventionTarget) -> Self {
        self.conventions.push(ConventionRule { mode, target });
        self
    }

    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Assembly {
    pub name: String,
    /// Assembly-wide convention used when neither member nor type picks one
    #[serde(default)]
    pub convention: Option<ConventionMode>,
}

/// Structural problems in a model handed over by the front end
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate type id {0}")]
    DuplicateType(TypeId),
    #[error("duplicate member id {0}")]
    DuplicateMember(MemberId),
    #[error("member {member} refers to unknown type {ty}")]
    UnknownType { member: MemberId, ty: TypeId },
    #[error("{referrer} refers to unknown member {target}")]
    UnknownMember { referrer: MemberId, target: MemberId },
    #[error("type {ty} has unknown base type {base}")]
    UnknownBase { ty: TypeId, base: TypeId },
    #[error("accessor {accessor} links to {property}, which is not a property")]
    NotAProperty { accessor: MemberId, property: MemberId },
}

#[derive(Deserialize)]
struct RawModel {
    #[serde(default)]
    assembly: Assembly,
    #[serde(default)]
    types: Vec<TypeDeclaration>,
    #[serde(default)]
    members: Vec<MemberDeclaration>,
}

impl TryFrom<RawModel> for SymbolModel {
    type Error = ModelError;

    fn try_from(raw: RawModel) -> Result<Self, Self::Error> {
        SymbolModel::from_parts(raw.assembly, raw.types, raw.members)
    }
}

/// The immutable, indexed symbol model for one compilation unit
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawModel")]
pub struct SymbolModel {
    pub assembly: Assembly,
    types: Vec<TypeDeclaration>,
    members: Vec<MemberDeclaration>,
    type_index: HashMap<TypeId, usize>,
    member_index: HashMap<MemberId, usize>,
    /// Members of each type, in declaration order
    type_members: HashMap<TypeId, Vec<MemberId>>,
}

impl SymbolModel {
    /// Index and validate the declarations of a compilation unit
    pub fn from_parts(
        assembly: Assembly,
        types: Vec<TypeDeclaration>,
        members: Vec<MemberDeclaration>,
    ) -> Result<Self, ModelError> {
        let mut type_index = HashMap::new();
        for (i, ty) in types.iter().enumerate() {
            if type_index.insert(ty.id, i).is_some() {
                return Err(ModelError::DuplicateType(ty.id));
            }
        }
        for ty in &types {
            if let Some(base) = ty.base {
                if !type_index.contains_key(&base) {
                    return Err(ModelError::UnknownBase { ty: ty.id, base });
                }
            }
        }

        let mut member_index = HashMap::new();
        let mut type_members: HashMap<TypeId, Vec<MemberId>> = HashMap::new();
        for (i, member) in members.iter().enumerate() {
            if member_index.insert(member.id, i).is_some() {
                return Err(ModelError::DuplicateMember(member.id));
            }
            if !type_index.contains_key(&member.declaring_type) {
                return Err(ModelError::UnknownType {
                    member: member.id,
                    ty: member.declaring_type,
                });
            }
            type_members.entry(member.declaring_type).or_default().push(member.id);
        }

        for member in &members {
            for target in [member.property, member.overrides].into_iter().flatten() {
                if !member_index.contains_key(&target) {
                    return Err(ModelError::UnknownMember {
                        referrer: member.id,
                        target,
                    });
                }
            }
            if let Some(property) = member.property {
                if members[member_index[&property]].kind != MemberKind::Property {
                    return Err(ModelError::NotAProperty {
                        accessor: member.id,
                        property,
                    });
                }
            }
        }

        Ok(Self {
            assembly,
            types,
            members,
            type_index,
            member_index,
            type_members,
        })
    }

    pub fn member(&self, id: MemberId) -> Option<&MemberDeclaration> {
        self.member_index.get(&id).map(|&i| &self.members[i])
    }

    pub fn type_decl(&self, id: TypeId) -> Option<&TypeDeclaration> {
        self.type_index.get(&id).map(|&i| &self.types[i])
    }

    pub fn members(&self) -> &[MemberDeclaration] {
        &self.members
    }

    pub fn types(&self) -> &[TypeDeclaration] {
        &self.types
    }

    pub fn members_of(&self, ty: TypeId) -> &[MemberId] {
        self.type_members.get(&ty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find a member by `Type.Member` or `Namespace.Type.Member`
    pub fn find_member(&self, path: &str) -> Option<&MemberDeclaration> {
        let (type_path, member_name) = path.rsplit_once('.')?;
        self.members.iter().find(|m| {
            m.name == member_name
                && self
                    .type_decl(m.declaring_type)
                    .is_some_and(|t| t.name == type_path || t.full_name() == type_path)
        })
    }

    /// Human-readable member identity, e.g.
    /// `System.Globalization.CultureInfo.GetCultureInfo(string)`
    pub fn display_member(&self, id: MemberId) -> String {
        let Some(member) = self.member(id) else {
            return format!("<unknown {}>", id);
        };
        let owner = self
            .type_decl(member.declaring_type)
            .map(|t| t.full_name())
            .unwrap_or_else(|| "?".to_string());
        match member.kind {
            MemberKind::Method | MemberKind::Constructor | MemberKind::Indexer => {
                let params: Vec<_> =
                    member.signature.parameters.iter().map(|p| p.ty.as_str()).collect();
                format!("{}.{}({})", owner, member.name, params.join(", "))
            }
            MemberKind::PropertyGet => format!("{}.{}.get", owner, member.name),
            MemberKind::PropertySet => format!("{}.{}.set", owner, member.name),
            _ => format!("{}.{}", owner, member.name),
        }
    }
}
