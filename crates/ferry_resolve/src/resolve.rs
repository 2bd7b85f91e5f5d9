//! Strategy selection from binding attributes

use crate::options::ResolveOptions;
use ferry_symbols::*;
use tracing::trace;

/// Where a name binding gets its text from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NameSource {
    /// Forced by `ExplicitName`
    Explicit(String),
    /// Derived from the declared name under this convention
    Convention(ConventionMode),
}

/// The single strategy chosen for a member
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolutionStrategy {
    /// No call-site representation at all
    Ignore,
    UseName(NameSource),
    /// Unvalidated pattern; the plan builder parses it against the signature
    UseTemplate(String),
}

/// A strategy plus the modifiers that apply to whichever strategy won
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub strategy: ResolutionStrategy,
    pub namespace: Option<String>,
    pub externally_visible: bool,
}

const ALL_TAGS: [AttributeTag; 6] = [
    AttributeTag::Ignored,
    AttributeTag::Template,
    AttributeTag::ExplicitName,
    AttributeTag::ConventionMode,
    AttributeTag::NamespaceOverride,
    AttributeTag::NotExternallyVisible,
];

/// Attribute resolver for one symbol model
pub struct AttributeResolver<'a> {
    model: &'a SymbolModel,
    options: &'a ResolveOptions,
}

/// Attribute sources of a member, most specific first
struct Sources<'a> {
    member: &'a MemberDeclaration,
    property: Option<&'a MemberDeclaration>,
    owner: Option<&'a TypeDeclaration>,
}

impl<'a> AttributeResolver<'a> {
    pub fn new(model: &'a SymbolModel, options: &'a ResolveOptions) -> Self {
        Self { model, options }
    }

    pub fn model(&self) -> &'a SymbolModel {
        self.model
    }

    pub fn options(&self) -> &'a ResolveOptions {
        self.options
    }

    /// Resolve the strategy of a member
    pub fn resolve(&self, id: MemberId) -> Result<Resolution, BindingError> {
        let member = self.model.member(id).ok_or_else(|| self.unknown(id))?;
        let sources = self.sources(member);
        self.validate(&sources)?;

        if self.member_level(&sources, AttributeTag::Ignored)?.is_some() {
            trace!(member = %id, "ignored");
            return Ok(Resolution {
                strategy: ResolutionStrategy::Ignore,
                namespace: None,
                externally_visible: false,
            });
        }

        let template = self.member_level(&sources, AttributeTag::Template)?;
        let strategy = match template.and_then(template_of) {
            Some(pattern) => ResolutionStrategy::UseTemplate(pattern),
            None => ResolutionStrategy::UseName(self.name_source_of(&sources)?),
        };

        let namespace = match self.member_level(&sources, AttributeTag::NamespaceOverride)? {
            Some(entry) => namespace_of(entry),
            None => match sources.owner {
                Some(owner) => self
                    .single(member, &owner.attributes, AttributeTag::NamespaceOverride)?
                    .and_then(namespace_of),
                None => None,
            },
        };

        let hidden = self.member_level(&sources, AttributeTag::NotExternallyVisible)?.is_some()
            || sources.owner.is_some_and(|owner| {
                owner
                    .attributes
                    .iter()
                    .any(|e| e.attribute == BindingAttribute::NotExternallyVisible)
            });

        trace!(member = %id, ?strategy, "resolved binding strategy");
        Ok(Resolution {
            strategy,
            namespace,
            externally_visible: !hidden,
        })
    }

    /// The name a member would bind to if no template were present.
    /// Templates use it for `{@}`.
    pub fn name_source(&self, id: MemberId) -> Result<NameSource, BindingError> {
        let member = self.model.member(id).ok_or_else(|| self.unknown(id))?;
        let sources = self.sources(member);
        self.validate(&sources)?;
        self.name_source_of(&sources)
    }

    /// Every tag, winning or not, may appear with one payload only
    fn validate(&self, sources: &Sources<'_>) -> Result<(), BindingError> {
        for tag in ALL_TAGS {
            self.single(sources.member, &sources.member.attributes, tag)?;
            if let Some(property) = sources.property {
                self.single(sources.member, &property.attributes, tag)?;
            }
        }
        Ok(())
    }

    fn sources(&self, member: &'a MemberDeclaration) -> Sources<'a> {
        Sources {
            member,
            property: member
                .property
                .filter(|_| member.kind.is_accessor())
                .and_then(|p| self.model.member(p)),
            owner: self.model.type_decl(member.declaring_type),
        }
    }

    fn name_source_of(&self, sources: &Sources<'_>) -> Result<NameSource, BindingError> {
        match self.member_level(sources, AttributeTag::ExplicitName)?.and_then(explicit_name_of) {
            Some(name) => Ok(NameSource::Explicit(name)),
            None => Ok(NameSource::Convention(self.convention(sources)?)),
        }
    }

    /// Member attributes first, then the owning property's for accessors
    fn member_level<'s>(
        &self,
        sources: &Sources<'s>,
        tag: AttributeTag,
    ) -> Result<Option<&'s AttributeEntry>, BindingError> {
        if let Some(entry) = self.single(sources.member, &sources.member.attributes, tag)? {
            return Ok(Some(entry));
        }
        match sources.property {
            Some(property) => self.single(sources.member, &property.attributes, tag),
            None => Ok(None),
        }
    }

    fn convention(&self, sources: &Sources<'_>) -> Result<ConventionMode, BindingError> {
        if let Some(entry) = self.member_level(sources, AttributeTag::ConventionMode)? {
            return Ok(mode_of(entry));
        }

        if let Some(owner) = sources.owner {
            let kind = sources.member.kind;
            let mut specific = owner
                .conventions
                .iter()
                .filter(|r| r.target != ConventionTarget::All && r.target.matches(kind));
            if let Some(rule) = specific.next() {
                if let Some(other) = specific.find(|r| r.mode != rule.mode) {
                    return Err(self.ambiguous(
                        sources.member,
                        AttributeTag::ConventionMode,
                        format!("{:?}", rule.mode),
                        format!("{:?}", other.mode),
                        owner.location.clone(),
                        owner.location.clone(),
                    ));
                }
                return Ok(rule.mode);
            }

            let declared =
                self.single(sources.member, &owner.attributes, AttributeTag::ConventionMode)?;
            if let Some(entry) = declared {
                return Ok(mode_of(entry));
            }
            let all = owner.conventions.iter().find(|r| r.target == ConventionTarget::All);
            if let Some(rule) = all {
                return Ok(rule.mode);
            }
        }

        Ok(self
            .model
            .assembly
            .convention
            .unwrap_or(self.options.default_convention))
    }

    /// The one entry carrying `tag`, or an ambiguity if two disagree
    fn single<'e>(
        &self,
        member: &MemberDeclaration,
        entries: &'e [AttributeEntry],
        tag: AttributeTag,
    ) -> Result<Option<&'e AttributeEntry>, BindingError> {
        let mut found = entries_with_tag(entries, tag);
        let Some(first) = found.next() else {
            return Ok(None);
        };
        // Identical repeats come from partial declarations and are harmless
        if let Some(second) = found.find(|e| e.attribute != first.attribute) {
            return Err(self.ambiguous(
                member,
                tag,
                first.attribute.to_string(),
                second.attribute.to_string(),
                first.location.clone(),
                second.location.clone(),
            ));
        }
        Ok(Some(first))
    }

    fn ambiguous(
        &self,
        member: &MemberDeclaration,
        tag: AttributeTag,
        first: String,
        second: String,
        first_location: Option<SourceLocation>,
        second_location: Option<SourceLocation>,
    ) -> BindingError {
        BindingError::AmbiguousBinding {
            member: MemberRef::of(self.model, member.id),
            tag,
            first,
            second,
            first_location,
            second_location,
        }
    }

    fn unknown(&self, id: MemberId) -> BindingError {
        BindingError::InvalidIdentifier {
            member: MemberRef::of(self.model, id),
            name: id.to_string(),
            reason: "member is not part of the symbol model".to_string(),
        }
    }
}

fn mode_of(entry: &AttributeEntry) -> ConventionMode {
    match entry.attribute {
        BindingAttribute::ConventionMode(mode) => mode,
        _ => ConventionMode::AsDeclared,
    }
}

fn template_of(entry: &AttributeEntry) -> Option<String> {
    match &entry.attribute {
        BindingAttribute::Template(pattern) => Some(pattern.clone()),
        _ => None,
    }
}

fn explicit_name_of(entry: &AttributeEntry) -> Option<String> {
    match &entry.attribute {
        BindingAttribute::ExplicitName(name) => Some(name.clone()),
        _ => None,
    }
}

fn namespace_of(entry: &AttributeEntry) -> Option<String> {
    match &entry.attribute {
        BindingAttribute::NamespaceOverride(ns) => Some(ns.clone()),
        _ => None,
    }
}
