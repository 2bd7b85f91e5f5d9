//! Resolution options

use ferry_symbols::ConventionMode;
use serde::{Deserialize, Serialize};

/// How to treat one explicit target name shared by members of unrelated types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStrictness {
    /// Namespacing is trusted to keep them apart
    Allow,
    #[default]
    Warn,
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Convention used when member, type and assembly are all silent
    pub default_convention: ConventionMode,
    pub cross_type_names: NameStrictness,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_yaml() {
        let yaml = "default_convention: LowerCamelCase\ncross_type_names: deny\n";
        let options: ResolveOptions = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(options.default_convention, ConventionMode::LowerCamelCase);
        assert_eq!(options.cross_type_names, NameStrictness::Deny);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let options: ResolveOptions = serde_yaml::from_str("{}").unwrap();
        assert_eq!(options, ResolveOptions::default());
        assert_eq!(options.cross_type_names, NameStrictness::Warn);
    }
}
