//! Naming conventions for target-side identifiers
//!
//! Derives the default target name of a member from its declared name, its
//! kind and a [`ConventionMode`]. The result depends on nothing else.
//!
//! ```text
//! ("DateTimeFormat", Property, LowerCamelCase)  → "dateTimeFormat"
//! ("get_NativeName", PropertyGet, LowerCamelCase) → "nativeName"
//! ("HTMLElement", Method, LowerCamelCase)        → "htmlElement"
//! ("get_value", Method, UpperCamelCase)          → "GetValue"
//! ```

use ferry_symbols::{ConventionMode, MemberKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("invalid identifier `{name}`: {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },
}

/// Derive the target-side name of a member under `mode`
///
/// `AsDeclared` returns the identifier untouched; metadata prefixes are only
/// dropped when the name is re-cased.
pub fn derive_name(
    declared: &str,
    kind: MemberKind,
    mode: ConventionMode,
) -> Result<String, NamingError> {
    let name = match mode {
        ConventionMode::AsDeclared => declared,
        _ => strip_metadata_prefix(declared, kind),
    };
    validate(declared, name)?;

    let derived = match mode {
        ConventionMode::AsDeclared => name.to_string(),
        ConventionMode::LowerCamelCase => to_camel(name, false),
        ConventionMode::UpperCamelCase => to_camel(name, true),
    };
    Ok(derived)
}

/// Accessor and constructor metadata names carry a prefix the target never sees
fn strip_metadata_prefix(declared: &str, kind: MemberKind) -> &str {
    match kind {
        MemberKind::PropertyGet => declared.strip_prefix("get_").unwrap_or(declared),
        MemberKind::PropertySet => declared.strip_prefix("set_").unwrap_or(declared),
        MemberKind::Constructor => declared.strip_prefix('.').unwrap_or(declared),
        _ => declared,
    }
}

fn validate(declared: &str, name: &str) -> Result<(), NamingError> {
    let reason = if name.is_empty() {
        Some("identifier is empty")
    } else if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("identifier contains whitespace")
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        Some("identifier starts with a digit")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(NamingError::InvalidIdentifier {
            name: declared.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn is_separator(c: char) -> bool {
    c == '_' || c == '-'
}

/// Split an identifier into words.
///
/// Handles camelCase, PascalCase, snake_case, kebab-case and acronym runs.
/// Digits stay with the word before them.
///
/// ```text
/// "DateTimeFormat" → ["Date", "Time", "Format"]
/// "HTMLElement"    → ["HTML", "Element"]
/// "get_user_name"  → ["get", "user", "name"]
/// "Vector3D"       → ["Vector3", "D"]
/// ```
pub fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for ch in name.chars() {
        if is_separator(ch) {
            flush(&mut words, &mut current);
        } else if ch.is_uppercase()
            && !current.is_empty()
            && !current.ends_with(char::is_uppercase)
        {
            // lower/digit -> upper
            flush(&mut words, &mut current);
            current.push(ch);
        } else if ch.is_lowercase()
            && current.chars().count() > 1
            && current.chars().all(char::is_uppercase)
        {
            // acronym run followed by a word: HTMLElement -> HTML, Element
            if let Some(last) = current.pop() {
                flush(&mut words, &mut current);
                current.push(last);
            }
            current.push(ch);
        } else {
            current.push(ch);
        }
    }

    flush(&mut words, &mut current);
    words
}

fn flush(words: &mut Vec<String>, current: &mut String) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

fn to_camel(name: &str, upper_first: bool) -> String {
    // Leading and trailing underscores mark privacy in both languages, keep them.
    let core = name.trim_matches('_');
    if core.is_empty() {
        return name.to_string();
    }
    let leading = &name[..name.len() - name.trim_start_matches('_').len()];
    let trailing = &name[name.trim_end_matches('_').len()..];

    let mut out = String::with_capacity(name.len());
    out.push_str(leading);
    for (i, word) in split_words(core).iter().enumerate() {
        if i == 0 && !upper_first {
            out.push_str(&word.to_lowercase());
        } else {
            capitalize_into(&mut out, word);
        }
    }
    out.push_str(trailing);
    out
}

fn capitalize_into(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ConventionMode::{AsDeclared, LowerCamelCase, UpperCamelCase};

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("DateTimeFormat"), vec!["Date", "Time", "Format"]);
        assert_eq!(split_words("HTMLElement"), vec!["HTML", "Element"]);
        assert_eq!(split_words("get_user_name"), vec!["get", "user", "name"]);
        assert_eq!(split_words("IOStream"), vec!["IO", "Stream"]);
        assert_eq!(split_words("Vector3D"), vec!["Vector3", "D"]);
        assert_eq!(split_words("utf8-decode"), vec!["utf8", "decode"]);
        assert_eq!(split_words("ID"), vec!["ID"]);
    }

    #[test]
    fn test_as_declared_is_identity() {
        let name = derive_name("GetCultureInfo", MemberKind::Method, AsDeclared).unwrap();
        assert_eq!(name, "GetCultureInfo");
    }

    #[test]
    fn test_lower_camel_case() {
        let lower = |s| derive_name(s, MemberKind::Method, LowerCamelCase).unwrap();
        assert_eq!(lower("DateTimeFormat"), "dateTimeFormat");
        assert_eq!(lower("HTMLElement"), "htmlElement");
        assert_eq!(lower("IOStream"), "ioStream");
        assert_eq!(lower("ID"), "id");
        assert_eq!(lower("get_value"), "getValue");
        assert_eq!(lower("_private"), "_private");
        assert_eq!(lower("alreadyCamel"), "alreadyCamel");
    }

    #[test]
    fn test_upper_camel_case() {
        let upper = |s| derive_name(s, MemberKind::Field, UpperCamelCase).unwrap();
        assert_eq!(upper("dateTimeFormat"), "DateTimeFormat");
        assert_eq!(upper("get_value"), "GetValue");
        assert_eq!(upper("ioStream"), "IoStream");
        assert_eq!(upper("__proto__"), "__Proto__");
    }

    #[test]
    fn test_accessors_derive_from_property_name() {
        let getter =
            derive_name("get_NativeName", MemberKind::PropertyGet, LowerCamelCase).unwrap();
        let setter =
            derive_name("set_NativeName", MemberKind::PropertySet, LowerCamelCase).unwrap();
        let property = derive_name("NativeName", MemberKind::Property, LowerCamelCase).unwrap();
        assert_eq!(getter, "nativeName");
        assert_eq!(setter, property);
    }

    #[test]
    fn test_constructor_metadata_name() {
        let cased = derive_name(".ctor", MemberKind::Constructor, LowerCamelCase).unwrap();
        assert_eq!(cased, "ctor");
    }

    #[test]
    fn test_as_declared_keeps_metadata_prefixes() {
        let ctor = derive_name(".ctor", MemberKind::Constructor, AsDeclared).unwrap();
        let getter = derive_name("get_Name", MemberKind::PropertyGet, AsDeclared).unwrap();
        assert_eq!(ctor, ".ctor");
        assert_eq!(getter, "get_Name");
    }

    #[test]
    fn test_invalid_identifiers() {
        for bad in ["", "has space", "9lives"] {
            let err = derive_name(bad, MemberKind::Method, LowerCamelCase).unwrap_err();
            assert!(matches!(err, NamingError::InvalidIdentifier { ref name, .. } if name == bad));
        }
        // the prefix alone leaves nothing to name
        assert!(derive_name("get_", MemberKind::PropertyGet, LowerCamelCase).is_err());
    }

    proptest! {
        #[test]
        fn prop_derivation_is_deterministic(name in "[A-Za-z_][A-Za-z0-9_]{0,24}") {
            for mode in [AsDeclared, LowerCamelCase, UpperCamelCase] {
                let a = derive_name(&name, MemberKind::Method, mode);
                let b = derive_name(&name, MemberKind::Method, mode);
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn prop_lower_camel_starts_lowercase(name in "[A-Z][a-z]{1,8}([A-Z][a-z]{1,8}){0,3}") {
            let derived = derive_name(&name, MemberKind::Property, LowerCamelCase).unwrap();
            prop_assert!(derived.starts_with(|c: char| c.is_ascii_lowercase()));
            prop_assert_eq!(derived.to_lowercase(), name.to_lowercase());
        }

        #[test]
        fn prop_upper_camel_starts_uppercase(name in "[a-z]{1,8}([A-Z][a-z]{1,8}){0,3}") {
            let derived = derive_name(&name, MemberKind::Method, UpperCamelCase).unwrap();
            prop_assert!(derived.starts_with(|c: char| c.is_ascii_uppercase()));
            prop_assert_eq!(derived.to_lowercase(), name.to_lowercase());
        }
    }
}
