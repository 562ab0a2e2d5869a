//! Column header parsing
//!
//! Fixture files carry their own ad hoc schema in the header row: a column
//! named `position(int)` holds integers, `roles(dict)` holds a JSON literal,
//! and a bare `first_name` holds text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coercion declared by a column header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Raw text, passed through unchanged
    String,
    /// Base-10 signed integer
    Int,
    /// Finite floating point value
    Float,
    /// Non-empty text is true, empty text is false
    Bool,
    /// JSON literal (object, array or scalar)
    Dict,
}

impl TypeTag {
    /// All recognized tags
    pub const ALL: [TypeTag; 5] = [
        TypeTag::String,
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::Bool,
        TypeTag::Dict,
    ];

    /// Looks up a tag by its exact header spelling.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(TypeTag::String),
            "int" => Some(TypeTag::Int),
            "float" => Some(TypeTag::Float),
            "bool" => Some(TypeTag::Bool),
            "dict" => Some(TypeTag::Dict),
            _ => None,
        }
    }

    /// Header spelling of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Dict => "dict",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed column header: field name plus the coercion to apply.
///
/// Parsing never fails. A header without a `(...)` suffix is a string
/// column, and so is one whose tag is not recognized; the declared text is
/// kept so callers can warn about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    name: String,
    type_tag: TypeTag,
    declared: Option<String>,
}

impl ColumnHeader {
    /// Splits `name(tag)` into its parts.
    ///
    /// The split only happens when the header contains `(` and ends with
    /// `)`; the name is everything before the first `(`.
    pub fn parse(header: &str) -> Self {
        match header.strip_suffix(')').and_then(|h| h.split_once('(')) {
            Some((name, tag)) => Self {
                name: name.to_string(),
                type_tag: TypeTag::from_tag(tag).unwrap_or(TypeTag::String),
                declared: Some(tag.to_string()),
            },
            None => Self {
                name: header.to_string(),
                type_tag: TypeTag::String,
                declared: None,
            },
        }
    }

    /// Field name with the type suffix removed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective coercion for this column
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    /// Tag text as written in the header, if any
    pub fn declared_tag(&self) -> Option<&str> {
        self.declared.as_deref()
    }

    /// False when the header declared a tag that fell back to string
    pub fn is_recognized(&self) -> bool {
        self.declared
            .as_deref()
            .map_or(true, |tag| TypeTag::from_tag(tag).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_recognized_tag_splits() {
        for tag in TypeTag::ALL {
            let header = ColumnHeader::parse(&format!("age({})", tag));
            assert_eq!(header.name(), "age");
            assert_eq!(header.type_tag(), tag);
            assert!(header.is_recognized());
        }
    }

    #[test]
    fn test_plain_header_defaults_to_string() {
        let header = ColumnHeader::parse("first_name");
        assert_eq!(header.name(), "first_name");
        assert_eq!(header.type_tag(), TypeTag::String);
        assert_eq!(header.declared_tag(), None);
        assert!(header.is_recognized());
    }

    #[test]
    fn test_unrecognized_tag_falls_back() {
        let header = ColumnHeader::parse("start(datetime)");
        assert_eq!(header.name(), "start");
        assert_eq!(header.type_tag(), TypeTag::String);
        assert_eq!(header.declared_tag(), Some("datetime"));
        assert!(!header.is_recognized());
    }

    #[test]
    fn test_tags_are_case_sensitive() {
        let header = ColumnHeader::parse("position(INT)");
        assert_eq!(header.type_tag(), TypeTag::String);
        assert!(!header.is_recognized());
    }

    #[test]
    fn test_paren_without_closing_suffix_is_plain() {
        let header = ColumnHeader::parse("note(int) extra");
        assert_eq!(header.name(), "note(int) extra");
        assert_eq!(header.type_tag(), TypeTag::String);

        let header = ColumnHeader::parse("weird)");
        assert_eq!(header.name(), "weird)");
    }

    #[test]
    fn test_empty_tag() {
        let header = ColumnHeader::parse("x()");
        assert_eq!(header.name(), "x");
        assert_eq!(header.declared_tag(), Some(""));
        assert_eq!(header.type_tag(), TypeTag::String);
    }
}
