//! Column type vocabulary
//!
//! Provides [`FieldType`], the semantic type a column's tag maps to. The
//! mapping is total: every tag resolves to exactly one type and anything
//! unrecognized becomes [`FieldType::String`].

use std::fmt::{self, Display, Formatter};

/// Prefix that turns a scalar tag into a list tag (`list_int`, `list_color`, ...)
pub const LIST_PREFIX: &str = "list_";

/// Semantic type of a column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FieldType {
    /// Text, also the fallback for unknown tags
    #[default]
    String,

    /// Signed integer
    Int,

    /// Floating-point number
    Float,

    /// Boolean (`true`, compared case-insensitively)
    Bool,

    /// Two-component float vector
    Vector2,

    /// Three-component float vector
    Vector3,

    /// RGBA color
    Color,

    /// Ordered sequence of a scalar type
    List(Box<FieldType>),
}

impl FieldType {
    /// Resolve a column type tag
    ///
    /// Tags are trimmed and compared case-insensitively. `list_<T>` maps to a
    /// list of `T`; list elements are always scalar, so a nested list tag such
    /// as `list_list_int` yields a list of strings.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_ascii_lowercase();
        match normalized.strip_prefix(LIST_PREFIX) {
            Some(inner) => Self::List(Box::new(Self::scalar(inner).unwrap_or_default())),
            None => Self::scalar(&normalized).unwrap_or_default(),
        }
    }

    fn scalar(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "vector2" => Some(Self::Vector2),
            "vector3" => Some(Self::Vector3),
            "color" => Some(Self::Color),
            _ => None,
        }
    }

    /// Canonical tag for this type
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::List(inner) => format!("{LIST_PREFIX}{}", inner.tag()),
            scalar => scalar.scalar_tag().to_string(),
        }
    }

    fn scalar_tag(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Vector2 => "vector2",
            Self::Vector3 => "vector3",
            Self::Color => "color",
            Self::List(_) => "list",
        }
    }

    /// Whether this is a list type
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Element type for lists, the type itself otherwise
    #[inline]
    #[must_use]
    pub fn element(&self) -> &FieldType {
        match self {
            Self::List(inner) => inner,
            other => other,
        }
    }

    /// All scalar types, in vocabulary order
    #[must_use]
    pub fn scalars() -> &'static [FieldType] {
        &[
            FieldType::String,
            FieldType::Int,
            FieldType::Float,
            FieldType::Bool,
            FieldType::Vector2,
            FieldType::Vector3,
            FieldType::Color,
        ]
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_tags_map_to_types() {
        assert_eq!(FieldType::from_tag("string"), FieldType::String);
        assert_eq!(FieldType::from_tag("int"), FieldType::Int);
        assert_eq!(FieldType::from_tag("float"), FieldType::Float);
        assert_eq!(FieldType::from_tag("bool"), FieldType::Bool);
        assert_eq!(FieldType::from_tag("vector2"), FieldType::Vector2);
        assert_eq!(FieldType::from_tag("vector3"), FieldType::Vector3);
        assert_eq!(FieldType::from_tag("color"), FieldType::Color);
    }

    #[test]
    fn tags_are_case_insensitive() {
        assert_eq!(FieldType::from_tag("INT"), FieldType::Int);
        assert_eq!(FieldType::from_tag(" Vector3 "), FieldType::Vector3);
        assert_eq!(
            FieldType::from_tag("List_Float"),
            FieldType::List(Box::new(FieldType::Float))
        );
    }

    #[test]
    fn unknown_tags_fall_back_to_string() {
        assert_eq!(FieldType::from_tag("fooType"), FieldType::String);
        assert_eq!(FieldType::from_tag("enum"), FieldType::String);
        assert_eq!(FieldType::from_tag(""), FieldType::String);
    }

    #[test]
    fn list_tags_map_their_element() {
        assert_eq!(
            FieldType::from_tag("list_int"),
            FieldType::List(Box::new(FieldType::Int))
        );
        assert_eq!(
            FieldType::from_tag("list_vector2"),
            FieldType::List(Box::new(FieldType::Vector2))
        );
        assert_eq!(
            FieldType::from_tag("list_whatever"),
            FieldType::List(Box::new(FieldType::String))
        );
    }

    #[test]
    fn nested_list_tags_flatten_to_string_elements() {
        let ty = FieldType::from_tag("list_list_int");
        assert_eq!(ty, FieldType::List(Box::new(FieldType::String)));
    }

    #[test]
    fn element_of_scalar_is_itself() {
        assert_eq!(FieldType::Int.element(), &FieldType::Int);
        assert_eq!(FieldType::from_tag("list_bool").element(), &FieldType::Bool);
        assert!(FieldType::from_tag("list_bool").is_list());
        assert!(!FieldType::Bool.is_list());
    }

    #[test]
    fn display_uses_canonical_tag() {
        assert_eq!(FieldType::from_tag("LIST_COLOR").to_string(), "list_color");
        assert_eq!(FieldType::from_tag("mystery").to_string(), "string");
    }

    proptest! {
        #[test]
        fn canonical_tags_round_trip(index in 0usize..7, list in any::<bool>()) {
            let scalar = FieldType::scalars()[index].clone();
            let ty = if list { FieldType::List(Box::new(scalar)) } else { scalar };
            prop_assert_eq!(FieldType::from_tag(&ty.tag()), ty);
        }

        #[test]
        fn any_tag_resolves(tag in ".*") {
            let ty = FieldType::from_tag(&tag);
            prop_assert!(!ty.element().is_list());
        }
    }
}
