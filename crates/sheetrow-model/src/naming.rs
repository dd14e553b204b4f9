//! Identifier rules shared by code generation and runtime lookup
//!
//! A generated row type is named from its table, and the runtime falls back to
//! matching a row type's name against table names. Both sides must derive
//! names through these functions for the binding to line up.

/// Rust keywords (strict and reserved) that cannot be used as plain identifiers
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Prelude names a generated type must not shadow inside its own module
const PRELUDE_TYPES: &[&str] = &[
    "Box", "Default", "Err", "None", "Ok", "Option", "Result", "Some", "String", "Vec",
];

/// Suffix appended to a type name that would shadow a prelude name
pub const PRELUDE_SUFFIX: &str = "Row";

/// Fallback type name for tables whose name has no usable characters
pub const FALLBACK_TYPE: &str = "Table";

/// Fallback field name for columns whose name has no usable characters
pub const FALLBACK_FIELD: &str = "field";

/// Fallback crate name for an empty output namespace
pub const FALLBACK_CRATE: &str = "sheetrow-generated";

/// Type name for a table: separators stripped, segments capitalized
///
/// `"enemy_stats"`, `"Enemy Stats"` and `"Enemy-Stats"` all become `EnemyStats`.
/// A table named after a prelude type gets a `Row` suffix (`StringRow`).
#[must_use]
pub fn type_name(table_name: &str) -> String {
    let mut name: String = segments(table_name)
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    if name.is_empty() {
        name = FALLBACK_TYPE.to_string();
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, 'T');
    } else if PRELUDE_TYPES.contains(&name.as_str()) {
        name.push_str(PRELUDE_SUFFIX);
    }
    escape_keyword(name)
}

/// Field name for a column: snake case, keyword-safe
///
/// `"HPMax"` becomes `hp_max`, `"ID"` becomes `id`, `"type"` becomes `type_`.
#[must_use]
pub fn field_name(column_name: &str) -> String {
    let mut name = snake_words(column_name).join("_");
    if name.is_empty() {
        name = FALLBACK_FIELD.to_string();
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "f_");
    }
    escape_keyword(name)
}

/// Module name for a generated type (snake case of the type name)
#[inline]
#[must_use]
pub fn module_name(type_name: &str) -> String {
    field_name(type_name)
}

/// Package name for an output namespace
///
/// `"Game.Data.Generated"` becomes `game-data-generated`.
#[must_use]
pub fn crate_name(namespace: &str) -> String {
    let words: Vec<String> = segments(namespace)
        .flat_map(split_humps)
        .collect();
    if words.is_empty() {
        return FALLBACK_CRATE.to_string();
    }
    let name = words.join("-");
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("data-{name}")
    } else {
        name
    }
}

/// Whether a Rust type identifier was generated from the given table name
#[inline]
#[must_use]
pub fn matches_table(type_ident: &str, table_name: &str) -> bool {
    type_name(table_name) == type_ident
}

/// Last path segment of a fully qualified type name, generics stripped
///
/// `"my_crate::rows::Enemies"` becomes `Enemies`.
#[must_use]
pub fn short_type_name(qualified: &str) -> &str {
    let base = qualified.split('<').next().unwrap_or(qualified);
    base.rsplit("::").next().unwrap_or(base)
}

/// Whether `ident` is a Rust keyword
#[inline]
#[must_use]
pub fn is_keyword(ident: &str) -> bool {
    KEYWORDS.contains(&ident)
}

fn escape_keyword(mut ident: String) -> String {
    if is_keyword(&ident) {
        ident.push('_');
    }
    ident
}

fn segments(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
}

fn snake_words(text: &str) -> Vec<String> {
    segments(text).flat_map(split_humps).collect()
}

/// Split one alphanumeric segment on camel-case humps, lowercasing each word
fn split_humps(segment: &str) -> Vec<String> {
    let chars: Vec<char> = segment.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let starts_word = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if starts_word && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
