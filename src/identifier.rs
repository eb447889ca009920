//! Identifier handling for the Snowflake SQL dialect.
//!
//! Snowflake knows two spellings for object names: bare identifiers, which
//! are case-insensitive and restricted to a small character set, and quoted
//! identifiers, which are case-sensitive and may contain anything as long as
//! embedded quotes are doubled. Everything in this module reduces to one
//! rule: two names refer to the same object exactly when their quoted
//! canonical forms are byte-for-byte equal.

const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Whether `name` is a valid bare (unquoted) identifier.
pub fn is_valid_unquoted_identifier(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Whether `name` is a valid quoted identifier, i.e. wrapped in double
/// quotes with every interior quote doubled.
pub fn is_valid_quoted_identifier(name: &str) -> bool {
    let inner = match name
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) if name.len() >= 2 => inner,
        _ => return false,
    };
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '"' && chars.next() != Some('"') {
            return false;
        }
    }
    true
}

/// Whether `name` is usable as an identifier in either spelling.
pub fn is_valid_identifier(name: &str) -> bool {
    is_valid_unquoted_identifier(name) || is_valid_quoted_identifier(name)
}

/// Returns `name` unchanged if it is already a valid identifier, otherwise
/// wraps it in quotes so it can be safely interpolated into SQL text.
pub fn to_identifier(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_owned()
    } else {
        to_quoted_identifier(name)
    }
}

/// Forces the quoted spelling. An input that is already a valid quoted
/// identifier is returned untouched; re-wrapping it would change which
/// object it names.
pub fn to_quoted_identifier(name: &str) -> String {
    if is_valid_quoted_identifier(name) {
        name.to_owned()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Undoes quoting: strips the wrapping quotes and collapses doubled quotes,
/// or uppercases a bare identifier (bare names are implicitly uppercase).
pub fn unquote_identifier(identifier: &str) -> String {
    if is_valid_quoted_identifier(identifier) {
        identifier[1..identifier.len() - 1].replace("\"\"", "\"")
    } else {
        identifier.to_ascii_uppercase()
    }
}

/// Whether two identifiers refer to the same object.
///
/// Bare identifiers are uppercased before comparison; quoted identifiers
/// are compared exactly as written. A bare identifier and a quoted one
/// match when the uppercased-and-quoted bare form equals the quoted one.
pub fn same_identifier(id1: &str, id2: &str) -> bool {
    to_quoted_identifier(&canonicalize(id1)) == to_quoted_identifier(&canonicalize(id2))
}

fn canonicalize(id: &str) -> String {
    if is_valid_unquoted_identifier(id) {
        id.to_ascii_uppercase()
    } else {
        id.to_owned()
    }
}

/// Renders an identifier as the pattern argument of a `show <objects> like`
/// statement: resolved to its bare meaning, with the LIKE wildcards `_` and
/// `%` escaped, wrapped in single quotes.
pub fn identifier_to_show_like_pattern(identifier: &str) -> String {
    let pattern = unquote_identifier(identifier)
        .replace('_', "\\\\_")
        .replace('%', "\\\\%");
    format!("'{pattern}'")
}

/// Renders arbitrary text as a SQL string literal.
pub fn to_string_literal(raw: &str) -> String {
    let escaped = raw.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// A possibly-qualified object name: `name`, `schema.name`, or
/// `database.schema.name`. Quoted parts may contain dots.
///
/// Two-part names keep their qualifier in [`Fqn::schema`]; what that
/// qualifier actually is (schema or database) depends on the statement the
/// name is used in, which is why [`Fqn::prefix`] exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fqn {
    database: Option<String>,
    schema: Option<String>,
    name: String,
}

impl Fqn {
    pub fn parse(text: &str) -> Fqn {
        let mut parts = split_qualified_name(text);
        let name = parts.pop().unwrap_or_default();
        let schema = parts.pop();
        let database = if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        };
        Fqn {
            database,
            schema,
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// The qualifier immediately preceding the name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.schema.as_deref().or(self.database.as_deref())
    }
}

fn split_qualified_name(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                current.push_str("\"\"");
            }
            '"' => {
                in_quotes = !in_quotes;
                current.push('"');
            }
            '.' if !in_quotes => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}
