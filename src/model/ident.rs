//! Splitting endpoint identifiers into their display parts.
//!
//! Endpoint ids usually look like a Java-style qualified name followed by an
//! instance suffix, e.g. `org.flexiblepower.Battery.42`. The node shows the
//! package, the short name and the suffix on separate lines.

use std::sync::LazyLock;

use regex::Regex;

/// `package.` segments in lowercase, a letters-only name, then `.suffix`.
static QUALIFIED_WITH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((?:[a-z]+\.)*)([a-zA-Z]+)(?:\.([^\.]+))$").expect("valid regex")
});

/// Any dot-separated path; the last segment is the name.
static DOTTED_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:[^\.]+\.)*)([^\.]+)$").expect("valid regex"));

/// Display parts of an endpoint id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EndpointIdent {
    /// Package path including its trailing dot, or empty.
    pub package: String,
    pub name: String,
    /// Instance suffix, empty when the id has none.
    pub unique_id: String,
}

impl EndpointIdent {
    pub fn parse(id: &str) -> Self {
        if let Some(caps) = QUALIFIED_WITH_SUFFIX.captures(id) {
            return Self {
                package: caps[1].to_string(),
                name: caps[2].to_string(),
                unique_id: caps.get(3).map(|m| m.as_str().to_string()).unwrap_or_default(),
            };
        }

        if let Some(caps) = DOTTED_PATH.captures(id) {
            return Self {
                package: caps[1].to_string(),
                name: caps[2].to_string(),
                unique_id: String::new(),
            };
        }

        Self {
            package: String::new(),
            name: id.to_string(),
            unique_id: String::new(),
        }
    }
}
