use crate::protocol::ParseError;
use std::collections::HashMap;
use std::fmt;

/// A parsed origin-form request target: path segments plus query parameters.
///
/// Only origin-form targets are accepted, so the raw string must start with
/// `/`. A single trailing `#` is stripped before any further splitting; a
/// `#` anywhere else is kept verbatim. Query parameters are a key-unique
/// mapping where a duplicate name overwrites the earlier value.
#[derive(Debug, Clone, Default)]
pub struct HttpTarget {
    segments: Vec<String>,
    query: HashMap<String, String>,
}

impl HttpTarget {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.strip_suffix('#').unwrap_or(raw);

        let rest = trimmed
            .strip_prefix('/')
            .ok_or_else(|| ParseError::invalid_target(format!("target must be origin-form, got '{raw}'")))?;

        let (path_part, query_part) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let segments = if path_part.is_empty() {
            Vec::new()
        } else {
            path_part.split('/').map(str::to_string).collect()
        };

        let mut query = HashMap::new();
        if let Some(query_part) = query_part
            && !query_part.is_empty()
        {
            for pair in query_part.split('&') {
                let (name, value) = match pair.split_once('=') {
                    Some((name, value)) => (name, value),
                    None => (pair, ""),
                };
                if name.is_empty() {
                    return Err(ParseError::invalid_target("query parameter with empty name"));
                }
                // last occurrence wins
                query.insert(name.to_string(), value.to_string());
            }
        }

        Ok(Self { segments, query })
    }

    /// The decoded path, reassembled as `"/" + segments.join("/")`.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn query_parameters(&self) -> &HashMap<String, String> {
        &self.query
    }
}

impl fmt::Display for HttpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
