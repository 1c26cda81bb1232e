/// An insertion-ordered, case-insensitive, multi-valued header map.
///
/// Lookups always compare names case-insensitively. The stored casing is
/// whatever the writer used: the request decoder lower-cases names before
/// insertion, response-side code keeps the casing it was given and the
/// encoder emits entries in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value without touching existing entries with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Sets a single value, replacing every existing entry with the same
    /// name. The first occurrence keeps its position in the emit order.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter().position(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(index) => {
                self.entries[index] = (name.clone(), value);
                let mut kept_first = false;
                self.entries.retain(|(n, _)| {
                    if n.eq_ignore_ascii_case(&name) {
                        !std::mem::replace(&mut kept_first, true)
                    } else {
                        true
                    }
                });
            }
            None => self.entries.push((name, value)),
        }
    }

    /// The first value stored under `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries.iter().filter(move |(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered cookie name/value pairs.
#[derive(Debug, Clone, Default)]
pub struct Cookies {
    entries: Vec<(String, String)>,
}

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `Cookie` request header value: `name=value` pairs separated
    /// by `;`. Pairs without a name are skipped.
    pub fn parse(header_value: &str) -> Self {
        let mut cookies = Self::new();
        for pair in header_value.split(';') {
            let pair = pair.trim();
            if let Some((name, value)) = pair.split_once('=')
                && !name.is_empty()
            {
                cookies.append(name, value);
            }
        }
        cookies
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut headers = Headers::new();
        headers.append("Content-Type", "text/plain");
        assert_eq!(headers.get("content-type"), Some("text/plain"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(headers.contains("Content-type"));
    }

    #[test]
    fn test_append_keeps_multiple_values() {
        let mut headers = Headers::new();
        headers.append("accept", "text/html");
        headers.append("Accept", "application/json");
        assert_eq!(headers.get("accept"), Some("text/html"));
        assert_eq!(headers.get_all("accept").count(), 2);
    }

    #[test]
    fn test_set_replaces_all_occurrences() {
        let mut headers = Headers::new();
        headers.append("x-first", "1");
        headers.append("Vary", "Accept");
        headers.append("vary", "Accept-Language");
        headers.set("Vary", "Accept-Encoding");

        assert_eq!(headers.get_all("vary").count(), 1);
        assert_eq!(headers.get("vary"), Some("Accept-Encoding"));
        // order preserved: replaced entry stays in its original slot
        let names: Vec<_> = headers.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, vec!["x-first", "Vary"]);
    }

    #[test]
    fn test_remove() {
        let mut headers = Headers::new();
        headers.append("ETag", "\"abc\"");
        headers.remove("etag");
        assert!(headers.is_empty());
    }

    #[test]
    fn test_cookie_parse() {
        let cookies = Cookies::parse("session=abc123; theme=dark; =skipme; bare");
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies.get("session"), Some("abc123"));
        assert_eq!(cookies.get("theme"), Some("dark"));
    }
}
