use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::utils::split_ranges;

/// A single `;name[=value]` parameter.
///
/// Names and values are stored as written. Quoted values keep their quotes.
/// An empty name is legal here so that surplus separators such as `;;;;`
/// survive a parse and serialize cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: Option<String>,
}

impl Param {
    pub fn new(name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        Param {
            name: name.into(),
            value: value.map(Into::into),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            value: None,
        }
    }

    fn parse(segment: &str) -> Self {
        match segment.split_once('=') {
            Some((name, value)) => Param {
                name: name.trim().to_string(),
                value: Some(value.trim().to_string()),
            },
            None => Param::flag(segment.trim()),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// Ordered parameter list used by URIs, addresses, Via and media types.
///
/// Lookups are case-insensitive on the name; order and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Params(Vec<Param>);

impl Params {
    pub fn new() -> Self {
        Params(Vec::new())
    }

    /// Parse a parameter run such as `;tag=1;lr`.
    ///
    /// The input must be empty or begin with `;`. Separators inside quoted
    /// values are not treated as parameter boundaries.
    pub fn parse(input: &str) -> Option<Params> {
        let input = input.trim();
        if input.is_empty() {
            return Some(Params::new());
        }
        let rest = input.strip_prefix(';')?;
        let params = split_ranges(rest, b';')
            .into_iter()
            .map(|range| Param::parse(&rest[range]))
            .collect();
        Some(Params(params))
    }

    /// Value of the first parameter with this name. Flags yield `Some("")`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.value.as_deref().unwrap_or(""))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn push(&mut self, param: Param) {
        self.0.push(param);
    }

    /// Replace the value of an existing parameter, or append it.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        match self.0.iter_mut().find(|p| p.name.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.value = value.map(str::to_string),
            None => self.0.push(Param::new(name, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for param in &self.0 {
            write!(f, ";{}", param)?;
        }
        Ok(())
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Params(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lookup() {
        let params = Params::parse(";tag=134161461246;LR; expires = 60").unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("tag"), Some("134161461246"));
        assert_eq!(params.get("lr"), Some(""));
        assert_eq!(params.get("Expires"), Some("60"));
        assert_eq!(params.get("branch"), None);
        assert_eq!(params.to_string(), ";tag=134161461246;LR;expires=60");
    }

    #[test]
    fn test_surplus_separators_round_trip() {
        let params = Params::parse(";;;;").unwrap();
        assert_eq!(params.len(), 4);
        assert_eq!(params.to_string(), ";;;;");
    }

    #[test]
    fn test_quoted_value_with_semicolon() {
        let params = Params::parse(r#";text="a;b";x"#).unwrap();
        assert_eq!(params.get("text"), Some(r#""a;b""#));
        assert!(params.contains("x"));
    }

    #[test]
    fn test_requires_leading_semicolon() {
        assert!(Params::parse("tag=1").is_none());
        assert!(Params::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn test_set() {
        let mut params = Params::new();
        params.set("branch", Some("z9hG4bK1"));
        params.set("BRANCH", Some("z9hG4bK2"));
        params.set("rport", None);
        assert_eq!(params.to_string(), ";branch=z9hG4bK2;rport");
    }
}
