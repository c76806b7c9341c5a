//! City-name suggestions for the search box.

use std::sync::Arc;

/// Inputs shorter than this (after trimming) produce no suggestions.
pub const MIN_QUERY_LEN: usize = 2;

/// Upper bound on the number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 8;

const DEFAULT_CITIES: &[&str] = &[
    "Amsterdam", "Athens", "Atlanta", "Auckland", "Bangkok", "Barcelona", "Beijing", "Berlin",
    "Bogota", "Boston", "Brussels", "Budapest", "Buenos Aires", "Cairo", "Cape Town", "Chicago",
    "Copenhagen", "Dallas", "Delhi", "Denver", "Dubai", "Dublin", "Edinburgh", "Frankfurt",
    "Geneva", "Hamburg", "Helsinki", "Hong Kong", "Honolulu", "Houston", "Istanbul", "Jakarta",
    "Johannesburg", "Kyiv", "Lagos", "Lima", "Lisbon", "London", "Los Angeles", "Madrid",
    "Manchester", "Manila", "Melbourne", "Mexico City", "Miami", "Milan", "Montreal", "Moscow",
    "Mumbai", "Munich", "Nairobi", "New York", "Oslo", "Paris", "Prague", "Rio de Janeiro",
    "Rome", "San Francisco", "Santiago", "Sao Paulo", "Seattle", "Seoul", "Shanghai", "Singapore",
    "Sparta", "Stockholm", "Sydney", "Taipei", "Tokyo", "Toronto", "Vancouver", "Vienna",
    "Warsaw", "Washington", "Zurich",
];

/// The fixed list of known city names used for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    cities: Arc<[String]>,
}

impl Catalog {
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { cities: cities.into_iter().map(Into::into).collect() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DEFAULT_CITIES.iter().copied())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    lowered: String,
}

/// Ranks catalog entries against partial input: prefix matches first, then
/// substring matches, catalog order preserved within each group.
#[derive(Debug, Clone)]
pub struct SuggestionMatcher {
    entries: Arc<[Entry]>,
}

impl SuggestionMatcher {
    pub fn new(catalog: &Catalog) -> Self {
        let entries = catalog
            .iter()
            .map(|name| Entry { name: name.to_string(), lowered: name.to_lowercase() })
            .collect();
        Self { entries }
    }

    pub fn suggest(&self, input: &str) -> Vec<String> {
        let trimmed = input.trim();
        if trimmed.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let needle = trimmed.to_lowercase();
        let (prefix, substring): (Vec<&Entry>, Vec<&Entry>) = self
            .entries
            .iter()
            .filter(|e| e.lowered.contains(&needle))
            .partition(|e| e.lowered.starts_with(&needle));

        prefix
            .into_iter()
            .chain(substring)
            .take(MAX_SUGGESTIONS)
            .map(|e| e.name.clone())
            .collect()
    }
}

/// Highlighted position in a suggestion list, with circular navigation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    index: Option<usize>,
    len: usize,
}

impl Highlight {
    /// Start over for a list of `len` suggestions; the first one is highlighted.
    pub fn reset(len: usize) -> Self {
        Self { index: (len > 0).then_some(0), len }
    }

    pub fn next(self) -> Self {
        match self.index {
            Some(i) => Self { index: Some((i + 1) % self.len), ..self },
            None => self,
        }
    }

    pub fn prev(self) -> Self {
        match self.index {
            Some(i) => Self { index: Some((i + self.len - 1) % self.len), ..self },
            None => self,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn selected<'a>(&self, suggestions: &'a [String]) -> Option<&'a str> {
        self.index.and_then(|i| suggestions.get(i)).map(String::as_str)
    }
}
