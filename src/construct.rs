use core::hash::BuildHasherDefault;
use std::collections::HashSet;

use seahash::SeaHasher;
use serde::{Deserialize, Serialize};

pub type FacetHasher = BuildHasherDefault<SeaHasher>;

/// Facet names to silently drop while building a query.
pub type Exclusions = HashSet<String, FacetHasher>;

pub fn exclusions<I, S>(names: I) -> Exclusions
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

// ------------- Facet -------------
/// A named, multi-valued filter term. Values keep their declared order and
/// duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub name: String,
    pub values: Vec<String>,
}

impl Facet {
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
    /// Values that occur more than once, each listed once in first-seen order.
    pub fn duplicates(&self) -> Vec<&str> {
        let mut duplicates: Vec<&str> = Vec::new();
        for (i, value) in self.values.iter().enumerate() {
            if self.values[..i].contains(value) && !duplicates.contains(&value.as_str()) {
                duplicates.push(value);
            }
        }
        duplicates
    }
}

// ------------- Request -------------
/// A variable scoped sub-query. The last facet is always the variable itself,
/// preceded by the facets that scope it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Request {
    pub facets: Vec<Facet>,
}

impl Request {
    pub fn new(facets: Vec<Facet>) -> Self {
        Self { facets }
    }
}

// ------------- Query -------------
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub facets: Vec<Facet>,
    pub requests: Vec<Request>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty() && self.requests.is_empty()
    }
    /// Root level facets with the given name.
    pub fn facets_named<'q>(&'q self, name: &'q str) -> impl Iterator<Item = &'q Facet> + 'q {
        self.facets.iter().filter(move |facet| facet.name == name)
    }
    /// Every facet in the query, root level first, then request by request.
    pub fn all_facets_mut(&mut self) -> impl Iterator<Item = &mut Facet> {
        self.facets
            .iter_mut()
            .chain(self.requests.iter_mut().flat_map(|request| request.facets.iter_mut()))
    }
}
