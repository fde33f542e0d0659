//! Canonical text form of a query.
//!
//! ```text
//! project: "CMIP6"
//! experiment_id: "historical,ssp585"
//! requests:
//!   table_id: "Amon"
//!     variable_id: "tas,pr"
//! ```
//!
//! Root facets come first, one per line. Each request is headed by its first
//! facet, indented two spaces, with its remaining facets indented four.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::construct::{Facet, Query};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    pub fn extension_hint(&self) -> &'static str {
        match self {
            Format::Text => "yaml",
            Format::Json => "json",
        }
    }
}

impl FromStr for Format {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format '{}', expected 'text' or 'json'", other)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Json => write!(f, "json"),
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: \"{}\"", self.name, self.values.join(","))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for facet in &self.facets {
            writeln!(f, "{}", facet)?;
        }
        if !self.requests.is_empty() {
            writeln!(f, "requests:")?;
            for request in &self.requests {
                let mut facets = request.facets.iter();
                if let Some(header) = facets.next() {
                    writeln!(f, "  {}", header)?;
                }
                for facet in facets {
                    writeln!(f, "    {}", facet)?;
                }
            }
        }
        Ok(())
    }
}

/// Renders `query`, or returns `None` when it is empty and nothing should be
/// persisted.
pub fn render(query: &Query, format: Format) -> Result<Option<String>> {
    if query.is_empty() {
        return Ok(None);
    }
    let rendered = match format {
        Format::Text => query.to_string(),
        Format::Json => serde_json::to_string_pretty(query)? + "\n",
    };
    Ok(Some(rendered))
}
