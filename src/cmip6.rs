//! CMIP6 facet naming.
//!
//! CMIP6 calls the frequency of a variable its `table_id` and the variable
//! itself `variable_id`. Queries that target CMIP6 get those names; values
//! are left alone.

use crate::construct::Query;

pub const GENERATION: &str = "CMIP6";

/// Root level facets whose values decide the data-model generation.
pub const DETECTING_FACETS: [&str; 2] = ["project", "mip_era"];

pub const RENAMES: [(&str, &str); 2] = [("frequency", "table_id"), ("variable", "variable_id")];

pub fn is_cmip6(query: &Query) -> bool {
    DETECTING_FACETS
        .iter()
        .any(|name| query.facets_named(name).any(|facet| facet.has_value(GENERATION)))
}

/// Renames facets everywhere in the query. Applying it twice is a no-op.
pub fn rename(query: &mut Query) {
    for facet in query.all_facets_mut() {
        if let Some((_, canonical)) = RENAMES.iter().find(|(old, _)| *old == facet.name) {
            facet.name = canonical.to_string();
        }
    }
}

/// Renames only when the query targets CMIP6, returning whether it did.
pub fn postprocess(query: &mut Query) -> bool {
    let detected = is_cmip6(query);
    if detected {
        rename(query);
    }
    detected
}
