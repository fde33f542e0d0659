use selconv::cmip6::{is_cmip6, postprocess, rename};
use selconv::construct::{Exclusions, Facet, Query, Request};
use selconv::render::Format;
use selconv::translate::Context;

fn cmip6_query() -> Query {
    Query {
        facets: vec![Facet::new("project", ["CMIP6"])],
        requests: vec![Request::new(vec![Facet::new("frequency", ["Amon"]), Facet::new("variable", ["tas"])])],
    }
}

#[test]
fn rename_applies_to_requests_and_is_idempotent() {
    let mut query = cmip6_query();
    assert!(postprocess(&mut query));
    let expected = Request::new(vec![Facet::new("table_id", ["Amon"]), Facet::new("variable_id", ["tas"])]);
    assert_eq!(query.requests, vec![expected.clone()]);
    rename(&mut query);
    assert_eq!(query.requests, vec![expected]);
    assert_eq!(query.facets, vec![Facet::new("project", ["CMIP6"])]);
}

#[test]
fn root_facets_are_renamed_too() {
    let mut query = Query {
        facets: vec![Facet::new("mip_era", ["CMIP6"]), Facet::new("frequency", ["mon", "day"]), Facet::new("variable", ["pr"])],
        requests: Vec::new(),
    };
    assert!(is_cmip6(&query));
    postprocess(&mut query);
    let names: Vec<&str> = query.facets.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["mip_era", "table_id", "variable_id"]);
    assert_eq!(query.facets[1].values, vec!["mon", "day"]);
}

#[test]
fn cmip6_is_detected_among_several_values() {
    let query = Query { facets: vec![Facet::new("project", ["CMIP5", "CMIP6"])], requests: Vec::new() };
    assert!(is_cmip6(&query));
}

#[test]
fn other_generations_are_left_alone() {
    let mut query = Query {
        facets: vec![Facet::new("project", ["CMIP5"]), Facet::new("model", ["CMIP6"])],
        requests: vec![Request::new(vec![Facet::new("frequency", ["mon"]), Facet::new("variable", ["tas"])])],
    };
    let before = query.clone();
    assert!(!is_cmip6(&query));
    assert!(!postprocess(&mut query));
    assert_eq!(query, before);
}

#[test]
fn detection_only_looks_at_root_facets() {
    let query = Query {
        facets: Vec::new(),
        requests: vec![Request::new(vec![Facet::new("project", ["CMIP6"]), Facet::new("variable", ["tas"])])],
    };
    assert!(!is_cmip6(&query));
}

#[test]
fn context_postprocesses_at_most_once() {
    let mut context = Context::new("cmip6.txt");
    context.parse("project=CMIP6\nvariable[Amon]=tas\n").expect("parse ok");
    context.translate(&Exclusions::default()).expect("translate ok");
    assert!(context.postprocess().expect("postprocess ok"));
    assert!(!context.postprocess().expect("second postprocess ok"));
    let rendered = context.render(Format::Text).expect("render ok");
    assert_eq!(rendered, "project: \"CMIP6\"\nrequests:\n  table_id: \"Amon\"\n    variable_id: \"tas\"\n");
}

#[test]
fn postprocess_before_translate_is_rejected() {
    let mut context = Context::new("early.txt");
    assert!(context.postprocess().is_err());
}
