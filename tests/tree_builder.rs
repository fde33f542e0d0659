use selconv::SelconvError;
use selconv::construct::{Exclusions, Facet, Query, Request, exclusions};
use selconv::grammar::tokenize;
use selconv::node::Node;
use selconv::translate::translate;

fn build(text: &str, excluded: &Exclusions) -> Query {
    let nodes = tokenize(text).expect("parse ok");
    translate(&nodes, excluded).expect("translate ok")
}

fn facet(name: &str, values: &[&str]) -> Facet {
    Facet::new(name, values.iter().copied())
}

#[test]
fn basic_line_gives_one_root_facet() {
    let query = build("project=CMIP5,CORDEX", &Exclusions::default());
    assert_eq!(query.facets, vec![Facet::new("project", ["CMIP5", "CORDEX"])]);
    assert!(query.requests.is_empty());
}

#[test]
fn frequency_bracket_gives_one_request() {
    let query = build("variable[Amon]=tas", &Exclusions::default());
    assert!(query.facets.is_empty());
    assert_eq!(query.requests, vec![Request::new(vec![facet("frequency", &["Amon"]), facet("variable", &["tas"])])]);
}

#[test]
fn realm_and_frequency_brackets_give_one_request() {
    let query = build("variable[ocean][Omon]=tos,thetao", &Exclusions::default());
    assert_eq!(
        query.requests,
        vec![Request::new(vec![
            facet("realm", &["ocean"]),
            facet("frequency", &["Omon"]),
            facet("variable", &["tos", "thetao"]),
        ])]
    );
}

#[test]
fn named_bracket_scopes_the_request() {
    let query = build("variable[priority=10900]=tas", &Exclusions::default());
    assert_eq!(query.requests, vec![Request::new(vec![facet("priority", &["10900"]), facet("variable", &["tas"])])]);
}

#[test]
fn mixed_file_keeps_root_facets_and_requests_apart() {
    let text = "\
# a selection
project=CMIP6
experiment_id=historical,ssp585
variable[Amon]=tas,pr
variable[ocean][Omon]=tos
source_id=*
";
    let query = build(text, &Exclusions::default());
    let names: Vec<&str> = query.facets.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["project", "experiment_id", "source_id"]);
    assert_eq!(query.requests.len(), 2);
    for request in &query.requests {
        assert_eq!(request.facets.last().map(|f| f.name.as_str()), Some("variable"));
    }
}

#[test]
fn excluded_facet_is_dropped_wherever_it_appears() {
    let excluded = exclusions(["project"]);
    for text in [
        "project=CMIP6\nmodel=IPSL\n",
        "model=IPSL\nproject=CMIP6\n",
        "model=IPSL\nproject=CMIP6\nvariable[Amon]=tas\n",
    ] {
        let query = build(text, &excluded);
        assert!(query.facets.iter().all(|f| f.name != "project"), "{text}");
        assert_eq!(query.facets, vec![Facet::new("model", ["IPSL"])], "{text}");
    }
}

#[test]
fn excluded_scope_name_leaves_the_variable_request() {
    let query = build("variable[priority=10900]=tas", &exclusions(["priority"]));
    assert_eq!(query.requests, vec![Request::new(vec![facet("variable", &["tas"])])]);
}

#[test]
fn exclusion_does_not_touch_structural_names() {
    let query = build("variable[atmos][Amon]=tas", &exclusions(["realm", "frequency", "variable"]));
    assert_eq!(
        query.requests,
        vec![Request::new(vec![
            facet("realm", &["atmos"]),
            facet("frequency", &["Amon"]),
            facet("variable", &["tas"]),
        ])]
    );
}

#[test]
fn duplicate_values_are_kept() {
    let query = build("model=IPSL,IPSL,CNRM", &Exclusions::default());
    assert_eq!(query.facets[0].values, vec!["IPSL", "IPSL", "CNRM"]);
    assert_eq!(query.facets[0].duplicates(), vec!["IPSL"]);
}

#[test]
fn comment_only_file_gives_empty_query() {
    let query = build("# nothing here\n\n#\n", &Exclusions::default());
    assert!(query.is_empty());
}

#[test]
fn null_node_is_an_invariant_violation() {
    let nodes = vec![Node::Name("project".into()), Node::Null, Node::Stop];
    let err = translate(&nodes, &Exclusions::default()).unwrap_err();
    match err {
        SelconvError::Invariant(message) => assert!(message.contains("node 2 of 3"), "{message}"),
        other => panic!("expected an invariant violation, got {other:?}"),
    }
}

#[test]
fn unterminated_stream_is_an_invariant_violation() {
    let nodes = vec![Node::Frequency("Amon".into()), Node::Value("tas".into()), Node::Variable];
    assert!(matches!(translate(&nodes, &Exclusions::default()), Err(SelconvError::Invariant(_))));
}

#[test]
fn handmade_stream_builds_the_same_tree() {
    let nodes = vec![
        Node::Name("project".into()),
        Node::Value("CMIP6".into()),
        Node::Stop,
        Node::Realm("atmos".into()),
        Node::Frequency("day".into()),
        Node::Value("pr".into()),
        Node::Variable,
        Node::Stop,
    ];
    let query = translate(&nodes, &Exclusions::default()).expect("translate ok");
    assert_eq!(query, build("project=CMIP6\nvariable[atmos][day]=pr\n", &Exclusions::default()));
}
