//! Reconstruction of a [`Query`] from a flat node stream.
//!
//! The [`TreeBuilder`] walks the stream front to back with an index cursor.
//! It keeps one facet accumulator and one request buffer; every `Stop` commits
//! either the buffered request or the accumulated facet. No tree is built
//! while parsing, the two levels fall out of the reset discipline alone.
//!
//! A [`Context`] holds everything known about one input file and drives the
//! whole pipeline for it: tokenize, translate, post-process and render.

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::cmip6;
use crate::construct::{Exclusions, Facet, Query, Request};
use crate::error::{Result, SelconvError};
use crate::grammar;
use crate::node::Node;
use crate::render::{self, Format};

pub struct TreeBuilder<'x> {
    exclusions: &'x Exclusions,
    facet: Facet,
    request: Vec<Facet>,
    query: Query,
}

impl<'x> TreeBuilder<'x> {
    pub fn new(exclusions: &'x Exclusions) -> Self {
        Self {
            exclusions,
            facet: Facet::default(),
            request: Vec::new(),
            query: Query::new(),
        }
    }

    /// Consumes the whole stream. Any node the builder cannot interpret, or
    /// a stream that ends with an uncommitted facet or request, is an error.
    pub fn build(mut self, nodes: &[Node]) -> Result<Query> {
        let mut cursor = 0;
        while let Some(node) = nodes.get(cursor) {
            trace!(cursor, %node, "step");
            self.step(node).map_err(|e| match e {
                SelconvError::Invariant(message) => {
                    SelconvError::Invariant(format!("{} (node {} of {})", message, cursor + 1, nodes.len()))
                }
                other => other,
            })?;
            cursor += 1;
        }
        if !self.request.is_empty() || !self.facet.name.is_empty() || !self.facet.values.is_empty() {
            return Err(SelconvError::Invariant(String::from(
                "node stream ended without a closing Stop",
            )));
        }
        Ok(self.query)
    }

    fn step(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Name(name) => {
                self.facet.name = name.clone();
                if self.exclusions.contains(name) {
                    debug!(facet = %name, "excluded facet");
                    self.reset();
                }
            }
            Node::Value(value) => self.facet.values.push(value.clone()),
            Node::RequestStop => {
                // An excluded scope term has lost its name and is dropped here
                // rather than pushed nameless. Exclusion only ever fires on
                // Name events, so realm/frequency/variable are unaffected.
                if !self.facet.name.is_empty() {
                    let facet = self.take();
                    self.push_to_request(facet);
                }
                self.reset();
            }
            Node::Realm(realm) => self.push_to_request(Facet::new("realm", [realm.as_str()])),
            Node::Frequency(frequency) => self.push_to_request(Facet::new("frequency", [frequency.as_str()])),
            Node::Variable => {
                self.facet.name = String::from("variable");
                let facet = self.take();
                self.push_to_request(facet);
            }
            Node::Stop => {
                if !self.request.is_empty() {
                    let request = Request::new(std::mem::take(&mut self.request));
                    self.query.requests.push(request);
                } else if !self.facet.name.is_empty() {
                    let facet = self.take();
                    report_duplicates(&facet);
                    self.query.facets.push(facet);
                }
                self.reset();
            }
            Node::Null => {
                return Err(SelconvError::Invariant(String::from("Null node in stream")));
            }
        }
        Ok(())
    }

    fn push_to_request(&mut self, facet: Facet) {
        report_duplicates(&facet);
        self.request.push(facet);
    }

    fn take(&mut self) -> Facet {
        std::mem::take(&mut self.facet)
    }

    fn reset(&mut self) {
        self.facet = Facet::default();
    }
}

fn report_duplicates(facet: &Facet) {
    let duplicates = facet.duplicates();
    if !duplicates.is_empty() {
        warn!(facet = %facet.name, ?duplicates, "duplicate values");
    }
}

/// Builds a query from an already tokenized stream.
pub fn translate(nodes: &[Node], exclusions: &Exclusions) -> Result<Query> {
    TreeBuilder::new(exclusions).build(nodes)
}

// ------------- Context -------------
/// Working state for one input file. Contexts share nothing mutable, so any
/// number of them can be processed on separate threads.
#[derive(Debug)]
pub struct Context {
    pub path: PathBuf,
    pub success: bool,
    pub nodes: Vec<Node>,
    pub query: Query,
    parsed: bool,
    translated: bool,
    postprocessed: bool,
}

impl Context {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            success: false,
            nodes: Vec::new(),
            query: Query::new(),
            parsed: false,
            translated: false,
            postprocessed: false,
        }
    }

    /// Tokenizes the whole text, discarding any earlier translation. On a
    /// grammar mismatch the context is marked failed and keeps no nodes.
    pub fn parse(&mut self, text: &str) -> Result<()> {
        self.parsed = true;
        self.query = Query::new();
        self.translated = false;
        self.postprocessed = false;
        match grammar::tokenize(text) {
            Ok(nodes) => {
                self.nodes = nodes;
                self.success = true;
                Ok(())
            }
            Err(e) => {
                self.nodes.clear();
                self.success = false;
                Err(e)
            }
        }
    }

    pub fn translate(&mut self, exclusions: &Exclusions) -> Result<&Query> {
        if !self.parsed || !self.success {
            return Err(SelconvError::Invariant(format!(
                "{} has no successfully parsed node stream",
                self.path.display()
            )));
        }
        match translate(&self.nodes, exclusions) {
            Ok(query) => {
                self.query = query;
                self.translated = true;
                self.postprocessed = false;
                Ok(&self.query)
            }
            Err(e) => {
                self.query = Query::new();
                self.translated = false;
                self.success = false;
                Err(e)
            }
        }
    }

    /// Applies the CMIP6 renaming when the query targets CMIP6. Runs at most
    /// once per translation; returns whether the rename was applied.
    pub fn postprocess(&mut self) -> Result<bool> {
        if !self.translated || !self.success {
            return Err(SelconvError::Invariant(format!("{} was not translated", self.path.display())));
        }
        if self.postprocessed {
            return Ok(false);
        }
        self.postprocessed = true;
        let applied = cmip6::postprocess(&mut self.query);
        if applied {
            debug!(path = %self.path.display(), "applied CMIP6 facet names");
        }
        Ok(applied)
    }

    /// Renders the query. An empty query yields [`SelconvError::EmptyResult`]
    /// and nothing should be persisted for it.
    pub fn render(&self, format: Format) -> Result<String> {
        if !self.translated || !self.success {
            return Err(SelconvError::Invariant(format!("{} was not translated", self.path.display())));
        }
        render::render(&self.query, format)?.ok_or(SelconvError::EmptyResult)
    }

    /// Runs the full pipeline over `text`.
    pub fn process(&mut self, text: &str, exclusions: &Exclusions, format: Format) -> Result<String> {
        self.parse(text)?;
        self.translate(exclusions)?;
        self.postprocess()?;
        self.render(format)
    }
}
