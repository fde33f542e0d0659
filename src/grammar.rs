//! Grammar driven tokenizer for selection files.
//!
//! The grammar itself lives in `selection.pest`. Parsing is all-or-nothing:
//! a single line that matches none of the productions fails the whole text,
//! and no nodes are produced for it.
//!
//! | Source line                   | Emitted nodes                                                   |
//! |-------------------------------|-----------------------------------------------------------------|
//! | `name=v1,v2`                  | `Name`, `Value`, `Value`, `Stop`                                |
//! | `variable[Freq]=v1`           | `Frequency`, `Value`, `Variable`, `Stop`                        |
//! | `variable[name=value]=v1`     | `Name`, `Value`, `RequestStop`, `Value`, `Variable`, `Stop`     |
//! | `variable[Realm][Freq]=v1`    | `Realm`, `Frequency`, `Value`, `Variable`, `Stop`               |

use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use tracing::debug;

use crate::error::{Result, SelconvError};
use crate::node::Node;

#[derive(Parser)]
#[grammar = "selection.pest"]
pub struct SelectionParser;

/// Scans `text` and flattens it into an ordered node stream.
pub fn tokenize(text: &str) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut statements = 0usize;
    let pairs = SelectionParser::parse(Rule::selection, text)?;
    for selection in pairs {
        for statement in selection.into_inner() {
            match statement.as_rule() {
                Rule::facet => {
                    emit_terms(statement, &mut nodes)?;
                    nodes.push(Node::Stop);
                }
                Rule::variable_double | Rule::variable_scoped | Rule::variable_frequency => {
                    emit_terms(statement, &mut nodes)?;
                    nodes.push(Node::Variable);
                    nodes.push(Node::Stop);
                }
                Rule::EOI => continue,
                rule => {
                    return Err(SelconvError::Invariant(format!("unexpected grammar rule {:?}", rule)));
                }
            }
            statements += 1;
        }
    }
    debug!(statements, nodes = nodes.len(), "tokenized selection");
    Ok(nodes)
}

fn emit_terms(statement: Pair<Rule>, nodes: &mut Vec<Node>) -> Result<()> {
    for term in statement.into_inner() {
        match term.as_rule() {
            Rule::scope => {
                emit_terms(term, nodes)?;
                nodes.push(Node::RequestStop);
            }
            Rule::name => nodes.push(Node::Name(term.as_str().to_string())),
            Rule::value => nodes.push(Node::Value(term.as_str().to_string())),
            Rule::realm => nodes.push(Node::Realm(term.as_str().to_string())),
            Rule::frequency => nodes.push(Node::Frequency(term.as_str().to_string())),
            rule => {
                return Err(SelconvError::Invariant(format!("unexpected term {:?} in statement", rule)));
            }
        }
    }
    Ok(())
}
