//! Parse events emitted by the tokenizer.
//!
//! A selection file is flattened into an ordered stream of [`Node`]s that
//! carries no tree structure of its own. The structure is recovered later by
//! the tree builder in [`crate::translate`], purely from the position of
//! `Stop` and `RequestStop` events in the stream.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Node {
    /// Never emitted by the tokenizer; seeing one is an invariant violation.
    #[default]
    Null,
    /// Ends a line.
    Stop,
    /// Ends the `[name=value]` term that scopes a request.
    RequestStop,
    Name(String),
    Value(String),
    Realm(String),
    Frequency(String),
    /// Closes the values of a `variable[...]` line.
    Variable,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Null => write!(f, "Null"),
            Node::Stop => write!(f, "Stop"),
            Node::RequestStop => write!(f, "RequestStop"),
            Node::Name(s) => write!(f, "Name({})", s),
            Node::Value(s) => write!(f, "Value({})", s),
            Node::Realm(s) => write!(f, "Realm({})", s),
            Node::Frequency(s) => write!(f, "Frequency({})", s),
            Node::Variable => write!(f, "Variable"),
        }
    }
}
