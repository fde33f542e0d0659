//! Selconv – converts legacy selection files into structured queries.
//!
//! A selection file describes data-retrieval criteria as flat `name=value`
//! lines plus bracketed `variable[...]` declarations:
//!
//! ```text
//! # my selection
//! project=CMIP6
//! experiment_id=historical,ssp585
//! variable[Amon]=tas,pr
//! variable[ocean][Omon]=tos
//! variable[priority=10900]=zg
//! ```
//!
//! The conversion is a one way pipeline:
//! * [`grammar`] – scans the text with a pest grammar and flattens it into a
//!   stream of [`node::Node`] events. One malformed line rejects the file.
//! * [`translate`] – the [`translate::TreeBuilder`] replays the stream and
//!   recovers a [`construct::Query`]: root-level facets plus per-variable
//!   requests. A [`translate::Context`] drives the pipeline for one file.
//! * [`cmip6`] – renames `frequency`/`variable` to `table_id`/`variable_id`
//!   when the query targets CMIP6.
//! * [`render`] – the canonical indented text form (or JSON).
//!
//! Around the core, [`settings`] loads configuration, [`persist`] reads
//! inputs and writes outputs, and [`interface`] converts a batch of files on
//! a pool of worker threads with per-file failure isolation.
//!
//! ## Quick Start
//! ```
//! use selconv::construct::exclusions;
//! use selconv::render::Format;
//! use selconv::translate::Context;
//!
//! let mut context = Context::new("example.txt");
//! let text = "project=CMIP6\nvariable[Amon]=tas\n";
//! let rendered = context.process(text, &exclusions(["priority"]), Format::Text).unwrap();
//! assert_eq!(rendered, "project: \"CMIP6\"\nrequests:\n  table_id: \"Amon\"\n    variable_id: \"tas\"\n");
//! ```

pub mod cmip6;
pub mod construct;
pub mod error;
pub mod grammar;
pub mod interface;
pub mod node;
pub mod persist;
pub mod render;
pub mod settings;
pub mod translate;

pub use error::{Result, SelconvError};
