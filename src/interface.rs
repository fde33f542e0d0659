//! Threaded batch interface for converting many selection files.
//!
//! Every input path gets its own [`Context`] and its own [`Report`]. Workers
//! pull paths from a shared cursor, so a slow or failing file never holds up
//! or spoils the others. The only state shared between workers is the
//! read-only exclusion set and the cancellation token.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};

use tracing::{info, warn};

use crate::construct::Exclusions;
use crate::error::SelconvError;
use crate::persist;
use crate::settings::Settings;
use crate::translate::Context;

/// Cancellation token shared with the worker threads.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);
impl CancelToken {
    pub fn new() -> Self { Self::default() }
    pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst); }
    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}

/// Where successful renderings go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sink {
    /// Written next to the input, under the substituted extension.
    #[default]
    Files,
    /// Handed back in the report, nothing touches the disk.
    Collect,
}

#[derive(Debug)]
pub enum Outcome {
    Written(PathBuf),
    Collected(String),
    /// Parsed fine but held no facets and no requests.
    Empty,
    Failed(SelconvError),
    Skipped(String),
    Cancelled,
}

#[derive(Debug)]
pub struct Report {
    pub path: PathBuf,
    pub outcome: Outcome,
}
impl Report {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed(_))
    }
}

pub struct Batch {
    settings: Settings,
    exclusions: Exclusions,
    sink: Sink,
    cancel: CancelToken,
}

impl Batch {
    pub fn new(settings: Settings) -> Self {
        let exclusions = settings.exclusions();
        Self { settings, exclusions, sink: Sink::default(), cancel: CancelToken::new() }
    }

    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Converts every path and returns one report per path, in input order.
    pub fn run(&self, paths: &[PathBuf]) -> Vec<Report> {
        let shadowed = self.shadowed_outputs(paths);
        let workers = self.settings.worker_count().min(paths.len()).max(1);
        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel();
        std::thread::scope(|scope| {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                let shadowed = &shadowed;
                scope.spawn(move || {
                    loop {
                        let index = next.fetch_add(1, Ordering::SeqCst);
                        let Some(path) = paths.get(index) else { break };
                        let outcome = if self.cancel.is_cancelled() {
                            Outcome::Cancelled
                        } else if shadowed[index] {
                            warn!(path = %path.display(), "output already claimed by an earlier input");
                            Outcome::Skipped(String::from("output already claimed by an earlier input"))
                        } else {
                            self.convert(path)
                        };
                        if tx.send((index, Report { path: path.clone(), outcome })).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(tx);
        let mut reports: Vec<Option<Report>> = paths.iter().map(|_| None).collect();
        for (index, report) in rx {
            reports[index] = Some(report);
        }
        reports.into_iter().flatten().collect()
    }

    /// Flags every path whose output an earlier path in the batch already
    /// maps to, so no two workers ever write the same file.
    fn shadowed_outputs(&self, paths: &[PathBuf]) -> Vec<bool> {
        let mut claimed = HashSet::new();
        paths
            .iter()
            .map(|path| match self.claimed_output(path) {
                Some(output) => !claimed.insert(output),
                None => false,
            })
            .collect()
    }

    fn claimed_output(&self, path: &Path) -> Option<PathBuf> {
        if self.sink == Sink::Collect {
            return None;
        }
        if let Some(extension) = &self.settings.input_extension {
            if !persist::has_extension(path, extension) {
                return None;
            }
        }
        Some(persist::output_path(path, self.settings.output_extension()))
    }

    /// Converts a single file on the current thread.
    pub fn convert(&self, path: &Path) -> Outcome {
        if let Some(extension) = &self.settings.input_extension {
            if !persist::has_extension(path, extension) {
                info!(path = %path.display(), "skipping, not a .{} file", extension);
                return Outcome::Skipped(format!("not a .{} file", extension));
            }
        }
        let text = match persist::read_input(path) {
            Ok(text) => text,
            Err(e) => return failed(path, e),
        };
        let mut context = Context::new(path);
        let rendered = match context.process(&text, &self.exclusions, self.settings.format) {
            Ok(rendered) => rendered,
            Err(e) if e.is_informational() => {
                info!(path = %path.display(), "no facets or requests, nothing written");
                return Outcome::Empty;
            }
            Err(e) => return failed(path, e),
        };
        match self.sink {
            Sink::Collect => Outcome::Collected(rendered),
            Sink::Files => {
                let output = persist::output_path(path, self.settings.output_extension());
                if output == path {
                    warn!(path = %path.display(), "output path equals the input path");
                    return Outcome::Skipped(String::from("output would replace the input"));
                }
                match persist::write_output(&output, &rendered, self.settings.overwrite) {
                    Ok(()) => {
                        info!(path = %path.display(), output = %output.display(), "converted");
                        Outcome::Written(output)
                    }
                    Err(e) => failed(path, e),
                }
            }
        }
    }
}

fn failed(path: &Path, error: SelconvError) -> Outcome {
    warn!(path = %path.display(), %error, "conversion failed");
    Outcome::Failed(error)
}
