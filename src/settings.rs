//! Runtime settings.
//!
//! Settings are layered with the `config` crate: embedded defaults first, then
//! an optional TOML file, then `SELCONV_*` environment variables, then any
//! overrides the caller applies (the command line, for the binary).
//!
//! ```toml
//! exclude = ["priority", "protocol"]
//! output_extension = "yaml"
//! input_extension = "txt"
//! workers = 4
//! overwrite = false
//! format = "text"
//! ```

use std::path::Path;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, ValueKind};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::construct::{self, Exclusions};
use crate::error::{Result, SelconvError};
use crate::render::Format;

const DEFAULT_TOML: &str = r#"
exclude = []
workers = 0
overwrite = true
format = "text"
"#;

pub const ENV_PREFIX: &str = "SELCONV";

lazy_static! {
    // same alphabet as a facet name in the grammar
    static ref FACET_NAME: Regex = Regex::new(r"^[A-Za-z0-9_*-]+$").unwrap();
    static ref EXTENSION: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Defaults to the extension matching `format`.
    #[serde(default)]
    pub output_extension: Option<String>,
    /// When set, inputs with any other extension are skipped.
    #[serde(default)]
    pub input_extension: Option<String>,
    /// Zero picks one worker per available CPU.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "overwrite_default")]
    pub overwrite: bool,
    #[serde(default)]
    pub format: Format,
}

fn overwrite_default() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            output_extension: None,
            input_extension: None,
            workers: 0,
            overwrite: true,
            format: Format::default(),
        }
    }
}

impl Settings {
    pub fn exclusions(&self) -> Exclusions {
        construct::exclusions(self.exclude.iter().cloned())
    }

    pub fn output_extension(&self) -> &str {
        self.output_extension.as_deref().unwrap_or_else(|| self.format.extension_hint())
    }

    pub fn worker_count(&self) -> usize {
        match self.workers {
            0 => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            n => n,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.exclude.iter().find(|name| !FACET_NAME.is_match(name)) {
            return Err(SelconvError::Config(format!("'{}' can never name a facet", name)));
        }
        for extension in self.output_extension.iter().chain(self.input_extension.iter()) {
            if !EXTENSION.is_match(extension) {
                return Err(SelconvError::Config(format!("'{}' is not a valid file extension", extension)));
            }
        }
        Ok(())
    }
}

/// Layers configuration sources over the embedded defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
    extra_exclusions: Vec<String>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder, extra_exclusions: Vec::new() }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `SELCONV_*` variables; `SELCONV_EXCLUDE` is a comma separated list.
    pub fn with_env(self) -> Self {
        self.with_env_prefix(ENV_PREFIX)
    }

    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        let source = Environment::with_prefix(prefix)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("exclude");
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Facet names excluded on top of whatever the sources configure.
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_exclusions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Finalize the builder, then deserialize and validate the settings.
    pub fn build(self) -> Result<Settings> {
        let mut settings: Settings = self.builder.build()?.try_deserialize()?;
        for name in self.extra_exclusions {
            if !settings.exclude.contains(&name) {
                settings.exclude.push(name);
            }
        }
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
