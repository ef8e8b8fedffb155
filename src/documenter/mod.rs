//! Output formats for discovered endpoints.
//!
//! Every format implements [`Documenter`]. The set of formats is closed and
//! enumerated by [`DocumenterKind`].
//!
//! # Example
//!
//! ```no_run
//! use endpoint_documenter::documenter::{DocumenterKind, RenderOptions};
//! use endpoint_documenter::extractor::EndpointExtractor;
//! use std::path::{Path, PathBuf};
//!
//! let endpoints = EndpointExtractor::new().extract_file(Path::new("Api/HttpTriggers.cs"));
//! let options = RenderOptions::new("my-api", PathBuf::from("out"));
//! let documenter = DocumenterKind::Bruno.documenter();
//! assert!(documenter.serialize_all(&endpoints, &options));
//! ```

pub mod bruno;
pub mod insomnia;
pub mod markdown;
pub mod raw;

use crate::error::{Error, Result};
use crate::extractor::{Endpoint, TriggerType};
use crate::serializer::write_to_file;
use log::error;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Renders endpoint records into one external collection or documentation format.
pub trait Documenter {
    /// Short identifier, also used as the output sub-directory name.
    fn name(&self) -> &'static str;

    /// File extension of the files this format writes, including the dot.
    fn extension(&self) -> &'static str;

    /// Whether endpoints of this trigger type are rendered at all.
    fn supports(&self, trigger_type: TriggerType) -> bool;

    /// Renders a single endpoint.
    fn serialize_one(&self, endpoint: &Endpoint, context: &RenderContext) -> Result<String>;

    /// Writes the whole collection to `options.output_dir`.
    ///
    /// Endpoints that fail to render are logged and skipped. Returns `false`
    /// when a required file cannot be written.
    fn serialize_all(&self, endpoints: &[Endpoint], options: &RenderOptions) -> bool;
}

/// Caller-supplied parameters of one `serialize_all` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub collection_name: String,
    pub output_dir: PathBuf,
    /// One file per endpoint instead of a single combined file, where the
    /// format allows both.
    pub separate_files: bool,
    /// Environment variables written into the collection, e.g. `host`.
    pub env_vars: BTreeMap<String, String>,
}

impl RenderOptions {
    pub fn new(collection_name: impl Into<String>, output_dir: PathBuf) -> Self {
        Self {
            collection_name: collection_name.into(),
            output_dir,
            separate_files: false,
            env_vars: BTreeMap::new(),
        }
    }

    pub fn with_separate_files(mut self, separate_files: bool) -> Self {
        self.separate_files = separate_files;
        self
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Path of a file named `stem + extension` inside the output directory.
    pub fn output_file(&self, stem: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}{}", stem, extension))
    }
}

/// Per-run rendering state.
///
/// A fresh context is created by every `serialize_all` call, so sequence
/// numbers restart at 1 for each batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// 1-based position of the endpoint among the rendered ones.
    pub sequence: usize,
    /// Milliseconds since the Unix epoch, shared by the whole run.
    pub timestamp: i64,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::at(chrono::Utc::now().timestamp_millis())
    }

    pub fn at(timestamp: i64) -> Self {
        Self {
            sequence: 1,
            timestamp,
        }
    }

    /// Zero-based ordering key matching `sequence`.
    pub fn sort_key(&self) -> usize {
        self.sequence - 1
    }

    pub fn advance(&mut self) {
        self.sequence += 1;
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumenterKind {
    /// Lossless JSON dump of every endpoint
    Raw,
    /// Single summary table
    Markdown,
    /// Bruno collection directory
    Bruno,
    /// Insomnia v5 collection file
    Insomnia,
}

impl DocumenterKind {
    pub const ALL: [DocumenterKind; 4] = [
        DocumenterKind::Raw,
        DocumenterKind::Markdown,
        DocumenterKind::Bruno,
        DocumenterKind::Insomnia,
    ];

    pub fn documenter(&self) -> Box<dyn Documenter> {
        match self {
            DocumenterKind::Raw => Box::new(raw::RawDocumenter),
            DocumenterKind::Markdown => Box::new(markdown::MarkdownDocumenter),
            DocumenterKind::Bruno => Box::new(bruno::BrunoDocumenter),
            DocumenterKind::Insomnia => Box::new(insomnia::InsomniaDocumenter),
        }
    }
}

impl FromStr for DocumenterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.documenter().name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedDocumenter(s.to_string()))
    }
}

/// Writes a required output file, logging the failure under the documenter's name.
pub(crate) fn write_required(documenter: &str, content: &str, path: &Path) -> bool {
    match write_to_file(content, path) {
        Ok(()) => true,
        Err(e) => {
            error!("{} documenter - {:#}", documenter, e);
            false
        }
    }
}
