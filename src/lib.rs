//! Endpoint Documenter - API client collections from annotated function sources.
//!
//! This library scans source files of function-trigger projects for the
//! attributes that declare each function (`[Function("Name")]`), its trigger
//! (`[HttpTrigger(..)]`, `[TimerTrigger(..)]`, ...) and its authentication
//! requirements, and renders the discovered endpoints into several formats.
//!
//! # Supported Formats
//!
//! - **Raw**: lossless JSON, one file per endpoint or a single array
//! - **Markdown**: a summary table of every function
//! - **Bruno**: a collection directory with one request file per endpoint
//! - **Insomnia**: a single v5 collection file with a base environment
//!
//! # Architecture
//!
//! 1. [`scanner`] - Recursively scans a repository for source files
//! 2. [`host_config`] - Resolves per-project route prefixes from `host.json`
//! 3. [`extractor`] - Extracts one endpoint record per annotated function
//! 4. [`path_vars`] - Rewrites and inspects `{name}` route placeholders
//! 5. [`documenter`] - Renders endpoints into the output formats
//! 6. [`serializer`] - JSON/YAML encoding and file writing
//!
//! # Example Usage
//!
//! ```no_run
//! use endpoint_documenter::{
//!     documenter::{DocumenterKind, RenderOptions},
//!     extractor::EndpointExtractor,
//!     scanner::FileScanner,
//! };
//! use std::path::PathBuf;
//!
//! let scan_result = FileScanner::new(PathBuf::from("./functions")).scan().unwrap();
//!
//! let extractor = EndpointExtractor::new();
//! let endpoints: Vec<_> = scan_result
//!     .source_files
//!     .iter()
//!     .flat_map(|file| extractor.extract_file(file))
//!     .collect();
//!
//! let options = RenderOptions::new("functions", PathBuf::from("./docs"))
//!     .with_env_var("host", "http://localhost:7071");
//! DocumenterKind::Insomnia.documenter().serialize_all(&endpoints, &options);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod documenter;
pub mod error;
pub mod extractor;
pub mod host_config;
pub mod path_vars;
pub mod scanner;
pub mod serializer;
