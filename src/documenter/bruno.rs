//! Bruno collection output.
//!
//! A Bruno collection is a directory: one `.bru` request file per endpoint,
//! a `bruno.json` manifest and an `environments/local.bru` variables file.
//!
//! ```text
//! meta {
//!   name: GetAsync
//!   type: http
//!   seq: 1
//! }
//!
//! get {
//!   url: {{host}}/sandbox/:moduleId
//!   body: json
//!   auth: inherit
//! }
//!
//! params:path {
//!   moduleId:
//! }
//! ```

use super::{write_required, Documenter, RenderContext, RenderOptions};
use crate::error::{Error, Result};
use crate::extractor::{Endpoint, TriggerType};
use crate::path_vars::{host_url, path_parameters_with_fragments};
use crate::serializer::{serialize_json, write_to_file};
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MANIFEST_FILE: &str = "bruno.json";
const ENVIRONMENT_DIR: &str = "environments";
const ENVIRONMENT_FILE: &str = "local.bru";

/// Contents of `bruno.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrunoCollection {
    pub version: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

impl BrunoCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: "1".to_string(),
            name: name.into(),
            kind: "collection".to_string(),
            ignore: vec!["node_modules".to_string(), ".git".to_string()],
        }
    }
}

pub struct BrunoDocumenter;

impl BrunoDocumenter {
    /// Renders the `vars` block of an environment file.
    pub fn render_environment(env_vars: &BTreeMap<String, String>) -> String {
        let mut out = String::from("vars {\n");
        for (key, value) in env_vars {
            out.push_str(&format!("  {}: {}\n", key, value));
        }
        out.push('}');
        out
    }
}

impl Documenter for BrunoDocumenter {
    fn name(&self) -> &'static str {
        "bruno"
    }

    fn extension(&self) -> &'static str {
        ".bru"
    }

    fn supports(&self, trigger_type: TriggerType) -> bool {
        trigger_type == TriggerType::Http
    }

    /// Only the first HTTP method is rendered.
    fn serialize_one(&self, endpoint: &Endpoint, context: &RenderContext) -> Result<String> {
        if !self.supports(endpoint.trigger_type) {
            return Err(Error::UnsupportedTrigger {
                endpoint: endpoint.name.clone(),
                documenter: self.name().to_string(),
            });
        }
        let method = endpoint
            .methods
            .first()
            .ok_or_else(|| Error::MissingMethod(endpoint.name.clone()))?
            .to_lowercase();

        let mut out = format!(
            "meta {{\n  name: {}\n  type: http\n  seq: {}\n}}\n\n\
             {} {{\n  url: {}\n  body: json\n  auth: inherit\n}}\n",
            endpoint.name,
            context.sequence,
            method,
            host_url(&endpoint.route)
        );

        let params = path_parameters_with_fragments(&endpoint.route);
        if !params.is_empty() {
            out.push_str("\nparams:path {\n");
            for (name, fragment) in params.iter() {
                out.push_str(&format!("  {}: {}\n", name, fragment));
            }
            out.push_str("}\n");
        }

        Ok(out)
    }

    /// `separate_files` is ignored: Bruno always keeps one file per request.
    fn serialize_all(&self, endpoints: &[Endpoint], options: &RenderOptions) -> bool {
        let mut context = RenderContext::new();

        for endpoint in endpoints.iter().filter(|e| self.supports(e.trigger_type)) {
            let content = match self.serialize_one(endpoint, &context) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Skipping endpoint {}: {}", endpoint.name, e);
                    continue;
                }
            };
            // function names are not unique; a later duplicate overwrites the file
            let path = options.output_file(&endpoint.name, self.extension());
            if !write_required(self.name(), &content, &path) {
                return false;
            }
            context.advance();
        }
        debug!("Wrote {} bruno requests", context.sort_key());

        let manifest = match serialize_json(&BrunoCollection::new(&options.collection_name)) {
            Ok(manifest) => manifest,
            Err(e) => {
                error!("bruno documenter - Error encoding collection manifest: {}", e);
                return false;
            }
        };
        if !write_required(self.name(), &manifest, &options.output_dir.join(MANIFEST_FILE)) {
            return false;
        }

        // the collection is usable without an environment file
        let env_path = options.output_dir.join(ENVIRONMENT_DIR).join(ENVIRONMENT_FILE);
        if let Err(e) = write_to_file(&Self::render_environment(&options.env_vars), &env_path) {
            warn!("bruno documenter - Error writing environment file: {:#}", e);
        }

        true
    }
}
