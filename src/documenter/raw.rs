use super::{write_required, Documenter, RenderContext, RenderOptions};
use crate::error::Result;
use crate::extractor::{Endpoint, TriggerType};
use crate::serializer::serialize_json;
use log::{debug, warn};

/// Field-for-field JSON dump of the endpoints.
pub struct RawDocumenter;

impl Documenter for RawDocumenter {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn extension(&self) -> &'static str {
        ".json"
    }

    fn supports(&self, _trigger_type: TriggerType) -> bool {
        true
    }

    fn serialize_one(&self, endpoint: &Endpoint, _context: &RenderContext) -> Result<String> {
        serialize_json(endpoint)
    }

    fn serialize_all(&self, endpoints: &[Endpoint], options: &RenderOptions) -> bool {
        let context = RenderContext::new();

        if options.separate_files {
            // function names are not unique; a later duplicate overwrites the file
            for endpoint in endpoints {
                let content = match self.serialize_one(endpoint, &context) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Skipping endpoint {}: {}", endpoint.name, e);
                        continue;
                    }
                };
                let path = options.output_file(&endpoint.name, self.extension());
                if !write_required(self.name(), &content, &path) {
                    return false;
                }
            }
            debug!("Wrote {} raw endpoint files", endpoints.len());
            return true;
        }

        let rendered: Vec<String> = endpoints
            .iter()
            .filter_map(|endpoint| match self.serialize_one(endpoint, &context) {
                Ok(content) => Some(content),
                Err(e) => {
                    warn!("Skipping endpoint {}: {}", endpoint.name, e);
                    None
                }
            })
            .collect();
        let content = if rendered.is_empty() {
            "[]".to_string()
        } else {
            format!("[\n{}\n]", rendered.join(",\n"))
        };

        let path = options.output_file(&options.collection_name, self.extension());
        write_required(self.name(), &content, &path)
    }
}
