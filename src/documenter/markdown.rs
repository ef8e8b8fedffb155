use super::{write_required, Documenter, RenderContext, RenderOptions};
use crate::error::Result;
use crate::extractor::{Endpoint, TriggerType};
use log::warn;

const HEADER: &str = "| Name | Methods | Route | Authentication | TriggerType | Interval | Description |";
const SEPARATOR: &str = "| ---------- | ---------- | ---------- | ---------- | ---------- | ---------- | ---------- |";

/// Single summary table with one row per endpoint.
pub struct MarkdownDocumenter;

impl Documenter for MarkdownDocumenter {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extension(&self) -> &'static str {
        ".md"
    }

    fn supports(&self, _trigger_type: TriggerType) -> bool {
        true
    }

    fn serialize_one(&self, endpoint: &Endpoint, _context: &RenderContext) -> Result<String> {
        Ok(format!(
            "| {} | {} | {} | {} | {} | {} | {} |",
            endpoint.name,
            endpoint.methods.join(", "),
            endpoint.route,
            endpoint.authentication.join(", "),
            endpoint.trigger_type,
            endpoint.interval.replace('*', "\\*"),
            endpoint.description
        ))
    }

    /// Always writes one `<collection>.md`; `separate_files` and `env_vars`
    /// have no meaning for a table.
    fn serialize_all(&self, endpoints: &[Endpoint], options: &RenderOptions) -> bool {
        let context = RenderContext::new();
        let mut table = format!("{}\n{}\n", HEADER, SEPARATOR);

        for endpoint in endpoints {
            match self.serialize_one(endpoint, &context) {
                Ok(row) => {
                    table.push_str(&row);
                    table.push('\n');
                }
                Err(e) => warn!("Skipping endpoint {}: {}", endpoint.name, e),
            }
        }

        let path = options.output_file(&options.collection_name, self.extension());
        write_required(self.name(), &table, &path)
    }
}
