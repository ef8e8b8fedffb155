//! Insomnia v5 collection output.
//!
//! All HTTP endpoints go into a single `<collection>.yaml` together with a
//! base environment holding the supplied variables. The workspace itself is
//! always named `Scratch Pad`; only the file name carries the collection name.

use super::{write_required, Documenter, RenderContext, RenderOptions};
use crate::error::{Error, Result};
use crate::extractor::{Endpoint, TriggerType};
use crate::path_vars::{host_url, path_parameters_with_fragments};
use crate::serializer::serialize_yaml;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const COLLECTION_TYPE: &str = "collection.insomnia.rest/5.0";

/// Workspace name Insomnia expects when importing without being logged in.
pub const WORKSPACE_NAME: &str = "Scratch Pad";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsomniaCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub meta: InsomniaMeta,
    pub collection: Vec<InsomniaRequest>,
    // a single object despite the plural key
    pub environments: InsomniaEnvironment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsomniaMeta {
    pub id: String,
    pub created: i64,
    pub modified: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsomniaRequest {
    pub url: String,
    pub name: String,
    pub meta: InsomniaMeta,
    pub method: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_parameters: Vec<InsomniaPathParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsomniaPathParameter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsomniaEnvironment {
    pub name: String,
    pub meta: InsomniaMeta,
    pub data: BTreeMap<String, String>,
}

/// Generates a unique identifier such as `req_1b4e28ba2fa1417d9b1e8e3c6f1e1a2b`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

pub struct InsomniaDocumenter;

impl InsomniaDocumenter {
    /// Builds the collection entry of one HTTP endpoint.
    pub fn request(&self, endpoint: &Endpoint, context: &RenderContext) -> Result<InsomniaRequest> {
        if !self.supports(endpoint.trigger_type) {
            return Err(Error::UnsupportedTrigger {
                endpoint: endpoint.name.clone(),
                documenter: self.name().to_string(),
            });
        }
        // only the first method is documented
        let method = endpoint
            .methods
            .first()
            .ok_or_else(|| Error::MissingMethod(endpoint.name.clone()))?
            .to_uppercase();

        let path_parameters = path_parameters_with_fragments(&endpoint.route)
            .iter()
            .map(|(name, value)| InsomniaPathParameter {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect();

        Ok(InsomniaRequest {
            url: host_url(&endpoint.route),
            name: endpoint.name.clone(),
            meta: InsomniaMeta {
                id: generate_id("req"),
                created: context.timestamp,
                modified: context.timestamp,
                is_private: Some(false),
                sort_key: Some(context.sort_key()),
            },
            method,
            path_parameters,
        })
    }
}

impl Documenter for InsomniaDocumenter {
    fn name(&self) -> &'static str {
        "insomnia"
    }

    fn extension(&self) -> &'static str {
        ".yaml"
    }

    fn supports(&self, trigger_type: TriggerType) -> bool {
        trigger_type == TriggerType::Http
    }

    fn serialize_one(&self, endpoint: &Endpoint, context: &RenderContext) -> Result<String> {
        serialize_yaml(&self.request(endpoint, context)?)
    }

    /// `separate_files` is ignored: Insomnia imports a single collection file.
    fn serialize_all(&self, endpoints: &[Endpoint], options: &RenderOptions) -> bool {
        let mut context = RenderContext::new();
        let mut requests = Vec::with_capacity(endpoints.len());

        for endpoint in endpoints.iter().filter(|e| self.supports(e.trigger_type)) {
            match self.request(endpoint, &context) {
                Ok(request) => {
                    requests.push(request);
                    context.advance();
                }
                Err(e) => warn!("Skipping endpoint {}: {}", endpoint.name, e),
            }
        }

        let collection = InsomniaCollection {
            kind: COLLECTION_TYPE.to_string(),
            name: WORKSPACE_NAME.to_string(),
            meta: InsomniaMeta {
                id: generate_id("wrk"),
                created: context.timestamp,
                modified: context.timestamp,
                is_private: None,
                sort_key: None,
            },
            collection: requests,
            environments: InsomniaEnvironment {
                name: "Base Environment".to_string(),
                meta: InsomniaMeta {
                    id: generate_id("env"),
                    created: context.timestamp,
                    modified: context.timestamp,
                    is_private: Some(false),
                    sort_key: None,
                },
                data: options.env_vars.clone(),
            },
        };

        let content = match serialize_yaml(&collection) {
            Ok(content) => content,
            Err(e) => {
                error!("insomnia documenter - Error encoding collection: {}", e);
                return false;
            }
        };

        let path = options.output_file(&options.collection_name, self.extension());
        write_required(self.name(), &content, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn http_endpoint(name: &str, method: &str, route: &str) -> Endpoint {
        let mut endpoint = Endpoint::named(name);
        endpoint.trigger_type = TriggerType::Http;
        endpoint.methods = vec![method.to_string()];
        endpoint.route = route.to_string();
        endpoint
    }

    #[test]
    fn test_generate_id_is_unique() {
        let first = generate_id("req");
        let second = generate_id("req");
        assert!(first.starts_with("req_"));
        assert_eq!(first.len(), "req_".len() + 32);
        assert_ne!(first, second);
    }

    #[test]
    fn test_request_entry() {
        let mut context = RenderContext::at(1_700_000_000_000);
        context.advance();
        let request = InsomniaDocumenter
            .request(&http_endpoint("GetItem", "get", "/api/items/id:{id}"), &context)
            .unwrap();

        assert_eq!(request.url, "{{host}}/api/items/id::id");
        assert_eq!(request.method, "GET");
        assert_eq!(request.meta.sort_key, Some(1));
        assert_eq!(request.meta.created, 1_700_000_000_000);
        assert_eq!(
            request.path_parameters,
            vec![InsomniaPathParameter {
                name: "id".to_string(),
                value: "id:".to_string(),
            }]
        );
    }

    #[test]
    fn test_serialize_all_writes_single_collection() {
        let temp_dir = TempDir::new().unwrap();
        let options = RenderOptions::new("sandbox", temp_dir.path().to_path_buf())
            .with_separate_files(true)
            .with_env_var("host", "http://localhost:7071");

        let mut timer = Endpoint::named("Nightly");
        timer.trigger_type = TriggerType::Timer;
        let endpoints = vec![
            http_endpoint("GetAsync", "get", "sandbox/{moduleId}"),
            timer,
            http_endpoint("Verify", "post", "sandbox/verify"),
        ];

        assert!(InsomniaDocumenter.serialize_all(&endpoints, &options));

        let content = fs::read_to_string(temp_dir.path().join("sandbox.yaml")).unwrap();
        let collection: InsomniaCollection = serde_yaml::from_str(&content).unwrap();

        assert_eq!(collection.kind, COLLECTION_TYPE);
        assert_eq!(collection.name, WORKSPACE_NAME);
        let names: Vec<_> = collection.collection.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["GetAsync", "Verify"]);
        let sort_keys: Vec<_> = collection.collection.iter().map(|r| r.meta.sort_key).collect();
        assert_eq!(sort_keys, vec![Some(0), Some(1)]);
        assert_eq!(collection.collection[0].url, "{{host}}/sandbox/:moduleId");
        assert_eq!(collection.environments.name, "Base Environment");
        assert_eq!(
            collection.environments.data.get("host").map(String::as_str),
            Some("http://localhost:7071")
        );
        assert!(collection.environments.meta.id.starts_with("env_"));
    }

    #[test]
    fn test_serialize_one_is_yaml_entry() {
        let yaml = InsomniaDocumenter
            .serialize_one(&http_endpoint("Ping", "get", "ping"), &RenderContext::at(5))
            .unwrap();
        let request: InsomniaRequest = serde_yaml::from_str(&yaml).unwrap();

        assert_eq!(request.name, "Ping");
        assert_eq!(request.meta.sort_key, Some(0));
        assert!(request.meta.id.starts_with("req_"));
    }
}
