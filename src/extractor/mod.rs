//! Endpoint extraction from annotated function sources.
//!
//! The extractor walks a source file line by line, collecting the attribute
//! annotations that precede each function declaration. When the next
//! declaration (or the end of the file) is reached, the collected metadata is
//! finalized into an [`Endpoint`].
//!
//! Recognized annotations:
//!
//! - `[Function("Name")]` / `[Function(nameof(Name))]` - marks a documented function
//! - `[RequireDocsTokenGroups(..)]`, `[RequireS2SToken(..)]`, `[RequireDocsToken]`,
//!   `[RequirePlatformApiAuth]` - authentication requirements
//! - `[HttpTrigger(..)]`, `[TimerTrigger(..)]`, `[EventGridTrigger(..)]`,
//!   `[CosmosDBTrigger(..)]` - inside the parameter list of the declaration
//!
//! There is no lexical awareness of comments: commented-out annotations are
//! scanned like live code.
//!
//! # Example
//!
//! ```
//! use endpoint_documenter::extractor::{EndpointExtractor, TriggerType};
//!
//! let source = r#"
//! public class Api(ILogger<Api> logger)
//! {
//!     [Function("Ping")]
//!     public async Task<HttpResponseData> Ping([HttpTrigger(AuthorizationLevel.Anonymous, "get", Route = "ping")] HttpRequestData req)
//!     {
//!     }
//! }
//! "#;
//!
//! let endpoints = EndpointExtractor::new().extract(source);
//! assert_eq!(endpoints.len(), 1);
//! assert_eq!(endpoints[0].trigger_type, TriggerType::Http);
//! ```

pub mod header;
pub mod patterns;

use log::{debug, error, warn};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;

/// The mechanism that causes a function to execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TriggerType {
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "timer")]
    Timer,
    #[serde(rename = "event-grid")]
    EventGrid,
    #[serde(rename = "cosmos")]
    CosmosDB,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl TriggerType {
    /// Every trigger kind that can appear as `[<Keyword>Trigger(..)]`.
    pub const RECOGNIZED: [TriggerType; 4] = [
        TriggerType::Http,
        TriggerType::Timer,
        TriggerType::EventGrid,
        TriggerType::CosmosDB,
    ];

    /// The annotation keyword preceding `Trigger`, e.g. `Http` in `[HttpTrigger(..)]`.
    pub fn keyword(&self) -> &'static str {
        match self {
            TriggerType::Http => "Http",
            TriggerType::Timer => "Timer",
            TriggerType::EventGrid => "EventGrid",
            TriggerType::CosmosDB => "CosmosDB",
            TriggerType::Unknown => "UNKNOWN",
        }
    }

    /// Resolves an annotation keyword; anything unrecognized is `Unknown`.
    pub fn from_keyword(keyword: &str) -> Self {
        Self::RECOGNIZED
            .into_iter()
            .find(|trigger| trigger.keyword() == keyword)
            .unwrap_or(TriggerType::Unknown)
    }

    /// The serialized identifier, e.g. `event-grid`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::Http => "http",
            TriggerType::Timer => "timer",
            TriggerType::EventGrid => "event-grid",
            TriggerType::CosmosDB => "cosmos",
            TriggerType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping of path parameter name to the literal fragment fused to it.
///
/// Keys keep the order in which they first appear in the route. Inserting an
/// existing name overwrites its fragment but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParameters {
    entries: Vec<(String, String)>,
}

impl PathParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: String, fragment: String) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = fragment,
            None => self.entries.push((name, fragment)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, fragment)| fragment.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, fragment)| (name.as_str(), fragment.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PathParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, fragment) in &self.entries {
            map.serialize_entry(name, fragment)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PathParameters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PathParametersVisitor;

        impl<'de> Visitor<'de> for PathParametersVisitor {
            type Value = PathParameters;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of path parameter names to fragments")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut params = PathParameters::new();
                while let Some((name, fragment)) = access.next_entry::<String, String>()? {
                    params.insert(name, fragment);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(PathParametersVisitor)
    }
}

/// One discovered triggerable function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authentication: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub route: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "PathParameters::is_empty")]
    pub path_parameters: PathParameters,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub response_codes: Vec<u16>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interval: String,
    #[serde(default)]
    pub trigger_type: TriggerType,
}

impl Endpoint {
    /// Creates an endpoint with only a name; every other field is empty.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Trigger: {}, Authentication: {:?}, Route: {}, Methods: {:?}",
            self.name, self.trigger_type, self.authentication, self.route, self.methods
        )
    }
}

/// Endpoints of one source text plus the number of name annotations seen.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub endpoints: Vec<Endpoint>,
    pub annotation_count: usize,
}

impl Extraction {
    /// Whether every name annotation produced exactly one endpoint.
    pub fn is_consistent(&self) -> bool {
        self.annotation_count == self.endpoints.len()
    }
}

/// Line-oriented scanner producing one [`Endpoint`] per annotated function.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointExtractor;

impl EndpointExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the endpoints of one source text, in declaration order.
    pub fn extract(&self, text: &str) -> Vec<Endpoint> {
        self.extract_source(text, "<input>").endpoints
    }

    /// Like [`extract`](Self::extract), but also reports the annotation count.
    pub fn extract_with_report(&self, text: &str) -> Extraction {
        self.extract_source(text, "<input>")
    }

    /// Reads and extracts one file. An unreadable file yields no endpoints.
    pub fn extract_file(&self, path: &Path) -> Vec<Endpoint> {
        match fs::read_to_string(path) {
            Ok(text) => self.extract_source(&text, &path.display().to_string()).endpoints,
            Err(e) => {
                error!("Error reading file {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }

    fn extract_source(&self, text: &str, origin: &str) -> Extraction {
        let annotation_count = patterns::FUNCTION_NAME.find_iter(text).count();
        if annotation_count == 0 {
            debug!("No functions found in {}", origin);
            return Extraction::default();
        }
        debug!("Found {} functions in {}", annotation_count, origin);

        let normalized = text.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();
        let mut line_offsets = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in &lines {
            line_offsets.push(offset);
            offset += line.len() + 1;
        }

        let mut endpoints = Vec::new();
        let mut current = Endpoint::default();
        let mut first_declaration_seen = false;
        let mut line_number = 0;

        while line_number < lines.len() {
            let line = lines[line_number];
            let mut skipped = 0;

            if patterns::DECLARATION.is_match(line) {
                if !first_declaration_seen {
                    first_declaration_seen = true;
                } else if current.name.is_empty() {
                    // a plain method or helper, not a documented function
                    current = Endpoint::default();
                } else {
                    let remaining = &normalized[line_offsets[line_number]..];
                    skipped = header::resolve_header(remaining, &mut current);
                    endpoints.push(std::mem::take(&mut current));
                }
            }

            if let Some(name) = patterns::function_name(line) {
                current.name = name;
            }
            current
                .authentication
                .extend(patterns::authentication(line));

            line_number += 1 + skipped;
        }

        if !current.name.is_empty() {
            endpoints.push(current);
        }

        let extraction = Extraction {
            endpoints,
            annotation_count,
        };
        if !extraction.is_consistent() {
            warn!(
                "Inconsistent parse of '{}': documented {} functions, but expected {}",
                origin,
                extraction.endpoints.len(),
                annotation_count
            );
        }

        extraction
    }
}
