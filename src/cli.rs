use crate::documenter::{DocumenterKind, RenderOptions};
use crate::extractor::{Endpoint, EndpointExtractor};
use crate::host_config::RoutePrefixes;
use crate::path_vars::join_route;
use crate::scanner::{FileScanner, DEFAULT_EXTENSION};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default value of the `host` environment variable written into collections.
pub const DEFAULT_HOST: &str = "http://localhost:7071";

/// Endpoint Documenter - Generate API client collections from annotated function projects
#[derive(Parser, Debug)]
#[command(name = "endpoint-documenter")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the repository to scan
    #[arg(value_name = "REPO_PATH", default_value = ".")]
    pub repo_path: PathBuf,

    /// Documenter to render with
    #[arg(short = 'd', long = "doc-type", value_enum, default_value = "raw")]
    pub doc_type: DocType,

    /// Directory the documentation is written to
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Collection name (defaults to the repository directory name)
    #[arg(short = 'n', long = "name")]
    pub collection_name: Option<String>,

    /// Write one file per endpoint where the format supports it
    #[arg(short = 's', long = "separate-files")]
    pub separate_files: bool,

    /// Base URL stored as the `host` environment variable
    #[arg(long = "host", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Additional environment variable for the collections (KEY=VALUE)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_env_var)]
    pub vars: Vec<(String, String)>,

    /// Extension of the source files to scan
    #[arg(short = 'e', long = "extension", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Documenter selection on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocType {
    /// Lossless JSON dump
    Raw,
    /// Markdown summary table
    Markdown,
    /// Bruno collection
    Bruno,
    /// Insomnia collection
    Insomnia,
    /// Every documenter, each in its own sub-directory
    All,
}

impl DocType {
    /// The documenters this selection runs.
    pub fn kinds(&self) -> Vec<DocumenterKind> {
        match self {
            DocType::Raw => vec![DocumenterKind::Raw],
            DocType::Markdown => vec![DocumenterKind::Markdown],
            DocType::Bruno => vec![DocumenterKind::Bruno],
            DocType::Insomnia => vec![DocumenterKind::Insomnia],
            DocType::All => DocumenterKind::ALL.to_vec(),
        }
    }
}

fn parse_env_var(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.repo_path.exists() {
        anyhow::bail!("Repo path does not exist: {}", args.repo_path.display());
    }

    if !args.repo_path.is_dir() {
        anyhow::bail!("Repo path is not a directory: {}", args.repo_path.display());
    }

    info!("Repo path: {}", args.repo_path.display());
    info!("Documenter: {:?}", args.doc_type);
    info!("Output directory: {}", args.output_dir.display());

    Ok(args)
}

impl CliArgs {
    /// Collection name: `--name`, or the repository directory name.
    pub fn collection_name(&self) -> String {
        if let Some(name) = &self.collection_name {
            return name.clone();
        }
        self.repo_path
            .canonicalize()
            .ok()
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "collection".to_string())
    }

    /// Environment variables for the collections, `host` included.
    pub fn env_vars(&self) -> BTreeMap<String, String> {
        let mut vars: BTreeMap<String, String> = self.vars.iter().cloned().collect();
        vars.entry("host".to_string()).or_insert_with(|| self.host.clone());
        vars
    }
}

/// Extracts the endpoints of every file, joining each route onto the prefix
/// of its project.
pub fn collect_endpoints<F>(files: &[PathBuf], prefix_for: F) -> Vec<Endpoint>
where
    F: Fn(&Path) -> Option<String>,
{
    let extractor = EndpointExtractor::new();
    let mut endpoints = Vec::new();

    for file in files {
        let prefix = prefix_for(file);
        for mut endpoint in extractor.extract_file(file) {
            if let Some(prefix) = prefix.as_deref() {
                if !endpoint.route.is_empty() {
                    endpoint.route = join_route(&["/", prefix, &endpoint.route]);
                }
            }
            info!("Found endpoint: {}", endpoint);
            endpoints.push(endpoint);
        }
    }

    sort_endpoints(&mut endpoints);
    endpoints
}

/// Orders endpoints by name, then route. The sort is stable, so duplicates
/// keep their discovery order.
pub fn sort_endpoints(endpoints: &mut [Endpoint]) {
    endpoints.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.route.cmp(&b.route)));
}

/// Renders the endpoints with every selected documenter.
///
/// With more than one documenter each writes into `<output_dir>/<name>`.
/// Returns the names of the documenters that failed.
pub fn render(endpoints: &[Endpoint], kinds: &[DocumenterKind], options: &RenderOptions) -> Vec<&'static str> {
    let mut failed = Vec::new();

    for kind in kinds {
        let documenter = kind.documenter();
        let mut run_options = options.clone();
        if kinds.len() > 1 {
            run_options.output_dir = options.output_dir.join(documenter.name());
        }

        if let Err(e) = std::fs::create_dir_all(&run_options.output_dir) {
            error!(
                "Error creating output directory {}: {}",
                run_options.output_dir.display(),
                e
            );
            failed.push(documenter.name());
            continue;
        }

        if documenter.serialize_all(endpoints, &run_options) {
            info!(
                "Wrote results for documenter '{}' to: {}",
                documenter.name(),
                run_options.output_dir.display()
            );
        } else {
            error!("Error writing results for documenter: {}", documenter.name());
            failed.push(documenter.name());
        }
    }

    failed
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting endpoint documentation...");

    // Step 1: Create the output directory
    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create output directory: {}", args.output_dir.display()))?;

    // Step 2: Scan directory for source files
    info!("Scanning repository...");
    let scanner = FileScanner::with_extension(args.repo_path.clone(), &args.extension);
    let scan_result = scanner.scan()?;
    info!("Found {} .{} files", scan_result.source_files.len(), args.extension);
    if scan_result.source_files.is_empty() {
        warn!("No source files found in {}", args.repo_path.display());
    }

    // Step 3: Resolve route prefixes from host.json files
    let prefixes = RoutePrefixes::load(&args.repo_path);
    debug!("Loaded {} route prefixes", prefixes.len());

    // Step 4: Extract endpoints
    let endpoints = collect_endpoints(&scan_result.source_files, |path| {
        prefixes.prefix_for(path).map(str::to_string)
    });
    info!("Found {} endpoints in repo: {}", endpoints.len(), args.repo_path.display());

    // Step 5: Render documentation
    let mut options = RenderOptions::new(args.collection_name(), args.output_dir.clone())
        .with_separate_files(args.separate_files);
    options.env_vars = args.env_vars();

    let failed = render(&endpoints, &args.doc_type.kinds(), &options);
    if !failed.is_empty() {
        anyhow::bail!("Documenters failed: {}", failed.join(", "));
    }

    info!("Summary:");
    info!("  - Files scanned: {}", scan_result.source_files.len());
    info!("  - Endpoints found: {}", endpoints.len());
    info!("  - Documenters: {:?}", args.doc_type);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::TriggerType;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_args_defaults() {
        let args = CliArgs::try_parse_from(["endpoint-documenter"]).unwrap();

        assert_eq!(args.repo_path, PathBuf::from("."));
        assert_eq!(args.doc_type, DocType::Raw);
        assert_eq!(args.extension, "cs");
        assert!(!args.separate_files);
        assert_eq!(args.env_vars().get("host").map(String::as_str), Some(DEFAULT_HOST));
    }

    #[test]
    fn test_args_vars_and_doc_type() {
        let args = CliArgs::try_parse_from([
            "endpoint-documenter",
            "./repo",
            "-d",
            "all",
            "--var",
            "host=https://example.test",
            "--var",
            "token=abc=def",
        ])
        .unwrap();

        assert_eq!(args.doc_type.kinds().len(), 4);
        let vars = args.env_vars();
        assert_eq!(vars.get("host").map(String::as_str), Some("https://example.test"));
        assert_eq!(vars.get("token").map(String::as_str), Some("abc=def"));
    }

    #[test]
    fn test_args_reject_unknown_doc_type_and_bad_var() {
        assert!(CliArgs::try_parse_from(["endpoint-documenter", "-d", "postman"]).is_err());
        assert!(CliArgs::try_parse_from(["endpoint-documenter", "--var", "novalue"]).is_err());
    }

    #[test]
    fn test_parse_args_rejects_missing_repo() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let args = CliArgs::try_parse_from(["endpoint-documenter", missing.to_str().unwrap()]).unwrap();

        assert!(parse_args_from_parsed(args).is_err());
    }

    #[test]
    fn test_collection_name_defaults_to_repo_dir() {
        let temp_dir = TempDir::new().unwrap();
        let repo = temp_dir.path().join("learn-api");
        fs::create_dir(&repo).unwrap();
        let args = CliArgs::try_parse_from(["endpoint-documenter", repo.to_str().unwrap()]).unwrap();
        assert_eq!(args.collection_name(), "learn-api");

        let named = CliArgs::try_parse_from(["endpoint-documenter", "-n", "custom"]).unwrap();
        assert_eq!(named.collection_name(), "custom");
    }

    #[test]
    fn test_collect_endpoints_joins_prefix_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("Api.cs");
        fs::write(
            &file,
            r#"public class Api(ILogger logger)
{
    [Function("Zeta")]
    public async Task<HttpResponseData> Zeta([HttpTrigger(AuthorizationLevel.Anonymous, "get", Route = "zeta/{id}")] HttpRequestData req)
    {
    }

    [Function("Alpha")]
    public async Task Alpha([TimerTrigger("0 0 * * * *")] TimerInfo timer)
    {
    }
}
"#,
        )
        .unwrap();

        let endpoints = collect_endpoints(&[file], |_| Some("api/v2".to_string()));

        let names: Vec<_> = endpoints.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert_eq!(endpoints[0].trigger_type, TriggerType::Timer);
        assert!(endpoints[0].route.is_empty());
        assert_eq!(endpoints[1].route, "/api/v2/zeta/{id}");
    }

    #[test]
    fn test_collect_endpoints_skips_unreadable_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("Api.cs");
        fs::write(
            &file,
            r#"public class Api(ILogger logger)
{
    [Function("Ping")]
    public async Task<HttpResponseData> Ping([HttpTrigger(AuthorizationLevel.Anonymous, "get", Route = "ping")] HttpRequestData req)
    {
    }
}
"#,
        )
        .unwrap();
        let missing = temp_dir.path().join("Deleted.cs");

        let endpoints = collect_endpoints(&[missing, file], |_| None);

        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].name, "Ping");
        assert_eq!(endpoints[0].route, "ping");
    }

    #[test]
    fn test_render_all_uses_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let mut endpoint = Endpoint::named("Ping");
        endpoint.trigger_type = TriggerType::Http;
        endpoint.methods = vec!["get".to_string()];
        endpoint.route = "ping".to_string();
        let options = RenderOptions::new("api", temp_dir.path().to_path_buf());

        let failed = render(&[endpoint], &DocType::All.kinds(), &options);

        assert!(failed.is_empty());
        assert!(temp_dir.path().join("raw/api.json").exists());
        assert!(temp_dir.path().join("markdown/api.md").exists());
        assert!(temp_dir.path().join("bruno/Ping.bru").exists());
        assert!(temp_dir.path().join("insomnia/api.yaml").exists());
    }

    #[test]
    fn test_render_reports_failed_documenter() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "file").unwrap();
        let options = RenderOptions::new("api", blocker);

        let failed = render(&[], &[DocumenterKind::Markdown], &options);

        assert_eq!(failed, vec!["markdown"]);
    }
}
