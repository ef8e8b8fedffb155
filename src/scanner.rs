use anyhow::{Context, Result};
use log::warn;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Default extension of the scanned source files.
pub const DEFAULT_EXTENSION: &str = "cs";

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a project directory to find all
/// source files with a given extension. It skips hidden directories (those
/// starting with `.`) and the usual build output directories `bin` and `obj`.
///
/// # Example
///
/// ```no_run
/// use endpoint_documenter::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-functions"));
/// let result = scanner.scan().unwrap();
/// println!("Found {} source files", result.source_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    extension: String,
}

/// Result of directory scanning operation.
///
/// Contains the discovered source files, in path order, and any warnings
/// encountered during scanning.
pub struct ScanResult {
    /// Paths of all discovered source files
    pub source_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for `.cs` files below the root directory.
    pub fn new(root_path: PathBuf) -> Self {
        Self::with_extension(root_path, DEFAULT_EXTENSION)
    }

    /// Creates a new `FileScanner` for files with the given extension (without the dot).
    pub fn with_extension(root_path: PathBuf, extension: &str) -> Self {
        Self {
            root_path,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Scans the directory tree and collects all matching files.
    ///
    /// If any directories or files cannot be accessed, warnings are logged and
    /// added to the result, but scanning continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory cannot be accessed.
    pub fn scan(&self) -> Result<ScanResult> {
        std::fs::metadata(&self.root_path)
            .with_context(|| format!("Failed to access {}", self.root_path.display()))?;

        let mut source_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.path() == self.root_path {
                    return true;
                }

                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_build_output = e.file_type().is_dir() && (file_name == "bin" || file_name == "obj");

                !is_hidden && !is_build_output
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_file()
                        && path.extension().and_then(|s| s.to_str()) == Some(self.extension.as_str())
                    {
                        source_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(ScanResult {
            source_files,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .source_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("HttpTriggers.cs"), "public class HttpTriggers {}").unwrap();
        fs::write(root.join("Helpers.cs"), "public static class Helpers {}").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.warnings.is_empty());
        assert_eq!(file_names(&result), vec!["Helpers.cs", "HttpTriggers.cs"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = FileScanner::new(temp_dir.path().to_path_buf()).scan().unwrap();

        assert!(result.source_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("Recall/Triggers")).unwrap();
        fs::create_dir_all(root.join("Admin")).unwrap();
        fs::write(root.join("Recall/Triggers/HttpTriggers.cs"), "").unwrap();
        fs::write(root.join("Recall/Startup.cs"), "").unwrap();
        fs::write(root.join("Admin/AdminApi.cs"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(result.source_files.len(), 3);
    }

    #[test]
    fn test_scan_skips_build_output_and_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("bin/Debug")).unwrap();
        fs::create_dir_all(root.join("obj")).unwrap();
        fs::create_dir_all(root.join(".vs")).unwrap();
        fs::write(root.join("bin/Debug/Generated.cs"), "").unwrap();
        fs::write(root.join("obj/AssemblyInfo.cs"), "").unwrap();
        fs::write(root.join(".vs/Cache.cs"), "").unwrap();
        fs::write(root.join("Api.cs"), "").unwrap();

        let result = FileScanner::new(root.to_path_buf()).scan().unwrap();

        assert_eq!(file_names(&result), vec!["Api.cs"]);
    }

    #[test]
    fn test_scan_custom_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("Api.cs"), "").unwrap();
        fs::write(root.join("Api.csx"), "").unwrap();

        let result = FileScanner::with_extension(root.to_path_buf(), ".csx").scan().unwrap();

        assert_eq!(file_names(&result), vec!["Api.csx"]);
    }

    #[test]
    fn test_scan_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();

        let result = FileScanner::new(temp_dir.path().join("missing")).scan();

        assert!(result.is_err());
    }
}
