use ktl_reports_types::PIPELINE_FILE_NAME;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Maps short report names to pipeline definition files under a catalog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportCatalog {
    root: PathBuf,
    prefix: String,
}

impl ReportCatalog {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Directory backing a report: `<root>/<prefix><name>`.
    pub fn report_directory(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}{}", self.prefix, name))
    }

    /// Pipeline definition for a report: `<root>/<prefix><name>/pipeline.yaml`.
    ///
    /// Pure concatenation. The path is not checked for existence; a name with
    /// no backing directory surfaces later as an engine failure.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let definition_path = self.report_directory(name).join(PIPELINE_FILE_NAME);
        debug!(report = name, path = %definition_path.display(), "resolved report definition");
        definition_path
    }

    /// Public names of all available reports.
    ///
    /// Equivalent to matching `<prefix>*` against the root's direct children:
    /// each directory whose name starts with the prefix yields one name with
    /// the prefix stripped. Names are sorted so repeated listings of an
    /// unchanged catalog are identical. An unreadable root yields an empty
    /// listing.
    pub fn list_names(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(root = %self.root.display(), %error, "unable to read report catalog");
                return Vec::new();
            }
        };

        let mut names = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(error) => {
                    warn!(root = %self.root.display(), %error, "skipping unreadable catalog entry");
                    None
                }
            })
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| self.public_name(&entry.file_name()))
            .collect::<Vec<String>>();

        names.sort();
        names
    }

    fn public_name(&self, file_name: &OsStr) -> Option<String> {
        let Some(file_name) = file_name.to_str() else {
            debug!(entry = ?file_name, "skipping non UTF-8 catalog entry");
            return None;
        };
        let name = file_name.strip_prefix(self.prefix.as_str())?;
        if name.is_empty() {
            return None;
        }
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn catalog_with(directories: &[&str], files: &[&str]) -> (TempDir, ReportCatalog) {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        for directory in directories {
            let report_dir = temp_dir.path().join(directory);
            fs::create_dir_all(&report_dir).expect("create report dir");
            fs::write(report_dir.join(PIPELINE_FILE_NAME), "kind: Pipeline\n").expect("write pipeline");
        }
        for file in files {
            fs::write(temp_dir.path().join(file), "").expect("write file");
        }
        let catalog = ReportCatalog::new(temp_dir.path(), "mcp-");
        (temp_dir, catalog)
    }

    #[test]
    fn resolve_is_pure_concatenation() {
        let catalog = ReportCatalog::new("/srv/ktl/pkg/e2e/testdata", "mcp-");
        assert_eq!(
            catalog.resolve("pods"),
            PathBuf::from("/srv/ktl/pkg/e2e/testdata/mcp-pods/pipeline.yaml")
        );
        assert_eq!(
            catalog.resolve("does-not-exist"),
            PathBuf::from("/srv/ktl/pkg/e2e/testdata/mcp-does-not-exist/pipeline.yaml")
        );
    }

    #[test]
    fn lists_prefixed_directories_with_prefix_stripped() {
        let (_temp_dir, catalog) = catalog_with(&["mcp-pods", "mcp-nodes", "fixtures", "kustomize-mcp-x"], &[]);
        assert_eq!(catalog.list_names(), vec!["nodes".to_string(), "pods".to_string()]);
    }

    #[test]
    fn ignores_plain_files_and_bare_prefix() {
        let (_temp_dir, catalog) = catalog_with(&["mcp-pods", "mcp-"], &["mcp-notes.txt"]);
        assert_eq!(catalog.list_names(), vec!["pods".to_string()]);
    }

    #[test]
    fn empty_catalog_lists_nothing() {
        let (_temp_dir, catalog) = catalog_with(&[], &[]);
        assert!(catalog.list_names().is_empty());
    }

    #[test]
    fn missing_root_lists_nothing() {
        let catalog = ReportCatalog::new("/nonexistent/ktl-reports/catalog", "mcp-");
        assert!(catalog.list_names().is_empty());
    }

    #[test]
    fn listing_is_stable_across_calls() {
        let (_temp_dir, catalog) = catalog_with(&["mcp-c", "mcp-a", "mcp-b"], &[]);
        let first = catalog.list_names();
        assert_eq!(first, catalog.list_names());
        assert_eq!(first, vec!["a", "b", "c"]);
    }

    #[test]
    fn listing_reflects_filesystem_changes() {
        let (temp_dir, catalog) = catalog_with(&["mcp-pods"], &[]);
        assert_eq!(catalog.list_names(), vec!["pods"]);
        fs::create_dir(temp_dir.path().join("mcp-services")).expect("create dir");
        assert_eq!(catalog.list_names(), vec!["pods", "services"]);
    }
}
