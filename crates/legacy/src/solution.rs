//! Listing the projects of a solution.
//!
//! Two providers exist: one that asks the native toolchain
//! (`<toolchain> sln <file> list`) and one that reads the solution file
//! directly. Which one is used is a configuration choice, see
//! [`crate::BridgeConfig`].

use crate::error::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::LazyLock;
use tokio::process::Command;
use tracing::debug;

/// Project type GUID of solution folders, which are not projects.
const SOLUTION_FOLDER_TYPE: &str = "2150E333-8FDC-42A3-9474-1A3956D46DE8";

static PROJECT_LINE: LazyLock<std::result::Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^\s*Project\("\{(?P<kind>[0-9A-Fa-f-]+)\}"\)\s*=\s*"(?P<name>[^"]*)"\s*,\s*"(?P<path>[^"]*)"\s*,\s*"\{(?P<guid>[0-9A-Fa-f-]+)\}"\s*$"#,
    )
});

/// Lists the project files contained in a solution.
#[async_trait]
pub trait ProjectListProvider: Send + Sync {
    /// Absolute paths of the solution's projects, in solution order.
    async fn project_paths(&self, solution: &Path) -> Result<Vec<PathBuf>>;
}

/// Resolves a path written in a solution against the solution's directory.
fn resolve(solution: &Path, relative: &str) -> PathBuf {
    let normalized = relative.trim().replace('\\', "/");
    solution
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(normalized)
}

/// Asks the native toolchain for the solution's projects.
#[derive(Debug, Clone)]
pub struct ToolchainProjectListProvider {
    toolchain: PathBuf,
}

impl ToolchainProjectListProvider {
    /// Uses the given toolchain executable.
    pub fn new(toolchain: impl Into<PathBuf>) -> Self {
        Self {
            toolchain: toolchain.into(),
        }
    }

    /// Project paths from `sln list` output: every non-blank line after the
    /// `---` separator.
    fn parse_output(solution: &Path, stdout: &str) -> Vec<PathBuf> {
        stdout
            .lines()
            .skip_while(|line| !line.trim_start().starts_with("---"))
            .skip(1)
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| resolve(solution, line))
            .collect()
    }
}

#[async_trait]
impl ProjectListProvider for ToolchainProjectListProvider {
    async fn project_paths(&self, solution: &Path) -> Result<Vec<PathBuf>> {
        let command = format!(
            "{} sln {} list",
            self.toolchain.display(),
            solution.display()
        );
        debug!(command = %command, "Listing solution projects with toolchain");

        let output = Command::new(&self.toolchain)
            .arg("sln")
            .arg(solution)
            .arg("list")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::ToolchainFailed {
                command: command.clone(),
                message: format!("failed to start: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::ToolchainFailed {
                command,
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(Self::parse_output(solution, &stdout))
    }
}

/// Reads project entries straight from the solution file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionFileProjectListProvider;

impl SolutionFileProjectListProvider {
    /// Creates the provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Project paths from solution text, skipping solution folders.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProjectList`] if the line pattern cannot be compiled.
    pub fn parse(solution: &Path, content: &str) -> Result<Vec<PathBuf>> {
        let pattern = PROJECT_LINE.as_ref().map_err(|e| Error::ProjectList {
            solution: solution.to_path_buf(),
            message: format!("invalid project line pattern: {e}"),
        })?;

        Ok(pattern
            .captures_iter(content)
            .filter(|captures| !captures["kind"].eq_ignore_ascii_case(SOLUTION_FOLDER_TYPE))
            .map(|captures| resolve(solution, &captures["path"]))
            .collect())
    }
}

#[async_trait]
impl ProjectListProvider for SolutionFileProjectListProvider {
    async fn project_paths(&self, solution: &Path) -> Result<Vec<PathBuf>> {
        let content = tokio::fs::read_to_string(solution)
            .await
            .map_err(|source| Error::Io {
                source,
                path: Some(solution.to_path_buf()),
                operation: "reading solution file".to_string(),
            })?;

        let paths = Self::parse(solution, &content)?;
        debug!(
            solution = %solution.display(),
            projects = paths.len(),
            "Read solution file"
        );
        Ok(paths)
    }
}
