//! Error types for the legacy project bridge.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for legacy bridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building restore specs from a project adapter
/// or listing the projects of a solution.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The project adapter failed to answer a request.
    #[error("Project adapter failed for '{project}': {message}")]
    #[diagnostic(
        code(dgspec::legacy::adapter),
        help("The project system may be unloaded or busy; retry once it is ready")
    )]
    Adapter {
        /// Project the request was made for.
        project: String,
        /// Failure reported by the adapter.
        message: String,
    },

    /// A package reference carried a version that could not be parsed.
    #[error("Invalid package reference '{package}' in '{project}'")]
    #[diagnostic(
        code(dgspec::legacy::invalid_package_reference),
        help("Fix the Version of the PackageReference item in the project file")
    )]
    InvalidPackageReference {
        /// Project declaring the reference.
        project: String,
        /// Package id.
        package: String,
        /// Why the version was rejected.
        #[source]
        source: dgspec_model::Error,
    },

    /// The projects of a solution could not be listed.
    #[error("Failed to list projects of solution '{}': {message}", solution.display())]
    #[diagnostic(
        code(dgspec::legacy::project_list),
        help("Check that the solution file exists and is well formed")
    )]
    ProjectList {
        /// Solution file.
        solution: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The native toolchain could not be run or exited with an error.
    #[error("Toolchain command '{command}' failed: {message}")]
    #[diagnostic(
        code(dgspec::legacy::toolchain_failed),
        help("Ensure the toolchain is installed and on PATH, or set DGSPEC_TOOLCHAIN_PATH")
    )]
    ToolchainFailed {
        /// Command line that was run.
        command: String,
        /// Exit status or spawn error plus stderr.
        message: String,
    },

    /// Bridge configuration is invalid.
    #[error("Invalid bridge configuration: {message}")]
    #[diagnostic(
        code(dgspec::legacy::config),
        help("Valid project list providers are 'toolchain' and 'solutionFile'")
    )]
    Config {
        /// Description of the problem.
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(dgspec::legacy::io_error),
        help("Check file permissions and that the path exists")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// Error from the graph model.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Model(#[from] dgspec_model::Error),
}

impl Error {
    /// Creates an [`Error::Adapter`].
    pub fn adapter(project: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adapter {
            project: project.into(),
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
