//! Bridge configuration.

use crate::error::{Error, Result};
use crate::solution::{
    ProjectListProvider, SolutionFileProjectListProvider, ToolchainProjectListProvider,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable selecting the project list provider.
pub const PROVIDER_ENV_VAR: &str = "DGSPEC_PROJECT_LIST_PROVIDER";

/// Environment variable naming the toolchain executable.
pub const TOOLCHAIN_ENV_VAR: &str = "DGSPEC_TOOLCHAIN_PATH";

/// Which [`ProjectListProvider`] to use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ProjectListProviderKind {
    /// Run the native toolchain.
    Toolchain,
    /// Read the solution file.
    #[default]
    SolutionFile,
}

impl fmt::Display for ProjectListProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toolchain => write!(f, "toolchain"),
            Self::SolutionFile => write!(f, "solutionFile"),
        }
    }
}

impl FromStr for ProjectListProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("toolchain") {
            Ok(Self::Toolchain)
        } else if s.eq_ignore_ascii_case("solutionFile") || s.eq_ignore_ascii_case("solution-file")
        {
            Ok(Self::SolutionFile)
        } else {
            Err(Error::config(format!("unknown project list provider '{s}'")))
        }
    }
}

/// Settings for the legacy bridge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// How solution project lists are obtained.
    pub project_list_provider: ProjectListProviderKind,

    /// Toolchain executable used by the toolchain provider.
    pub toolchain_path: PathBuf,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            project_list_provider: ProjectListProviderKind::default(),
            toolchain_path: PathBuf::from("dotnet"),
        }
    }
}

impl BridgeConfig {
    /// Parses a JSON configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the JSON is invalid or names an unknown provider.
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| Error::config(e.to_string()))
    }

    /// Defaults overlaid with `DGSPEC_PROJECT_LIST_PROVIDER` and
    /// `DGSPEC_TOOLCHAIN_PATH`. Empty variables are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the provider variable names an unknown provider.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(provider) = non_empty_var(PROVIDER_ENV_VAR) {
            config.project_list_provider = provider.parse()?;
        }
        if let Some(toolchain) = non_empty_var(TOOLCHAIN_ENV_VAR) {
            config.toolchain_path = PathBuf::from(toolchain);
        }

        Ok(config)
    }

    /// The configured project list provider.
    #[must_use]
    pub fn project_list_provider(&self) -> Box<dyn ProjectListProvider> {
        match self.project_list_provider {
            ProjectListProviderKind::Toolchain => {
                Box::new(ToolchainProjectListProvider::new(self.toolchain_path.clone()))
            }
            ProjectListProviderKind::SolutionFile => Box::new(SolutionFileProjectListProvider),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}
