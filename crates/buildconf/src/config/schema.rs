//! Configuration schema definitions

use crate::credential::MAPBOX_DOWNLOADS_TOKEN;
use crate::layout::DEFAULT_BUILD_DIR;
use crate::repositories::{self, RepositorySource};
use serde::{Deserialize, Serialize};

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub credentials: CredentialsConfig,

    #[serde(default)]
    pub repositories: RepositoriesConfig,
}

/// Project layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Build output redirect, relative to the project root
    #[serde(default = "default_build_dir")]
    pub build_dir: String,

    /// Pinned sub-project names; empty means discover from the project tree
    #[serde(default)]
    pub subprojects: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            subprojects: Vec::new(),
        }
    }
}

fn default_build_dir() -> String {
    DEFAULT_BUILD_DIR.to_string()
}

/// Credential lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Key looked up in `local.properties` and the environment
    #[serde(default = "default_credential_key")]
    pub key: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            key: default_credential_key(),
        }
    }
}

fn default_credential_key() -> String {
    MAPBOX_DOWNLOADS_TOKEN.to_string()
}

/// Repository source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoriesConfig {
    /// Ordered source list applied to every project
    #[serde(default = "default_repository_sources")]
    pub sources: Vec<RepositorySource>,
}

impl Default for RepositoriesConfig {
    fn default() -> Self {
        Self {
            sources: default_repository_sources(),
        }
    }
}

fn default_repository_sources() -> Vec<RepositorySource> {
    repositories::default_sources()
}
