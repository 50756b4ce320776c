//! The one-time configuration pass
//!
//! Mirrors what the Gradle root script does at configuration time, as an
//! inspectable value: load `local.properties`, resolve the downloads token,
//! redirect the build tree, and derive per-subproject configuration. The
//! pass is single-threaded and runs once per invocation; nothing here
//! mutates global state.

use crate::config::ConfigSchema;
use crate::credential::{self, Credential, CredentialSource};
use crate::error::{Error, Result};
use crate::layout::BuildLayout;
use crate::properties::{LocalProperties, LOCAL_PROPERTIES};
use crate::repositories::RepositorySource;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The sub-project every other sub-project's evaluation depends on
pub const APP_SUBPROJECT: &str = "app";

/// Configuration derived for a single sub-project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprojectConfig {
    /// Gradle project name
    pub name: String,
    /// Redirected build output directory, `<root_build_dir>/<name>`
    pub build_dir: PathBuf,
    /// Ordered repository sources, identical for every project
    pub repositories: Vec<RepositorySource>,
    /// Extra properties exposed to the project (the downloads token, when set)
    pub extra_properties: BTreeMap<String, String>,
    /// Projects that must be evaluated before this one
    pub evaluation_depends_on: Vec<String>,
}

/// Result of the configuration pass
#[derive(Debug, Clone)]
pub struct BuildConfiguration {
    /// Android project root the pass ran against
    pub project_root: PathBuf,
    /// Parsed `local.properties` (empty when the file is absent)
    pub properties: LocalProperties,
    /// Key the credential was looked up under
    pub credential_key: String,
    /// Resolved credential, `None` when unset in both tiers
    pub credential: Option<Credential>,
    /// Ordered repository sources applied to every project
    pub repositories: Vec<RepositorySource>,
    /// Redirected build output tree
    pub layout: BuildLayout,
    /// Per-subproject configuration, sorted by name
    pub subprojects: Vec<SubprojectConfig>,
}

impl BuildConfiguration {
    /// Run the configuration pass for the project rooted at `project_root`
    pub fn configure(project_root: &Path, schema: &ConfigSchema) -> Result<Self> {
        let properties = LocalProperties::load(&project_root.join(LOCAL_PROPERTIES))?;

        let credential = credential::resolve(&schema.credentials.key, &properties);
        if credential.is_none() {
            tracing::warn!(
                key = %schema.credentials.key,
                "credential not set in local.properties or environment"
            );
        }

        let layout = BuildLayout::redirect(project_root, &schema.project.build_dir);

        let names = if schema.project.subprojects.is_empty() {
            discover_subprojects(project_root)?
        } else {
            schema.project.subprojects.clone()
        };

        let mut extra_properties = BTreeMap::new();
        if let Some(c) = &credential {
            extra_properties.insert(schema.credentials.key.clone(), c.value().to_string());
        }

        let subprojects = names
            .iter()
            .map(|name| SubprojectConfig {
                name: name.clone(),
                build_dir: layout.subproject_dir(name),
                repositories: schema.repositories.sources.clone(),
                extra_properties: extra_properties.clone(),
                evaluation_depends_on: if name == APP_SUBPROJECT {
                    Vec::new()
                } else {
                    vec![APP_SUBPROJECT.to_string()]
                },
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            root = %project_root.display(),
            subprojects = subprojects.len(),
            "configuration pass complete"
        );

        Ok(Self {
            project_root: project_root.to_path_buf(),
            properties,
            credential_key: schema.credentials.key.clone(),
            credential,
            repositories: schema.repositories.sources.clone(),
            layout,
            subprojects,
        })
    }

    /// Serializable view of the pass; credential values are masked and extra
    /// properties reduced to their key names
    pub fn report(&self) -> ConfigurationReport {
        ConfigurationReport {
            project_root: self.project_root.clone(),
            root_build_dir: self.layout.root_build_dir().to_path_buf(),
            credential: self.credential.as_ref().map(|c| CredentialReport {
                key: self.credential_key.clone(),
                source: c.source,
                masked_value: c.masked(),
            }),
            repositories: self
                .repositories
                .iter()
                .map(|r| RepositoryReport {
                    id: r.id(),
                    url: r.url(),
                })
                .collect(),
            subprojects: self
                .subprojects
                .iter()
                .map(|s| SubprojectReport {
                    name: s.name.clone(),
                    build_dir: s.build_dir.clone(),
                    evaluation_depends_on: s.evaluation_depends_on.clone(),
                    extra_property_keys: s.extra_properties.keys().cloned().collect(),
                })
                .collect(),
        }
    }
}

/// Discover sub-projects one level below the project root.
///
/// A directory is a sub-project when it contains a Gradle build file. The
/// result is sorted by name so the pass is deterministic.
fn discover_subprojects(project_root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in WalkDir::new(project_root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            Error::io(format!(
                "Failed to scan {}: {}",
                project_root.display(),
                e
            ))
        })?;

        if !entry.file_type().is_dir() || is_hidden(entry.path()) {
            continue;
        }

        let path = entry.path();
        if path.join("build.gradle").exists() || path.join("build.gradle.kts").exists() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
    }

    names.sort();
    Ok(names)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Masked, serializable view of a [`BuildConfiguration`]
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationReport {
    pub project_root: PathBuf,
    pub root_build_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialReport>,
    pub repositories: Vec<RepositoryReport>,
    pub subprojects: Vec<SubprojectReport>,
}

/// Credential provenance without the raw value
#[derive(Debug, Clone, Serialize)]
pub struct CredentialReport {
    pub key: String,
    pub source: CredentialSource,
    pub masked_value: String,
}

/// Repository source entry in a report
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub id: &'static str,
    pub url: &'static str,
}

/// Sub-project entry in a report
#[derive(Debug, Clone, Serialize)]
pub struct SubprojectReport {
    pub name: String,
    pub build_dir: PathBuf,
    pub evaluation_depends_on: Vec<String>,
    pub extra_property_keys: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::MAPBOX_DOWNLOADS_TOKEN;
    use std::fs;

    fn gradle_project(root: &Path, name: &str, kts: bool) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        let build_file = if kts { "build.gradle.kts" } else { "build.gradle" };
        fs::write(dir.join(build_file), "// gradle\n").unwrap();
    }

    // Everything runs against defaults except the build_dir redirect, which
    // stays inside the temp tree so the paths are easy to assert on.
    fn schema() -> ConfigSchema {
        let mut schema = ConfigSchema::default();
        schema.project.build_dir = "build".to_string();
        schema
    }

    #[test]
    fn test_discovery_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "maps_plugin", true);
        gradle_project(dir.path(), "app", false);
        gradle_project(dir.path(), ".hidden", false);
        fs::create_dir_all(dir.path().join("docs")).unwrap();

        let config = BuildConfiguration::configure(dir.path(), &schema()).unwrap();
        let names: Vec<&str> = config.subprojects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["app", "maps_plugin"]);
    }

    #[test]
    fn test_build_dirs_derive_from_redirected_root() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "app", false);

        let config = BuildConfiguration::configure(dir.path(), &schema()).unwrap();
        assert_eq!(
            config.subprojects[0].build_dir,
            dir.path().join("build").join("app")
        );
    }

    #[test]
    fn test_token_propagates_to_every_subproject() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "app", false);
        gradle_project(dir.path(), "maps_plugin", true);
        fs::write(
            dir.path().join(LOCAL_PROPERTIES),
            "MAPBOX_DOWNLOADS_TOKEN=pk.eyJ1Ijo1234567890\n",
        )
        .unwrap();

        let config = BuildConfiguration::configure(dir.path(), &schema()).unwrap();
        assert_eq!(config.subprojects.len(), 2);
        for subproject in &config.subprojects {
            assert_eq!(
                subproject.extra_properties.get(MAPBOX_DOWNLOADS_TOKEN),
                Some(&"pk.eyJ1Ijo1234567890".to_string())
            );
        }
    }

    #[test]
    fn test_unset_token_leaves_extra_properties_empty() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "app", false);

        let mut schema = schema();
        // A key nothing sets, so the pass cannot pick the value up from the
        // test runner's environment.
        schema.credentials.key = "FOODSHARE_TEST_UNSET_KEY".to_string();

        let config = BuildConfiguration::configure(dir.path(), &schema).unwrap();
        assert!(config.credential.is_none());
        assert!(config.subprojects[0].extra_properties.is_empty());
    }

    #[test]
    fn test_evaluation_depends_on_app() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "app", false);
        gradle_project(dir.path(), "maps_plugin", true);

        let config = BuildConfiguration::configure(dir.path(), &schema()).unwrap();
        for subproject in &config.subprojects {
            if subproject.name == APP_SUBPROJECT {
                assert!(subproject.evaluation_depends_on.is_empty());
            } else {
                assert_eq!(subproject.evaluation_depends_on, vec!["app"]);
            }
        }
    }

    #[test]
    fn test_pinned_subprojects_skip_discovery() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "app", false);

        let mut schema = schema();
        schema.project.subprojects = vec!["app".to_string(), "maps".to_string()];

        let config = BuildConfiguration::configure(dir.path(), &schema).unwrap();
        let names: Vec<&str> = config.subprojects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["app", "maps"]);
    }

    #[test]
    fn test_malformed_properties_fail_the_pass() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "app", false);
        fs::write(dir.path().join(LOCAL_PROPERTIES), "no equals sign here\n").unwrap();

        let err = BuildConfiguration::configure(dir.path(), &schema()).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::PropertiesParseError);
    }

    #[test]
    fn test_report_masks_credential() {
        let dir = tempfile::tempdir().unwrap();
        gradle_project(dir.path(), "app", false);
        fs::write(
            dir.path().join(LOCAL_PROPERTIES),
            "MAPBOX_DOWNLOADS_TOKEN=pk.eyJ1Ijo1234567890\n",
        )
        .unwrap();

        let config = BuildConfiguration::configure(dir.path(), &schema()).unwrap();
        let report = config.report();
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("pk.e********"));
        assert!(!json.contains("pk.eyJ1Ijo1234567890"));
        assert!(json.contains("local_properties"));
    }
}
