//! Repository sources applied to every Gradle project
//!
//! Order matters: Gradle consults sources in declaration order, and the
//! Android build expects `google()` before `mavenCentral()`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A package source declared for the root project and every sub-project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositorySource {
    Google,
    MavenCentral,
}

impl RepositorySource {
    /// Stable identifier used in tool configuration and JSON reports
    pub fn id(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::MavenCentral => "maven-central",
        }
    }

    /// Registry URL the source resolves against
    pub fn url(&self) -> &'static str {
        match self {
            Self::Google => "https://dl.google.com/dl/android/maven2/",
            Self::MavenCentral => "https://repo.maven.apache.org/maven2/",
        }
    }
}

impl fmt::Display for RepositorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// The ordered default source list: Google's Maven registry, then Maven
/// Central
pub fn default_sources() -> Vec<RepositorySource> {
    vec![RepositorySource::Google, RepositorySource::MavenCentral]
}
