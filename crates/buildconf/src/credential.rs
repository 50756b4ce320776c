//! Mapbox downloads token resolution
//!
//! The token is looked up in `local.properties` first and the process
//! environment second; that order is fixed. Absence is not an error — the
//! Gradle side tolerates an unset token for builds that skip Mapbox SDK
//! downloads.

use crate::properties::LocalProperties;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default credential key, matching the Gradle build script
pub const MAPBOX_DOWNLOADS_TOKEN: &str = "MAPBOX_DOWNLOADS_TOKEN";

/// Where a resolved credential value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    LocalProperties,
    Environment,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalProperties => write!(f, "local.properties"),
            Self::Environment => write!(f, "environment"),
        }
    }
}

/// A resolved credential and its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    /// Which tier of the lookup produced the value
    pub source: CredentialSource,
}

impl Credential {
    /// The raw credential value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Display form that never exposes the full value
    pub fn masked(&self) -> String {
        if self.value.chars().count() <= 8 {
            "********".to_string()
        } else {
            let prefix: String = self.value.chars().take(4).collect();
            format!("{prefix}********")
        }
    }
}

/// Resolve a credential: `local.properties` first, environment second,
/// `None` if neither defines it
pub fn resolve(name: &str, props: &LocalProperties) -> Option<Credential> {
    let credential = resolve_with(name, props, |key| std::env::var(key).ok());
    match &credential {
        Some(c) => tracing::debug!(key = name, source = %c.source, "credential resolved"),
        None => tracing::debug!(key = name, "credential not set"),
    }
    credential
}

fn resolve_with(
    name: &str,
    props: &LocalProperties,
    env: impl Fn(&str) -> Option<String>,
) -> Option<Credential> {
    if let Some(value) = props.get(name) {
        return Some(Credential {
            value: value.to_string(),
            source: CredentialSource::LocalProperties,
        });
    }

    env(name).map(|value| Credential {
        value,
        source: CredentialSource::Environment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(content: &str) -> LocalProperties {
        LocalProperties::parse(content).unwrap()
    }

    #[test]
    fn test_properties_take_precedence_over_environment() {
        let props = props("MAPBOX_DOWNLOADS_TOKEN=pk.from-properties\n");
        let credential = resolve_with(MAPBOX_DOWNLOADS_TOKEN, &props, |_| {
            Some("pk.from-environment".to_string())
        })
        .unwrap();

        assert_eq!(credential.value(), "pk.from-properties");
        assert_eq!(credential.source, CredentialSource::LocalProperties);
    }

    #[test]
    fn test_environment_fallback() {
        let props = props("sdk.dir=/opt/android-sdk\n");
        let credential = resolve_with(MAPBOX_DOWNLOADS_TOKEN, &props, |key| {
            (key == MAPBOX_DOWNLOADS_TOKEN).then(|| "pk.from-environment".to_string())
        })
        .unwrap();

        assert_eq!(credential.value(), "pk.from-environment");
        assert_eq!(credential.source, CredentialSource::Environment);
    }

    #[test]
    fn test_unset_in_both_tiers() {
        let props = LocalProperties::default();
        assert!(resolve_with(MAPBOX_DOWNLOADS_TOKEN, &props, |_| None).is_none());
    }

    #[test]
    fn test_masked_keeps_prefix_only() {
        let credential = Credential {
            value: "pk.eyJ1Ijo1234567890".to_string(),
            source: CredentialSource::Environment,
        };
        assert_eq!(credential.masked(), "pk.e********");
    }

    #[test]
    fn test_masked_short_value_fully_hidden() {
        let credential = Credential {
            value: "short".to_string(),
            source: CredentialSource::LocalProperties,
        };
        assert_eq!(credential.masked(), "********");
    }
}
