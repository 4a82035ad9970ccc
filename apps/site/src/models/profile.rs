use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Built-in résumé content, used when no `PROFILE_PATH` is configured.
const DEFAULT_PROFILE: &str = include_str!("../../content/profile.toml");

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Failed to read profile {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid profile: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Static résumé content rendered on the landing page.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub page_title: String,
    pub name: String,
    pub description: String,
    pub email: String,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub social_links: Vec<Link>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub projects: Vec<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Skill {
    pub category: String,
    pub detail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub title: String,
    pub organization: String,
    pub period: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

impl Profile {
    pub fn from_toml(raw: &str) -> Result<Self, ProfileError> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads the profile at `path`, or the built-in one when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ProfileError> {
        let Some(path) = path else {
            return Self::from_toml(DEFAULT_PROFILE);
        };

        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let profile = Self::from_toml(&raw)?;
        info!(path = %path.display(), name = %profile.name, "profile loaded");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_profile_parses() {
        let profile = Profile::load(None).unwrap();
        assert!(!profile.name.is_empty());
        assert!(!profile.jobs.is_empty());
        assert!(!profile.social_links.is_empty());
    }

    #[test]
    fn test_optional_sections_default_to_empty() {
        let profile = Profile::from_toml(
            r#"
            page_title = "CV"
            name = "Sam"
            description = "Engineer"
            email = "sam@example.com"
            "#,
        )
        .unwrap();
        assert!(profile.resume_url.is_none());
        assert!(profile.jobs.is_empty());
        assert!(profile.projects.is_empty());
    }

    #[test]
    fn test_missing_required_field_is_parse_error() {
        let err = Profile::from_toml(r#"name = "Sam""#).unwrap_err();
        assert!(matches!(err, ProfileError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            page_title = "Digital CV | Sam"
            name = "Sam"
            description = "Engineer"
            email = "sam@example.com"

            [[jobs]]
            title = "Backend Engineer"
            organization = "Acme"
            period = "2022 - 2024"
            highlights = ["Shipped things"]
            "#
        )
        .unwrap();

        let profile = Profile::load(Some(file.path())).unwrap();
        assert_eq!(profile.page_title, "Digital CV | Sam");
        assert_eq!(profile.jobs[0].organization, "Acme");
        assert_eq!(profile.jobs[0].highlights, vec!["Shipped things"]);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = Profile::load(Some(Path::new("/nonexistent/profile.toml"))).unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
